//! Default value functions for configuration.
//!
//! Used as `#[serde(default = "crate::defaults::...")]` attributes on
//! [`Config`](crate::Config) fields so partial config files still load.

// ── Chat backend ───────────────────────────────────────────────────────────

pub fn chat_endpoint() -> String {
    "http://127.0.0.1:8888/api/chat".to_string()
}

// ── Auto-run ───────────────────────────────────────────────────────────────

pub fn auto_run_debounce_ms() -> u64 {
    300
}

// ── Floating windows ───────────────────────────────────────────────────────

pub fn window_gap() -> f64 {
    5.0
}

pub fn window_stagger() -> f64 {
    20.0
}

pub fn window_initial_top() -> f64 {
    100.0
}

pub fn window_origin_inset() -> f64 {
    10.0
}

pub fn default_container_width() -> f64 {
    2000.0
}

pub fn default_container_height() -> f64 {
    1500.0
}
