//! Shared integration test helpers for pedagent.
//!
//! # Usage
//!
//! ```ignore
//! mod common;
//! use common::{ScriptedBackend, Lcg, code_cell};
//! ```
//!
//! Note: Rust integration tests use `mod common;` (not `use`) to bring in
//! helpers from `tests/common/mod.rs`. The `#[allow(dead_code)]` attributes
//! suppress warnings when only a subset of helpers are used per file.

#![allow(dead_code)]

use parking_lot::Mutex;
use pedagent::{AgentPanel, HostContainers};
use pedagent_chat::{ChatBackend, ChatError};
use pedagent_config::Config;
use serde_json::{Value, json};
use std::collections::VecDeque;

pub const NOTEBOOK: &str = "analysis.ipynb";

/// In-memory chat backend returning scripted replies in order.
///
/// When the script runs out it echoes the message back as `echo: <msg>`.
#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<String, ChatError>>>,
    received: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: &str) -> Self {
        self.replies.lock().push_back(Ok(text.to_string()));
        self
    }

    pub fn fail_with_status(self, status: u16) -> Self {
        self.replies.lock().push_back(Err(ChatError::Status(status)));
        self
    }

    /// Messages received so far, in order
    pub fn received(&self) -> Vec<String> {
        self.received.lock().clone()
    }
}

impl ChatBackend for ScriptedBackend {
    fn send(&self, message: &str) -> Result<String, ChatError> {
        self.received.lock().push(message.to_string());
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(format!("echo: {message}")))
    }
}

/// Deterministic pseudo-random sequence for property-style tests
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    /// Uniform-ish value in `0..bound`
    pub fn below(&mut self, bound: u64) -> u64 {
        self.next_u64() % bound
    }

    /// Value in `[-range, range]`
    pub fn signed(&mut self, range: f64) -> f64 {
        let unit = self.below(10_001) as f64 / 10_000.0;
        (unit * 2.0 - 1.0) * range
    }
}

/// Serialized code cell as a drop payload
pub fn code_cell(id: &str) -> Value {
    json!({
        "id": id,
        "cell_type": "code",
        "source": ["import pandas as pd\n", "df = pd.read_csv('data.csv')"],
        "execution_count": 1,
        "outputs": []
    })
}

/// Serialized markdown cell as a drop payload
pub fn markdown_cell(id: &str) -> Value {
    json!({"id": id, "cell_type": "markdown", "source": "# Notes", "execution_count": null, "outputs": []})
}

/// A panel for [`NOTEBOOK`] with default config and no host container
pub fn new_panel() -> AgentPanel {
    AgentPanel::new(NOTEBOOK, &Config::default(), HostContainers::default())
}
