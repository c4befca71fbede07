//! Detached floating windows
//!
//! A tab's content can be popped out into a window that floats over the
//! host's main content area. This module provides:
//! - `FloatingWindowController`: owns the windows, their z-order, and the
//!   single active drag session
//! - `FloatingWindow`: position, requested size, and max-size bounds
//! - `DragSession`: incremental pointer tracking for a header drag
//! - `HostContainers`: the container candidates reported by the host

mod controller;
mod drag;
mod window;

pub use controller::FloatingWindowController;
pub use drag::DragSession;
pub use window::{FloatingWindow, FloatingWindowId, bounded_max_size, clamp_position};

use crate::geometry::Size;
use pedagent_config::Config;
use serde::{Deserialize, Serialize};

/// Layout constants for floating windows
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatingSettings {
    /// Distance kept between a window and the container's right/bottom edge
    pub gap: f64,
    /// Offset per already-open window on detach
    pub stagger: f64,
    /// Top coordinate of the first detached window
    pub initial_top: f64,
    /// Horizontal inset from the origin widget
    pub origin_inset: f64,
    /// Bounds used when the host reports no container
    pub default_container: Size,
}

impl FloatingSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            gap: config.window_gap,
            stagger: config.window_stagger,
            initial_top: config.window_initial_top,
            origin_inset: config.window_origin_inset,
            default_container: Size::new(
                config.default_container_width,
                config.default_container_height,
            ),
        }
    }
}

impl Default for FloatingSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Container candidates, in the order they are tried
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HostContainers {
    /// The host's main content panel (tabbed layouts)
    #[serde(default)]
    pub main_content: Option<Size>,
    /// The single-document main panel
    #[serde(default)]
    pub main_panel: Option<Size>,
}

/// Which candidate supplied the container bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerSource {
    MainContent,
    MainPanel,
    Default,
}

impl HostContainers {
    /// Pick the first available container, falling back to `default`.
    ///
    /// Falling back is a configuration problem on the host side; it is logged
    /// and the windows stay usable with the default bounds.
    pub fn resolve(&self, default: Size) -> (Size, ContainerSource) {
        if let Some(size) = self.main_content {
            return (size, ContainerSource::MainContent);
        }
        if let Some(size) = self.main_panel {
            return (size, ContainerSource::MainPanel);
        }
        log::warn!(
            "No container found for floating windows, using default bounds {}x{}",
            default.width,
            default.height
        );
        (default, ContainerSource::Default)
    }
}

/// Global cursor requested by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorStyle {
    #[default]
    Default,
    /// Shown for the whole viewport while a window is being dragged
    Move,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_prefers_main_content() {
        let containers = HostContainers {
            main_content: Some(Size::new(800.0, 600.0)),
            main_panel: Some(Size::new(1200.0, 900.0)),
        };
        let (size, source) = containers.resolve(Size::new(2000.0, 1500.0));
        assert_eq!(size, Size::new(800.0, 600.0));
        assert_eq!(source, ContainerSource::MainContent);
    }

    #[test]
    fn test_resolve_falls_back_to_main_panel_then_default() {
        let containers = HostContainers {
            main_content: None,
            main_panel: Some(Size::new(1200.0, 900.0)),
        };
        assert_eq!(
            containers.resolve(Size::new(1.0, 1.0)).1,
            ContainerSource::MainPanel
        );

        let (size, source) = HostContainers::default().resolve(Size::new(2000.0, 1500.0));
        assert_eq!(size, Size::new(2000.0, 1500.0));
        assert_eq!(source, ContainerSource::Default);
    }

    #[test]
    fn test_settings_follow_config() {
        let config = Config {
            window_gap: 8.0,
            default_container_width: 640.0,
            ..Config::default()
        };
        let settings = FloatingSettings::from_config(&config);
        assert_eq!(settings.gap, 8.0);
        assert_eq!(settings.stagger, 20.0);
        assert_eq!(settings.default_container, Size::new(640.0, 1500.0));
    }
}
