//! Configuration system for the pedagent notebook agent panel.
//!
//! This crate provides configuration loading, saving, validation, and
//! default values. It includes:
//!
//! - [`Config`]: the panel configuration (chat endpoint, auto-run debounce,
//!   floating window geometry, log level)
//! - [`ConfigError`]: typed failures for config I/O and validation
//! - [`LogLevel`]: log verbosity selectable from the config file

pub mod config;
pub mod defaults;
pub mod error;
mod types;

pub use config::Config;
pub use error::ConfigError;
pub use types::LogLevel;
