//! The [`Config`] struct plus persistence and validation.
//!
//! Covers:
//! - `load` / `save` (YAML file I/O with atomic write) at the XDG path
//! - `load_from` / `save_to` for explicit paths (`--config`, tests)
//! - `validate` for semantic checks that serde cannot express

use crate::defaults;
use crate::error::ConfigError;
use crate::types::LogLevel;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Panel configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Chat backend URL receiving `POST {message_content}` requests.
    #[serde(default = "defaults::chat_endpoint")]
    pub chat_endpoint: String,

    /// Optional global timeout for chat requests, in seconds.
    /// `None` sends without a timeout.
    #[serde(default)]
    pub chat_timeout_secs: Option<u64>,

    /// Coalescing window for bursts of execution-scheduled signals.
    #[serde(default = "defaults::auto_run_debounce_ms")]
    pub auto_run_debounce_ms: u64,

    /// Minimum distance kept between a floating window and the container edge.
    #[serde(default = "defaults::window_gap")]
    pub window_gap: f64,

    /// Offset applied per already-open floating window on detach.
    #[serde(default = "defaults::window_stagger")]
    pub window_stagger: f64,

    /// Top coordinate of the first detached window.
    #[serde(default = "defaults::window_initial_top")]
    pub window_initial_top: f64,

    /// Horizontal inset from the origin widget on detach.
    #[serde(default = "defaults::window_origin_inset")]
    pub window_origin_inset: f64,

    /// Container width used when the host exposes no container.
    #[serde(default = "defaults::default_container_width")]
    pub default_container_width: f64,

    /// Container height used when the host exposes no container.
    #[serde(default = "defaults::default_container_height")]
    pub default_container_height: f64,

    /// Debug log verbosity.
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chat_endpoint: defaults::chat_endpoint(),
            chat_timeout_secs: None,
            auto_run_debounce_ms: defaults::auto_run_debounce_ms(),
            window_gap: defaults::window_gap(),
            window_stagger: defaults::window_stagger(),
            window_initial_top: defaults::window_initial_top(),
            window_origin_inset: defaults::window_origin_inset(),
            default_container_width: defaults::default_container_width(),
            default_container_height: defaults::default_container_height(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default path, creating it with defaults
    /// when it does not exist yet.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        log::info!("Config path: {:?}", config_path);

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            log::info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            if let Err(e) = config.save() {
                log::error!("Failed to save default config: {}", e);
                return Err(e);
            }
            Ok(config)
        }
    }

    /// Load and validate configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        log::info!("Loading config from {:?}", path);
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_yaml_ng::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to an explicit path.
    ///
    /// Writes to a temp file and renames it over the target so a crash never
    /// leaves a half-written config behind.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml_ng::to_string(self)?;
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml)?;
        fs::rename(&temp_path, path)?;
        Ok(())
    }

    /// Get the configuration file path: `~/.config/pedagent/config.yaml`.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    /// Get the configuration directory path (using XDG convention).
    pub fn config_dir() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join("pedagent")
            } else {
                PathBuf::from(".")
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            if let Some(home_dir) = dirs::home_dir() {
                home_dir.join(".config").join("pedagent")
            } else {
                PathBuf::from(".")
            }
        }
    }

    /// Check field values that deserialize fine but make no sense.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.window_gap >= 0.0) {
            return Err(ConfigError::Validation(format!(
                "window_gap must be >= 0, got {}",
                self.window_gap
            )));
        }
        if !(self.window_stagger >= 0.0) {
            return Err(ConfigError::Validation(format!(
                "window_stagger must be >= 0, got {}",
                self.window_stagger
            )));
        }
        if !(self.default_container_width > 0.0 && self.default_container_height > 0.0) {
            return Err(ConfigError::Validation(format!(
                "default container size must be positive, got {}x{}",
                self.default_container_width, self.default_container_height
            )));
        }
        if self.auto_run_debounce_ms == 0 {
            return Err(ConfigError::Validation(
                "auto_run_debounce_ms must be at least 1".to_string(),
            ));
        }

        let parsed = url::Url::parse(&self.chat_endpoint).map_err(|e| {
            ConfigError::Validation(format!(
                "chat_endpoint '{}' is not a valid URL: {}",
                self.chat_endpoint, e
            ))
        })?;
        match parsed.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ConfigError::Validation(format!(
                "chat_endpoint scheme '{}' is not supported; use http or https",
                scheme
            ))),
        }
    }

    /// The auto-run coalescing window as a [`Duration`].
    pub fn auto_run_debounce(&self) -> Duration {
        Duration::from_millis(self.auto_run_debounce_ms)
    }

    /// The chat request timeout, if one is configured.
    pub fn chat_timeout(&self) -> Option<Duration> {
        self.chat_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.window_gap, 5.0);
        assert_eq!(config.default_container_width, 2000.0);
        assert_eq!(config.default_container_height, 1500.0);
        assert_eq!(config.chat_timeout(), None);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let config: Config = serde_yaml_ng::from_str("window_gap: 8.0\n").unwrap();
        assert_eq!(config.window_gap, 8.0);
        assert_eq!(config.window_stagger, 20.0);
        assert_eq!(config.chat_endpoint, defaults::chat_endpoint());
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("config.yaml");

        let config = Config {
            chat_endpoint: "https://example.com/api/chat".to_string(),
            chat_timeout_secs: Some(15),
            auto_run_debounce_ms: 750,
            log_level: LogLevel::Debug,
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        assert!(!path.with_extension("yaml.tmp").exists());
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn load_rejects_invalid_yaml() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("config.yaml");
        fs::write(&path, "window_gap: [not a number\n").unwrap();

        match Config::load_from(&path) {
            Err(ConfigError::Parse(_)) => {}
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let result = Config::load_from(&dir.path().join("absent.yaml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn validation_rejects_bad_values() {
        let negative_gap = Config {
            window_gap: -1.0,
            ..Config::default()
        };
        assert!(matches!(
            negative_gap.validate(),
            Err(ConfigError::Validation(_))
        ));

        let zero_debounce = Config {
            auto_run_debounce_ms: 0,
            ..Config::default()
        };
        assert!(zero_debounce.validate().is_err());

        let flat_container = Config {
            default_container_height: 0.0,
            ..Config::default()
        };
        assert!(flat_container.validate().is_err());
    }

    #[test]
    fn validation_rejects_non_http_endpoint() {
        let config = Config {
            chat_endpoint: "file:///etc/passwd".to_string(),
            ..Config::default()
        };
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("file"), "error should name the scheme: {err}");

        let relative = Config {
            chat_endpoint: "/api/chat".to_string(),
            ..Config::default()
        };
        assert!(relative.validate().is_err());
    }
}
