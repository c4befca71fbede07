//! Command-line interface for pedagent.
//!
//! Parses global flags and the subcommand, and resolves the effective
//! configuration from the config file plus command-line overrides.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pedagent_chat::{ChatBackend, HttpChatBackend};
use pedagent_config::{Config, LogLevel};
use std::path::PathBuf;

/// pedagent - agent side panel for notebooks
#[derive(Parser, Debug)]
#[command(name = "pedagent")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file to use instead of ~/.config/pedagent/config.yaml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", value_parser = parse_log_level)]
    pub log_level: Option<LogLevel>,

    /// Chat endpoint overriding the configured one
    #[arg(long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the host bridge on stdin/stdout
    Serve,
    /// Send one message to the chat backend and print the reply
    Chat {
        /// Message text
        message: String,
    },
    /// Print the config path and the resolved configuration
    Config,
}

fn parse_log_level(value: &str) -> Result<LogLevel, String> {
    LogLevel::parse(value).ok_or_else(|| {
        format!("unknown log level '{value}' (expected off, error, warn, info, debug, trace)")
    })
}

/// Runtime options passed from the CLI to the subcommands
#[derive(Clone, Debug, Default)]
pub struct RuntimeOptions {
    pub config_path: Option<PathBuf>,
    pub log_level: Option<LogLevel>,
    pub endpoint: Option<String>,
}

impl From<&Cli> for RuntimeOptions {
    fn from(cli: &Cli) -> Self {
        Self {
            config_path: cli.config.clone(),
            log_level: cli.log_level,
            endpoint: cli.endpoint.clone(),
        }
    }
}

impl RuntimeOptions {
    /// Path the configuration is read from
    pub fn config_path(&self) -> PathBuf {
        self.config_path.clone().unwrap_or_else(Config::config_path)
    }

    /// Load the configuration and apply command-line overrides.
    ///
    /// An explicit `--config` file must exist; the default path is created
    /// with defaults on first run.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config_path {
            Some(path) => Config::load_from(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => Config::load().context("Failed to load config")?,
        };

        if let Some(endpoint) = &self.endpoint {
            config.chat_endpoint = endpoint.clone();
            config
                .validate()
                .context("Invalid --endpoint override")?;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        Ok(config)
    }
}

/// Build the HTTP chat backend described by `config`
pub fn chat_backend(config: &Config) -> Result<HttpChatBackend> {
    HttpChatBackend::new(&config.chat_endpoint, config.chat_timeout())
        .with_context(|| format!("Invalid chat endpoint {}", config.chat_endpoint))
}

/// `pedagent chat MESSAGE`
pub fn run_chat(backend: &dyn ChatBackend, message: &str) -> Result<String> {
    log::info!("One-shot chat request ({} chars)", message.len());
    backend.send(message).context("Chat request failed")
}

/// `pedagent config`
pub fn render_config(path: &std::path::Path, config: &Config) -> Result<String> {
    let yaml = serde_yaml_ng::to_string(config).context("Failed to serialize config")?;
    Ok(format!("# {}\n{}", path.display(), yaml))
}
