//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/mindstory/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/mindstory/` (~/.config/mindstory/)
//! - State/Logs: `$XDG_STATE_HOME/mindstory/` (~/.local/state/mindstory/)

use crate::error::{Error, Result};
use crate::format::{DateLabels, RelativeDateFormatter};
use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File name of the log inside [`Config::state_dir`]
pub const LOG_FILE_NAME: &str = "mindstory.log";

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Relative date labels
    #[serde(default)]
    pub labels: DateLabels,

    /// Display settings
    #[serde(default)]
    pub display: DisplayConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How dates are rendered
#[derive(Debug, Deserialize)]
pub struct DisplayConfig {
    /// UTC offset for long-form dates and offset-less timestamps (e.g. "+02:00")
    #[serde(default = "default_utc_offset")]
    pub utc_offset: String,

    /// Label shown in place of an unparseable timestamp
    #[serde(default)]
    pub placeholder: Option<String>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            utc_offset: default_utc_offset(),
            placeholder: None,
        }
    }
}

impl DisplayConfig {
    /// Parse the configured offset
    pub fn offset(&self) -> Result<FixedOffset> {
        parse_utc_offset(&self.utc_offset)
    }
}

fn default_utc_offset() -> String {
    "+00:00".to_string()
}

/// Parse a `+HH:MM` / `-HH:MM` offset. `Z` and `UTC` are accepted for zero.
pub fn parse_utc_offset(value: &str) -> Result<FixedOffset> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("z") || value.eq_ignore_ascii_case("utc") {
        return Ok(Utc.fix());
    }
    value
        .parse::<FixedOffset>()
        .map_err(|e| Error::Config(format!("invalid utc_offset {:?}: {}", value, e)))
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        // Surface a bad offset at load time
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        self.display.offset()?;

        // today/yesterday are shown alone; days_ago always follows a count
        if self.labels.today.trim().is_empty() || self.labels.yesterday.trim().is_empty() {
            return Err(Error::Config(
                "labels.today and labels.yesterday must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Build a formatter from the configured labels and offset
    pub fn formatter(&self) -> Result<RelativeDateFormatter> {
        Ok(RelativeDateFormatter::new(self.labels.clone()).with_offset(self.display.offset()?))
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/mindstory/config.toml` (~/.config/mindstory/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("mindstory").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/mindstory/` (~/.local/state/mindstory/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("mindstory")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/mindstory/mindstory.log` (~/.local/state/mindstory/mindstory.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join(LOG_FILE_NAME)
    }
}
