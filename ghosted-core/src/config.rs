//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/ghosted/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/ghosted/` (~/.config/ghosted/)
//! - Data: `$XDG_DATA_HOME/ghosted/` (~/.local/share/ghosted/)
//! - State/Logs: `$XDG_STATE_HOME/ghosted/` (~/.local/state/ghosted/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

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

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
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
    /// Engine timing configuration
    #[serde(default)]
    pub engine: EngineConfig,

    /// History persistence configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Engine timing configuration
///
/// Only the ticker intervals and the autosave cadence are configurable.
/// The message lifecycle delays and probabilities are contract constants
/// owned by the engine, not configuration.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct EngineConfig {
    /// Milliseconds between presence-status ticks
    #[serde(default = "default_status_tick_ms")]
    pub status_tick_ms: u64,

    /// Milliseconds between encouragement ticks
    #[serde(default = "default_encouragement_tick_ms")]
    pub encouragement_tick_ms: u64,

    /// Autosave the conversation into history every N sent messages
    #[serde(default = "default_autosave_every")]
    pub autosave_every: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            status_tick_ms: default_status_tick_ms(),
            encouragement_tick_ms: default_encouragement_tick_ms(),
            autosave_every: default_autosave_every(),
        }
    }
}

fn default_status_tick_ms() -> u64 {
    5000
}

fn default_encouragement_tick_ms() -> u64 {
    1000
}

fn default_autosave_every() -> u64 {
    5
}

/// History persistence configuration
#[derive(Debug, Deserialize, Default)]
pub struct StorageConfig {
    /// Override path for the history JSON file
    pub history_path: Option<PathBuf>,
}

impl StorageConfig {
    /// Returns the effective history file path (override or XDG default)
    pub fn effective_history_path(&self) -> PathBuf {
        self.history_path
            .clone()
            .unwrap_or_else(Config::history_path)
    }
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
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration, returning an error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.engine.status_tick_ms == 0 {
            return Err(Error::Config(
                "engine.status_tick_ms must be greater than zero".to_string(),
            ));
        }
        if self.engine.encouragement_tick_ms == 0 {
            return Err(Error::Config(
                "engine.encouragement_tick_ms must be greater than zero".to_string(),
            ));
        }
        if self.engine.autosave_every == 0 {
            return Err(Error::Config(
                "engine.autosave_every must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/ghosted/config.toml` (~/.config/ghosted/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("ghosted").join("config.toml")
    }

    /// Returns the data directory path (for the history file)
    ///
    /// `$XDG_DATA_HOME/ghosted/` (~/.local/share/ghosted/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("ghosted")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/ghosted/` (~/.local/state/ghosted/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("ghosted")
    }

    /// Returns the history file path
    ///
    /// `$XDG_DATA_HOME/ghosted/history.json` (~/.local/share/ghosted/history.json)
    pub fn history_path() -> PathBuf {
        Self::data_dir().join("history.json")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/ghosted/ghosted.log` (~/.local/state/ghosted/ghosted.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("ghosted.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.engine.status_tick_ms, 5000);
        assert_eq!(config.engine.encouragement_tick_ms, 1000);
        assert_eq!(config.engine.autosave_every, 5);
        assert!(config.storage.history_path.is_none());
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[engine]
status_tick_ms = 2500
autosave_every = 3

[storage]
history_path = "/tmp/ghosted-history.json"

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.engine.status_tick_ms, 2500);
        // Unspecified fields fall back to their defaults
        assert_eq!(config.engine.encouragement_tick_ms, 1000);
        assert_eq!(config.engine.autosave_every, 3);
        assert_eq!(
            config.storage.history_path.as_deref(),
            Some(std::path::Path::new("/tmp/ghosted-history.json"))
        );
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_validate_rejects_zero_intervals() {
        let toml = r#"
[engine]
status_tick_ms = 0
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.validate().is_err());

        let toml = r#"
[engine]
autosave_every = 0
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_history_path_override() {
        let storage = StorageConfig {
            history_path: Some(PathBuf::from("/tmp/elsewhere.json")),
        };
        assert_eq!(
            storage.effective_history_path(),
            PathBuf::from("/tmp/elsewhere.json")
        );

        let storage = StorageConfig::default();
        assert!(storage.effective_history_path().ends_with("history.json"));
    }
}
