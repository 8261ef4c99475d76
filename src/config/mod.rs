//! Configuration management
//!
//! Handles loading, validation, and merging of configuration from:
//! - TOML files
//! - CLI arguments

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub mod types;

pub use types::{LoggingConfig, ReportConfig, StabilityConfig};

/// Configuration directory, preferring the XDG location.
pub fn config_dir() -> PathBuf {
    dirs::config_dir().map_or_else(
        || PathBuf::from("/etc/hdmi-linkcheck"),
        |dir| dir.join("hdmi-linkcheck"),
    )
}

/// Default configuration file path.
pub fn default_config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Resolve the log directory, falling back to the XDG data location.
pub fn resolve_log_dir(configured: &Option<PathBuf>) -> PathBuf {
    configured.clone().unwrap_or_else(|| {
        dirs::data_dir().map_or_else(
            || PathBuf::from("/tmp/hdmi-linkcheck"),
            |dir| dir.join("hdmi-linkcheck/logs"),
        )
    })
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Stability sampling configuration
    #[serde(default)]
    pub stability: StabilityConfig,
    /// Report output configuration
    #[serde(default)]
    pub report: ReportConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.stability.duration_seconds == 0 {
            anyhow::bail!("stability.duration_seconds must be greater than zero");
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => anyhow::bail!("Invalid log level: {other}"),
        }

        Ok(())
    }

    /// Override config with CLI arguments
    pub fn with_overrides(mut self, duration: Option<u32>, skip_stability: bool) -> Self {
        if let Some(duration_seconds) = duration {
            self.stability.duration_seconds = duration_seconds;
        }
        if skip_stability {
            self.stability.enabled = false;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.stability.duration_seconds, 10);
        assert!(config.stability.enabled);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_zero_duration() {
        let mut config = Config::default();
        config.stability.duration_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let config = Config::default().with_overrides(Some(30), true);
        assert_eq!(config.stability.duration_seconds, 30);
        assert!(!config.stability.enabled);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: Config = toml::from_str("[stability]\nduration_seconds = 5\n").unwrap();
        assert_eq!(config.stability.duration_seconds, 5);
        assert!(config.stability.enabled);
        assert_eq!(config.logging.level, "info");
    }
}
