//! Configuration section types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Stability sampling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilityConfig {
    /// Sampling duration in whole seconds (one poll per second)
    pub duration_seconds: u32,
    /// Run the timed stability loop at all
    pub enabled: bool,
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            duration_seconds: 10,
            enabled: true,
        }
    }
}

/// Report output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory for saved reports; current directory when unset
    pub output_dir: Option<PathBuf>,
    /// Save the JSON report after every run without asking
    pub auto_save: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
    /// Write logs to this directory in addition to the console
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
        }
    }
}
