//! Report persistence
//!
//! Writes the finished report as pretty-printed JSON. Persistence failure is
//! reported to the caller as a status outcome; the in-memory report is never
//! affected.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::info;

use super::LinkReport;

/// Default report filename for a run started at `timestamp`.
pub fn default_report_filename(timestamp: DateTime<Utc>) -> PathBuf {
    PathBuf::from(format!(
        "hdmi_link_report_{}.json",
        timestamp.format("%Y%m%d_%H%M%S")
    ))
}

/// Write the report to `path` as pretty JSON.
pub fn save(report: &LinkReport, path: &Path) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(report).context("failed to serialize report")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    info!(path = %path.display(), "report saved");
    Ok(path.to_path_buf())
}
