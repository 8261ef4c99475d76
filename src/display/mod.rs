//! Display enumeration
//!
//! Read-only collaborators that answer two questions: which displays are
//! connected, and which modes does the OS claim to support. Two backends are
//! provided: `xrandr` (preferred, reports the full mode catalog) and sysfs
//! DRM (fallback for sessions without a reachable X server).
//!
//! Failures are isolated per call so a failed query degrades the affected
//! test instead of halting the run.

mod drm;
mod edid;
mod xrandr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

pub use drm::DrmEnumerator;
pub use edid::parse_identity;
pub use xrandr::XrandrEnumerator;

/// One OS-reported display mode line.
///
/// Uniqueness is not guaranteed by the source: the same (width, height,
/// refresh) triple may appear once per output. Consumers deduplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DisplayMode {
    /// Horizontal resolution in pixels
    pub width_px: u32,
    /// Vertical resolution in pixels
    pub height_px: u32,
    /// Refresh rate in Hz, rounded to the nearest integer
    pub refresh_hz: u32,
    /// Bits per pixel, when the source reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bits_per_pixel: Option<u32>,
}

/// Identity snapshot of a connected display, taken at detection time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DisplayIdentity {
    /// Three-letter PNP manufacturer id from EDID, e.g. `"DEL"`
    pub manufacturer: String,
    /// Manufacturer product code, hex-formatted
    pub product_code: String,
    /// Serial number (EDID serial string descriptor, or the numeric serial)
    pub serial_number: String,
    /// Human-readable name (EDID monitor-name descriptor, or the output port)
    pub friendly_name: String,
    /// Year of manufacture from EDID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_of_manufacture: Option<u32>,
    /// Week of manufacture from EDID, when encoded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_of_manufacture: Option<u32>,
    /// Active resolution, e.g. `"1920x1080"`, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_resolution: Option<String>,
    /// Panel bits per pixel derived from the EDID color depth, when encoded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bits_per_pixel: Option<u32>,
    /// Whether this is the primary display, when the backend reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_primary: Option<bool>,
}

/// Errors from display enumeration backends.
#[derive(Debug, Error)]
pub enum EnumerationError {
    /// The query command ran but reported failure.
    #[error("display query command failed: {0}")]
    CommandFailed(String),

    /// No usable backend data source.
    #[error("display enumeration unavailable: {0}")]
    Unavailable(String),

    /// Backend output could not be parsed.
    #[error("failed to parse display data: {0}")]
    Parse(String),

    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Read-only display enumeration seam.
///
/// Implementations may return empty sequences but must not silently
/// truncate. Each call fails independently.
#[async_trait]
pub trait DisplayEnumerator: Send + Sync {
    /// Identities of currently connected displays.
    async fn list_connected_displays(&self) -> Result<Vec<DisplayIdentity>, EnumerationError>;

    /// All display modes the OS claims to support, across all outputs.
    async fn list_available_modes(&self) -> Result<Vec<DisplayMode>, EnumerationError>;

    /// Backend name for logging.
    fn name(&self) -> &'static str;
}

/// Pick the best available backend for this session.
pub async fn detect_backend() -> Box<dyn DisplayEnumerator> {
    if XrandrEnumerator::available().await {
        info!("using xrandr display backend");
        Box::new(XrandrEnumerator::new())
    } else {
        info!("xrandr not reachable, falling back to sysfs DRM backend");
        Box::new(DrmEnumerator::new())
    }
}
