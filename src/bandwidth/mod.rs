//! HDMI bandwidth estimation
//!
//! Closed-form required-bandwidth calculation for a resolution, refresh rate,
//! color depth, and chroma subsampling combination. The result is an estimate
//! of the raw link rate a signal needs, including a fixed allowance for
//! blanking intervals and encoding, not a measurement of any real cable.

mod revisions;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use revisions::{compatible_revisions, HdmiRevision, HDMI_REVISIONS};

/// Fixed overhead factor for blanking intervals and encoding.
const OVERHEAD_FACTOR: f64 = 1.25;

/// Errors for malformed bandwidth inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BandwidthError {
    /// A dimension, rate, or depth was zero.
    #[error("{name} must be positive (got {value})")]
    InvalidArgument {
        /// Which input was rejected
        name: &'static str,
        /// The rejected value
        value: u32,
    },

    /// A chroma subsampling string did not name a known scheme.
    #[error("unsupported chroma subsampling: {0:?}")]
    UnsupportedChroma(String),
}

/// Chroma subsampling schemes.
///
/// The variant space is closed: an unrecognized scheme is rejected at the
/// string boundary ([`FromStr`]) instead of reaching the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChromaSubsampling {
    /// Full-resolution color (RGB / YCbCr 4:4:4)
    #[default]
    #[serde(rename = "4:4:4")]
    Full444,
    /// Horizontally halved chroma (YCbCr 4:2:2)
    #[serde(rename = "4:2:2")]
    Sub422,
    /// Quarter-resolution chroma (YCbCr 4:2:0)
    #[serde(rename = "4:2:0")]
    Sub420,
}

impl ChromaSubsampling {
    /// Effective bits per pixel for a given per-component bit depth.
    fn bits_per_pixel(self, bit_depth: u32) -> f64 {
        let depth = f64::from(bit_depth);
        match self {
            Self::Full444 => depth * 3.0,
            Self::Sub422 => depth * 2.0,
            Self::Sub420 => depth * 1.5,
        }
    }

    /// Conventional notation, e.g. `"4:4:4"`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Full444 => "4:4:4",
            Self::Sub422 => "4:2:2",
            Self::Sub420 => "4:2:0",
        }
    }
}

impl fmt::Display for ChromaSubsampling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ChromaSubsampling {
    type Err = BandwidthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "4:4:4" => Ok(Self::Full444),
            "4:2:2" => Ok(Self::Sub422),
            "4:2:0" => Ok(Self::Sub420),
            other => Err(BandwidthError::UnsupportedChroma(other.to_string())),
        }
    }
}

/// Required link bandwidth in Gbps, rounded to two decimal places.
///
/// `pixels/s × bits/pixel × 1.25 overhead`, reported in Gbps. Deterministic
/// and side-effect free. All inputs must be positive.
pub fn required_gbps(
    width_px: u32,
    height_px: u32,
    refresh_hz: u32,
    bit_depth: u32,
    chroma: ChromaSubsampling,
) -> Result<f64, BandwidthError> {
    for (name, value) in [
        ("width", width_px),
        ("height", height_px),
        ("refresh rate", refresh_hz),
        ("bit depth", bit_depth),
    ] {
        if value == 0 {
            return Err(BandwidthError::InvalidArgument { name, value });
        }
    }

    let pixels_per_second = f64::from(width_px) * f64::from(height_px) * f64::from(refresh_hz);
    let bits_per_second = pixels_per_second * chroma.bits_per_pixel(bit_depth) * OVERHEAD_FACTOR;
    let gbps = bits_per_second / 1e9;

    // f64::round is round-half-away-from-zero
    Ok((gbps * 100.0).round() / 100.0)
}
