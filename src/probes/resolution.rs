//! Resolution support probe
//!
//! Checks which standard resolutions the OS-reported mode catalog can
//! drive, and at which refresh rates. Match semantics are exact integer
//! equality on width and height; there is no nearest-match tolerance.

use std::collections::BTreeSet;

use chrono::Utc;
use tracing::debug;

use crate::display::DisplayMode;
use crate::report::{ResolutionOutcome, TestDetails, TestRecord};

use super::ResolutionProbe;

/// Record name for this probe.
pub const TEST_NAME: &str = "Resolution Support Test";

/// Probe each standard resolution against the available modes.
///
/// Unsupported resolutions are informational, not failures: the record
/// always passes, and the per-probe `supported` detail carries the data a
/// stricter policy would need.
pub fn evaluate(modes: &[DisplayMode], probes: &[ResolutionProbe]) -> TestRecord {
    let mut outcomes = Vec::with_capacity(probes.len());

    for probe in probes {
        // Dedup by refresh rate; BTreeSet keeps the record deterministic
        let rates: BTreeSet<u32> = modes
            .iter()
            .filter(|mode| mode.width_px == probe.width_px && mode.height_px == probe.height_px)
            .map(|mode| mode.refresh_hz)
            .collect();
        let supported = !rates.is_empty();

        debug!(resolution = probe.name, supported, "resolution probe");
        outcomes.push(ResolutionOutcome {
            resolution: format!("{}x{}", probe.width_px, probe.height_px),
            supported,
            available_refresh_rates: supported.then(|| rates.into_iter().collect()),
        });
    }

    TestRecord {
        test_name: TEST_NAME.to_string(),
        timestamp: Utc::now(),
        passed: true,
        details: TestDetails::Resolutions {
            resolutions_tested: outcomes,
        },
    }
}
