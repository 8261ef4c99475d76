//! Refresh-rate support probe
//!
//! Checks which standard refresh rates appear anywhere in the mode catalog,
//! regardless of resolution. The distinct-rate set is built once.

use std::collections::BTreeSet;

use chrono::Utc;
use tracing::debug;

use crate::display::DisplayMode;
use crate::report::{RefreshRateOutcome, TestDetails, TestRecord};

/// Record name for this probe.
pub const TEST_NAME: &str = "Refresh Rate Test";

/// Probe each standard rate against the distinct rates in the catalog.
///
/// Same informational policy as the resolution probe: the record always
/// passes, per-rate `supported` carries the detail.
pub fn evaluate(modes: &[DisplayMode], probes: &[u32]) -> TestRecord {
    let available: BTreeSet<u32> = modes.iter().map(|mode| mode.refresh_hz).collect();

    let outcomes = probes
        .iter()
        .map(|&rate| {
            let supported = available.contains(&rate);
            debug!(rate, supported, "refresh rate probe");
            RefreshRateOutcome {
                refresh_rate: format!("{rate}Hz"),
                supported,
            }
        })
        .collect();

    TestRecord {
        test_name: TEST_NAME.to_string(),
        timestamp: Utc::now(),
        passed: true,
        details: TestDetails::RefreshRates {
            refresh_rates_tested: outcomes,
        },
    }
}
