//! Bandwidth analysis probe
//!
//! Runs the fixed scenario catalog through the bandwidth calculator and the
//! HDMI revision classifier. Purely computational; the mode catalog plays
//! no part here.

use chrono::Utc;
use tracing::warn;

use crate::bandwidth::{self, ChromaSubsampling};
use crate::report::{BandwidthOutcome, TestDetails, TestRecord};

use super::BANDWIDTH_SCENARIOS;

/// Record name for this probe.
pub const TEST_NAME: &str = "Bandwidth Analysis";

/// Bit depth assumed for all scenarios, in bits per component.
const SCENARIO_BIT_DEPTH: u32 = 8;

/// Analyze every scenario in the fixed catalog.
pub fn evaluate() -> TestRecord {
    let mut outcomes = Vec::with_capacity(BANDWIDTH_SCENARIOS.len());

    for scenario in &BANDWIDTH_SCENARIOS {
        match bandwidth::required_gbps(
            scenario.width_px,
            scenario.height_px,
            scenario.refresh_hz,
            SCENARIO_BIT_DEPTH,
            ChromaSubsampling::Full444,
        ) {
            Ok(gbps) => outcomes.push(BandwidthOutcome {
                scenario: scenario.name.to_string(),
                bandwidth_gbps: gbps,
                compatible_revisions: bandwidth::compatible_revisions(gbps)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            }),
            Err(err) => warn!(scenario = scenario.name, %err, "scenario rejected"),
        }
    }

    TestRecord {
        test_name: TEST_NAME.to_string(),
        timestamp: Utc::now(),
        passed: true,
        details: TestDetails::Bandwidth { scenarios: outcomes },
    }
}
