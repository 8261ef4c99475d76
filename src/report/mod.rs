//! Result aggregation
//!
//! The [`LinkReport`] is the single value threaded through a run: displays
//! and test records are appended as probes complete, the overall quality is
//! reduced from the records last, and the finished report is handed whole to
//! rendering and persistence. There is no global accumulator.

mod persist;
mod quality;
pub mod render;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::display::DisplayIdentity;

pub use persist::{default_report_filename, save};
pub use quality::{aggregate_quality, Quality};

/// One appended test outcome.
///
/// Records are append-only: once pushed onto a report, `passed` is never
/// rewritten. The quality verdict reads records without mutating them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TestRecord {
    /// Human-readable test name
    pub test_name: String,
    /// When the test ran
    pub timestamp: DateTime<Utc>,
    /// Whether the test passed (informational tests always pass)
    pub passed: bool,
    /// Test-specific detail payload
    #[serde(flatten)]
    pub details: TestDetails,
}

/// Per-test detail payloads, one variant per test kind.
///
/// Serialized with a `Kind` tag and the detail fields flattened into the
/// record, so each persisted record is keyed by its own detail array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "Kind")]
pub enum TestDetails {
    /// Resolution support probe outcomes
    Resolutions {
        /// One outcome per probed resolution
        #[serde(rename = "ResolutionsTested")]
        resolutions_tested: Vec<ResolutionOutcome>,
    },
    /// Refresh-rate support probe outcomes
    RefreshRates {
        /// One outcome per probed rate
        #[serde(rename = "RefreshRatesTested")]
        refresh_rates_tested: Vec<RefreshRateOutcome>,
    },
    /// Bandwidth feasibility scenario outcomes
    Bandwidth {
        /// One outcome per scenario
        #[serde(rename = "BandwidthScenarios")]
        scenarios: Vec<BandwidthOutcome>,
    },
    /// Connection stability samples
    Stability {
        /// Requested sampling duration in seconds
        #[serde(rename = "DurationSeconds")]
        duration_seconds: u32,
        /// One sample per polling tick (may be fewer if interrupted)
        #[serde(rename = "Samples")]
        samples: Vec<StabilitySample>,
    },
}

/// Outcome of probing one standard resolution against the mode catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResolutionOutcome {
    /// Probed resolution, e.g. `"1920x1080"`
    pub resolution: String,
    /// Whether any available mode matches exactly
    pub supported: bool,
    /// Distinct refresh rates available at this resolution, sorted ascending
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_refresh_rates: Option<Vec<u32>>,
}

/// Outcome of probing one standard refresh rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RefreshRateOutcome {
    /// Probed rate, e.g. `"144Hz"`
    pub refresh_rate: String,
    /// Whether any available mode advertises this rate
    pub supported: bool,
}

/// Outcome of one bandwidth feasibility scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BandwidthOutcome {
    /// Scenario label, e.g. `"4K@120Hz"`
    pub scenario: String,
    /// Required bandwidth in Gbps
    pub bandwidth_gbps: f64,
    /// HDMI revisions able to carry the signal, in catalog order
    pub compatible_revisions: Vec<String>,
}

/// One connection stability sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StabilitySample {
    /// The poll succeeded and reported a display count.
    #[serde(rename_all = "PascalCase")]
    Counted {
        /// 1-based polling tick
        time_index: u32,
        /// Connected display count at this tick
        displays_connected: u32,
        /// Whether at least one display was connected
        stable: bool,
    },
    /// The poll itself failed; no stability judgement for this tick.
    #[serde(rename_all = "PascalCase")]
    Failed {
        /// 1-based polling tick
        time_index: u32,
        /// Why the poll failed
        error: String,
    },
}

/// Aggregate of one full run, handed by value to rendering and persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkReport {
    /// When the run started
    #[serde(rename = "Timestamp")]
    pub timestamp: DateTime<Utc>,
    /// OS family, e.g. `"Linux"`
    #[serde(rename = "Platform")]
    pub platform: String,
    /// OS release description
    #[serde(rename = "OSVersion")]
    pub os_version: String,
    /// Identities of detected displays
    #[serde(rename = "Displays")]
    pub displays: Vec<DisplayIdentity>,
    /// Test records in execution order
    #[serde(rename = "Tests")]
    pub tests: Vec<TestRecord>,
    /// Overall verdict, `Unknown` until finalized
    #[serde(rename = "OverallQuality")]
    pub overall_quality: Quality,
    /// Warning-level notes (collaborator failures); omitted when empty
    #[serde(rename = "Notes", default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl LinkReport {
    /// Empty report for a run starting now.
    pub fn new(platform: impl Into<String>, os_version: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            platform: platform.into(),
            os_version: os_version.into(),
            displays: Vec::new(),
            tests: Vec::new(),
            overall_quality: Quality::Unknown,
            notes: Vec::new(),
        }
    }

    /// Append a finished test record.
    pub fn record(&mut self, test: TestRecord) {
        self.tests.push(test);
    }

    /// Attach a warning-level note.
    pub fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    /// Reduce all recorded outcomes into the overall quality verdict.
    pub fn finalize(&mut self) {
        self.overall_quality = aggregate_quality(&self.tests);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> LinkReport {
        let mut report = LinkReport::new("Linux", "Test OS 1.0");
        report.record(TestRecord {
            test_name: "Resolution Support Test".to_string(),
            timestamp: report.timestamp,
            passed: true,
            details: TestDetails::Resolutions {
                resolutions_tested: vec![ResolutionOutcome {
                    resolution: "1920x1080".to_string(),
                    supported: true,
                    available_refresh_rates: Some(vec![60, 144]),
                }],
            },
        });
        report.record(TestRecord {
            test_name: "Signal Stability Test".to_string(),
            timestamp: report.timestamp,
            passed: false,
            details: TestDetails::Stability {
                duration_seconds: 2,
                samples: vec![
                    StabilitySample::Counted {
                        time_index: 1,
                        displays_connected: 1,
                        stable: true,
                    },
                    StabilitySample::Failed {
                        time_index: 2,
                        error: "poll failed".to_string(),
                    },
                ],
            },
        });
        report.finalize();
        report
    }

    #[test]
    fn test_top_level_keys() {
        let json = serde_json::to_value(sample_report()).unwrap();
        let object = json.as_object().unwrap();
        for key in ["Timestamp", "Platform", "OSVersion", "Displays", "Tests", "OverallQuality"] {
            assert!(object.contains_key(key), "missing {key}");
        }
        // Notes omitted when empty
        assert!(!object.contains_key("Notes"));
    }

    #[test]
    fn test_records_keyed_by_detail_arrays() {
        let json = serde_json::to_value(sample_report()).unwrap();
        let tests = json["Tests"].as_array().unwrap();
        assert!(tests[0]["ResolutionsTested"].is_array());
        assert_eq!(tests[0]["Kind"], "Resolutions");
        assert_eq!(tests[1]["DurationSeconds"], 2);
        assert!(tests[1]["Samples"][0]["Stable"].as_bool().unwrap());
        assert!(tests[1]["Samples"][1].get("Stable").is_none());
    }

    #[test]
    fn test_json_round_trip() {
        let report = sample_report();
        let json = serde_json::to_string_pretty(&report).unwrap();
        let back: LinkReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.tests, report.tests);
        assert_eq!(back.overall_quality, report.overall_quality);
        assert_eq!(serde_json::to_string_pretty(&back).unwrap(), json);
    }

    #[test]
    fn test_finalize_does_not_rewrite_records() {
        let report = sample_report();
        assert!(report.tests[0].passed);
        assert!(!report.tests[1].passed);
        assert_eq!(report.overall_quality, Quality::Fair);
    }
}
