//! Overall quality verdict
//!
//! Reduces the pass/fail outcome of every recorded test into a single tier.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::TestRecord;

/// Overall link quality tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Quality {
    /// No tests ran
    #[default]
    Unknown,
    /// Every test passed
    Excellent,
    /// At least 80% of tests passed
    Good,
    /// At least 50% of tests passed
    Fair,
    /// Less than half of the tests passed
    Poor,
}

impl Quality {
    /// Tier name as rendered in reports.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reduce test records to a quality tier.
///
/// Thresholds are inclusive lower bounds evaluated in real arithmetic, so
/// exactly 80% is `Good` and exactly 50% is `Fair`. Records are read, never
/// mutated.
pub fn aggregate_quality(tests: &[TestRecord]) -> Quality {
    let total = tests.len();
    if total == 0 {
        return Quality::Unknown;
    }
    let passed = tests.iter().filter(|test| test.passed).count();

    if passed == total {
        Quality::Excellent
    } else if passed as f64 >= total as f64 * 0.8 {
        Quality::Good
    } else if passed as f64 >= total as f64 * 0.5 {
        Quality::Fair
    } else {
        Quality::Poor
    }
}
