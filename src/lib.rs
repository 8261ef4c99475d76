//! # hdmi-linkcheck
//!
//! HDMI link capability checker for Linux.
//!
//! Reports on connected display hardware and estimates whether an HDMI
//! connection can sustain given resolution/refresh-rate combinations, using
//! read-only OS queries plus a closed-form bandwidth formula. It does not
//! measure electrical signal quality; it infers capability limits from the
//! modes the OS claims to support and compares them against the fixed
//! bandwidth ceilings of the HDMI revisions.
//!
//! # Architecture
//!
//! ```text
//! hdmi-linkcheck
//!   ├─> Display Enumerator (xrandr / sysfs DRM, EDID identity parsing)
//!   ├─> Mode Support Probes (resolution + refresh-rate evaluation)
//!   ├─> Bandwidth Analyzer (requirement formula + HDMI revision ceilings)
//!   ├─> Stability Sampler (timed connection polling, cancellable)
//!   └─> Link Report (aggregation, quality verdict, rendering, JSON)
//! ```
//!
//! # Data Flow
//!
//! Displays and the mode catalog are fetched once, each probe appends one
//! test record to the [`report::LinkReport`], the quality verdict is reduced
//! from the records last, and the finished report is handed by value to
//! rendering and persistence.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// HDMI bandwidth estimation and revision compatibility
pub mod bandwidth;

/// Checker configuration
pub mod config;

/// Display enumeration backends and identity parsing
pub mod display;

/// Link test probes: mode support, bandwidth scenarios, stability sampling
pub mod probes;

/// Result aggregation, quality verdict, rendering, and persistence
pub mod report;

/// Test-sequence orchestration
pub mod runner;
