//! Console rendering
//!
//! Builds the human-readable test report: run header, detected displays,
//! per-test outcomes, and the bandwidth compatibility table.

use crate::bandwidth::HDMI_REVISIONS;
use crate::display::DisplayIdentity;

use super::{LinkReport, StabilitySample, TestDetails, TestRecord};

const LINE_WIDTH: usize = 70;

/// Render the full report as console text.
pub fn format_text(report: &LinkReport) -> String {
    let mut out = String::new();

    out.push_str(&"=".repeat(LINE_WIDTH));
    out.push('\n');
    out.push_str(&center("HDMI LINK TEST REPORT"));
    out.push('\n');
    out.push_str(&"=".repeat(LINE_WIDTH));
    out.push('\n');
    out.push_str(&format!(
        "\nTest Date: {}\n",
        report.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!("Platform: {}\n", report.platform));
    out.push_str(&format!("OS: {}\n", report.os_version));
    out.push_str(&format!(
        "\nOverall Link Quality: {}\n",
        report.overall_quality
    ));

    out.push_str(&format!("\n{}\n", "-".repeat(LINE_WIDTH)));
    out.push_str("\n📺 DETECTED DISPLAYS:\n");
    if report.displays.is_empty() {
        out.push_str("\n  (none detected)\n");
    }
    for (index, display) in report.displays.iter().enumerate() {
        render_display(&mut out, index + 1, display);
    }

    out.push_str(&format!("\n{}\n", "-".repeat(LINE_WIDTH)));
    out.push_str("\n📊 TEST RESULTS:\n");
    for test in &report.tests {
        render_test(&mut out, test);
    }

    if !report.notes.is_empty() {
        out.push_str(&format!("\n{}\n", "-".repeat(LINE_WIDTH)));
        out.push_str("\n⚠ NOTES:\n");
        for note in &report.notes {
            out.push_str(&format!("  • {note}\n"));
        }
    }

    out.push_str(&format!("\n{}\n", "=".repeat(LINE_WIDTH)));
    out
}

fn center(text: &str) -> String {
    let padding = LINE_WIDTH.saturating_sub(text.chars().count()) / 2;
    format!("{}{}", " ".repeat(padding), text)
}

fn render_display(out: &mut String, number: usize, display: &DisplayIdentity) {
    out.push_str(&format!("\n  Display {number}: {}", display.friendly_name));
    if display.is_primary == Some(true) {
        out.push_str(" (primary)");
    }
    out.push('\n');

    if !display.manufacturer.is_empty() {
        out.push_str(&format!("    Manufacturer: {}\n", display.manufacturer));
    }
    if !display.product_code.is_empty() {
        out.push_str(&format!("    Product code: {}\n", display.product_code));
    }
    if !display.serial_number.is_empty() {
        out.push_str(&format!("    Serial: {}\n", display.serial_number));
    }
    match (display.week_of_manufacture, display.year_of_manufacture) {
        (Some(week), Some(year)) => {
            out.push_str(&format!("    Manufactured: week {week} of {year}\n"));
        }
        (None, Some(year)) => out.push_str(&format!("    Manufactured: {year}\n")),
        _ => {}
    }
    if let Some(resolution) = &display.current_resolution {
        out.push_str(&format!("    Current mode: {resolution}\n"));
    }
    if let Some(bits) = display.bits_per_pixel {
        out.push_str(&format!("    Color depth: {bits} bpp\n"));
    }
}

fn render_test(out: &mut String, test: &TestRecord) {
    out.push_str(&format!(
        "\n  • {} — {}\n",
        test.test_name,
        if test.passed { "✅ PASSED" } else { "❌ FAILED" }
    ));

    match &test.details {
        TestDetails::Resolutions { resolutions_tested } => {
            for outcome in resolutions_tested {
                match &outcome.available_refresh_rates {
                    Some(rates) => out.push_str(&format!(
                        "      {}: ✓ supported ({} Hz)\n",
                        outcome.resolution,
                        join_rates(rates)
                    )),
                    None => out.push_str(&format!("      {}: ✗ not supported\n", outcome.resolution)),
                }
            }
        }
        TestDetails::RefreshRates { refresh_rates_tested } => {
            for outcome in refresh_rates_tested {
                out.push_str(&format!(
                    "      {}: {}\n",
                    outcome.refresh_rate,
                    if outcome.supported { "✓ supported" } else { "✗ not supported" }
                ));
            }
        }
        TestDetails::Bandwidth { scenarios } => render_bandwidth_table(out, scenarios),
        TestDetails::Stability {
            duration_seconds,
            samples,
        } => render_stability(out, *duration_seconds, samples),
    }
}

fn render_bandwidth_table(out: &mut String, scenarios: &[super::BandwidthOutcome]) {
    out.push_str("      Scenario             Bandwidth   ");
    for revision in &HDMI_REVISIONS {
        out.push_str(&format!("  {}", revision.label));
    }
    out.push('\n');
    out.push_str(&format!("      {}\n", "-".repeat(60)));

    for outcome in scenarios {
        out.push_str(&format!(
            "      {:<20} {:>6.2} Gbps",
            outcome.scenario, outcome.bandwidth_gbps
        ));
        for revision in &HDMI_REVISIONS {
            let mark = if outcome.compatible_revisions.iter().any(|r| r == revision.label) {
                "✓"
            } else {
                "✗"
            };
            out.push_str(&format!("  {mark:^8}"));
        }
        out.push('\n');
    }
}

fn render_stability(out: &mut String, duration_seconds: u32, samples: &[StabilitySample]) {
    let mut disconnections = 0;
    let mut poll_errors = 0;
    for sample in samples {
        match sample {
            StabilitySample::Counted { stable: false, .. } => disconnections += 1,
            StabilitySample::Failed { .. } => poll_errors += 1,
            StabilitySample::Counted { .. } => {}
        }
    }

    out.push_str(&format!(
        "      {} of {duration_seconds} samples collected\n",
        samples.len()
    ));
    if disconnections == 0 && poll_errors == 0 {
        out.push_str("      ✓ no disconnections detected\n");
        return;
    }
    if disconnections > 0 {
        out.push_str(&format!("      ✗ {disconnections} sample(s) with no display connected\n"));
    }
    if poll_errors > 0 {
        out.push_str(&format!("      ⚠ {poll_errors} poll error(s)\n"));
    }
}

fn join_rates(rates: &[u32]) -> String {
    rates
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
