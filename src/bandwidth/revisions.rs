//! Fixed HDMI revision catalog and compatibility classification.

use serde::Serialize;

/// An HDMI specification revision with its maximum signal bandwidth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HdmiRevision {
    /// Revision label, e.g. `"HDMI 2.0"`
    pub label: &'static str,
    /// Maximum signal bandwidth this revision can carry, in Gbps
    pub ceiling_gbps: f64,
}

/// The revision catalog, in the fixed order used for rendering.
pub const HDMI_REVISIONS: [HdmiRevision; 3] = [
    HdmiRevision { label: "HDMI 1.4", ceiling_gbps: 10.2 },
    HdmiRevision { label: "HDMI 2.0", ceiling_gbps: 18.0 },
    HdmiRevision { label: "HDMI 2.1", ceiling_gbps: 48.0 },
];

/// Revisions whose ceiling can carry `gbps`, in catalog order.
pub fn compatible_revisions(gbps: f64) -> Vec<&'static str> {
    HDMI_REVISIONS
        .iter()
        .filter(|rev| gbps <= rev.ceiling_gbps)
        .map(|rev| rev.label)
        .collect()
}
