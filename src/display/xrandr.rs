//! xrandr display backend
//!
//! Runs `xrandr --props` and parses connected outputs, their mode tables,
//! and the EDID property blobs. The mode table rows carry one entry per
//! advertised refresh rate; rates are rounded to whole Hz.

use tokio::process::Command;
use tracing::debug;

use super::{edid, DisplayEnumerator, DisplayIdentity, DisplayMode, EnumerationError};
use async_trait::async_trait;

/// Backend that shells out to `xrandr`.
#[derive(Debug, Default)]
pub struct XrandrEnumerator;

impl XrandrEnumerator {
    /// Create the backend. Availability is not checked here; see
    /// [`XrandrEnumerator::available`].
    pub fn new() -> Self {
        Self
    }

    /// Whether `xrandr` can run against a reachable display server.
    pub async fn available() -> bool {
        Command::new("xrandr")
            .arg("--query")
            .output()
            .await
            .map(|out| out.status.success())
            .unwrap_or(false)
    }

    async fn query(&self) -> Result<String, EnumerationError> {
        let output = Command::new("xrandr").arg("--props").output().await?;
        if !output.status.success() {
            return Err(EnumerationError::CommandFailed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl DisplayEnumerator for XrandrEnumerator {
    async fn list_connected_displays(&self) -> Result<Vec<DisplayIdentity>, EnumerationError> {
        let text = self.query().await?;
        Ok(parse_outputs(&text).into_iter().map(OutputBlock::into_identity).collect())
    }

    async fn list_available_modes(&self) -> Result<Vec<DisplayMode>, EnumerationError> {
        let text = self.query().await?;
        Ok(parse_outputs(&text)
            .into_iter()
            .flat_map(|block| block.modes)
            .collect())
    }

    fn name(&self) -> &'static str {
        "xrandr"
    }
}

/// One connected output parsed from the xrandr listing.
#[derive(Debug, Default)]
struct OutputBlock {
    name: String,
    primary: bool,
    current_resolution: Option<String>,
    modes: Vec<DisplayMode>,
    edid: Vec<u8>,
}

impl OutputBlock {
    fn into_identity(self) -> DisplayIdentity {
        let mut identity = if self.edid.is_empty() {
            DisplayIdentity::default()
        } else {
            edid::parse_identity(&self.edid).unwrap_or_else(|err| {
                debug!(output = %self.name, %err, "EDID parse failed");
                DisplayIdentity::default()
            })
        };
        if identity.friendly_name.is_empty() {
            identity.friendly_name = self.name;
        }
        identity.current_resolution = self.current_resolution;
        identity.is_primary = Some(self.primary);
        identity
    }
}

/// Parse the full `xrandr --props` (or `--query`) listing.
///
/// Disconnected outputs are skipped along with their property blocks.
fn parse_outputs(text: &str) -> Vec<OutputBlock> {
    let mut blocks: Vec<OutputBlock> = Vec::new();
    let mut connected = false;
    let mut in_edid = false;

    for line in text.lines() {
        if !line.starts_with(' ') && !line.starts_with('\t') {
            in_edid = false;
            match parse_output_header(line) {
                Some(block) => {
                    connected = true;
                    blocks.push(block);
                }
                None => connected = false,
            }
            continue;
        }

        if !connected {
            continue;
        }
        let Some(block) = blocks.last_mut() else {
            continue;
        };

        let trimmed = line.trim();
        if trimmed.starts_with("EDID:") {
            in_edid = true;
            continue;
        }
        if in_edid {
            match decode_hex(trimmed) {
                Some(bytes) => {
                    block.edid.extend(bytes);
                    continue;
                }
                None => in_edid = false,
            }
        }

        if let Some(modes) = parse_mode_line(line) {
            block.modes.extend(modes);
        }
    }

    blocks
}

/// Parse a `"HDMI-1 connected primary 1920x1080+0+0 ..."` header line.
/// Returns `None` for screen headers and disconnected outputs.
fn parse_output_header(line: &str) -> Option<OutputBlock> {
    let mut tokens = line.split_whitespace();
    let name = tokens.next()?.to_string();
    let rest: Vec<&str> = tokens.collect();
    if rest.first() != Some(&"connected") {
        return None;
    }

    let primary = rest.contains(&"primary");
    // Geometry token like 1920x1080+0+0; the part before '+' is the active mode
    let current_resolution = rest.iter().find_map(|token| {
        let (geometry, _) = token.split_once('+')?;
        let (w, h) = geometry.split_once('x')?;
        (w.parse::<u32>().is_ok() && h.parse::<u32>().is_ok()).then(|| geometry.to_string())
    });

    Some(OutputBlock {
        name,
        primary,
        current_resolution,
        ..OutputBlock::default()
    })
}

/// Parse a mode table row: `"   1920x1080     60.00*+  59.94    50.00"`.
/// Produces one `DisplayMode` per rate column.
fn parse_mode_line(line: &str) -> Option<Vec<DisplayMode>> {
    let mut tokens = line.split_whitespace();
    let (width_px, height_px) = parse_geometry(tokens.next()?)?;

    let mut modes = Vec::new();
    for token in tokens {
        let cleaned = token.trim_end_matches(|c| c == '*' || c == '+');
        if cleaned.is_empty() {
            continue;
        }
        let Ok(rate) = cleaned.parse::<f64>() else {
            return None;
        };
        if rate > 0.0 {
            modes.push(DisplayMode {
                width_px,
                height_px,
                refresh_hz: rate.round() as u32,
                bits_per_pixel: None,
            });
        }
    }

    if modes.is_empty() {
        None
    } else {
        Some(modes)
    }
}

/// `"1920x1080"` (optionally with an interlace suffix) → (1920, 1080).
fn parse_geometry(token: &str) -> Option<(u32, u32)> {
    let token = token.trim_end_matches('i');
    let (w, h) = token.split_once('x')?;
    Some((w.parse().ok()?, h.parse().ok()?))
}

/// Decode a run of hex pairs, rejecting anything that is not pure hex.
fn decode_hex(s: &str) -> Option<Vec<u8>> {
    if s.is_empty() || s.len() % 2 != 0 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    s.as_bytes()
        .chunks(2)
        .map(|pair| u8::from_str_radix(std::str::from_utf8(pair).ok()?, 16).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Screen 0: minimum 320 x 200, current 1920 x 1080, maximum 16384 x 16384
HDMI-1 connected primary 1920x1080+0+0 (normal left inverted right x axis y axis) 527mm x 296mm
\tEDID:
\t\t00ffffffffffff0010aca140
\t\t1234567817
   1920x1080     60.00*+  59.94    50.00
   1280x720      60.00    59.94
DP-1 disconnected (normal left inverted right x axis y axis)
VGA-1 connected 1280x1024+1920+0 (normal left inverted right x axis y axis) 376mm x 301mm
   1280x1024     75.02    60.02
";

    #[test]
    fn test_parse_connected_outputs() {
        let blocks = parse_outputs(SAMPLE);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].name, "HDMI-1");
        assert!(blocks[0].primary);
        assert_eq!(blocks[0].current_resolution.as_deref(), Some("1920x1080"));
        assert_eq!(blocks[1].name, "VGA-1");
        assert!(!blocks[1].primary);
    }

    #[test]
    fn test_parse_mode_table() {
        let blocks = parse_outputs(SAMPLE);
        let modes = &blocks[0].modes;
        assert_eq!(modes.len(), 5);
        assert!(modes.contains(&DisplayMode {
            width_px: 1920,
            height_px: 1080,
            refresh_hz: 60,
            bits_per_pixel: None
        }));
        // 59.94 rounds to 60: duplicates are tolerated, consumers dedup
        assert_eq!(
            modes.iter().filter(|m| m.refresh_hz == 60).count(),
            4
        );
        assert!(blocks[1].modes.iter().any(|m| m.refresh_hz == 75));
    }

    #[test]
    fn test_disconnected_outputs_skipped() {
        let blocks = parse_outputs(SAMPLE);
        assert!(blocks.iter().all(|b| b.name != "DP-1"));
    }

    #[test]
    fn test_edid_hex_collected() {
        let blocks = parse_outputs(SAMPLE);
        assert_eq!(blocks[0].edid.len(), 17);
        assert_eq!(&blocks[0].edid[..8], &[0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00]);
        assert!(blocks[1].edid.is_empty());
    }

    #[test]
    fn test_header_without_geometry() {
        let block = parse_output_header(
            "HDMI-2 connected (normal left inverted right x axis y axis)",
        )
        .unwrap();
        assert_eq!(block.current_resolution, None);
        assert!(!block.primary);
    }

    #[test]
    fn test_decode_hex_rejects_partial() {
        assert_eq!(decode_hex("00ff"), Some(vec![0x00, 0xFF]));
        assert_eq!(decode_hex("0f0"), None);
        assert_eq!(decode_hex("zz"), None);
    }

    #[test]
    fn test_interlaced_geometry() {
        assert_eq!(parse_geometry("1920x1080i"), Some((1920, 1080)));
    }
}
