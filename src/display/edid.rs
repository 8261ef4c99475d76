//! EDID identity parsing
//!
//! Extracts the identity fields from a raw EDID base block: manufacturer PNP
//! id, product code, serial, week/year of manufacture, panel color depth,
//! and the monitor-name and serial-string descriptors.

use super::{DisplayIdentity, EnumerationError};

const EDID_HEADER: [u8; 8] = [0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00];
const BASE_BLOCK_LEN: usize = 128;

/// Descriptor tags in the detailed-timing area.
const TAG_SERIAL_STRING: u8 = 0xFF;
const TAG_MONITOR_NAME: u8 = 0xFC;

/// Parse a display identity out of a raw EDID blob.
///
/// Only the 128-byte base block is read; extension blocks are ignored.
pub fn parse_identity(edid: &[u8]) -> Result<DisplayIdentity, EnumerationError> {
    if edid.len() < BASE_BLOCK_LEN {
        return Err(EnumerationError::Parse(format!(
            "EDID too short: {} bytes",
            edid.len()
        )));
    }
    if edid[..8] != EDID_HEADER {
        return Err(EnumerationError::Parse("EDID header mismatch".to_string()));
    }

    let mut identity = DisplayIdentity {
        manufacturer: decode_pnp_id(u16::from_be_bytes([edid[8], edid[9]])),
        product_code: format!("{:04X}", u16::from_le_bytes([edid[10], edid[11]])),
        serial_number: u32::from_le_bytes([edid[12], edid[13], edid[14], edid[15]]).to_string(),
        week_of_manufacture: (1..=53).contains(&edid[16]).then(|| u32::from(edid[16])),
        year_of_manufacture: (edid[17] > 0).then(|| 1990 + u32::from(edid[17])),
        bits_per_pixel: decode_color_depth(edid[20]),
        ..DisplayIdentity::default()
    };

    // Descriptor blocks: four 18-byte slots from offset 54
    let mut offset = 54;
    while offset + 18 <= BASE_BLOCK_LEN {
        let block = &edid[offset..offset + 18];
        if block[0] == 0 && block[1] == 0 {
            match block[3] {
                TAG_MONITOR_NAME => {
                    let text = descriptor_text(&block[5..18]);
                    if !text.is_empty() {
                        identity.friendly_name = text;
                    }
                }
                TAG_SERIAL_STRING => {
                    let text = descriptor_text(&block[5..18]);
                    if !text.is_empty() {
                        identity.serial_number = text;
                    }
                }
                _ => {}
            }
        }
        offset += 18;
    }

    Ok(identity)
}

/// Decode the big-endian packed 3×5-bit PNP manufacturer id.
fn decode_pnp_id(packed: u16) -> String {
    let letters = [
        (((packed >> 10) & 0x1F) as u8 + 0x40) as char,
        (((packed >> 5) & 0x1F) as u8 + 0x40) as char,
        ((packed & 0x1F) as u8 + 0x40) as char,
    ];
    if letters.iter().all(char::is_ascii_uppercase) {
        letters.iter().collect()
    } else {
        String::new()
    }
}

/// Panel bits per pixel from the digital video-input byte (offset 20).
fn decode_color_depth(input_byte: u8) -> Option<u32> {
    // Analog inputs do not encode a color depth
    if input_byte & 0x80 == 0 {
        return None;
    }
    let bits_per_component = match (input_byte >> 4) & 0x07 {
        1 => 6,
        2 => 8,
        3 => 10,
        4 => 12,
        5 => 14,
        6 => 16,
        _ => return None,
    };
    Some(bits_per_component * 3)
}

/// Descriptor text: up to 13 bytes, newline-terminated, space-padded.
fn descriptor_text(bytes: &[u8]) -> String {
    let text: Vec<u8> = bytes
        .iter()
        .copied()
        .take_while(|&b| b != 0x0A && b != 0x00)
        .collect();
    String::from_utf8_lossy(&text).trim().to_string()
}
