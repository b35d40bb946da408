// src/transform/encode.rs
//
// Outbound encoder: what the user typed -> bytes for the port.

use crate::error::EncodeError;

/// Encode send-box text for transmission.
///
/// In text mode the UTF-8 bytes are sent as-is. In hex mode the text is a run
/// of hex digit pairs, optionally separated by spaces (`"41 42"`, `"4142"`).
pub fn encode_outbound(text: &str, hex_mode: bool) -> Result<Vec<u8>, EncodeError> {
    if hex_mode {
        decode_hex(text)
    } else {
        Ok(text.as_bytes().to_vec())
    }
}

/// Decode space-separated hex digits into bytes.
///
/// An empty string, a non-hex character or an odd number of digits is rejected:
/// a trailing half byte has no unambiguous meaning.
pub fn decode_hex(text: &str) -> Result<Vec<u8>, EncodeError> {
    let cleaned: String = text.chars().filter(|c| *c != ' ').collect();
    if cleaned.is_empty() {
        return Err(EncodeError::InvalidHex(text.to_string()));
    }
    hex::decode(&cleaned).map_err(|_| EncodeError::InvalidHex(text.to_string()))
}
