//! String handling utilities
//!
//! DSKIMG text fields are fixed-width US-ASCII, padded with blanks or NULs.

use alloc::string::String;

/// Is this byte blank padding (NUL, control, or space)?
fn is_blank(byte: u8) -> bool {
    byte <= b' '
}

/// Trim leading and trailing blank padding from byte slice
pub fn trim_blanks(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| !is_blank(b)).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|&b| !is_blank(b)).map_or(start, |i| i + 1);
    &bytes[start..end]
}

/// Trim trailing blank padding only
pub fn trim_trailing_blanks(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().rposition(|&b| !is_blank(b)).map_or(0, |i| i + 1);
    &bytes[..end]
}

/// Decode US-ASCII bytes, replacing anything above 0x7F
pub fn ascii_to_string(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| {
            if b.is_ascii() {
                b as char
            } else {
                char::REPLACEMENT_CHARACTER
            }
        })
        .collect()
}

/// Decode a fixed-width ASCII field and trim its padding
pub fn fixed_ascii(bytes: &[u8]) -> String {
    ascii_to_string(trim_blanks(bytes))
}

/// Decode a left-aligned, blank padded ASCII field
pub fn padded_ascii(bytes: &[u8]) -> String {
    ascii_to_string(trim_trailing_blanks(bytes))
}
