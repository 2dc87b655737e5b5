//! Byte-level helpers shared by the codecs

pub mod datetime;
pub mod sector;
pub mod string;

use crate::error::{DskimgError, Result};

/// Fail with `Truncated` unless `data` holds at least `needed` bytes
pub fn require_len(data: &[u8], needed: usize) -> Result<()> {
    if data.len() < needed {
        return Err(DskimgError::Truncated {
            needed,
            available: data.len(),
        });
    }
    Ok(())
}

/// Little-endian u16 at `offset`
pub fn le_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

/// Little-endian u32 at `offset`
pub fn le_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}
