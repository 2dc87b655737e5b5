//! Data block arithmetic

/// Number of data blocks needed for byte count
pub fn blocks_for_bytes(byte_count: u64, block_size: u64) -> u64 {
    byte_count.div_ceil(block_size)
}
