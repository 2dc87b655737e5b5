//! Master boot record parsing
//!
//! The first 512 bytes of an image are a standard MBR once deobfuscated.
//! Its bootstrap area carries the Garmin header (see [`crate::header`]).

pub mod chs;
pub mod partition;

use crate::error::{DskimgError, Result};
use crate::types::{
    BOOTSTRAP_SIZE, BOOT_SIGNATURE, MBR_SIZE, PARTITION_ENTRY_SIZE, PARTITION_TABLE_OFFSET,
};
use crate::utils::require_len;
use partition::PartitionEntry;

pub use chs::{CylinderHeadSector, Geometry};
pub use partition::{PartitionStatus, PartitionType};

/// Parsed master boot record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootSector {
    /// Bootstrap area (446 bytes)
    pub bootstrap: [u8; BOOTSTRAP_SIZE],

    /// Partition slots; `None` for empty slots
    pub partitions: [Option<PartitionEntry>; 4],
}

impl BootSector {
    /// Parse 512 already-deobfuscated bytes
    pub fn parse(data: &[u8]) -> Result<Self> {
        require_len(data, MBR_SIZE)?;

        let mut bootstrap = [0u8; BOOTSTRAP_SIZE];
        bootstrap.copy_from_slice(&data[..BOOTSTRAP_SIZE]);

        let mut partitions = [None; 4];
        for (i, slot) in partitions.iter_mut().enumerate() {
            let offset = PARTITION_TABLE_OFFSET + i * PARTITION_ENTRY_SIZE;
            *slot = PartitionEntry::parse(&data[offset..offset + PARTITION_ENTRY_SIZE])?;
        }

        if data[510..512] != BOOT_SIGNATURE {
            return Err(DskimgError::InvalidBootSignature);
        }

        Ok(Self {
            bootstrap,
            partitions,
        })
    }

    /// Iterate over present partition entries
    pub fn partitions(&self) -> impl Iterator<Item = &PartitionEntry> {
        self.partitions.iter().flatten()
    }
}
