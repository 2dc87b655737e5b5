//! Partition table entries
//!
//! See: https://en.wikipedia.org/wiki/Master_boot_record#PTE

use super::chs::CylinderHeadSector;
use crate::error::{DskimgError, Result};
use crate::types::PARTITION_ENTRY_SIZE;
use crate::utils::{le_u32, require_len};

/// Partition status byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PartitionStatus {
    /// Inactive
    Inactive = 0x00,
    /// Active or bootable
    Active = 0x80,
}

impl PartitionStatus {
    /// Decode status byte
    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            0x00 => Ok(Self::Inactive),
            0x80 => Ok(Self::Active),
            other => Err(DskimgError::InvalidPartitionStatus(other)),
        }
    }
}

/// Partition type byte
///
/// DSKIMG images only ever carry empty entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PartitionType {
    /// Empty partition entry
    Empty = 0x00,
}

impl PartitionType {
    /// Decode type byte
    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            0x00 => Ok(Self::Empty),
            other => Err(DskimgError::UnknownPartitionType(other)),
        }
    }
}

/// One partition table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionEntry {
    /// Status
    pub status: PartitionStatus,

    /// First sector (CHS)
    pub first_sector: CylinderHeadSector,

    /// Partition type
    pub partition_type: PartitionType,

    /// Last sector (CHS)
    pub last_sector: CylinderHeadSector,

    /// LBA of first sector
    pub first_lba: u32,

    /// Number of sectors
    pub sector_count: u32,
}

impl PartitionEntry {
    /// Parse a 16-byte entry
    ///
    /// Returns `Ok(None)` for an empty slot (first CHS equals last CHS).
    pub fn parse(data: &[u8]) -> Result<Option<Self>> {
        require_len(data, PARTITION_ENTRY_SIZE)?;

        let status = PartitionStatus::from_byte(data[0])?;
        let first_sector = CylinderHeadSector::from_bytes([data[1], data[2], data[3]]);
        let partition_type = PartitionType::from_byte(data[4])?;
        let last_sector = CylinderHeadSector::from_bytes([data[5], data[6], data[7]]);
        let first_lba = le_u32(data, 8);
        let sector_count = le_u32(data, 12);

        if first_sector == last_sector {
            return Ok(None);
        }

        Ok(Some(Self {
            status,
            first_sector,
            partition_type,
            last_sector,
            first_lba,
            sector_count,
        }))
    }

    /// Is the bootable flag set?
    pub fn is_active(&self) -> bool {
        self.status == PartitionStatus::Active
    }
}
