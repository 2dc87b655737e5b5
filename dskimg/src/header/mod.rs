//! Garmin DSKIMG header
//!
//! The header is superimposed on the MBR bootstrap area. All multi-byte
//! integers are little-endian and all offsets are fixed.

use crate::error::{DskimgError, Result};
use crate::mbr::Geometry;
use crate::types::{BOOTSTRAP_SIZE, FAT_BLOCK_SIZE};
use crate::utils::datetime::{CreationTime, UpdateDate};
use crate::utils::{le_u16, require_len, string};
use alloc::string::String;
use alloc::vec::Vec;

/// Header field offsets within the bootstrap area
pub mod offsets {
    /// Format version (u16)
    pub const VERSION: usize = 0x08;
    /// Last update month, 0-based
    pub const UPDATE_MONTH: usize = 0x0A;
    /// Last update year, pivoted
    pub const UPDATE_YEAR: usize = 0x0B;
    /// Checksum byte (not verified)
    pub const CHECKSUM: usize = 0x0F;
    /// "DSKIMG\0"
    pub const DSKIMG: usize = 0x10;
    /// Sectors, heads, cylinders (u16 each)
    pub const GEOMETRY: usize = 0x18;
    /// Creation year (u16)
    pub const CREATION_YEAR: usize = 0x39;
    /// Creation month, 0-based
    pub const CREATION_MONTH: usize = 0x3B;
    /// Creation day
    pub const CREATION_DAY: usize = 0x3C;
    /// Creation hour
    pub const CREATION_HOUR: usize = 0x3D;
    /// Creation minute
    pub const CREATION_MINUTE: usize = 0x3E;
    /// Creation second
    pub const CREATION_SECOND: usize = 0x3F;
    /// FAT start in 512-byte blocks
    pub const FAT_START_BLOCK: usize = 0x40;
    /// "GARMIN\0"
    pub const GARMIN: usize = 0x41;
    /// Description, first 20 bytes
    pub const DESCRIPTION_START: usize = 0x49;
    /// Unexplained u16, possibly a head count
    pub const POSSIBLE_HEADS: usize = 0x5D;
    /// Unexplained u16, possibly a sector count
    pub const POSSIBLE_SECTORS: usize = 0x5F;
    /// Data block size exponent, first part
    pub const BLOCK_SIZE_EXPONENT_BASE: usize = 0x61;
    /// Data block size exponent, second part
    pub const BLOCK_SIZE_EXPONENT_INCREMENT: usize = 0x62;
    /// Unexplained geometry-related u16
    pub const GEOMETRY_RELATED: usize = 0x63;
    /// Description, remaining 30 bytes
    pub const DESCRIPTION_CONT: usize = 0x65;
}

/// "DSKIMG\0" signature
pub const DSKIMG_SIGNATURE: &[u8; 7] = b"DSKIMG\0";

/// "GARMIN\0" signature
pub const GARMIN_SIGNATURE: &[u8; 7] = b"GARMIN\0";

/// Largest block size exponent accepted (16 MiB blocks)
pub const MAX_BLOCK_SIZE_EXPONENT: u32 = 24;

/// Header fields with no known meaning, kept verbatim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpaqueFields {
    /// Checksum byte @0x0F
    pub checksum: u8,
    /// u16 @0x5D
    pub possible_heads: u16,
    /// u16 @0x5F
    pub possible_sectors: u16,
    /// u16 @0x63
    pub geometry_related: u16,
}

/// Decoded Garmin header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMetadata {
    /// Format version
    pub version: u16,

    /// Last update
    pub updated_at: UpdateDate,

    /// Creation timestamp
    pub created_at: CreationTime,

    /// Number of 512-byte blocks before the FAT
    pub fat_start_block: u8,

    /// Disk geometry
    pub geometry: Geometry,

    /// Map description, trimmed
    pub description: String,

    /// Data block size in bytes (power of two)
    pub data_block_size: u64,

    /// Undecoded fields
    pub opaque: OpaqueFields,
}

impl ImageMetadata {
    /// Parse the header from the 446-byte bootstrap area
    pub fn parse(bootstrap: &[u8]) -> Result<Self> {
        use offsets::*;

        require_len(bootstrap, BOOTSTRAP_SIZE)?;

        let version = le_u16(bootstrap, VERSION);
        let updated_at =
            UpdateDate::from_bytes(bootstrap[UPDATE_MONTH], bootstrap[UPDATE_YEAR]);

        if bootstrap[DSKIMG..DSKIMG + 7] != DSKIMG_SIGNATURE[..] {
            return Err(DskimgError::InvalidDskimgSignature);
        }

        let mut geometry_bytes = [0u8; 6];
        geometry_bytes.copy_from_slice(&bootstrap[GEOMETRY..GEOMETRY + 6]);
        let geometry = Geometry::from_bytes(geometry_bytes);

        let created_at = CreationTime::from_fields(
            le_u16(bootstrap, CREATION_YEAR),
            bootstrap[CREATION_MONTH],
            bootstrap[CREATION_DAY],
            bootstrap[CREATION_HOUR],
            bootstrap[CREATION_MINUTE],
            bootstrap[CREATION_SECOND],
        );

        let fat_start_block = bootstrap[FAT_START_BLOCK];

        if bootstrap[GARMIN..GARMIN + 7] != GARMIN_SIGNATURE[..] {
            return Err(DskimgError::InvalidGarminSignature);
        }

        let mut description_bytes = Vec::with_capacity(50);
        description_bytes.extend_from_slice(&bootstrap[DESCRIPTION_START..DESCRIPTION_START + 20]);
        description_bytes.extend_from_slice(&bootstrap[DESCRIPTION_CONT..DESCRIPTION_CONT + 30]);
        let description = string::fixed_ascii(&description_bytes);

        let exponent = bootstrap[BLOCK_SIZE_EXPONENT_BASE] as u32
            + bootstrap[BLOCK_SIZE_EXPONENT_INCREMENT] as u32;
        if exponent > MAX_BLOCK_SIZE_EXPONENT {
            return Err(DskimgError::InvalidBlockSize(exponent));
        }
        let data_block_size = 1u64 << exponent;

        let opaque = OpaqueFields {
            checksum: bootstrap[CHECKSUM],
            possible_heads: le_u16(bootstrap, POSSIBLE_HEADS),
            possible_sectors: le_u16(bootstrap, POSSIBLE_SECTORS),
            geometry_related: le_u16(bootstrap, GEOMETRY_RELATED),
        };

        tracing::debug!(
            checksum = opaque.checksum,
            possible_heads = opaque.possible_heads,
            possible_sectors = opaque.possible_sectors,
            geometry_related = opaque.geometry_related,
            "undecoded header fields"
        );

        Ok(Self {
            version,
            updated_at,
            created_at,
            fat_start_block,
            geometry,
            description,
            data_block_size,
            opaque,
        })
    }

    /// Byte offset of the FAT
    pub fn fat_offset(&self) -> u64 {
        FAT_BLOCK_SIZE * self.fat_start_block as u64
    }
}
