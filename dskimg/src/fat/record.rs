//! FAT record decoding
//!
//! Each record is 512 bytes:
//!
//! | Offset | Size | Field                                  |
//! |--------|------|----------------------------------------|
//! | 0x00   | 1    | Entry type (0 = padding, 1 = regular)  |
//! | 0x01   | 8    | Base name, blank padded on the right   |
//! | 0x09   | 3    | Extension, blank padded on the right   |
//! | 0x0C   | 4    | File size (LE)                         |
//! | 0x10   | 2    | Part number (LE)                       |
//! | 0x20   | 480  | Up to 240 block numbers (LE u16)       |

use crate::error::{DskimgError, Result};
use crate::types::{BLOCK_LIST_END, FAT_RECORD_SIZE, MAX_BLOCKS_PER_RECORD};
use crate::utils::{le_u16, le_u32, require_len, string};
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

const OFFSET_ENTRY_TYPE: usize = 0x00;
const OFFSET_BASENAME: usize = 0x01;
const OFFSET_EXTENSION: usize = 0x09;
const OFFSET_FILE_SIZE: usize = 0x0C;
const OFFSET_FILE_PART: usize = 0x10;
const OFFSET_BLOCK_LIST: usize = 0x20;

/// FAT entry type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EntryType {
    /// Unused slot
    Padding = 0x00,
    /// Describes (part of) a file
    Regular = 0x01,
}

impl EntryType {
    /// Decode entry type byte
    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            0x00 => Ok(Self::Padding),
            0x01 => Ok(Self::Regular),
            other => Err(DskimgError::UnknownEntryType(other)),
        }
    }
}

/// One decoded FAT record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FatRecord {
    /// Entry type
    pub entry_type: EntryType,

    /// Base name (up to 8 chars)
    pub basename: String,

    /// Extension (up to 3 chars)
    pub extension: String,

    /// Declared file size
    pub file_size: u32,

    /// Part sequence number (informational)
    pub file_part: u16,

    /// Block numbers, without the terminator
    pub blocks: Vec<u32>,
}

impl FatRecord {
    /// Parse a 512-byte record
    pub fn parse(data: &[u8]) -> Result<Self> {
        require_len(data, FAT_RECORD_SIZE)?;

        let entry_type = EntryType::from_byte(data[OFFSET_ENTRY_TYPE])?;
        let basename = string::padded_ascii(&data[OFFSET_BASENAME..OFFSET_BASENAME + 8]);
        let extension = string::padded_ascii(&data[OFFSET_EXTENSION..OFFSET_EXTENSION + 3]);
        let file_size = le_u32(data, OFFSET_FILE_SIZE);
        let file_part = le_u16(data, OFFSET_FILE_PART);

        let blocks = (0..MAX_BLOCKS_PER_RECORD)
            .map(|i| le_u16(data, OFFSET_BLOCK_LIST + i * 2))
            .take_while(|&block| block != BLOCK_LIST_END)
            .map(u32::from)
            .collect();

        Ok(Self {
            entry_type,
            basename,
            extension,
            file_size,
            file_part,
            blocks,
        })
    }

    /// `BASENAME.EXT`
    pub fn filename(&self) -> String {
        format!("{}.{}", self.basename, self.extension)
    }

    /// Is this a regular (file-describing) record?
    pub fn is_regular(&self) -> bool {
        self.entry_type == EntryType::Regular
    }
}
