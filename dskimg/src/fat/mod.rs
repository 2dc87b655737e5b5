//! File allocation table scanning
//!
//! The FAT is a run of 512-byte records starting at the header's FAT
//! offset. The first record describes the FAT itself; its size field is
//! the byte offset where data blocks begin, which is also where the FAT
//! ends. Every later record describes a slice of one file's block list;
//! records of one file are contiguous and are folded into a single
//! [`Inode`].

pub mod inode;
pub mod record;

use crate::device::read_at;
use crate::error::{DskimgError, Result};
use crate::types::{PaddingMode, FAT_RECORD_SIZE};
use alloc::string::String;
use alloc::vec::Vec;
use gpt_disk_io::BlockIo;

pub use inode::{Inode, InodeTable};
pub use record::{EntryType, FatRecord};

/// Outcome of a FAT scan
#[derive(Debug, Clone)]
pub struct FatScan {
    /// Byte offset where data blocks begin
    pub data_blocks_offset: u64,

    /// Files found
    pub inodes: InodeTable,
}

/// Fold state while scanning
#[derive(Debug)]
enum ScanState {
    /// No group open
    Idle,
    /// Collecting records of one file
    Scanning {
        name: String,
        file_size: u64,
        blocks: Vec<u32>,
    },
}

/// Folds FAT records into an inode table
#[derive(Debug)]
pub struct InodeBuilder {
    mode: PaddingMode,
    state: ScanState,
    table: InodeTable,
    /// Name of the record compared against for merging
    previous_name: Option<String>,
    /// Type of the last record pushed
    last_type: Option<EntryType>,
}

impl InodeBuilder {
    /// Create an empty builder
    pub fn new(mode: PaddingMode) -> Self {
        Self {
            mode,
            state: ScanState::Idle,
            table: InodeTable::new(),
            previous_name: None,
            last_type: None,
        }
    }

    /// Feed the next record in scan order
    pub fn push(&mut self, record: FatRecord) -> Result<()> {
        self.last_type = Some(record.entry_type);
        let name = record.filename();

        if !record.is_regular() {
            if self.mode == PaddingMode::Strict {
                self.previous_name = Some(name);
            }
            return Ok(());
        }

        let continues = self.previous_name.as_deref() == Some(name.as_str());
        if continues {
            if let ScanState::Scanning { blocks, .. } = &mut self.state {
                blocks.extend_from_slice(&record.blocks);
                return Ok(());
            }
        }

        self.commit()?;
        self.state = ScanState::Scanning {
            name: name.clone(),
            file_size: record.file_size as u64,
            blocks: record.blocks,
        };
        self.previous_name = Some(name);
        Ok(())
    }

    /// Close the open group, if any, into the table
    fn commit(&mut self) -> Result<()> {
        if let ScanState::Scanning {
            name,
            file_size,
            blocks,
        } = core::mem::replace(&mut self.state, ScanState::Idle)
        {
            tracing::trace!(name = %name, file_size, blocks = blocks.len(), "inode");
            if self.table.contains(&name) {
                tracing::warn!(name = %name, "FAT records for file are not contiguous");
                return Err(DskimgError::DuplicateFile);
            }
            self.table.insert(Inode {
                name,
                file_size,
                blocks,
            })?;
        }
        Ok(())
    }

    /// Commit the final group and return the table
    pub fn finish(mut self) -> Result<InodeTable> {
        let commit_pending = match self.mode {
            PaddingMode::Strict => self.last_type == Some(EntryType::Regular),
            PaddingMode::Transparent => true,
        };

        if commit_pending {
            self.commit()?;
        } else if let ScanState::Scanning { name, .. } = &self.state {
            tracing::debug!(name = %name, "dropping group that precedes trailing padding");
        }

        Ok(self.table)
    }
}

/// Fold a record sequence (excluding the self-describing first record)
pub fn build_inodes<I>(records: I, mode: PaddingMode) -> Result<InodeTable>
where
    I: IntoIterator<Item = FatRecord>,
{
    let mut builder = InodeBuilder::new(mode);
    for record in records {
        builder.push(record)?;
    }
    builder.finish()
}

/// Scan the FAT of a deobfuscated device
///
/// # Arguments
/// * `block_io` - Device yielding deobfuscated bytes
/// * `fat_offset` - Byte offset of the first FAT record
/// * `mode` - Padding record handling
pub fn scan<B: BlockIo<Error = DskimgError>>(
    block_io: &mut B,
    fat_offset: u64,
    mode: PaddingMode,
) -> Result<FatScan> {
    let mut buffer = [0u8; FAT_RECORD_SIZE];
    let mut position = fat_offset;

    let mut next_record = |position: &mut u64| -> Result<FatRecord> {
        read_at(&mut *block_io, *position, &mut buffer)?;
        *position += FAT_RECORD_SIZE as u64;
        FatRecord::parse(&buffer)
    };

    // The first record describes the FAT region itself
    let fat_record = next_record(&mut position)?;
    let data_blocks_offset = fat_record.file_size as u64;
    tracing::debug!(fat_offset, data_blocks_offset, "scanning FAT");

    let mut builder = InodeBuilder::new(mode);
    builder.push(next_record(&mut position)?)?;

    while position < data_blocks_offset {
        builder.push(next_record(&mut position)?)?;
    }

    let inodes = builder.finish()?;
    tracing::debug!(files = inodes.len(), "FAT scan complete");

    Ok(FatScan {
        data_blocks_offset,
        inodes,
    })
}
