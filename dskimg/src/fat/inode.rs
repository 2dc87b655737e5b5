//! Reconstructed file records

use crate::error::{DskimgError, Result};
use crate::utils::sector::blocks_for_bytes;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

/// One file: its size and ordered data block list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inode {
    /// File name (`BASENAME.EXT`)
    pub name: String,

    /// File size in bytes
    pub file_size: u64,

    /// Data block numbers in file order
    pub blocks: Vec<u32>,
}

impl Inode {
    /// Number of allocated blocks
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Blocks the declared size needs
    pub fn required_blocks(&self, block_size: u64) -> u64 {
        blocks_for_bytes(self.file_size, block_size)
    }

    /// Does the block list cover the declared size?
    pub fn is_fully_allocated(&self, block_size: u64) -> bool {
        self.blocks.len() as u64 >= self.required_blocks(block_size)
    }

    /// Data block holding the given block index
    pub fn block(&self, index: u64) -> Result<u32> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.blocks.get(i).copied())
            .ok_or(DskimgError::BlockIndexOutOfRange(index.min(u32::MAX as u64) as u32))
    }
}

/// Name -> inode table, in FAT order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InodeTable {
    inodes: Vec<Inode>,
    index: BTreeMap<String, usize>,
}

impl InodeTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an inode; a name may only be committed once
    pub fn insert(&mut self, inode: Inode) -> Result<()> {
        if self.index.contains_key(&inode.name) {
            return Err(DskimgError::DuplicateFile);
        }
        self.index.insert(inode.name.clone(), self.inodes.len());
        self.inodes.push(inode);
        Ok(())
    }

    /// Look up by name
    pub fn get(&self, name: &str) -> Option<&Inode> {
        self.index.get(name).map(|&i| &self.inodes[i])
    }

    /// Is the name present?
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Inodes in FAT order
    pub fn iter(&self) -> impl Iterator<Item = &Inode> {
        self.inodes.iter()
    }

    /// File names in FAT order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inodes.iter().map(|inode| inode.name.as_str())
    }

    /// Number of files
    pub fn len(&self) -> usize {
        self.inodes.len()
    }

    /// No files?
    pub fn is_empty(&self) -> bool {
        self.inodes.is_empty()
    }
}
