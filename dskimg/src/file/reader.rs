//! Block-addressed file reader
//!
//! Translates a file's logical byte offset into its scattered data blocks
//! and streams bytes with single-block buffering. Each reader owns its own
//! device handle.

use crate::device::read_at;
use crate::error::{DskimgError, Result};
use crate::fat::Inode;
use crate::xor::XorKey;
use alloc::vec;
use alloc::vec::Vec;
use core::cmp;
use gpt_disk_io::BlockIo;

/// Buffered reader over one file
pub struct FileReader<B: BlockIo<Error = DskimgError>> {
    /// `None` once closed
    device: Option<B>,
    inode: Inode,
    data_block_size: u64,
    data_key: XorKey,
    position: u64,
    loaded_block: Option<u64>,
    /// Valid bytes in `buffer` for the loaded block
    loaded_len: usize,
    buffer: Vec<u8>,
}

impl<B: BlockIo<Error = DskimgError>> FileReader<B> {
    /// Create new file reader
    ///
    /// # Arguments
    /// * `device` - Handle onto the raw image, owned by this reader
    /// * `inode` - File to read
    /// * `data_block_size` - Image data block size in bytes
    /// * `data_key` - Key applied to payload bytes (identity for raw payloads)
    pub fn new(device: B, inode: Inode, data_block_size: u64, data_key: XorKey) -> Self {
        Self {
            device: Some(device),
            inode,
            data_block_size,
            data_key,
            position: 0,
            loaded_block: None,
            loaded_len: 0,
            buffer: vec![0u8; data_block_size as usize],
        }
    }

    /// Read bytes from current position
    ///
    /// Returns the number of bytes copied; 0 means end of file.
    pub fn read(&mut self, dst: &mut [u8]) -> Result<usize> {
        let device = self.device.as_mut().ok_or(DskimgError::ClosedHandle)?;
        let block_size = self.data_block_size;
        let file_size = self.inode.file_size;
        let mut total = 0usize;

        while total < dst.len() && self.position < file_size {
            let block_index = self.position / block_size;

            if self.loaded_block != Some(block_index) {
                let block = self.inode.block(block_index)?;
                // The last block may be short; load only what the file still needs
                let block_start = block_index * block_size;
                let load_len = cmp::min(block_size, file_size - block_start) as usize;

                self.loaded_block = None;
                let loaded = &mut self.buffer[..load_len];
                read_at(device, block as u64 * block_size, loaded)?;
                self.data_key.apply(loaded);
                self.loaded_block = Some(block_index);
                self.loaded_len = load_len;
            }

            let in_block = (self.position % block_size) as usize;
            let block_remaining = self.loaded_len - in_block;
            let file_remaining = file_size - self.position;
            let n = cmp::min(
                cmp::min(dst.len() - total, block_remaining),
                usize::try_from(file_remaining).unwrap_or(usize::MAX),
            );

            dst[total..total + n].copy_from_slice(&self.buffer[in_block..in_block + n]);
            self.position += n as u64;
            total += n;
        }

        Ok(total)
    }

    /// Seek to position
    ///
    /// Positions past the end are allowed; reads there return 0.
    pub fn seek(&mut self, pos: u64) -> Result<()> {
        self.ensure_open()?;
        self.position = pos;
        Ok(())
    }

    /// Get current position
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Get file size
    pub fn size(&self) -> u64 {
        self.inode.file_size
    }

    /// File being read
    pub fn inode(&self) -> &Inode {
        &self.inode
    }

    /// Images are read-only
    pub fn write(&mut self, _src: &[u8]) -> Result<usize> {
        self.ensure_open()?;
        Err(DskimgError::Unsupported)
    }

    /// Images are read-only
    pub fn truncate(&mut self, _size: u64) -> Result<()> {
        self.ensure_open()?;
        Err(DskimgError::Unsupported)
    }

    /// Release the device handle
    pub fn close(&mut self) {
        if self.device.take().is_some() {
            tracing::trace!(name = %self.inode.name, "closed file reader");
        }
        self.loaded_block = None;
    }

    /// Has `close` been called?
    pub fn is_closed(&self) -> bool {
        self.device.is_none()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.device.is_none() {
            return Err(DskimgError::ClosedHandle);
        }
        Ok(())
    }
}

#[cfg(feature = "std")]
impl<B: BlockIo<Error = DskimgError>> std::io::Read for FileReader<B> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        FileReader::read(self, buf).map_err(std::io::Error::from)
    }
}

#[cfg(feature = "std")]
impl<B: BlockIo<Error = DskimgError>> std::io::Seek for FileReader<B> {
    fn seek(&mut self, pos: std::io::SeekFrom) -> std::io::Result<u64> {
        use std::io::{Error, ErrorKind, SeekFrom};

        let target = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::End(delta) => self.size().checked_add_signed(delta),
            SeekFrom::Current(delta) => self.position.checked_add_signed(delta),
        };
        let target = target.ok_or_else(|| {
            Error::new(ErrorKind::InvalidInput, "seek to a negative or overflowing position")
        })?;

        FileReader::seek(self, target)?;
        Ok(target)
    }
}
