//! Raw image access
//!
//! An [`ImageSource`] opens independent block devices onto the raw image
//! bytes. Mount uses one handle for the header and FAT; every open file
//! gets its own, so concurrent readers never share a position.

#[cfg(feature = "std")]
mod file;

#[cfg(feature = "std")]
pub use file::{FileDevice, FileImage};

use crate::error::{DskimgError, Result};
use crate::types::SECTOR_SIZE;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::cmp;
use gpt_disk_io::BlockIo;
use gpt_disk_types::{BlockSize, Lba};

/// Factory for independent handles onto one raw image
pub trait ImageSource {
    /// Block device returned for each handle
    type Device: BlockIo<Error = DskimgError>;

    /// Open a fresh handle positioned at the start of the image
    fn open_device(&self) -> Result<Self::Device>;
}

impl<S: ImageSource + ?Sized> ImageSource for Arc<S> {
    type Device = S::Device;

    fn open_device(&self) -> Result<Self::Device> {
        (**self).open_device()
    }
}

/// Read `dst.len()` bytes starting at an arbitrary byte offset
///
/// Aligned requests go straight to the device in a single call; unaligned
/// ones read the covering blocks and copy out the requested range.
pub fn read_at<B: BlockIo<Error = DskimgError>>(
    block_io: &mut B,
    offset: u64,
    dst: &mut [u8],
) -> Result<()> {
    if dst.is_empty() {
        return Ok(());
    }

    let block_size = u64::from(block_io.block_size().to_u32());
    let len = dst.len() as u64;

    if offset % block_size == 0 && len % block_size == 0 {
        return block_io.read_blocks(Lba(offset / block_size), dst);
    }

    let first = offset / block_size;
    let last = (offset + len).div_ceil(block_size);
    let mut staging = vec![0u8; ((last - first) * block_size) as usize];
    block_io.read_blocks(Lba(first), &mut staging)?;

    let skip = (offset - first * block_size) as usize;
    dst.copy_from_slice(&staging[skip..skip + dst.len()]);
    Ok(())
}

/// Image length rounded up to whole device sectors
///
/// Images need not end on a sector boundary; the missing tail of the last
/// sector reads as zeros.
pub(crate) fn padded_len(len: u64) -> u64 {
    len.div_ceil(SECTOR_SIZE as u64) * SECTOR_SIZE as u64
}

/// Immutable in-memory image
#[derive(Debug, Clone)]
pub struct MemoryImage {
    data: Arc<[u8]>,
}

impl MemoryImage {
    /// Wrap raw image bytes
    pub fn new(data: impl Into<Arc<[u8]>>) -> Self {
        Self { data: data.into() }
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl From<Vec<u8>> for MemoryImage {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl ImageSource for MemoryImage {
    type Device = MemoryDevice;

    fn open_device(&self) -> Result<MemoryDevice> {
        Ok(MemoryDevice {
            data: Arc::clone(&self.data),
        })
    }
}

/// Read-only block device over shared image bytes
#[derive(Debug, Clone)]
pub struct MemoryDevice {
    data: Arc<[u8]>,
}

impl BlockIo for MemoryDevice {
    type Error = DskimgError;

    fn block_size(&self) -> BlockSize {
        BlockSize::BS_512
    }

    fn num_blocks(&mut self) -> Result<u64> {
        Ok(padded_len(self.data.len() as u64) / SECTOR_SIZE as u64)
    }

    fn read_blocks(&mut self, start_lba: Lba, dst: &mut [u8]) -> Result<()> {
        let offset = start_lba.0.saturating_mul(SECTOR_SIZE as u64);
        let len = self.data.len() as u64;
        let available = padded_len(len).saturating_sub(offset);
        if available < dst.len() as u64 {
            return Err(DskimgError::Truncated {
                needed: dst.len(),
                available: available as usize,
            });
        }

        let present = cmp::min(dst.len() as u64, len.saturating_sub(offset)) as usize;
        let (data, tail) = dst.split_at_mut(present);
        if present > 0 {
            let start = offset as usize;
            data.copy_from_slice(&self.data[start..start + present]);
        }
        tail.fill(0);
        Ok(())
    }

    fn write_blocks(&mut self, _start_lba: Lba, _src: &[u8]) -> Result<()> {
        Err(DskimgError::Unsupported)
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
