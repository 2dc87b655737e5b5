//! File-backed images

use super::{padded_len, ImageSource};
use crate::error::{DskimgError, Result};
use crate::types::SECTOR_SIZE;
use gpt_disk_io::BlockIo;
use gpt_disk_types::{BlockSize, Lba};
use core::cmp;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Image stored in a file on the host filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileImage {
    path: PathBuf,
}

impl FileImage {
    /// Image at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the image file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ImageSource for FileImage {
    type Device = FileDevice;

    /// Each call opens the file again, giving the handle its own cursor
    fn open_device(&self) -> Result<FileDevice> {
        let file = File::open(&self.path).map_err(DskimgError::from_io)?;
        let len = file.metadata().map_err(DskimgError::from_io)?.len();
        Ok(FileDevice { file, len })
    }
}

/// Read-only block device over an open image file
#[derive(Debug)]
pub struct FileDevice {
    file: File,
    len: u64,
}

impl BlockIo for FileDevice {
    type Error = DskimgError;

    fn block_size(&self) -> BlockSize {
        BlockSize::BS_512
    }

    fn num_blocks(&mut self) -> Result<u64> {
        Ok(padded_len(self.len) / SECTOR_SIZE as u64)
    }

    fn read_blocks(&mut self, start_lba: Lba, dst: &mut [u8]) -> Result<()> {
        let offset = start_lba.0.saturating_mul(SECTOR_SIZE as u64);
        let available = padded_len(self.len).saturating_sub(offset);
        if available < dst.len() as u64 {
            return Err(DskimgError::Truncated {
                needed: dst.len(),
                available: available as usize,
            });
        }

        let present = cmp::min(dst.len() as u64, self.len.saturating_sub(offset)) as usize;
        let (data, tail) = dst.split_at_mut(present);
        if present > 0 {
            self.file
                .seek(SeekFrom::Start(offset))
                .map_err(DskimgError::from_io)?;
            self.file.read_exact(data).map_err(DskimgError::from_io)?;
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
