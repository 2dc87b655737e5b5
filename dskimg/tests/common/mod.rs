//! Common test utilities: image builder and recording devices

#![allow(dead_code)]

pub mod builder;
pub use builder::{fat_record, DskimgBuilder, FileSpec};

use dskimg::device::MemoryDevice;
use dskimg::{DskimgError, ImageSource, MemoryImage};
use gpt_disk_io::BlockIo;
use gpt_disk_types::{BlockSize, Lba};
use std::sync::{Arc, Mutex};

/// Image whose devices log the byte offset of every block read
#[derive(Debug, Clone)]
pub struct RecordingImage {
    pub image: MemoryImage,
    pub reads: Arc<Mutex<Vec<u64>>>,
    pub opened: Arc<Mutex<usize>>,
}

impl RecordingImage {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            image: MemoryImage::from(data),
            reads: Arc::new(Mutex::new(Vec::new())),
            opened: Arc::new(Mutex::new(0)),
        }
    }

    /// Byte offsets read since the last call
    pub fn take_reads(&self) -> Vec<u64> {
        std::mem::take(&mut *self.reads.lock().unwrap())
    }

    /// Number of device handles opened so far
    pub fn open_count(&self) -> usize {
        *self.opened.lock().unwrap()
    }
}

impl ImageSource for RecordingImage {
    type Device = RecordingDevice;

    fn open_device(&self) -> Result<RecordingDevice, DskimgError> {
        *self.opened.lock().unwrap() += 1;
        Ok(RecordingDevice {
            inner: self.image.open_device()?,
            reads: Arc::clone(&self.reads),
        })
    }
}

/// Device that records read offsets
pub struct RecordingDevice {
    inner: MemoryDevice,
    reads: Arc<Mutex<Vec<u64>>>,
}

impl BlockIo for RecordingDevice {
    type Error = DskimgError;

    fn block_size(&self) -> BlockSize {
        self.inner.block_size()
    }

    fn num_blocks(&mut self) -> Result<u64, Self::Error> {
        self.inner.num_blocks()
    }

    fn read_blocks(&mut self, start_lba: Lba, dst: &mut [u8]) -> Result<(), Self::Error> {
        self.reads.lock().unwrap().push(start_lba.0 * 512);
        self.inner.read_blocks(start_lba, dst)
    }

    fn write_blocks(&mut self, start_lba: Lba, src: &[u8]) -> Result<(), Self::Error> {
        self.inner.write_blocks(start_lba, src)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.inner.flush()
    }
}

/// Deterministic test payload
pub fn pattern(len: usize, seed: u8) -> Vec<u8> {
    (0..len)
        .map(|i| (i as u32).wrapping_mul(31).wrapping_add(seed as u32 * 7) as u8)
        .collect()
}
