//! Single-byte XOR deobfuscation
//!
//! Every byte of the boot sector and FAT region is XORed with one key
//! byte: the image's raw first byte. Applying the transform twice with the
//! same key is the identity, so the same code obfuscates and deobfuscates.

#[cfg(feature = "std")]
mod reader;

#[cfg(feature = "std")]
pub use reader::XorReader;

use crate::error::DskimgError;
use gpt_disk_io::BlockIo;
use gpt_disk_types::{BlockSize, Lba};

/// XOR key of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct XorKey(pub u8);

impl XorKey {
    /// Key read from the unmodified first byte of an image
    pub fn from_image_start(raw: &[u8]) -> Option<Self> {
        raw.first().map(|&b| Self(b))
    }

    /// Transform a single byte
    #[inline]
    pub fn apply_byte(self, byte: u8) -> u8 {
        byte ^ self.0
    }

    /// Transform a buffer in place
    pub fn apply(self, bytes: &mut [u8]) {
        if self.0 == 0 {
            return;
        }
        for byte in bytes.iter_mut() {
            *byte ^= self.0;
        }
    }

    /// Is this the identity key?
    pub fn is_identity(self) -> bool {
        self.0 == 0
    }
}

/// Transform `bytes` in place with `key`
pub fn deobfuscate(bytes: &mut [u8], key: u8) {
    XorKey(key).apply(bytes);
}

/// Read-only block device adapter that XORs every block read through it
pub struct XorBlockIo<B: BlockIo> {
    inner: B,
    key: XorKey,
}

impl<B: BlockIo> XorBlockIo<B> {
    /// Wrap a device
    pub fn new(inner: B, key: XorKey) -> Self {
        Self { inner, key }
    }

    /// Key applied by this adapter
    pub fn key(&self) -> XorKey {
        self.key
    }

    /// Unwrap the underlying device
    pub fn into_inner(self) -> B {
        self.inner
    }
}

impl<B: BlockIo<Error = DskimgError>> BlockIo for XorBlockIo<B> {
    type Error = DskimgError;

    fn block_size(&self) -> BlockSize {
        self.inner.block_size()
    }

    fn num_blocks(&mut self) -> Result<u64, Self::Error> {
        self.inner.num_blocks()
    }

    fn read_blocks(&mut self, start_lba: Lba, dst: &mut [u8]) -> Result<(), Self::Error> {
        self.inner.read_blocks(start_lba, dst)?;
        self.key.apply(dst);
        Ok(())
    }

    fn write_blocks(&mut self, _start_lba: Lba, _src: &[u8]) -> Result<(), Self::Error> {
        Err(DskimgError::Unsupported)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.inner.flush()
    }
}
