//! Streaming XOR over `std::io::Read`

use super::XorKey;
use std::io::{self, Read, Seek, SeekFrom};

/// Reader that deobfuscates everything read through it
///
/// Per-byte results are identical regardless of how reads are split.
pub struct XorReader<R> {
    inner: R,
    key: XorKey,
}

impl<R: Read> XorReader<R> {
    /// Wrap a reader
    pub fn new(inner: R, key: XorKey) -> Self {
        Self { inner, key }
    }

    /// Unwrap the underlying reader
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for XorReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.key.apply(&mut buf[..n]);
        Ok(n)
    }
}

impl<R: Read + Seek> Seek for XorReader<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}
