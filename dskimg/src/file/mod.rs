//! File reading

pub mod reader;

use crate::error::{DskimgError, Result};
use alloc::vec::Vec;
use gpt_disk_io::BlockIo;

pub use reader::FileReader;

/// Read a whole file from its start
///
/// # Arguments
/// * `reader` - Open reader for the file
/// * `buffer` - Buffer to read into, at least the file size
///
/// # Returns
/// Number of bytes read
pub fn read_file<B: BlockIo<Error = DskimgError>>(
    reader: &mut FileReader<B>,
    buffer: &mut [u8],
) -> Result<usize> {
    let file_size = reader.size() as usize;

    if buffer.len() < file_size {
        return Err(DskimgError::Truncated {
            needed: file_size,
            available: buffer.len(),
        });
    }

    reader.seek(0)?;
    let mut filled = 0;
    while filled < file_size {
        let n = reader.read(&mut buffer[filled..file_size])?;
        if n == 0 {
            break;
        }
        filled += n;
    }

    Ok(filled)
}

/// Read a whole file into a new Vec
pub fn read_file_vec<B: BlockIo<Error = DskimgError>>(reader: &mut FileReader<B>) -> Result<Vec<u8>> {
    let mut buffer = alloc::vec![0u8; reader.size() as usize];
    let n = read_file(reader, &mut buffer)?;
    buffer.truncate(n);
    Ok(buffer)
}
