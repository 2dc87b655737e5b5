//! Garmin DSKIMG Image Reader
//!
//! A `no_std` reader for the Garmin "DSKIMG" container used for `.img` map
//! files.
//!
//! # Overview
//!
//! A DSKIMG image is a single blob holding an XOR-obfuscated master boot
//! record, a Garmin header superimposed on the MBR bootstrap area, a flat
//! file allocation table, and fixed-size data blocks holding whole files
//! (map tiles). This crate provides:
//! - Single-byte XOR deobfuscation of header and FAT bytes
//! - Boot sector, partition entry and CHS geometry parsing
//! - Garmin header decoding (signatures, timestamps, FAT location, block size)
//! - FAT scanning that folds fragmented records into one inode per file
//! - Random-access file reading across scattered data blocks
//!
//! # Architecture
//!
//! The implementation is layered:
//! 1. **Device layer** - `ImageSource` opens independent `BlockIo` handles
//! 2. **Header layer** - MBR and Garmin header, after deobfuscation
//! 3. **FAT layer** - Record decoding and inode reconstruction
//! 4. **File layer** - Block-addressed reads with single-block buffering
//! 5. **Volume layer** - Mount orchestration, flat-directory surface, registry
//!
//! # Usage
//!
//! ```ignore
//! use dskimg::{mount, read_file_vec, FileImage};
//!
//! // Mount the image (reads the header and the whole FAT)
//! let volume = mount(FileImage::new("gmapsupp.img"))?;
//!
//! for name in volume.list() {
//!     println!("{} ({} bytes)", name, volume.stat(name)?.size);
//! }
//!
//! // Each open file gets its own handle onto the image
//! let mut reader = volume.open_file("00000001.TRE")?;
//! let tre = read_file_vec(&mut reader)?;
//! ```
//!
//! The image is read-only: every write-path operation reports
//! [`DskimgError::Unsupported`].

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod device;
pub mod error;
pub mod fat;
pub mod file;
pub mod header;
pub mod mbr;
pub mod types;
pub mod utils;
pub mod volume;
pub mod xor;

pub use error::{DskimgError, ErrorKind, Result};
pub use types::{FileStat, MountOptions, PaddingMode};

pub use device::{ImageSource, MemoryImage};
#[cfg(feature = "std")]
pub use device::FileImage;
pub use fat::{Inode, InodeTable};
pub use file::FileReader;
pub use header::ImageMetadata;
pub use mbr::BootSector;
pub use volume::registry::{MountRegistry, MountedVolume};
pub use volume::{ImageFilesystem, Volume};
pub use xor::XorKey;

// High-level API exports
pub use file::{read_file, read_file_vec};
pub use volume::{mount, mount_with_options};
