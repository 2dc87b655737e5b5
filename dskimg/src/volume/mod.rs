//! Mounting a DSKIMG image
//!
//! Mount is a single sequential pass: read and deobfuscate the boot
//! sector, decode the Garmin header, then scan the whole FAT. The resulting
//! inode table is immutable; readers opened afterwards each get their own
//! device handle.

pub mod registry;

use crate::device::{read_at, ImageSource};
use crate::error::{DskimgError, Result};
use crate::fat::{self, Inode, InodeTable};
use crate::header::ImageMetadata;
use crate::mbr::BootSector;
use crate::file::FileReader;
use crate::types::{FileStat, MountOptions, MBR_SIZE};
use crate::xor::{XorBlockIo, XorKey};
use alloc::boxed::Box;

/// Mount an image with default options
///
/// # Arguments
/// * `source` - Raw image; opened once here and once per file reader
///
/// # Returns
/// Mounted volume with its complete inode table
pub fn mount<S: ImageSource>(source: S) -> Result<Volume<S>> {
    mount_with_options(source, MountOptions::default())
}

/// Mount an image
///
/// Fails without partial state if any structural check fails.
pub fn mount_with_options<S: ImageSource>(source: S, options: MountOptions) -> Result<Volume<S>> {
    let mut device = source.open_device()?;

    let mut sector = [0u8; MBR_SIZE];
    read_at(&mut device, 0, &mut sector)?;

    // The key is the raw first byte, read before anything is transformed
    let key = XorKey(sector[0]);
    key.apply(&mut sector);
    tracing::debug!(key = key.0, "deobfuscating image header");

    let boot_sector = BootSector::parse(&sector).map_err(|err| {
        tracing::warn!(error = %err, "invalid boot sector");
        err
    })?;
    let metadata = ImageMetadata::parse(&boot_sector.bootstrap).map_err(|err| {
        tracing::warn!(error = %err, "invalid DSKIMG header");
        err
    })?;

    tracing::debug!(
        version = metadata.version,
        description = %metadata.description,
        data_block_size = metadata.data_block_size,
        fat_offset = metadata.fat_offset(),
        "DSKIMG header"
    );

    let mut fat_device = XorBlockIo::new(device, key);
    let scan = fat::scan(&mut fat_device, metadata.fat_offset(), options.padding).map_err(|err| {
        tracing::warn!(error = %err, "FAT scan failed");
        err
    })?;

    for inode in scan.inodes.iter() {
        if !inode.is_fully_allocated(metadata.data_block_size) {
            tracing::warn!(
                name = %inode.name,
                file_size = inode.file_size,
                blocks = inode.block_count(),
                "declared size exceeds allocated blocks"
            );
        }
    }

    Ok(Volume {
        source,
        key,
        boot_sector,
        metadata,
        data_blocks_offset: scan.data_blocks_offset,
        inodes: scan.inodes,
        options,
    })
}

/// Strip an optional leading `/`; `None` names the root directory
///
/// DSKIMG images have a single flat directory, so any further separator
/// is rejected.
pub fn file_name(path: &str) -> Result<Option<&str>> {
    let name = path.strip_prefix('/').unwrap_or(path);
    if name.is_empty() {
        return Ok(None);
    }
    if name.contains('/') {
        return Err(DskimgError::NestedPath);
    }
    Ok(Some(name))
}

/// A mounted image
pub struct Volume<S: ImageSource> {
    source: S,
    key: XorKey,
    boot_sector: BootSector,
    metadata: ImageMetadata,
    data_blocks_offset: u64,
    inodes: InodeTable,
    options: MountOptions,
}

impl<S: ImageSource> Volume<S> {
    /// File names in FAT order
    pub fn list(&self) -> impl Iterator<Item = &str> {
        self.inodes.names()
    }

    /// Attributes of the root (`""` or `"/"`) or of one file
    pub fn stat(&self, path: &str) -> Result<FileStat> {
        match file_name(path)? {
            None => Ok(FileStat {
                is_regular_file: false,
                size: self.metadata.data_block_size,
            }),
            Some(name) => self
                .inodes
                .get(name)
                .map(|inode| FileStat {
                    is_regular_file: true,
                    size: inode.file_size,
                })
                .ok_or(DskimgError::NotFound),
        }
    }

    /// Inode for a file path
    pub fn inode(&self, path: &str) -> Result<&Inode> {
        let name = file_name(path)?.ok_or(DskimgError::NotFound)?;
        self.inodes.get(name).ok_or(DskimgError::NotFound)
    }

    /// Open a file for reading on a fresh device handle
    pub fn open_file(&self, path: &str) -> Result<FileReader<S::Device>> {
        let inode = self.inode(path)?.clone();
        let device = self.source.open_device()?;
        let data_key = if self.options.data_block_xor {
            self.key
        } else {
            XorKey::default()
        };
        Ok(FileReader::new(
            device,
            inode,
            self.metadata.data_block_size,
            data_key,
        ))
    }

    /// All inodes
    pub fn inodes(&self) -> &InodeTable {
        &self.inodes
    }

    /// Decoded Garmin header
    pub fn metadata(&self) -> &ImageMetadata {
        &self.metadata
    }

    /// Deobfuscated boot sector
    pub fn boot_sector(&self) -> &BootSector {
        &self.boot_sector
    }

    /// XOR key of the image
    pub fn key(&self) -> XorKey {
        self.key
    }

    /// Byte offset where data blocks begin
    pub fn data_blocks_offset(&self) -> u64 {
        self.data_blocks_offset
    }

    /// Options the image was mounted with
    pub fn options(&self) -> MountOptions {
        self.options
    }

    /// Underlying image source
    pub fn source(&self) -> &S {
        &self.source
    }
}

/// Filesystem surface of a mounted image
///
/// The image is read-only and flat: every mutation reports `Unsupported`.
pub trait ImageFilesystem {
    /// Open file handle
    type File;

    /// File names in directory order
    fn list(&self) -> Box<dyn Iterator<Item = &str> + '_>;

    /// Attributes of a path
    fn stat(&self, path: &str) -> Result<FileStat>;

    /// Open a file for reading
    fn open(&self, path: &str) -> Result<Self::File>;

    /// Create a file
    fn create(&self, _path: &str) -> Result<()> {
        Err(DskimgError::Unsupported)
    }

    /// Create a directory
    fn create_dir(&self, _path: &str) -> Result<()> {
        Err(DskimgError::Unsupported)
    }

    /// Delete a file
    fn remove(&self, _path: &str) -> Result<()> {
        Err(DskimgError::Unsupported)
    }

    /// Move a file
    fn rename(&self, _from: &str, _to: &str) -> Result<()> {
        Err(DskimgError::Unsupported)
    }

    /// Truncate a file
    fn truncate(&self, _path: &str, _size: u64) -> Result<()> {
        Err(DskimgError::Unsupported)
    }
}

impl<S: ImageSource> ImageFilesystem for Volume<S> {
    type File = FileReader<S::Device>;

    fn list(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(Volume::list(self))
    }

    fn stat(&self, path: &str) -> Result<FileStat> {
        Volume::stat(self, path)
    }

    fn open(&self, path: &str) -> Result<Self::File> {
        self.open_file(path)
    }
}
