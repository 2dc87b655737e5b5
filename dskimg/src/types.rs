//! Common types and constants for DSKIMG

/// Device sector size (always 512 bytes)
pub const SECTOR_SIZE: usize = 512;

/// Size of the master boot record
pub const MBR_SIZE: usize = 512;

/// Size of the bootstrap area that carries the Garmin header
pub const BOOTSTRAP_SIZE: usize = 446;

/// Partition table starts right after the bootstrap area
pub const PARTITION_TABLE_OFFSET: usize = 446;

/// Size of one partition table entry
pub const PARTITION_ENTRY_SIZE: usize = 16;

/// Boot signature at bytes 510..512
pub const BOOT_SIGNATURE: [u8; 2] = [0x55, 0xAA];

/// Unit in which the FAT start is expressed
pub const FAT_BLOCK_SIZE: u64 = 512;

/// Size of one FAT record
pub const FAT_RECORD_SIZE: usize = 512;

/// Maximum block addresses in one FAT record
pub const MAX_BLOCKS_PER_RECORD: usize = 240;

/// Block list terminator
pub const BLOCK_LIST_END: u16 = 0xFFFF;

/// How padding FAT records interact with file grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaddingMode {
    /// Padding records count as the "preceding record" for name comparison,
    /// and a trailing padding record drops the pending group.
    #[default]
    Strict,
    /// Padding records are invisible: records of one file separated by
    /// padding still merge, and the pending group is always committed.
    Transparent,
}

/// Options applied when mounting an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MountOptions {
    /// XOR data block payloads with the image key as well
    pub data_block_xor: bool,

    /// Padding record handling during the FAT scan
    pub padding: PaddingMode,
}

impl MountOptions {
    /// Set data block deobfuscation
    pub fn with_data_block_xor(mut self, enabled: bool) -> Self {
        self.data_block_xor = enabled;
        self
    }

    /// Set padding handling
    pub fn with_padding(mut self, padding: PaddingMode) -> Self {
        self.padding = padding;
        self
    }
}

/// File attributes returned by `stat`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    /// Regular file (the root is the only directory)
    pub is_regular_file: bool,

    /// Size in bytes
    pub size: u64,
}

impl FileStat {
    /// Is this the root directory?
    pub fn is_directory(&self) -> bool {
        !self.is_regular_file
    }
}
