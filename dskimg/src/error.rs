//! Error types for DSKIMG operations

use core::fmt;

/// Result type for DSKIMG operations
pub type Result<T> = core::result::Result<T, DskimgError>;

/// Errors that can occur while mounting or reading a DSKIMG image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DskimgError {
    /// I/O error reading from the image
    IoError,

    /// Fewer bytes available than a fixed structure needs
    Truncated {
        /// Bytes the structure requires
        needed: usize,
        /// Bytes that were available
        available: usize,
    },

    /// Boot sector does not end in 0x55 0xAA
    InvalidBootSignature,

    /// Partition status byte other than 0x00 / 0x80
    InvalidPartitionStatus(u8),

    /// Partition type byte that is not defined for DSKIMG
    UnknownPartitionType(u8),

    /// Missing "DSKIMG\0" signature in the header
    InvalidDskimgSignature,

    /// Missing "GARMIN\0" signature in the header
    InvalidGarminSignature,

    /// Data block size exponent out of range or not a whole number of sectors
    InvalidBlockSize(u32),

    /// FAT entry type byte other than padding / regular
    UnknownEntryType(u8),

    /// A file's FAT records are not contiguous
    DuplicateFile,

    /// Declared file size exceeds the allocated blocks
    BlockIndexOutOfRange(u32),

    /// File not found
    NotFound,

    /// Write-path operation on a read-only image
    Unsupported,

    /// Path has more than one segment
    NestedPath,

    /// Handle used after close
    ClosedHandle,

    /// Image is already mounted
    AlreadyMounted,
}

/// Coarse error classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Device failure
    Io,
    /// Bad magic, signature or type byte
    Format,
    /// Short read of a fixed-size structure
    TruncatedInput,
    /// Internally inconsistent image
    Corruption,
    /// Unknown file name
    NotFound,
    /// Operation not supported by a read-only flat image
    Unsupported,
    /// Use after close
    ClosedHandle,
    /// Mount key already in use
    Busy,
}

impl DskimgError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::IoError => ErrorKind::Io,
            Self::Truncated { .. } => ErrorKind::TruncatedInput,
            Self::InvalidBootSignature
            | Self::InvalidPartitionStatus(_)
            | Self::UnknownPartitionType(_)
            | Self::InvalidDskimgSignature
            | Self::InvalidGarminSignature
            | Self::InvalidBlockSize(_)
            | Self::UnknownEntryType(_) => ErrorKind::Format,
            Self::DuplicateFile | Self::BlockIndexOutOfRange(_) => ErrorKind::Corruption,
            Self::NotFound => ErrorKind::NotFound,
            Self::Unsupported | Self::NestedPath => ErrorKind::Unsupported,
            Self::ClosedHandle => ErrorKind::ClosedHandle,
            Self::AlreadyMounted => ErrorKind::Busy,
        }
    }
}

impl fmt::Display for DskimgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IoError => write!(f, "I/O error reading image"),
            Self::Truncated { needed, available } => {
                write!(f, "Truncated input: needed {} bytes, got {}", needed, available)
            }
            Self::InvalidBootSignature => write!(f, "Invalid boot sector signature"),
            Self::InvalidPartitionStatus(b) => write!(f, "Unrecognised partition status {:#04x}", b),
            Self::UnknownPartitionType(b) => write!(f, "Unrecognised partition type {:#04x}", b),
            Self::InvalidDskimgSignature => write!(f, "Missing DSKIMG signature"),
            Self::InvalidGarminSignature => write!(f, "Missing GARMIN signature"),
            Self::InvalidBlockSize(exp) => write!(f, "Invalid data block size exponent {}", exp),
            Self::UnknownEntryType(b) => write!(f, "Unrecognised FAT entry type {:#04x}", b),
            Self::DuplicateFile => write!(f, "FAT records for a file are not contiguous"),
            Self::BlockIndexOutOfRange(i) => {
                write!(f, "Declared size exceeds allocated blocks (block index {})", i)
            }
            Self::NotFound => write!(f, "File not found"),
            Self::Unsupported => write!(f, "Operation not supported on a read-only image"),
            Self::NestedPath => write!(f, "DSKIMG images have no nested directories"),
            Self::ClosedHandle => write!(f, "Handle is closed"),
            Self::AlreadyMounted => write!(f, "Image is already mounted"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DskimgError {}

#[cfg(feature = "std")]
impl DskimgError {
    /// Host I/O failure while opening or reading an image
    ///
    /// Logged here since the variant does not carry the `io::Error`.
    pub fn from_io(err: std::io::Error) -> Self {
        tracing::warn!(error = %err, "image I/O failed");
        Self::IoError
    }
}

#[cfg(feature = "std")]
impl From<DskimgError> for std::io::Error {
    fn from(err: DskimgError) -> Self {
        let kind = match err.kind() {
            ErrorKind::TruncatedInput => std::io::ErrorKind::UnexpectedEof,
            ErrorKind::NotFound => std::io::ErrorKind::NotFound,
            ErrorKind::Unsupported => std::io::ErrorKind::Unsupported,
            ErrorKind::Format | ErrorKind::Corruption => std::io::ErrorKind::InvalidData,
            _ => std::io::ErrorKind::Other,
        };
        std::io::Error::new(kind, err)
    }
}
