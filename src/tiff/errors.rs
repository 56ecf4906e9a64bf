//! Error types for reading TIFF structure

use std::fmt;
use std::io;

/// Errors raised while walking a TIFF file
#[derive(Debug)]
pub enum TiffError {
    /// I/O error
    IoError(io::Error),
    /// Invalid byte order marker
    InvalidByteOrder(u16),
    /// Unsupported TIFF version
    UnsupportedVersion(u16),
    /// BigTIFF header with an unexpected offset size
    InvalidBigTIFFHeader(u16),
    /// An offset that points outside the file
    InvalidOffset { offset: u64, file_size: u64 },
    /// The file contains no image directory
    NoImage,
    /// Image dimensions not found
    MissingDimensions,
}

impl fmt::Display for TiffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TiffError::IoError(e) => write!(f, "I/O error: {}", e),
            TiffError::InvalidByteOrder(v) => write!(f, "Invalid byte order marker: {:#06x}", v),
            TiffError::UnsupportedVersion(v) => write!(f, "Unsupported TIFF version: {}", v),
            TiffError::InvalidBigTIFFHeader(size) => {
                write!(f, "Invalid BigTIFF header (offset size {})", size)
            }
            TiffError::InvalidOffset { offset, file_size } => {
                write!(f, "Offset {} lies outside file of {} bytes", offset, file_size)
            }
            TiffError::NoImage => write!(f, "TIFF contains no image directory"),
            TiffError::MissingDimensions => write!(f, "Image dimensions not found"),
        }
    }
}

impl std::error::Error for TiffError {}

impl From<io::Error> for TiffError {
    fn from(error: io::Error) -> Self {
        TiffError::IoError(error)
    }
}

/// Result type for TIFF operations
pub type TiffResult<T> = Result<T, TiffError>;
