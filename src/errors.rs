//! Error types for COG conversion
//!
//! Every hard failure of a conversion unit (one file or one subdataset)
//! is reported as a [`CogError`]. Missing georeferencing is not an error
//! and never shows up here.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::tiff::errors::TiffError;

/// Errors raised while converting rasters to COG
#[derive(Debug)]
pub enum CogError {
    /// The input raster or container could not be opened
    SourceOpen {
        location: String,
        message: String,
    },
    /// A container exposed no (matching) subdatasets
    SubdatasetDiscovery {
        location: String,
        message: String,
    },
    /// The driver rejected the profile or failed while writing
    Encoding {
        destination: PathBuf,
        message: String,
    },
    /// Malformed profile text or profile file
    Profile(String),
    /// Command-line arguments missing for the requested mode
    Usage(String),
    /// The produced file could not be inspected
    Tiff(TiffError),
    /// Filesystem error around the destination
    Io(io::Error),
}

impl CogError {
    pub fn source_open(location: impl Into<String>, message: impl fmt::Display) -> Self {
        CogError::SourceOpen {
            location: location.into(),
            message: message.to_string(),
        }
    }

    pub fn discovery(location: impl Into<String>, message: impl fmt::Display) -> Self {
        CogError::SubdatasetDiscovery {
            location: location.into(),
            message: message.to_string(),
        }
    }

    pub fn encoding(destination: impl Into<PathBuf>, message: impl fmt::Display) -> Self {
        CogError::Encoding {
            destination: destination.into(),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for CogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CogError::SourceOpen { location, message } => {
                write!(f, "Cannot open raster '{}': {}", location, message)
            }
            CogError::SubdatasetDiscovery { location, message } => {
                write!(f, "No subdatasets in '{}': {}", location, message)
            }
            CogError::Encoding { destination, message } => {
                write!(f, "Failed to write '{}': {}", destination.display(), message)
            }
            CogError::Profile(msg) => write!(f, "Invalid profile: {}", msg),
            CogError::Usage(msg) => write!(f, "Invalid arguments: {}", msg),
            CogError::Tiff(e) => write!(f, "{}", e),
            CogError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for CogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CogError::Tiff(e) => Some(e),
            CogError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for CogError {
    fn from(error: io::Error) -> Self {
        CogError::Io(error)
    }
}

impl From<TiffError> for CogError {
    fn from(error: TiffError) -> Self {
        CogError::Tiff(error)
    }
}

/// Result type for conversion operations
pub type CogResult<T> = Result<T, CogError>;
