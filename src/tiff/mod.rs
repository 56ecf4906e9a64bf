//! Structural reading of TIFF/BigTIFF files
//!
//! Used to check what a conversion produced (compression, tiling,
//! overviews) without going back through the raster toolkit.

pub mod errors;
pub mod ifd;
pub(crate) mod types;
pub mod reader;
pub(crate) mod constants;
pub mod layout;

pub use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
pub use errors::{TiffError, TiffResult};
pub use ifd::{IFD, IFDEntry};
pub use layout::{inspect, CogLayout};
pub use reader::TiffReader;
pub use types::TIFF;
