//! Layout summary of a produced GeoTIFF

use std::fmt;
use std::path::Path;

use crate::tiff::constants::compression_name;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::reader::TiffReader;
use crate::tiff::types::TIFF;

/// What a reader of the output file will find
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CogLayout {
    pub big_tiff: bool,
    pub width: u64,
    pub height: u64,
    /// Compression of the full-resolution image, e.g. `deflate`
    pub compression: String,
    pub tiled: bool,
    /// Tile width and height of the full-resolution image
    pub block_size: Option<(u64, u64)>,
    pub overview_count: usize,
    pub mask_count: usize,
    /// Whether every overview is tiled as well
    overviews_tiled: bool,
}

impl CogLayout {
    /// Summarize an already-read TIFF structure
    pub fn from_tiff(tiff: &TIFF) -> TiffResult<Self> {
        let main = tiff.main_ifd().ok_or(TiffError::NoImage)?;
        let (width, height) = main.get_dimensions().ok_or(TiffError::MissingDimensions)?;
        let overviews = tiff.overviews();

        Ok(CogLayout {
            big_tiff: tiff.is_big_tiff,
            width,
            height,
            compression: compression_name(main.compression()),
            tiled: main.tile_size().is_some(),
            block_size: main.tile_size(),
            overview_count: overviews.len(),
            mask_count: tiff.masks().len(),
            overviews_tiled: overviews.iter().all(|ifd| ifd.tile_size().is_some()),
        })
    }

    /// Tiled full-resolution image with tiled overviews
    pub fn is_cloud_optimized(&self) -> bool {
        self.tiled && self.overviews_tiled
    }
}

impl fmt::Display for CogLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Format: {}", if self.big_tiff { "BigTIFF" } else { "TIFF" })?;
        writeln!(f, "Dimensions: {}x{}", self.width, self.height)?;
        writeln!(f, "Compression: {}", self.compression)?;
        match self.block_size {
            Some((w, h)) => writeln!(f, "Tiling: {}x{}", w, h)?,
            None => writeln!(f, "Tiling: none (stripped)")?,
        }
        writeln!(f, "Overviews: {}", self.overview_count)?;
        writeln!(f, "Masks: {}", self.mask_count)?;
        write!(f, "Cloud optimized: {}", if self.is_cloud_optimized() { "yes" } else { "no" })
    }
}

/// Read the layout of the TIFF file at `path`
pub fn inspect(path: &Path) -> TiffResult<CogLayout> {
    let tiff = TiffReader::new().load(path)?;
    CogLayout::from_tiff(&tiff)
}
