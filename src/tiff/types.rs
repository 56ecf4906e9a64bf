//! Core TIFF data structures

use crate::io::byte_order::ByteOrder;
use crate::tiff::ifd::IFD;

/// Structure of a TIFF file: its image directories in chain order
#[derive(Debug)]
pub struct TIFF {
    pub ifds: Vec<IFD>,
    pub is_big_tiff: bool,
    pub byte_order: ByteOrder,
}

impl TIFF {
    pub fn new(is_big_tiff: bool, byte_order: ByteOrder) -> Self {
        TIFF {
            ifds: Vec::new(),
            is_big_tiff,
            byte_order,
        }
    }

    /// The full-resolution image
    pub fn main_ifd(&self) -> Option<&IFD> {
        self.ifds.first()
    }

    pub fn ifd_count(&self) -> usize {
        self.ifds.len()
    }

    /// Reduced-resolution images, excluding masks
    pub fn overviews(&self) -> Vec<&IFD> {
        self.ifds.iter().skip(1).filter(|ifd| ifd.is_overview()).collect()
    }

    /// Transparency masks at any resolution
    pub fn masks(&self) -> Vec<&IFD> {
        self.ifds.iter().filter(|ifd| ifd.is_mask()).collect()
    }
}
