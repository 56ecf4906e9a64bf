//! Image File Directory (IFD) structures

use std::collections::HashMap;
use crate::tiff::constants::{new_subfile_type, tags};

/// One image directory of a TIFF file
///
/// A COG holds the full-resolution image first, followed by its
/// overviews and any transparency masks.
#[derive(Debug, Clone)]
pub struct IFD {
    /// Entries in file order
    pub entries: Vec<IFDEntry>,
    /// IFD number (0-based)
    pub number: usize,
    /// Offset to this IFD in the file
    pub offset: u64,
    tag_map: HashMap<u16, usize>,
}

/// A tag entry of an IFD
///
/// `value` holds the decoded first value when it fits inline, and the
/// offset of the value array otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IFDEntry {
    pub tag: u16,
    pub field_type: u16,
    pub count: u64,
    pub value: u64,
}

impl IFDEntry {
    pub fn new(tag: u16, field_type: u16, count: u64, value: u64) -> Self {
        IFDEntry { tag, field_type, count, value }
    }
}

impl IFD {
    pub fn new(number: usize, offset: u64) -> Self {
        IFD {
            entries: Vec::new(),
            number,
            offset,
            tag_map: HashMap::new(),
        }
    }

    pub fn add_entry(&mut self, entry: IFDEntry) {
        self.tag_map.insert(entry.tag, self.entries.len());
        self.entries.push(entry);
    }

    pub fn get_entry(&self, tag: u16) -> Option<&IFDEntry> {
        self.tag_map.get(&tag).map(|&i| &self.entries[i])
    }

    pub fn get_tag_value(&self, tag: u16) -> Option<u64> {
        self.get_entry(tag).map(|entry| entry.value)
    }

    /// Width and height, if both tags are present
    pub fn get_dimensions(&self) -> Option<(u64, u64)> {
        let width = self.get_tag_value(tags::IMAGE_WIDTH)?;
        let height = self.get_tag_value(tags::IMAGE_LENGTH)?;
        Some((width, height))
    }

    /// Tile width and height, if the image is tiled
    pub fn tile_size(&self) -> Option<(u64, u64)> {
        let width = self.get_tag_value(tags::TILE_WIDTH)?;
        let height = self.get_tag_value(tags::TILE_LENGTH)?;
        Some((width, height))
    }

    pub fn compression(&self) -> u64 {
        self.get_tag_value(tags::COMPRESSION).unwrap_or(1)
    }

    fn subfile_type(&self) -> u64 {
        self.get_tag_value(tags::NEW_SUBFILE_TYPE).unwrap_or(0)
    }

    pub fn is_overview(&self) -> bool {
        let flags = self.subfile_type();
        flags & new_subfile_type::REDUCED_RESOLUTION != 0
            && flags & new_subfile_type::TRANSPARENCY_MASK == 0
    }

    pub fn is_mask(&self) -> bool {
        self.subfile_type() & new_subfile_type::TRANSPARENCY_MASK != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subfile_classification() {
        let mut main = IFD::new(0, 8);
        main.add_entry(IFDEntry::new(256, 4, 1, 1024));
        main.add_entry(IFDEntry::new(257, 4, 1, 768));
        assert!(!main.is_overview());
        assert!(!main.is_mask());
        assert_eq!(main.get_dimensions(), Some((1024, 768)));
        assert_eq!(main.compression(), 1);
        assert_eq!(main.tile_size(), None);

        let mut overview = IFD::new(1, 100);
        overview.add_entry(IFDEntry::new(254, 4, 1, 1));
        assert!(overview.is_overview());

        let mut mask = IFD::new(2, 200);
        mask.add_entry(IFDEntry::new(254, 4, 1, 4));
        assert!(mask.is_mask());
        assert!(!mask.is_overview());

        let mut overview_mask = IFD::new(3, 300);
        overview_mask.add_entry(IFDEntry::new(254, 4, 1, 5));
        assert!(overview_mask.is_mask());
        assert!(!overview_mask.is_overview());
    }
}
