//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};
use cogify::{CogError, CogResult, ConversionProfile, RasterBackend, RasterSource, SubdatasetEntry};

pub const CONTAINER: &str = "rain.h5";

pub const RAIN_TOTAL: &str = "HDF5:\"rain.h5\"://MonthlyRainTotal_GeoGrid/Data_Fields/RrLandRain";
pub const RAIN_COUNT: &str = "HDF5:\"rain.h5\"://MonthlyRainTotal_GeoGrid/Data_Fields/TotalCounts";

/// Raster backend serving one fake container and writing minimal tiled TIFFs
pub struct MockBackend {
    pub subdatasets: Vec<String>,
    pub failing: BTreeSet<String>,
    pub translated: RefCell<Vec<String>>,
}

impl MockBackend {
    pub fn rain() -> Self {
        MockBackend {
            subdatasets: vec![RAIN_TOTAL.to_string(), RAIN_COUNT.to_string()],
            failing: BTreeSet::new(),
            translated: RefCell::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        MockBackend {
            subdatasets: Vec::new(),
            failing: BTreeSet::new(),
            translated: RefCell::new(Vec::new()),
        }
    }

    pub fn failing_on(mut self, identifier: &str) -> Self {
        self.failing.insert(identifier.to_string());
        self
    }
}

impl RasterBackend for MockBackend {
    fn describe(&self, location: &str) -> CogResult<RasterSource> {
        let known = location == CONTAINER || self.subdatasets.iter().any(|s| s == location);
        if !known {
            return Err(CogError::source_open(location, "no such file"));
        }

        let subdatasets = if location == CONTAINER {
            self.subdatasets
                .iter()
                .enumerate()
                .map(|(i, identifier)| SubdatasetEntry {
                    index: i + 1,
                    identifier: identifier.clone(),
                    description: Some(format!("[72x144] {} (32-bit floating-point)", identifier)),
                })
                .collect()
        } else {
            Vec::new()
        };

        Ok(RasterSource {
            location: location.to_string(),
            driver: "HDF5".to_string(),
            size: (144, 72),
            band_count: 1,
            georeferenced: false,
            subdatasets,
        })
    }

    fn translate(&self, location: &str, destination: &Path, profile: &ConversionProfile) -> CogResult<()> {
        self.translated.borrow_mut().push(location.to_string());
        if self.failing.contains(location) {
            return Err(CogError::encoding(destination, "write failed"));
        }
        write_tiled_tiff(destination, 144, 72, compression_code(&profile.compress), profile.blocksize)?;
        Ok(())
    }
}

fn compression_code(name: &str) -> u16 {
    match name.to_ascii_lowercase().as_str() {
        "none" => 1,
        "lzw" => 5,
        "zstd" => 50000,
        _ => 8,
    }
}

/// Minimal little-endian TIFF header and one tiled IFD, no pixel data
pub fn write_tiled_tiff(path: &Path, width: u32, height: u32, compression: u16, tile: u32) -> std::io::Result<()> {
    let mut buffer = Vec::new();
    buffer.write_u16::<LittleEndian>(0x4949)?;
    buffer.write_u16::<LittleEndian>(42)?;
    buffer.write_u32::<LittleEndian>(8)?;

    let entries: [(u16, u16, u32); 5] = [
        (256, 4, width),
        (257, 4, height),
        (259, 3, compression as u32),
        (322, 4, tile),
        (323, 4, tile),
    ];
    buffer.write_u16::<LittleEndian>(entries.len() as u16)?;
    for (tag, field_type, value) in entries {
        buffer.write_u16::<LittleEndian>(tag)?;
        buffer.write_u16::<LittleEndian>(field_type)?;
        buffer.write_u32::<LittleEndian>(1)?;
        if field_type == 3 {
            buffer.write_u16::<LittleEndian>(value as u16)?;
            buffer.write_u16::<LittleEndian>(0)?;
        } else {
            buffer.write_u32::<LittleEndian>(value)?;
        }
    }
    buffer.write_u32::<LittleEndian>(0)?;

    fs::write(path, buffer)
}
