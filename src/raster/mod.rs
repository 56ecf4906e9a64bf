//! Access to the raster toolkit
//!
//! Conversion code never talks to GDAL directly. It goes through the
//! [`RasterBackend`] trait, which can describe a raster and write an
//! encoded copy of it. [`GdalBackend`] is the production implementation.

mod gdal_backend;
pub mod writer;

use std::collections::BTreeMap;
use std::path::Path;
use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::CogResult;
use crate::profile::ConversionProfile;

pub use gdal_backend::GdalBackend;
pub use writer::RasterWriter;

lazy_static! {
    static ref SUBDATASET_ITEM: Regex =
        Regex::new(r"^SUBDATASET_(\d+)_(NAME|DESC)=(.*)$").expect("subdataset pattern is valid");
}

/// Structure of a raster as reported by the toolkit
#[derive(Debug, Clone, PartialEq)]
pub struct RasterSource {
    /// Path or toolkit URI the raster was opened from
    pub location: String,
    /// Short name of the driver that opened it
    pub driver: String,
    /// Width and height in pixels
    pub size: (usize, usize),
    pub band_count: usize,
    /// Whether a non-trivial geotransform is present
    pub georeferenced: bool,
    /// Named grids bundled in the file, in toolkit order
    pub subdatasets: Vec<SubdatasetEntry>,
}

impl RasterSource {
    /// Whether this raster bundles subdatasets
    pub fn is_container(&self) -> bool {
        !self.subdatasets.is_empty()
    }
}

/// One subdataset as listed by the toolkit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubdatasetEntry {
    /// 1-based position in the toolkit's listing
    pub index: usize,
    /// Identifier that opens the subdataset, e.g. `HDF5:"f.h5"://grid/var`
    pub identifier: String,
    /// Human-readable description, if the driver provides one
    pub description: Option<String>,
}

/// The raster I/O capability conversions are built on
pub trait RasterBackend {
    /// Open `location` read-only and describe its structure
    fn describe(&self, location: &str) -> CogResult<RasterSource>;

    /// Write an encoded copy of `location` to `destination`
    fn translate(&self, location: &str, destination: &Path, profile: &ConversionProfile) -> CogResult<()>;
}

impl<B: RasterBackend + ?Sized> RasterBackend for &B {
    fn describe(&self, location: &str) -> CogResult<RasterSource> {
        (**self).describe(location)
    }

    fn translate(&self, location: &str, destination: &Path, profile: &ConversionProfile) -> CogResult<()> {
        (**self).translate(location, destination, profile)
    }
}

/// Parse `SUBDATASET_<n>_NAME` / `SUBDATASET_<n>_DESC` metadata items
///
/// Entries come back ordered by `n`; items without a name are dropped.
pub fn parse_subdataset_metadata<S: AsRef<str>>(items: &[S]) -> Vec<SubdatasetEntry> {
    let mut by_index: BTreeMap<usize, (Option<String>, Option<String>)> = BTreeMap::new();

    for item in items {
        let Some(caps) = SUBDATASET_ITEM.captures(item.as_ref()) else {
            continue;
        };
        let Ok(index) = caps[1].parse::<usize>() else {
            continue;
        };
        let slot = by_index.entry(index).or_default();
        let value = caps[3].to_string();
        match &caps[2] {
            "NAME" => slot.0 = Some(value),
            _ => slot.1 = Some(value),
        }
    }

    by_index
        .into_iter()
        .filter_map(|(index, (name, description))| {
            name.map(|identifier| SubdatasetEntry { index, identifier, description })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_orders_by_index() {
        let items = [
            "SUBDATASET_2_NAME=HDF5:\"rain.h5\"://MonthlyRainTotal_GeoGrid/Data_Fields/TbOceanRain",
            "SUBDATASET_2_DESC=[28x72] //MonthlyRainTotal_GeoGrid/Data_Fields/TbOceanRain (32-bit floating-point)",
            "SUBDATASET_1_NAME=HDF5:\"rain.h5\"://MonthlyRainTotal_GeoGrid/Data_Fields/RrLandRain",
            "SUBDATASET_1_DESC=[28x72] //MonthlyRainTotal_GeoGrid/Data_Fields/RrLandRain (32-bit floating-point)",
        ];

        let entries = parse_subdataset_metadata(&items);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].index, 1);
        assert!(entries[0].identifier.ends_with("RrLandRain"));
        assert!(entries[0].description.as_deref().unwrap().contains("32-bit"));
        assert_eq!(entries[1].index, 2);
        assert!(entries[1].identifier.ends_with("TbOceanRain"));
    }

    #[test]
    fn test_parse_sorts_numerically_and_skips_noise() {
        let items = vec![
            "SUBDATASET_10_NAME=NETCDF:\"a.nc\":ten".to_string(),
            "SUBDATASET_2_NAME=NETCDF:\"a.nc\":two".to_string(),
            "SUBDATASET_3_DESC=orphan description".to_string(),
            "SOMETHING_ELSE=1".to_string(),
        ];

        let entries = parse_subdataset_metadata(items.as_slice());
        let indices: Vec<usize> = entries.iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![2, 10]);
        assert!(entries.iter().all(|e| e.description.is_none()));
    }

    #[test]
    fn test_empty_metadata() {
        let items: [&str; 0] = [];
        assert!(parse_subdataset_metadata(&items).is_empty());
    }
}
