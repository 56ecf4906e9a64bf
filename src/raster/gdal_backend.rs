//! GDAL implementation of the raster backend

use std::path::Path;
use gdal::raster::RasterCreationOptions;
use gdal::{Dataset, DatasetOptions, DriverManager, GdalOpenFlags, Metadata};
use log::{debug, info};

use crate::errors::{CogError, CogResult};
use crate::profile::ConversionProfile;
use super::{parse_subdataset_metadata, RasterBackend, RasterSource};

/// Geotransform GDAL reports for rasters without georeferencing
const IDENTITY_TRANSFORM: [f64; 6] = [0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

/// Raster backend on top of the GDAL library
#[derive(Debug, Default, Clone, Copy)]
pub struct GdalBackend;

impl GdalBackend {
    pub fn new() -> Self {
        GdalBackend
    }

    fn open(&self, location: &str) -> CogResult<Dataset> {
        let options = DatasetOptions {
            open_flags: GdalOpenFlags::GDAL_OF_RASTER | GdalOpenFlags::GDAL_OF_READONLY,
            ..Default::default()
        };
        Dataset::open_ex(location, options).map_err(|e| CogError::source_open(location, e))
    }
}

impl RasterBackend for GdalBackend {
    fn describe(&self, location: &str) -> CogResult<RasterSource> {
        let dataset = self.open(location)?;

        let subdatasets = dataset
            .metadata_domain("SUBDATASETS")
            .map(|items| parse_subdataset_metadata(items.as_slice()))
            .unwrap_or_default();

        let georeferenced = match dataset.geo_transform() {
            Ok(transform) => transform != IDENTITY_TRANSFORM,
            Err(_) => false,
        };

        let source = RasterSource {
            location: location.to_string(),
            driver: dataset.driver().short_name(),
            size: dataset.raster_size(),
            band_count: dataset.raster_count() as usize,
            georeferenced,
            subdatasets,
        };

        debug!("Described {}: driver={}, size={:?}, bands={}, subdatasets={}",
               location, source.driver, source.size, source.band_count, source.subdatasets.len());
        Ok(source)
    }

    fn translate(&self, location: &str, destination: &Path, profile: &ConversionProfile) -> CogResult<()> {
        let dataset = self.open(location)?;

        let driver = DriverManager::get_driver_by_name(&profile.driver)
            .map_err(|e| CogError::encoding(destination, e))?;

        let mut options = RasterCreationOptions::new();
        for (key, value) in profile.creation_options() {
            options
                .set_name_value(&key, &value)
                .map_err(|e| CogError::encoding(destination, e))?;
        }

        info!("Writing {} with driver {}", destination.display(), driver.short_name());
        dataset
            .create_copy(&driver, destination, &options)
            .map_err(|e| CogError::encoding(destination, e))?;

        Ok(())
    }
}
