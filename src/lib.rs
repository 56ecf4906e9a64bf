pub mod io;
pub mod tiff;
pub mod utils;
pub mod errors;
pub mod georef;
pub mod profile;
pub mod raster;
pub mod subdatasets;
pub mod commands;
pub mod api;

pub use crate::api::{cogify, cogify_subdatasets, inspect, Cogifier};

pub use errors::{CogError, CogResult};
pub use georef::{ignore_not_georeferenced, with_not_georeferenced_ignored, GeoreferenceGuard};
pub use profile::{resolve, resolve_default, ConversionProfile, ProfileOverrides};
pub use raster::{GdalBackend, RasterBackend, RasterSource, SubdatasetEntry};
pub use subdatasets::{derive_name, FailurePolicy, Subdataset, SubdatasetConversion, SubdatasetEnumerator};
pub use tiff::{CogLayout, TiffReader};
