use std::path::Path;
use log::info;

use crate::errors::{CogError, CogResult};
use crate::profile::{resolve_default, ProfileOverrides};
use crate::raster::{GdalBackend, RasterBackend, RasterWriter};
use crate::subdatasets::{FailurePolicy, Subdataset, SubdatasetConversion, SubdatasetEnumerator};
use crate::tiff::CogLayout;

/// Main interface to the conversion engine
///
/// Every call is independent: nothing is cached between conversions.
pub struct Cogifier<B: RasterBackend = GdalBackend> {
    backend: B,
}

impl Cogifier<GdalBackend> {
    /// A converter backed by GDAL
    pub fn with_gdal() -> Self {
        Cogifier { backend: GdalBackend::new() }
    }
}

impl<B: RasterBackend> Cogifier<B> {
    /// Create a converter on top of `backend`
    pub fn new(backend: B) -> Self {
        Cogifier { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Convert one raster to a COG
    ///
    /// # Arguments
    /// * `input` - Path or URI of the input raster
    /// * `output` - File to create or overwrite
    /// * `overrides` - Encoding options laid over the COG defaults
    ///
    /// # Returns
    /// Result indicating success or an error
    pub fn convert(&self, input: &str, output: &Path, overrides: &ProfileOverrides) -> CogResult<()> {
        let profile = resolve_default(overrides);
        RasterWriter::new(&self.backend).convert(input, output, &profile)?;
        info!("Wrote {}", output.display());
        Ok(())
    }

    /// Convert every subdataset of a container with the default profile
    ///
    /// # Arguments
    /// * `input` - Path of the container (HDF, netCDF, ...)
    /// * `output_dir` - Directory receiving `<name>.tif` per subdataset
    ///
    /// # Returns
    /// Output paths and derived names, index-aligned
    pub fn convert_subdatasets(&self, input: &str, output_dir: &Path) -> CogResult<SubdatasetConversion> {
        self.subdataset_enumerator().convert_all(input, output_dir)
    }

    /// Convert subdatasets with explicit options
    ///
    /// # Arguments
    /// * `input` - Path of the container
    /// * `output_dir` - Output directory
    /// * `overrides` - Encoding options laid over the COG defaults
    /// * `only` - Derived names to convert; all when empty
    /// * `policy` - Whether one failure aborts the rest
    pub fn convert_subdatasets_with(&self,
                                    input: &str,
                                    output_dir: &Path,
                                    overrides: &ProfileOverrides,
                                    only: &[String],
                                    policy: FailurePolicy) -> CogResult<SubdatasetConversion> {
        let mut enumerator = self
            .subdataset_enumerator()
            .with_profile(resolve_default(overrides))
            .with_policy(policy);
        if !only.is_empty() {
            enumerator = enumerator.only(only.iter().cloned());
        }
        enumerator.convert_all(input, output_dir)
    }

    /// List the subdatasets of a container with their derived names
    pub fn subdatasets(&self, input: &str) -> CogResult<Vec<Subdataset>> {
        self.subdataset_enumerator().list(input)
    }

    /// Enumerator over this converter's backend, for finer control
    pub fn subdataset_enumerator(&self) -> SubdatasetEnumerator<'_, B> {
        SubdatasetEnumerator::new(&self.backend)
    }

    /// Read the layout of a produced GeoTIFF
    pub fn inspect(&self, path: &Path) -> CogResult<CogLayout> {
        Ok(crate::tiff::inspect(path)?)
    }
}

/// Convert `input` to a COG at `output` using GDAL
pub fn cogify(input: impl AsRef<Path>, output: impl AsRef<Path>, overrides: &ProfileOverrides) -> CogResult<()> {
    let input = location(input.as_ref())?;
    Cogifier::with_gdal().convert(input, output.as_ref(), overrides)
}

/// Convert every subdataset of `input` into `output_dir` using GDAL
pub fn cogify_subdatasets(input: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> CogResult<SubdatasetConversion> {
    let input = location(input.as_ref())?;
    Cogifier::with_gdal().convert_subdatasets(input, output_dir.as_ref())
}

/// GDAL opens datasets by UTF-8 name
fn location(path: &Path) -> CogResult<&str> {
    path.to_str()
        .ok_or_else(|| CogError::source_open(path.to_string_lossy(), "path is not valid UTF-8"))
}

/// Read the layout of the GeoTIFF at `path`
pub fn inspect(path: impl AsRef<Path>) -> CogResult<CogLayout> {
    Ok(crate::tiff::inspect(path.as_ref())?)
}
