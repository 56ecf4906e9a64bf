//! Re-encode one raster to a destination file
//!
//! The copy is written next to the destination under a hidden
//! `.<name>.partial` file and renamed into place only once the toolkit
//! reports success, so a failed conversion never leaves a truncated
//! file at the destination.

use std::fs;
use std::path::{Path, PathBuf};
use log::{debug, info, warn};

use crate::errors::{CogError, CogResult};
use crate::georef;
use crate::profile::ConversionProfile;
use super::RasterBackend;

/// Writes encoded copies of rasters through a backend
pub struct RasterWriter<'a, B: RasterBackend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: RasterBackend + ?Sized> RasterWriter<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        RasterWriter { backend }
    }

    /// Convert `source` into `destination` under `profile`
    ///
    /// # Arguments
    /// * `source` - Path or toolkit URI of the input raster
    /// * `destination` - File to create or overwrite
    /// * `profile` - Fully resolved encoding profile
    ///
    /// # Returns
    /// Ok once `destination` holds the complete output
    pub fn convert(&self, source: &str, destination: &Path, profile: &ConversionProfile) -> CogResult<()> {
        let description = self.backend.describe(source)?;
        if !description.georeferenced {
            if georef::is_ignoring_not_georeferenced() {
                debug!("{} is not georeferenced", source);
            } else {
                warn!("{} is not georeferenced", source);
            }
        }

        let partial = partial_path(destination)?;
        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        info!("Converting {} to {} ({}, {})",
              source, destination.display(), profile.driver, profile.compress);

        if let Err(e) = self.backend.translate(source, &partial, profile) {
            discard(&partial);
            return Err(e);
        }

        if let Err(e) = fs::rename(&partial, destination) {
            discard(&partial);
            return Err(e.into());
        }

        debug!("Finished {}", destination.display());
        Ok(())
    }
}

/// Hidden sibling path the copy is written to before the final rename
fn partial_path(destination: &Path) -> CogResult<PathBuf> {
    let file_name = destination
        .file_name()
        .ok_or_else(|| CogError::encoding(destination, "destination has no file name"))?;

    let mut partial_name = std::ffi::OsString::from(".");
    partial_name.push(file_name);
    partial_name.push(".partial");
    Ok(destination.with_file_name(partial_name))
}

fn discard(partial: &Path) {
    if partial.exists() {
        if let Err(e) = fs::remove_file(partial) {
            warn!("Could not remove {}: {}", partial.display(), e);
        }
    }
}
