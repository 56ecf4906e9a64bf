//! Subdataset discovery and per-subdataset conversion
//!
//! Container formats (HDF4, HDF5, netCDF) bundle several independent
//! grids. The enumerator lists them in the order the toolkit reports,
//! gives each a unique short name and converts each into
//! `<output dir>/<name>.tif`.

pub mod naming;

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use log::{info, warn};

use crate::errors::{CogError, CogResult};
use crate::georef::ignore_not_georeferenced;
use crate::profile::ConversionProfile;
use crate::raster::{RasterBackend, RasterWriter};
use crate::utils::progress::ProgressTracker;

pub use naming::{derive_name, unique_names};

/// What to do when one subdataset fails to convert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Abort on the first failure
    #[default]
    FailFast,
    /// Log the failure and move on to the next subdataset
    Continue,
}

/// A named grid inside a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subdataset {
    /// Location of the container
    pub parent: String,
    /// 1-based position in the toolkit's listing
    pub index: usize,
    /// Identifier that opens the subdataset
    pub identifier: String,
    pub description: Option<String>,
    /// Unique, filesystem-safe short name
    pub name: String,
}

/// Outputs of a subdataset conversion, index-aligned
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubdatasetConversion {
    pub paths: Vec<PathBuf>,
    pub names: Vec<String>,
}

impl SubdatasetConversion {
    fn push(&mut self, path: PathBuf, name: String) {
        self.paths.push(path);
        self.names.push(name);
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// `(path, name)` pairs in conversion order
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.paths.iter().map(PathBuf::as_path).zip(self.names.iter().map(String::as_str))
    }

    /// Split into the parallel `(paths, names)` vectors
    pub fn into_parts(self) -> (Vec<PathBuf>, Vec<String>) {
        (self.paths, self.names)
    }
}

/// Lists and converts the subdatasets of a container
pub struct SubdatasetEnumerator<'a, B: RasterBackend + ?Sized> {
    backend: &'a B,
    profile: ConversionProfile,
    policy: FailurePolicy,
    only: Option<BTreeSet<String>>,
    show_progress: bool,
}

impl<'a, B: RasterBackend + ?Sized> SubdatasetEnumerator<'a, B> {
    /// Enumerator writing with the default COG profile, failing fast
    pub fn new(backend: &'a B) -> Self {
        SubdatasetEnumerator {
            backend,
            profile: ConversionProfile::default(),
            policy: FailurePolicy::default(),
            only: None,
            show_progress: false,
        }
    }

    pub fn with_profile(mut self, profile: ConversionProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Restrict conversion to subdatasets with these derived names
    pub fn only<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Draw a progress bar while converting
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// List the subdatasets of `container` with their derived names
    ///
    /// # Returns
    /// Subdatasets in toolkit order, or `SubdatasetDiscovery` if the
    /// container has none
    pub fn list(&self, container: &str) -> CogResult<Vec<Subdataset>> {
        let source = {
            let _guard = ignore_not_georeferenced();
            self.backend.describe(container)?
        };

        if !source.is_container() {
            return Err(CogError::discovery(
                container,
                format!("driver {} reports no subdatasets", source.driver),
            ));
        }

        let names = unique_names(
            source.subdatasets.iter().map(|entry| (entry.index, derive_name(&entry.identifier))),
        );

        Ok(source
            .subdatasets
            .into_iter()
            .zip(names)
            .map(|(entry, name)| Subdataset {
                parent: container.to_string(),
                index: entry.index,
                identifier: entry.identifier,
                description: entry.description,
                name,
            })
            .collect())
    }

    /// Convert every (selected) subdataset of `container` into `output_dir`
    ///
    /// # Arguments
    /// * `container` - Path or URI of the container raster
    /// * `output_dir` - Directory receiving one `<name>.tif` per subdataset
    ///
    /// # Returns
    /// Output paths and names, index-aligned, in toolkit order
    pub fn convert_all(&self, container: &str, output_dir: &Path) -> CogResult<SubdatasetConversion> {
        let subdatasets = self.selected(container)?;
        info!("Converting {} subdatasets of {} into {}",
              subdatasets.len(), container, output_dir.display());

        fs::create_dir_all(output_dir)?;

        let progress = if self.show_progress {
            ProgressTracker::new(subdatasets.len() as u64, "Converting subdatasets")
        } else {
            ProgressTracker::hidden(subdatasets.len() as u64)
        };

        let writer = RasterWriter::new(self.backend);
        let mut result = SubdatasetConversion::default();

        for subdataset in subdatasets {
            progress.set_message(&subdataset.name);
            let path = output_dir.join(format!("{}.tif", subdataset.name));

            let outcome = {
                let _guard = ignore_not_georeferenced();
                writer.convert(&subdataset.identifier, &path, &self.profile)
            };

            match outcome {
                Ok(()) => result.push(path, subdataset.name),
                Err(e) if self.policy == FailurePolicy::Continue => {
                    warn!("Skipping subdataset {}: {}", subdataset.name, e);
                }
                Err(e) => {
                    progress.abandon(&format!("Failed on {}", subdataset.name));
                    return Err(e);
                }
            }
            progress.increment(1);
        }

        progress.finish();
        info!("Converted {} of {} subdatasets", result.len(), progress.position());
        Ok(result)
    }

    fn selected(&self, container: &str) -> CogResult<Vec<Subdataset>> {
        let subdatasets = self.list(container)?;
        let Some(only) = &self.only else {
            return Ok(subdatasets);
        };

        let selected: Vec<Subdataset> = subdatasets
            .into_iter()
            .filter(|subdataset| only.contains(&subdataset.name))
            .collect();

        if selected.is_empty() {
            let wanted: Vec<&str> = only.iter().map(String::as_str).collect();
            return Err(CogError::discovery(
                container,
                format!("no subdataset named {}", wanted.join(", ")),
            ));
        }
        Ok(selected)
    }
}
