//! Encoding profiles for COG output
//!
//! A [`ConversionProfile`] is the complete set of encoding options handed
//! to the raster writer. Callers only describe what they want to change
//! through [`ProfileOverrides`]; [`resolve`] lays those over the built-in
//! defaults.

mod config;

use std::collections::BTreeMap;
use log::{debug, warn};

use crate::errors::{CogError, CogResult};

/// Driver that produces Cloud-Optimized GeoTIFFs
pub const DEFAULT_DRIVER: &str = "COG";
/// Lossless default compression
pub const DEFAULT_COMPRESSION: &str = "deflate";
/// Default internal tile edge in pixels
pub const DEFAULT_BLOCKSIZE: u32 = 512;

/// Complete encoding configuration for one write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionProfile {
    /// Output driver short name
    pub driver: String,
    /// Compression algorithm name
    pub compress: String,
    /// Whether the output is internally tiled
    pub tiled: bool,
    /// Tile edge in pixels
    pub blocksize: u32,
    /// Driver-specific creation options passed through verbatim
    pub extra: BTreeMap<String, String>,
}

impl Default for ConversionProfile {
    fn default() -> Self {
        ConversionProfile {
            driver: DEFAULT_DRIVER.to_string(),
            compress: DEFAULT_COMPRESSION.to_string(),
            tiled: true,
            blocksize: DEFAULT_BLOCKSIZE,
            extra: BTreeMap::new(),
        }
    }
}

impl ConversionProfile {
    /// Whether this profile targets the COG driver
    pub fn is_cog_driver(&self) -> bool {
        self.driver.eq_ignore_ascii_case(DEFAULT_DRIVER)
    }

    /// Whether the output is a TIFF the layout inspector can read
    pub fn writes_tiff(&self) -> bool {
        self.is_cog_driver() || self.driver.eq_ignore_ascii_case("GTiff")
    }

    /// Render the profile as `KEY=VALUE` creation options
    ///
    /// The COG driver always tiles and takes a single `BLOCKSIZE`; other
    /// drivers get `TILED` and the per-axis block sizes. Extras come last
    /// and replace any generated option with the same key.
    pub fn creation_options(&self) -> Vec<(String, String)> {
        let mut options = vec![("COMPRESS".to_string(), self.compress.to_ascii_uppercase())];

        if self.is_cog_driver() {
            if !self.tiled {
                warn!("COG output is always tiled, ignoring tiled=false");
            }
            options.push(("BLOCKSIZE".to_string(), self.blocksize.to_string()));
        } else {
            options.push(("TILED".to_string(), bool_option(self.tiled).to_string()));
            if self.tiled {
                options.push(("BLOCKXSIZE".to_string(), self.blocksize.to_string()));
                options.push(("BLOCKYSIZE".to_string(), self.blocksize.to_string()));
            }
        }

        for (key, value) in &self.extra {
            options.retain(|(existing, _)| existing != key);
            options.push((key.clone(), value.clone()));
        }

        debug!("Creation options for driver {}: {:?}", self.driver, options);
        options
    }
}

/// Caller-supplied partial profile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileOverrides {
    pub driver: Option<String>,
    pub compress: Option<String>,
    pub tiled: Option<bool>,
    pub blocksize: Option<u32>,
    /// Passthrough options, keys upper-cased
    pub extra: BTreeMap<String, String>,
}

impl ProfileOverrides {
    /// An empty set of overrides
    pub fn new() -> Self {
        Self::default()
    }

    pub fn driver(mut self, driver: impl Into<String>) -> Self {
        self.driver = Some(driver.into());
        self
    }

    pub fn compress(mut self, compress: impl Into<String>) -> Self {
        self.compress = Some(compress.into());
        self
    }

    pub fn tiled(mut self, tiled: bool) -> Self {
        self.tiled = Some(tiled);
        self
    }

    pub fn blocksize(mut self, blocksize: u32) -> Self {
        self.blocksize = Some(blocksize);
        self
    }

    /// Add a passthrough creation option
    pub fn option(mut self, key: &str, value: impl Into<String>) -> Self {
        self.extra.insert(key.to_ascii_uppercase(), value.into());
        self
    }

    /// Build overrides from `key=value` strings
    ///
    /// Well-known keys are matched case-insensitively; everything else
    /// becomes a passthrough option.
    pub fn from_pairs<I, S>(pairs: I) -> CogResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut overrides = ProfileOverrides::new();
        overrides.apply_pairs(pairs)?;
        Ok(overrides)
    }

    /// Lay `key=value` strings over the options already set
    pub fn apply_pairs<I, S>(&mut self, pairs: I) -> CogResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pair in pairs {
            let pair = pair.as_ref();
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| CogError::Profile(format!("expected KEY=VALUE, got '{}'", pair)))?;
            self.set(key.trim(), value.trim())?;
        }
        Ok(())
    }

    /// Set one option by name
    pub fn set(&mut self, key: &str, value: &str) -> CogResult<()> {
        if key.is_empty() {
            return Err(CogError::Profile(format!("empty option name for value '{}'", value)));
        }

        match key.to_ascii_lowercase().as_str() {
            "driver" => self.driver = Some(value.to_string()),
            "compress" => self.compress = Some(value.to_string()),
            "tiled" => self.tiled = Some(parse_bool(value)?),
            "blocksize" => {
                let size = value
                    .parse::<u32>()
                    .map_err(|_| CogError::Profile(format!("invalid blocksize '{}'", value)))?;
                self.blocksize = Some(size);
            }
            _ => {
                self.extra.insert(key.to_ascii_uppercase(), value.to_string());
            }
        }
        Ok(())
    }

    /// Whether no option is overridden
    pub fn is_empty(&self) -> bool {
        self.driver.is_none()
            && self.compress.is_none()
            && self.tiled.is_none()
            && self.blocksize.is_none()
            && self.extra.is_empty()
    }
}

/// Overlay `overrides` on `defaults`
///
/// Every key the caller set replaces the default; everything else passes
/// through. Values are not validated here.
pub fn resolve(defaults: &ConversionProfile, overrides: &ProfileOverrides) -> ConversionProfile {
    let mut extra = defaults.extra.clone();
    for (key, value) in &overrides.extra {
        extra.insert(key.to_ascii_uppercase(), value.clone());
    }

    ConversionProfile {
        driver: overrides.driver.clone().unwrap_or_else(|| defaults.driver.clone()),
        compress: overrides.compress.clone().unwrap_or_else(|| defaults.compress.clone()),
        tiled: overrides.tiled.unwrap_or(defaults.tiled),
        blocksize: overrides.blocksize.unwrap_or(defaults.blocksize),
        extra,
    }
}

/// Resolve against the built-in COG defaults
pub fn resolve_default(overrides: &ProfileOverrides) -> ConversionProfile {
    resolve(&ConversionProfile::default(), overrides)
}

fn parse_bool(value: &str) -> CogResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(CogError::Profile(format!("invalid boolean '{}'", value))),
    }
}

fn bool_option(value: bool) -> &'static str {
    if value { "YES" } else { "NO" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_make_a_cog() {
        let profile = resolve_default(&ProfileOverrides::new());
        assert_eq!(profile.driver, "COG");
        assert_eq!(profile.compress, "deflate");
        assert!(profile.tiled);
        assert_eq!(profile.blocksize, 512);
        assert!(profile.extra.is_empty());
    }

    #[test]
    fn test_caller_keys_win() {
        let overrides = ProfileOverrides::new().compress("lzw").blocksize(256);
        let profile = resolve_default(&overrides);
        assert_eq!(profile.compress, "lzw");
        assert_eq!(profile.blocksize, 256);
        assert_eq!(profile.driver, "COG");
        assert!(profile.tiled);
    }

    #[test]
    fn test_extras_overlay_default_extras() {
        let mut defaults = ConversionProfile::default();
        defaults.extra.insert("PREDICTOR".to_string(), "1".to_string());
        defaults.extra.insert("LEVEL".to_string(), "6".to_string());

        let overrides = ProfileOverrides::new().option("predictor", "2");
        let profile = resolve(&defaults, &overrides);
        assert_eq!(profile.extra.get("PREDICTOR").map(String::as_str), Some("2"));
        assert_eq!(profile.extra.get("LEVEL").map(String::as_str), Some("6"));
    }

    #[test]
    fn test_resolve_does_not_validate() {
        let profile = resolve_default(&ProfileOverrides::new().compress("not-a-codec"));
        assert_eq!(profile.compress, "not-a-codec");
    }

    #[test]
    fn test_cog_creation_options() {
        let options = ConversionProfile::default().creation_options();
        assert_eq!(
            options,
            vec![
                ("COMPRESS".to_string(), "DEFLATE".to_string()),
                ("BLOCKSIZE".to_string(), "512".to_string()),
            ]
        );
    }

    #[test]
    fn test_tiff_drivers_are_recognized() {
        assert!(ConversionProfile::default().writes_tiff());
        assert!(resolve_default(&ProfileOverrides::new().driver("gtiff")).writes_tiff());
        assert!(!resolve_default(&ProfileOverrides::new().driver("PNG")).writes_tiff());
    }

    #[test]
    fn test_gtiff_creation_options() {
        let profile = resolve_default(&ProfileOverrides::new().driver("GTiff").blocksize(256));
        let options = profile.creation_options();
        assert!(options.contains(&("TILED".to_string(), "YES".to_string())));
        assert!(options.contains(&("BLOCKXSIZE".to_string(), "256".to_string())));
        assert!(options.contains(&("BLOCKYSIZE".to_string(), "256".to_string())));

        let untiled = resolve_default(&ProfileOverrides::new().driver("GTiff").tiled(false));
        let options = untiled.creation_options();
        assert!(options.contains(&("TILED".to_string(), "NO".to_string())));
        assert!(!options.iter().any(|(key, _)| key == "BLOCKXSIZE"));
    }

    #[test]
    fn test_extra_replaces_generated_option() {
        let profile = resolve_default(&ProfileOverrides::new().option("blocksize", "1024"));
        let options = profile.creation_options();
        let blocksizes: Vec<_> = options.iter().filter(|(key, _)| key == "BLOCKSIZE").collect();
        assert_eq!(blocksizes.len(), 1);
        assert_eq!(blocksizes[0].1, "1024");
    }

    #[test]
    fn test_from_pairs() {
        let overrides =
            ProfileOverrides::from_pairs(["compress=lzw", "TILED=no", "blocksize = 128", "predictor=2"]).unwrap();
        assert_eq!(overrides.compress.as_deref(), Some("lzw"));
        assert_eq!(overrides.tiled, Some(false));
        assert_eq!(overrides.blocksize, Some(128));
        assert_eq!(overrides.extra.get("PREDICTOR").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_from_pairs_rejects_garbage() {
        assert!(matches!(ProfileOverrides::from_pairs(["compress"]), Err(CogError::Profile(_))));
        assert!(matches!(ProfileOverrides::from_pairs(["tiled=maybe"]), Err(CogError::Profile(_))));
        assert!(matches!(ProfileOverrides::from_pairs(["blocksize=big"]), Err(CogError::Profile(_))));
        assert!(matches!(ProfileOverrides::from_pairs(["=1"]), Err(CogError::Profile(_))));
    }

    #[test]
    fn test_is_empty() {
        assert!(ProfileOverrides::new().is_empty());
        assert!(!ProfileOverrides::new().tiled(true).is_empty());
    }
}
