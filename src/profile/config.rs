//! Profile overrides loaded from TOML
//!
//! ```toml
//! compress = "zstd"
//! blocksize = 256
//!
//! [extra]
//! level = 9
//! predictor = 2
//! ```
//!
//! Top-level keys other than the well-known ones are treated like
//! entries of `[extra]`.

use std::fs;
use std::path::Path;
use log::info;

use crate::errors::{CogError, CogResult};
use super::ProfileOverrides;

impl ProfileOverrides {
    /// Parse overrides from a TOML document
    pub fn from_toml_str(content: &str) -> CogResult<Self> {
        let toml_value: toml::Value = content
            .parse()
            .map_err(|e| CogError::Profile(format!("Failed to parse TOML: {}", e)))?;

        let table = toml_value
            .as_table()
            .ok_or_else(|| CogError::Profile("profile must be a TOML table".to_string()))?;

        let mut overrides = ProfileOverrides::new();
        for (key, value) in table {
            if key == "extra" {
                let extra = value
                    .as_table()
                    .ok_or_else(|| CogError::Profile("[extra] must be a table".to_string()))?;
                for (extra_key, extra_value) in extra {
                    let text = scalar_to_option(extra_key, extra_value)?;
                    overrides.extra.insert(extra_key.to_ascii_uppercase(), text);
                }
                continue;
            }

            let text = scalar_to_option(key, value)?;
            overrides.set(key, &text)?;
        }

        Ok(overrides)
    }

    /// Load overrides from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> CogResult<Self> {
        let path = path.as_ref();
        info!("Loading profile from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

/// Stringify a scalar TOML value the way creation options expect it
fn scalar_to_option(key: &str, value: &toml::Value) -> CogResult<String> {
    match value {
        toml::Value::String(s) => Ok(s.clone()),
        toml::Value::Integer(i) => Ok(i.to_string()),
        toml::Value::Float(f) => Ok(f.to_string()),
        toml::Value::Boolean(b) => Ok(if *b { "YES" } else { "NO" }.to_string()),
        _ => Err(CogError::Profile(format!("option '{}' must be a scalar", key))),
    }
}
