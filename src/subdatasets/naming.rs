//! Short, filesystem-safe names for subdatasets
//!
//! Toolkit identifiers embed the driver and the container path, e.g.
//! `HDF5:"/data/rain.h5"://MonthlyRainTotal_GeoGrid/Data_Fields/RrLandRain`.
//! The name keeps only the part after the container path, with its
//! `:` and `/` separators folded into underscores:
//! `MonthlyRainTotal_GeoGrid_Data_Fields_RrLandRain`.

use std::collections::HashSet;
use lazy_static::lazy_static;
use log::warn;
use regex::Regex;

/// Name used when an identifier has nothing left after stripping
pub const FALLBACK_NAME: &str = "subdataset";

lazy_static! {
    static ref UNSAFE_CHARS: Regex = Regex::new(r"[^A-Za-z0-9_.\-]").expect("unsafe-char pattern is valid");
}

/// Derive a short name from a raw subdataset identifier
///
/// Pure: the same identifier always yields the same name.
pub fn derive_name(identifier: &str) -> String {
    let tail = match (identifier.find('"'), identifier.rfind('"')) {
        (Some(open), Some(close)) if close > open => &identifier[close + 1..],
        _ => identifier.rsplit(':').next().unwrap_or(identifier),
    };

    let name = tail
        .split(|c| c == ':' || c == '/')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| UNSAFE_CHARS.replace_all(segment, "_").into_owned())
        .collect::<Vec<_>>()
        .join("_");

    if name.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        name
    }
}

/// Make names unique within one container
///
/// Takes `(toolkit index, derived name)` pairs in toolkit order. A name
/// already taken gets `_<index>` appended, and a counter after that if
/// it still collides. Names are compared case-insensitively so outputs
/// cannot clobber each other on case-insensitive filesystems.
pub fn unique_names<I>(candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = (usize, String)>,
{
    let mut taken = HashSet::new();
    let mut names = Vec::new();

    for (index, name) in candidates {
        let mut unique = name.clone();
        if taken.contains(&unique.to_lowercase()) {
            unique = format!("{}_{}", name, index);
            let mut counter = 2;
            while taken.contains(&unique.to_lowercase()) {
                unique = format!("{}_{}_{}", name, index, counter);
                counter += 1;
            }
            warn!("Subdataset name '{}' is taken, using '{}'", name, unique);
        }
        taken.insert(unique.to_lowercase());
        names.push(unique);
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hdf5_identifier() {
        assert_eq!(
            derive_name("HDF5:\"/data/AMSR_E_L3_RainGrid_B05_200707.h5\"://MonthlyRainTotal_GeoGrid/Data_Fields/RrLandRain"),
            "MonthlyRainTotal_GeoGrid_Data_Fields_RrLandRain"
        );
        assert_eq!(
            derive_name("HDF5:\"/data/AMSR_E_L3_RainGrid_B05_200707.h5\"://MonthlyRainTotal_GeoGrid/Data_Fields/TbOceanRain"),
            "MonthlyRainTotal_GeoGrid_Data_Fields_TbOceanRain"
        );
    }

    #[test]
    fn test_other_drivers() {
        assert_eq!(derive_name("NETCDF:\"sst.nc\":analysed_sst"), "analysed_sst");
        assert_eq!(
            derive_name("HDF4_EOS:EOS_GRID:\"MCD43A4.hdf\":MOD_Grid_BRDF:Nadir_Reflectance_Band1"),
            "MOD_Grid_BRDF_Nadir_Reflectance_Band1"
        );
        assert_eq!(derive_name("NETCDF:sst.nc:analysed_sst"), "analysed_sst");
        assert_eq!(derive_name("HDF5:/data/f.h5://group/var"), "group_var");
    }

    #[test]
    fn test_quoted_path_with_colons() {
        assert_eq!(derive_name("HDF5:\"C:\\data\\f.h5\"://grid/var"), "grid_var");
        assert_eq!(derive_name("NETCDF:\"/vsis3/bucket/a:b.nc\":tas"), "tas");
    }

    #[test]
    fn test_unsafe_characters_are_replaced() {
        assert_eq!(derive_name("NETCDF:\"a.nc\":sea surface (K)"), "sea_surface__K_");
        assert_eq!(derive_name("HDF5:\"a.h5\"://a b/c*d"), "a_b_c_d");
    }

    #[test]
    fn test_empty_tail_falls_back() {
        assert_eq!(derive_name("HDF5:\"a.h5\"://"), FALLBACK_NAME);
        assert_eq!(derive_name(""), FALLBACK_NAME);
    }

    #[test]
    fn test_derivation_is_pure() {
        let identifier = "HDF5:\"rain.h5\"://MonthlyRainTotal_GeoGrid/Data_Fields/RrLandRain";
        assert_eq!(derive_name(identifier), derive_name(identifier));
    }

    #[test]
    fn test_unique_names() {
        let names = unique_names(vec![
            (1, "rain".to_string()),
            (2, "rain".to_string()),
            (3, "snow".to_string()),
            (4, "Rain".to_string()),
        ]);
        assert_eq!(names, vec!["rain", "rain_2", "snow", "Rain_4"]);
    }

    #[test]
    fn test_unique_names_chain() {
        let names = unique_names(vec![
            (1, "a".to_string()),
            (2, "a".to_string()),
            (3, "a_2".to_string()),
        ]);
        assert_eq!(names, vec!["a", "a_2", "a_2_3"]);

        let repeated = unique_names(vec![
            (1, "a".to_string()),
            (2, "a".to_string()),
            (3, "a".to_string()),
        ]);
        assert_eq!(repeated, unique_names(vec![
            (1, "a".to_string()),
            (2, "a".to_string()),
            (3, "a".to_string()),
        ]));
        assert_eq!(repeated, vec!["a", "a_2", "a_3"]);
    }
}
