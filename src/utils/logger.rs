//! Logging setup for the command-line tool
//!
//! The library only emits through the `log` facade; the binary decides
//! where records go.

use env_logger::{Builder, Env};
use log::LevelFilter;

use crate::georef::route_toolkit_diagnostics_to_log;

/// Install `env_logger` and send GDAL diagnostics through it
///
/// `RUST_LOG` wins over the level chosen here.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };

    let mut builder = Builder::from_env(Env::default().default_filter_or(default_level.as_str()));
    builder.format_timestamp(None).format_target(false);
    if builder.try_init().is_err() {
        eprintln!("Warning: logger was already initialized");
    }

    route_toolkit_diagnostics_to_log();
}
