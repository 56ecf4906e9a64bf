//! CLI command implementations
//!
//! Each CLI mode maps to one command object; the factory picks it from
//! the parsed arguments.

pub mod command_traits;
pub mod cogify_command;
pub mod subdatasets_command;
pub mod inspect_command;

pub use command_traits::{Command, CommandFactory};
pub use cogify_command::CogifyCommand;
pub use subdatasets_command::{ListSubdatasetsCommand, SubdatasetsCommand};
pub use inspect_command::InspectCommand;

use std::path::PathBuf;
use clap::{Arg, ArgAction, ArgMatches, Command as ClapCommand};

use crate::errors::{CogError, CogResult};
use crate::profile::ProfileOverrides;

/// Command-line definition of the `cogify` tool
pub fn build_cli() -> ClapCommand {
    ClapCommand::new("cogify")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert rasters and their subdatasets into Cloud-Optimized GeoTIFFs")
        .arg(
            Arg::new("input")
                .help("Input raster, container file or GDAL dataset URI")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Output file, or output directory with --subdatasets")
                .value_name("PATH"),
        )
        .arg(
            Arg::new("co")
                .long("co")
                .help("Profile option as KEY=VALUE (driver, compress, tiled, blocksize or any creation option)")
                .value_name("KEY=VALUE")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("profile")
                .long("profile")
                .help("TOML file with profile options; --co values override it")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("subdatasets")
                .long("subdatasets")
                .help("Convert every subdataset of the input into the output directory")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-subdatasets")
                .long("list-subdatasets")
                .help("List subdatasets and their derived names")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("only")
                .long("only")
                .help("Only convert the subdataset with this derived name (repeatable)")
                .value_name("NAME")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("keep-going")
                .long("keep-going")
                .help("Skip subdatasets that fail instead of stopping")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("inspect")
                .long("inspect")
                .help("Print the TIFF layout (compression, tiling, overviews) of the input")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug output")
                .action(ArgAction::SetTrue),
        )
}

/// Factory for creating command instances based on CLI arguments
pub struct CogifyCommandFactory;

impl CogifyCommandFactory {
    pub fn new() -> Self {
        CogifyCommandFactory
    }
}

impl Default for CogifyCommandFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandFactory for CogifyCommandFactory {
    fn create_command(&self, args: &ArgMatches) -> CogResult<Box<dyn Command>> {
        if args.get_flag("inspect") {
            Ok(Box::new(InspectCommand::new(args)?))
        } else if args.get_flag("list-subdatasets") {
            Ok(Box::new(ListSubdatasetsCommand::new(args)?))
        } else if args.get_flag("subdatasets") {
            Ok(Box::new(SubdatasetsCommand::new(args)?))
        } else {
            Ok(Box::new(CogifyCommand::new(args)?))
        }
    }
}

pub(crate) fn required_input(args: &ArgMatches) -> CogResult<String> {
    args.get_one::<String>("input")
        .cloned()
        .ok_or_else(|| CogError::Usage("missing input".to_string()))
}

pub(crate) fn required_output(args: &ArgMatches) -> CogResult<PathBuf> {
    args.get_one::<String>("output")
        .map(PathBuf::from)
        .ok_or_else(|| CogError::Usage("--output is required for conversion".to_string()))
}

/// Profile file first, then `--co` pairs on top
pub(crate) fn profile_overrides(args: &ArgMatches) -> CogResult<ProfileOverrides> {
    let mut overrides = match args.get_one::<String>("profile") {
        Some(path) => ProfileOverrides::from_file(path)?,
        None => ProfileOverrides::new(),
    };

    if let Some(pairs) = args.get_many::<String>("co") {
        overrides.apply_pairs(pairs)?;
    }

    Ok(overrides)
}
