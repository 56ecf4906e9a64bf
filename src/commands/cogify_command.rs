//! Single-raster conversion command

use std::path::PathBuf;
use clap::ArgMatches;
use log::info;

use crate::api::Cogifier;
use crate::commands::command_traits::Command;
use crate::errors::CogResult;
use crate::profile::{resolve_default, ProfileOverrides};

/// Convert one raster into a COG
pub struct CogifyCommand {
    input: String,
    output: PathBuf,
    overrides: ProfileOverrides,
}

impl CogifyCommand {
    pub fn new(args: &ArgMatches) -> CogResult<Self> {
        Ok(CogifyCommand {
            input: super::required_input(args)?,
            output: super::required_output(args)?,
            overrides: super::profile_overrides(args)?,
        })
    }

    /// Whether the output can be summarized by the TIFF inspector
    fn reports_layout(&self) -> bool {
        resolve_default(&self.overrides).writes_tiff()
    }
}

impl Command for CogifyCommand {
    fn execute(&self) -> CogResult<()> {
        let cogifier = Cogifier::with_gdal();
        cogifier.convert(&self.input, &self.output, &self.overrides)?;

        if self.reports_layout() {
            let layout = cogifier.inspect(&self.output)?;
            info!("{} written: {} compression, {} overviews",
                  self.output.display(), layout.compression, layout.overview_count);
        }
        Ok(())
    }
}
