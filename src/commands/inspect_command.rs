//! Layout inspection command

use std::path::PathBuf;
use clap::ArgMatches;

use crate::commands::command_traits::Command;
use crate::errors::CogResult;

/// Print the TIFF layout of a file
pub struct InspectCommand {
    input: PathBuf,
}

impl InspectCommand {
    pub fn new(args: &ArgMatches) -> CogResult<Self> {
        Ok(InspectCommand { input: PathBuf::from(super::required_input(args)?) })
    }
}

impl Command for InspectCommand {
    fn execute(&self) -> CogResult<()> {
        let layout = crate::api::inspect(&self.input)?;
        println!("{}", layout);
        Ok(())
    }
}
