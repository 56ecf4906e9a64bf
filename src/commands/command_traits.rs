//! Command pattern interfaces

use crate::errors::CogResult;

/// An executable CLI operation
pub trait Command {
    /// Execute the command
    fn execute(&self) -> CogResult<()>;
}

/// Builds the command matching parsed CLI arguments
pub trait CommandFactory {
    fn create_command(&self, args: &clap::ArgMatches) -> CogResult<Box<dyn Command>>;
}
