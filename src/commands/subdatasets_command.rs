//! Subdataset listing and conversion commands

use std::path::PathBuf;
use clap::ArgMatches;

use crate::api::Cogifier;
use crate::commands::command_traits::Command;
use crate::errors::CogResult;
use crate::profile::{resolve_default, ProfileOverrides};
use crate::subdatasets::FailurePolicy;

/// Convert the subdatasets of a container into a directory
pub struct SubdatasetsCommand {
    input: String,
    output_dir: PathBuf,
    overrides: ProfileOverrides,
    only: Vec<String>,
    policy: FailurePolicy,
}

impl SubdatasetsCommand {
    pub fn new(args: &ArgMatches) -> CogResult<Self> {
        let only = args
            .get_many::<String>("only")
            .map(|names| names.cloned().collect())
            .unwrap_or_default();
        let policy = if args.get_flag("keep-going") {
            FailurePolicy::Continue
        } else {
            FailurePolicy::FailFast
        };

        Ok(SubdatasetsCommand {
            input: super::required_input(args)?,
            output_dir: super::required_output(args)?,
            overrides: super::profile_overrides(args)?,
            only,
            policy,
        })
    }
}

impl Command for SubdatasetsCommand {
    fn execute(&self) -> CogResult<()> {
        let cogifier = Cogifier::with_gdal();
        let mut enumerator = cogifier
            .subdataset_enumerator()
            .with_profile(resolve_default(&self.overrides))
            .with_policy(self.policy)
            .show_progress(true);
        if !self.only.is_empty() {
            enumerator = enumerator.only(self.only.iter().cloned());
        }

        let result = enumerator.convert_all(&self.input, &self.output_dir)?;
        for (path, name) in result.iter() {
            println!("{}\t{}", name, path.display());
        }
        Ok(())
    }
}

/// Print the subdatasets of a container
pub struct ListSubdatasetsCommand {
    input: String,
}

impl ListSubdatasetsCommand {
    pub fn new(args: &ArgMatches) -> CogResult<Self> {
        Ok(ListSubdatasetsCommand { input: super::required_input(args)? })
    }
}

impl Command for ListSubdatasetsCommand {
    fn execute(&self) -> CogResult<()> {
        for subdataset in Cogifier::with_gdal().subdatasets(&self.input)? {
            println!("{}\t{}\t{}",
                     subdataset.index,
                     subdataset.name,
                     subdataset.description.as_deref().unwrap_or(&subdataset.identifier));
        }
        Ok(())
    }
}
