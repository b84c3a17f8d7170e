use anyhow::Result;

use quarry::core::{Config, Selection};

use crate::args::{Command, DepsSelectionArgs, DepsSubcommand};
use crate::errors::ErrorWithExitCode;

pub mod deps_clean;
pub mod deps_unlock;

pub fn run(command: Command, config: &Config) -> Result<()> {
    use Command::*;

    match command {
        // Keep these sorted alphabetically.
        Deps(DepsSubcommand::Clean(args)) => deps_clean::run(args, config),
        Deps(DepsSubcommand::Unlock(args)) => deps_unlock::run(args, config),
    }
}

/// Validate selection flags before anything is read from disk.
fn selection(args: DepsSelectionArgs, command: &'static str) -> Result<Selection> {
    Selection::from_args(args.names, args.all, args.unused, command)
        .map_err(|err| ErrorWithExitCode::usage(err.into()).into())
}
