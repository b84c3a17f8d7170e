use anyhow::Result;

use quarry::core::{Config, Scope};
use quarry::ops::{self, CleanDepsOptions};

use crate::args::DepsCleanArgs;

#[tracing::instrument(skip_all, level = "info")]
pub fn run(args: DepsCleanArgs, config: &Config) -> Result<()> {
    let opts = CleanDepsOptions {
        selection: super::selection(args.selection, "clean")?,
        scope: Scope {
            env: args.only,
            target: args.target,
        },
        build_only: args.build,
        unlock: args.unlock,
    };

    let ws = ops::read_workspace(config.manifest_path(), config)?;
    ops::clean_deps(&ws, &opts)?;
    Ok(())
}
