use anyhow::Result;

use quarry::core::Config;
use quarry::ops;

use crate::args::DepsUnlockArgs;

#[tracing::instrument(skip_all, level = "info")]
pub fn run(args: DepsUnlockArgs, config: &Config) -> Result<()> {
    let selection = super::selection(args.selection, "unlock")?;
    let ws = ops::read_workspace(config.manifest_path(), config)?;
    ops::unlock_deps(&ws, &selection)?;
    Ok(())
}
