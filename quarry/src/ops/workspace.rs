use anyhow::Result;
use camino::Utf8Path;

use crate::core::{Config, Workspace};
use crate::ops;

#[tracing::instrument(level = "debug", skip(config))]
pub fn read_workspace<'c>(manifest_path: &Utf8Path, config: &'c Config) -> Result<Workspace<'c>> {
    let manifest = ops::read_manifest(manifest_path)?;
    Ok(Workspace::new(manifest, config))
}
