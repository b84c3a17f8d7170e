use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};

use anyhow::{Context, Result};
use fs4::FileExt;

use crate::core::{Lockfile, Workspace};

/// Read the lock file of the workspace, if there is one.
#[tracing::instrument(skip_all, level = "debug")]
pub fn read_lockfile(ws: &Workspace<'_>) -> Result<Option<Lockfile>> {
    let mut file = match OpenOptions::new().read(true).open(ws.lockfile_path()) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err).context("failed to open lockfile"),
    };

    FileExt::lock_shared(&file).context("failed to acquire shared lockfile access")?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .context("failed to read lockfile content")?;

    content.try_into().map(Some)
}

#[tracing::instrument(skip_all, level = "debug")]
pub fn write_lockfile(lockfile: &Lockfile, ws: &Workspace<'_>) -> Result<()> {
    let mut file = File::create(ws.lockfile_path()).context("failed to create lockfile")?;

    FileExt::lock_exclusive(&file).context("failed to acquire exclusive lockfile access")?;

    file.write_all(lockfile.render().as_bytes())
        .context("failed to write lockfile content")?;

    Ok(())
}
