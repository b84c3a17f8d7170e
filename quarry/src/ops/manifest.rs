use std::env;

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};

use crate::MANIFEST_FILE_NAME;
use crate::core::{Manifest, TomlManifest};
use crate::internal::fsx::{self, PathUtf8Ext};

#[tracing::instrument(level = "debug")]
pub fn read_manifest(manifest_path: &Utf8Path) -> Result<Manifest> {
    let toml_manifest = TomlManifest::read_from_path(manifest_path)?;
    toml_manifest
        .to_manifest(manifest_path)
        .with_context(|| format!("failed to parse manifest at `{manifest_path}`"))
}

/// Locate the project manifest.
///
/// An explicitly given path is used as-is (canonicalized if it exists). Otherwise, the current
/// directory and all its ancestors are searched for a `Quarry.toml` file.
#[tracing::instrument(level = "debug")]
pub fn find_manifest_path(user_override: Option<&Utf8Path>) -> Result<Utf8PathBuf> {
    match user_override {
        Some(user_override) => {
            Ok(fsx::canonicalize_utf8(user_override).unwrap_or_else(|_| user_override.into()))
        }
        None => try_find_manifest_of_pwd(),
    }
}

fn try_find_manifest_of_pwd() -> Result<Utf8PathBuf> {
    let pwd = env::current_dir()?.try_to_utf8()?;

    let mut root = Some(pwd.as_path());
    while let Some(path) = root {
        let manifest = path.join(MANIFEST_FILE_NAME);
        if manifest.is_file() {
            return Ok(manifest);
        }

        root = path.parent();
    }

    Ok(pwd.join(MANIFEST_FILE_NAME))
}
