use std::collections::BTreeSet;

use anyhow::Result;
use camino::Utf8Path;
use tracing::{debug, trace};

use crate::core::DependencyName;
use crate::internal::wildcard::PathPattern;

/// Find names of all dependencies which have a directory in the build or dependencies directory.
///
/// `build_pattern` matches per-environment library directories, each holding one subdirectory per
/// dependency. Hidden entries and the project's own name are never reported.
#[tracing::instrument(level = "debug", skip_all)]
pub(crate) fn discover(
    build_pattern: &PathPattern,
    deps_dir: &Utf8Path,
    own_name: &DependencyName,
) -> Result<BTreeSet<DependencyName>> {
    let build_entries = build_pattern.wildcard("").expand()?;
    let deps_entries = PathPattern::new(deps_dir).wildcard("").expand()?;

    let discovered = build_entries
        .into_iter()
        .chain(deps_entries)
        .filter(|path| is_dir_like(path))
        .filter_map(|path| dependency_name(&path))
        .filter(|name| name != own_name)
        .collect::<BTreeSet<_>>();

    trace!(?discovered);
    Ok(discovered)
}

/// Directories, and links which may point to one.
fn is_dir_like(path: &Utf8Path) -> bool {
    path.is_dir() || path.is_symlink()
}

fn dependency_name(path: &Utf8Path) -> Option<DependencyName> {
    let file_name = path.file_name()?;
    match file_name.parse() {
        Ok(name) => Some(name),
        Err(err) => {
            debug!("ignoring directory which is not a dependency: {path}: {err}");
            None
        }
    }
}
