use std::collections::BTreeSet;

use anyhow::Result;
use itertools::Itertools;
use tracing::debug;

use quarry_ui::components::Status;

use crate::core::{DependencyName, Selection, Snapshot, Workspace};
use crate::ops;

/// Remove selected dependencies from the lock file, so that they are resolved anew.
///
/// Acquires the dependencies directory lock for the duration of the edit.
/// Returns names of removed lock file entries.
#[tracing::instrument(level = "debug", skip(ws))]
pub fn unlock_deps(ws: &Workspace<'_>, selection: &Selection) -> Result<BTreeSet<String>> {
    let snapshot = match selection {
        Selection::Unused => ops::converge(ws)?,
        _ => Snapshot::default(),
    };
    let selection = ops::exclude_own_package(ws, selection);
    ws.with_deps_lock(|| unlock(ws, &selection, &snapshot))
}

/// Remove selected dependencies from the lock file.
///
/// With [`Selection::Unused`], entries of dependencies not present in `snapshot` are removed.
/// The caller is responsible for holding the dependencies directory lock.
#[tracing::instrument(level = "debug", skip(ws, snapshot))]
pub fn unlock(
    ws: &Workspace<'_>,
    selection: &Selection,
    snapshot: &Snapshot,
) -> Result<BTreeSet<String>> {
    let Some(mut lockfile) = ops::read_lockfile(ws)? else {
        debug!("no lockfile found at: {}", ws.lockfile_path());
        if let Selection::Explicit(names) = selection {
            warn_not_locked(ws, names.iter());
        }
        return Ok(BTreeSet::new());
    };

    let own_name = ws.package_name().as_str();
    let removed = match selection {
        Selection::Explicit(names) => {
            let removed =
                lockfile.remove_packages(|name| names.iter().any(|n| n.as_str() == name));
            warn_not_locked(ws, names.iter().filter(|n| !removed.contains(n.as_str())));
            removed
        }
        Selection::All => lockfile.remove_packages(|name| name != own_name),
        Selection::Unused => {
            let used: BTreeSet<&str> = snapshot.iter().map(|dep| dep.name.as_str()).collect();
            lockfile.remove_packages(|name| name != own_name && !used.contains(name))
        }
    };

    if removed.is_empty() {
        debug!("lockfile left untouched");
        return Ok(removed);
    }

    for name in &removed {
        ws.config().ui().print(Status::new("Unlocking", name));
    }
    ops::write_lockfile(&lockfile, ws)?;

    Ok(removed)
}

fn warn_not_locked<'a>(ws: &Workspace<'_>, names: impl Iterator<Item = &'a DependencyName>) {
    let names = names.map(|name| format!("`{name}`")).join(", ");
    if !names.is_empty() {
        ws.config()
            .ui()
            .warn(format!("dependencies are not locked: {names}"));
    }
}
