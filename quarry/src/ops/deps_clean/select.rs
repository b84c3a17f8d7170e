use std::collections::BTreeSet;

use crate::core::{DependencyName, Selection, Snapshot, Workspace};

/// Final, immutable set of dependencies a cleanup operates on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CleanupTargets(Vec<DependencyName>);

impl CleanupTargets {
    /// Turn a [`Selection`] into concrete dependency names.
    ///
    /// `discovered` are dependencies with directories on disk, `snapshot` lists dependencies the
    /// project currently uses. Explicit names are taken verbatim, whether they exist or not.
    pub(crate) fn resolve(
        selection: &Selection,
        discovered: BTreeSet<DependencyName>,
        snapshot: &Snapshot,
    ) -> Self {
        match selection {
            Selection::Explicit(names) => Self(names.clone()),
            Selection::All => Self(discovered.into_iter().collect()),
            Selection::Unused => Self(
                discovered
                    .into_iter()
                    .filter(|name| !snapshot.contains(name))
                    .collect(),
            ),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &DependencyName> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[DependencyName] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Drop the project's own package from an explicit selection, warning about it.
///
/// The project itself is never a dependency, so there is nothing of it to clean or unlock.
pub fn exclude_own_package(ws: &Workspace<'_>, selection: &Selection) -> Selection {
    match selection {
        Selection::Explicit(names) if names.contains(ws.package_name()) => {
            ws.config().ui().warn(format!(
                "`{}` is the current project, not a dependency, ignoring",
                ws.package_name()
            ));
            Selection::Explicit(
                names
                    .iter()
                    .filter(|name| *name != ws.package_name())
                    .cloned()
                    .collect(),
            )
        }
        selection => selection.clone(),
    }
}
