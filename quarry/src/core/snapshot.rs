use std::collections::BTreeSet;

use crate::core::dependency::{DependencyName, DependencySpec};
use crate::core::selection::Scope;

/// The converged dependency tree of a project, flattened to one entry per dependency.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    deps: Vec<DependencySpec>,
}

impl Snapshot {
    pub fn new(deps: Vec<DependencySpec>) -> Self {
        Self { deps }
    }

    pub fn iter(&self) -> impl Iterator<Item = &DependencySpec> {
        self.deps.iter()
    }

    pub fn contains(&self, name: &DependencyName) -> bool {
        self.deps.iter().any(|dep| &dep.name == name)
    }

    /// Names of dependencies referenced by a local path, whose sources are never fetched.
    pub fn local_names(&self) -> BTreeSet<DependencyName> {
        self.deps
            .iter()
            .filter(|dep| !dep.is_fetchable())
            .map(|dep| dep.name.clone())
            .collect()
    }

    /// Keep only dependencies used within `scope`.
    pub fn filter(&self, scope: &Scope) -> Self {
        Self {
            deps: self
                .deps
                .iter()
                .filter(|dep| scope.includes(dep))
                .cloned()
                .collect(),
        }
    }
}

impl FromIterator<DependencySpec> for Snapshot {
    fn from_iter<I: IntoIterator<Item = DependencySpec>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
