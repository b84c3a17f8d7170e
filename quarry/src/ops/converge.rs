use std::collections::{BTreeSet, VecDeque};

use anyhow::Result;
use camino::Utf8PathBuf;
use tracing::{debug, trace};

use crate::MANIFEST_FILE_NAME;
use crate::core::{DependencyName, DependencySource, DependencySpec, Snapshot, Workspace};
use crate::ops;

/// Flatten the dependency tree of the workspace into a [`Snapshot`].
///
/// Dependencies are visited breadth-first, starting from the root manifest, and the first
/// declaration of each name wins. Manifests of dependencies are looked up in the dependencies
/// directory (fetched ones) or at their path (local ones). A dependency whose manifest cannot be
/// read is kept as a leaf.
#[tracing::instrument(level = "debug", skip_all)]
pub fn converge(ws: &Workspace<'_>) -> Result<Snapshot> {
    let deps_dir = ws.config().deps_dir().path_unchecked();

    let mut seen: BTreeSet<DependencyName> = BTreeSet::from([ws.package_name().clone()]);
    let mut queue: VecDeque<DependencySpec> = VecDeque::new();
    let mut converged = Vec::new();

    let enqueue = |queue: &mut VecDeque<DependencySpec>,
                   seen: &mut BTreeSet<DependencyName>,
                   dep: DependencySpec| {
        if seen.insert(dep.name.clone()) {
            queue.push_back(dep);
        } else {
            trace!(name = %dep.name, "dependency already converged");
        }
    };

    for dep in ws.manifest().dependencies.iter().cloned() {
        enqueue(&mut queue, &mut seen, dep);
    }

    while let Some(dep) = queue.pop_front() {
        let manifest_path: Utf8PathBuf = match &dep.source {
            DependencySource::Path { path } => path.join(MANIFEST_FILE_NAME),
            _ => deps_dir.join(dep.name.as_str()).join(MANIFEST_FILE_NAME),
        };

        if manifest_path.is_file() {
            match ops::read_manifest(&manifest_path) {
                Ok(manifest) => {
                    for mut child in manifest.dependencies {
                        if child.only.is_empty() {
                            child.only = dep.only.clone();
                        }
                        enqueue(&mut queue, &mut seen, child);
                    }
                }
                Err(err) => {
                    debug!("treating `{}` as a leaf dependency: {err:?}", dep.name);
                }
            }
        } else {
            debug!("no manifest found for `{}` at: {manifest_path}", dep.name);
        }

        converged.push(dep);
    }

    Ok(Snapshot::new(converged))
}

#[cfg(test)]
mod tests {
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use camino::Utf8Path;
    use indoc::indoc;

    use crate::core::{Config, DependencySpec};
    use crate::ops;

    fn converge(t: &TempDir) -> Vec<DependencySpec> {
        let manifest_path = Utf8Path::from_path(t.path()).unwrap().join("Quarry.toml");
        let config = Config::builder(manifest_path.clone()).build().unwrap();
        let ws = ops::read_workspace(&manifest_path, &config).unwrap();
        ops::converge(&ws).unwrap().iter().cloned().collect()
    }

    fn summary(deps: &[DependencySpec]) -> Vec<(String, bool, Vec<String>)> {
        deps.iter()
            .map(|d| {
                (
                    d.name.to_string(),
                    d.is_fetchable(),
                    d.only.iter().map(ToString::to_string).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn walks_fetched_and_local_manifests() {
        let t = TempDir::new().unwrap();
        t.child("Quarry.toml")
            .write_str(indoc! {r#"
                [package]
                name = "hello"

                [dependencies]
                foo = { version = "1", only = "test" }
                local = { path = "vendor/local" }
            "#})
            .unwrap();
        t.child("deps/foo/Quarry.toml")
            .write_str(indoc! {r#"
                [package]
                name = "foo"

                [dependencies]
                bar = "2"
                hello = "0.1"
            "#})
            .unwrap();
        t.child("vendor/local/Quarry.toml")
            .write_str(indoc! {r#"
                [package]
                name = "local"

                [dependencies]
                bar = { version = "3", only = "dev" }
                baz = { git = "https://example.com/baz.git", only = "dev" }
            "#})
            .unwrap();

        assert_eq!(
            summary(&converge(&t)),
            vec![
                ("foo".into(), true, vec!["test".into()]),
                ("local".into(), false, vec![]),
                // Declared by `foo` first, inheriting its environments.
                ("bar".into(), true, vec!["test".into()]),
                ("baz".into(), true, vec!["dev".into()]),
            ]
        );
    }

    #[test]
    fn broken_dependency_manifest_is_leaf() {
        let t = TempDir::new().unwrap();
        t.child("Quarry.toml")
            .write_str(indoc! {r#"
                [package]
                name = "hello"

                [dependencies]
                foo = "1"
            "#})
            .unwrap();
        t.child("deps/foo/Quarry.toml")
            .write_str("this is not toml")
            .unwrap();

        assert_eq!(
            summary(&converge(&t)),
            vec![("foo".into(), true, vec![])]
        );
    }
}
