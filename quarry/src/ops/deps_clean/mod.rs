use std::collections::BTreeSet;

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use crate::BUILD_LIB_DIR_NAME;
use crate::core::{Scope, Selection, Workspace};
use crate::internal::wildcard::PathPattern;
use crate::ops;

pub use execute::{Deletion, DeletionOutcome, SkipReason};
pub use select::{CleanupTargets, exclude_own_package};

mod execute;
mod scan;
mod select;

#[derive(Clone, Debug)]
pub struct CleanDepsOptions {
    pub selection: Selection,
    pub scope: Scope,
    /// Only remove build artifacts, keeping fetched sources.
    pub build_only: bool,
    /// Remove cleaned dependencies from the lock file afterwards.
    pub unlock: bool,
}

/// Outcome of [`clean_deps`], one entry per attempted path.
#[derive(Clone, Debug, Default, Serialize)]
pub struct CleanDepsReport {
    #[serde(skip)]
    pub targets: CleanupTargets,
    pub build: Vec<Deletion>,
    pub sources: Vec<Deletion>,
    pub unlocked: BTreeSet<String>,
}

impl CleanDepsReport {
    pub fn deletions(&self) -> impl Iterator<Item = &Deletion> {
        self.build.iter().chain(self.sources.iter())
    }

    pub fn has_failures(&self) -> bool {
        self.deletions().any(|d| d.outcome.is_failure())
    }
}

/// Remove build artifacts and fetched sources of selected dependencies.
///
/// Targets are resolved once, before any lock is taken. Build artifacts are then removed while
/// holding the build directory lock, and sources (followed by the optional unlock) while holding
/// the dependencies directory lock. The two locks are never held at the same time.
///
/// Failing to remove a path is reported as a warning and does not fail the operation.
#[tracing::instrument(level = "debug", skip(ws))]
pub fn clean_deps(ws: &Workspace<'_>, opts: &CleanDepsOptions) -> Result<CleanDepsReport> {
    let config = ws.config();
    let ui = config.ui();

    let snapshot = ops::converge(ws)?;
    let scoped = snapshot.filter(&opts.scope);
    let local = snapshot.local_names();

    let lib_pattern = build_lib_pattern(ws, &opts.scope);
    let deps_dir = config.deps_dir().path_unchecked();

    let selection = exclude_own_package(ws, &opts.selection);
    let discovered = match selection {
        Selection::Explicit(_) => BTreeSet::new(),
        Selection::All | Selection::Unused => {
            scan::discover(&lib_pattern, deps_dir, ws.package_name())?
        }
    };
    let targets = CleanupTargets::resolve(&selection, discovered, &scoped);
    debug!(targets = ?targets.as_slice());

    let build = ws.with_build_lock(|| Ok(execute::clean_build(&targets, &lib_pattern, ui)))?;

    let (sources, unlocked) = ws.with_deps_lock(|| {
        let sources = execute::clean_source(&targets, &local, deps_dir, opts.build_only, ui);
        let unlocked = if opts.unlock {
            ops::unlock(ws, &selection, &snapshot)?
        } else {
            BTreeSet::new()
        };
        Ok((sources, unlocked))
    })?;

    Ok(CleanDepsReport {
        targets,
        build,
        sources,
        unlocked,
    })
}

/// Pattern matching per-environment library directories: `<build dir>/*<env>/lib`.
///
/// Without an environment in `scope`, all environments are matched. Otherwise, every environment
/// whose name ends with the requested one is matched, so `test` also covers `wasm_test`.
pub(crate) fn build_lib_pattern(ws: &Workspace<'_>, scope: &Scope) -> PathPattern {
    let env = scope.env.as_ref().map(|env| env.as_str()).unwrap_or_default();
    PathPattern::new(ws.config().build_dir().path_unchecked())
        .wildcard(env)
        .literal(BUILD_LIB_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use camino::Utf8Path;
    use indoc::indoc;
    use predicates::prelude::*;
    use quarry_ui::Verbosity;

    use super::{CleanDepsOptions, SkipReason};
    use crate::core::{Config, Scope, Selection};
    use crate::ops::{self, DeletionOutcome};

    fn project() -> TempDir {
        let t = TempDir::new().unwrap();
        t.child("Quarry.toml")
            .write_str(indoc! {r#"
                [package]
                name = "hello"

                [dependencies]
                a = "1.0"
                b = { path = "vendor/b" }
                t = { version = "1.0", only = "test" }
            "#})
            .unwrap();
        for dep in ["a", "b", "c", "t"] {
            t.child(format!("_build/dev/lib/{dep}")).create_dir_all().unwrap();
            t.child(format!("deps/{dep}")).create_dir_all().unwrap();
        }
        t.child("_build/test/lib/t").create_dir_all().unwrap();
        t.child("_build/dev/lib/hello").create_dir_all().unwrap();
        t
    }

    fn clean(t: &TempDir, selection: Selection, scope: Scope, build_only: bool) -> Vec<String> {
        let manifest_path = Utf8Path::from_path(t.path()).unwrap().join("Quarry.toml");
        let config = Config::builder(manifest_path.clone())
            .ui_verbosity(Verbosity::Quiet)
            .build()
            .unwrap();
        let ws = ops::read_workspace(&manifest_path, &config).unwrap();
        let opts = CleanDepsOptions {
            selection,
            scope,
            build_only,
            unlock: false,
        };
        let report = ops::clean_deps(&ws, &opts).unwrap();
        assert!(!report.has_failures());
        report.targets.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn all_preserves_local_sources() {
        let t = project();
        assert_eq!(
            clean(&t, Selection::All, Scope::default(), false),
            vec!["a", "b", "c", "t"]
        );

        for dep in ["a", "b", "c", "t"] {
            t.child(format!("_build/dev/lib/{dep}"))
                .assert(predicate::path::missing());
        }
        t.child("deps/a").assert(predicate::path::missing());
        t.child("deps/b").assert(predicate::path::exists());
        t.child("deps/c").assert(predicate::path::missing());
        t.child("_build/dev/lib/hello").assert(predicate::path::exists());
    }

    #[test]
    fn unused_removes_only_undeclared() {
        let t = project();
        assert_eq!(
            clean(&t, Selection::Unused, Scope::default(), false),
            vec!["c"]
        );
        t.child("deps/a").assert(predicate::path::exists());
        t.child("deps/c").assert(predicate::path::missing());
        t.child("_build/dev/lib/c").assert(predicate::path::missing());
    }

    #[test]
    fn unused_within_environment() {
        let t = project();
        let scope = Scope {
            env: Some("dev".parse().unwrap()),
            target: None,
        };
        // `t` is only used in tests, so it is unused in `dev`.
        assert_eq!(clean(&t, Selection::Unused, scope, false), vec!["c", "t"]);
        t.child("_build/test/lib/t").assert(predicate::path::exists());
        t.child("_build/dev/lib/t").assert(predicate::path::missing());
    }

    #[test]
    fn build_only_keeps_sources() {
        let t = project();
        let selection = Selection::Explicit(vec!["a".parse().unwrap()]);
        assert_eq!(clean(&t, selection, Scope::default(), true), vec!["a"]);
        t.child("_build/dev/lib/a").assert(predicate::path::missing());
        t.child("deps/a").assert(predicate::path::exists());
    }

    #[test]
    fn own_package_is_never_a_target() {
        let t = project();
        let selection = Selection::Explicit(vec!["hello".parse().unwrap()]);
        assert!(clean(&t, selection, Scope::default(), false).is_empty());
        t.child("_build/dev/lib/hello").assert(predicate::path::exists());
    }

    #[test]
    fn second_run_finds_nothing_to_remove() {
        let t = project();
        let selection = Selection::Explicit(vec!["a".parse().unwrap(), "b".parse().unwrap()]);
        clean(&t, selection.clone(), Scope::default(), false);

        let manifest_path = Utf8Path::from_path(t.path()).unwrap().join("Quarry.toml");
        let config = Config::builder(manifest_path.clone())
            .ui_verbosity(Verbosity::Quiet)
            .build()
            .unwrap();
        let ws = ops::read_workspace(&manifest_path, &config).unwrap();
        let report = ops::clean_deps(
            &ws,
            &CleanDepsOptions {
                selection,
                scope: Scope::default(),
                build_only: false,
                unlock: false,
            },
        )
        .unwrap();

        assert!(
            report
                .build
                .iter()
                .all(|d| matches!(d.outcome, DeletionOutcome::Absent { .. }))
        );
        assert!(matches!(
            report.sources[0].outcome,
            DeletionOutcome::Absent { .. }
        ));
        assert_eq!(
            report.sources[1].outcome,
            DeletionOutcome::Skipped {
                reason: SkipReason::Local
            }
        );
    }
}
