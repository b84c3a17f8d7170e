use std::collections::BTreeSet;
use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use tracing::{debug, trace};

use quarry_ui::Ui;
use quarry_ui::components::Status;

use crate::core::DependencyName;
use crate::internal::fsx;
use crate::internal::wildcard::PathPattern;
use crate::ops::deps_clean::CleanupTargets;

/// What happened to a single path while cleaning a dependency.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum DeletionOutcome {
    Removed {
        path: Utf8PathBuf,
    },
    /// There was nothing at `path` to remove.
    Absent {
        path: Utf8PathBuf,
    },
    /// The path was deliberately left untouched.
    Skipped {
        reason: SkipReason,
    },
    Failed {
        path: Utf8PathBuf,
        reason: String,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    /// Only build artifacts were requested to be cleaned.
    BuildOnly,
    /// Sources of path dependencies are not owned by Quarry.
    Local,
}

/// A [`DeletionOutcome`] attributed to the dependency it concerns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Deletion {
    pub dependency: DependencyName,
    #[serde(flatten)]
    pub outcome: DeletionOutcome,
}

impl DeletionOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BuildOnly => f.write_str("build only"),
            Self::Local => f.write_str("local dependency"),
        }
    }
}

/// Remove build artifacts of every target, in every environment matched by `lib_pattern`.
///
/// Problems are reported as warnings and never stop the batch.
#[tracing::instrument(level = "debug", skip_all)]
pub(crate) fn clean_build(
    targets: &CleanupTargets,
    lib_pattern: &PathPattern,
    ui: &Ui,
) -> Vec<Deletion> {
    let mut deletions = Vec::new();

    for dependency in targets.iter() {
        ui.print(Status::new("Cleaning", dependency.as_str()));

        let pattern = lib_pattern.literal(dependency.as_str());
        let paths = match pattern.expand() {
            Ok(paths) => paths,
            Err(err) => {
                debug!("failed to expand {pattern}: {err:?}");
                Vec::new()
            }
        };

        if paths.is_empty() {
            ui.warn(format!(
                "dependency `{dependency}` has no build directory, nothing to clean"
            ));
            deletions.push(Deletion {
                dependency: dependency.clone(),
                outcome: DeletionOutcome::Absent {
                    path: Utf8PathBuf::from(pattern.as_str()),
                },
            });
            continue;
        }

        for path in paths {
            deletions.push(Deletion {
                dependency: dependency.clone(),
                outcome: remove(path, ui),
            });
        }
    }

    deletions
}

/// Remove fetched sources of every target.
///
/// Nothing is removed when `build_only` is set, and sources of `local` dependencies are always
/// preserved. Missing source directories are not reported.
#[tracing::instrument(level = "debug", skip_all)]
pub(crate) fn clean_source(
    targets: &CleanupTargets,
    local: &BTreeSet<DependencyName>,
    deps_dir: &Utf8Path,
    build_only: bool,
    ui: &Ui,
) -> Vec<Deletion> {
    targets
        .iter()
        .map(|dependency| {
            let outcome = if build_only {
                DeletionOutcome::Skipped {
                    reason: SkipReason::BuildOnly,
                }
            } else if local.contains(dependency) {
                trace!("preserving sources of local dependency `{dependency}`");
                DeletionOutcome::Skipped {
                    reason: SkipReason::Local,
                }
            } else {
                remove(deps_dir.join(dependency.as_str()), ui)
            };

            Deletion {
                dependency: dependency.clone(),
                outcome,
            }
        })
        .collect()
}

fn remove(path: Utf8PathBuf, ui: &Ui) -> DeletionOutcome {
    match fsx::remove_all_if_exists(&path) {
        Ok(true) => {
            ui.verbose(Status::new("Removed", path.as_str()));
            DeletionOutcome::Removed { path }
        }
        Ok(false) => DeletionOutcome::Absent { path },
        Err(err) => {
            ui.warn(format!("failed to remove `{path}`: {err}"));
            DeletionOutcome::Failed {
                path,
                reason: err.to_string(),
            }
        }
    }
}
