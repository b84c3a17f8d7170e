use std::fmt;

use anyhow::Result;
use camino::{Utf8Path, Utf8PathBuf};

use crate::core::config::Config;
use crate::core::dependency::DependencyName;
use crate::core::manifest::Manifest;
use crate::flock::AdvisoryLock;
use crate::{BUILD_LOCK_FILE_NAME, DEPS_LOCK_FILE_NAME, LOCK_FILE_NAME};

/// The core abstraction for working with a Quarry project.
///
/// A workspace is created very early on and then threaded through all other functions.
/// It owns both directory locks, so every operation within one invocation shares them.
pub struct Workspace<'c> {
    config: &'c Config,
    manifest: Manifest,
    build_lock: AdvisoryLock<'c>,
    deps_lock: AdvisoryLock<'c>,
}

impl<'c> Workspace<'c> {
    pub(crate) fn new(manifest: Manifest, config: &'c Config) -> Self {
        Self {
            config,
            manifest,
            build_lock: config.build_dir().advisory_lock(
                BUILD_LOCK_FILE_NAME,
                "build directory",
                config,
            ),
            deps_lock: config.deps_dir().advisory_lock(
                DEPS_LOCK_FILE_NAME,
                "dependencies directory",
                config,
            ),
        }
    }

    /// Returns the [`Config`] this workspace is associated with.
    pub fn config(&self) -> &'c Config {
        self.config
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn package_name(&self) -> &DependencyName {
        &self.manifest.name
    }

    pub fn root(&self) -> &Utf8Path {
        self.config.root()
    }

    pub fn manifest_path(&self) -> &Utf8Path {
        self.config.manifest_path()
    }

    pub fn lockfile_path(&self) -> Utf8PathBuf {
        self.root().join(LOCK_FILE_NAME)
    }

    /// Runs `f` while holding an exclusive lock over the build directory.
    pub fn with_build_lock<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        self.build_lock.run(f)
    }

    /// Runs `f` while holding an exclusive lock over the dependencies directory and the lock file.
    pub fn with_deps_lock<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        self.deps_lock.run(f)
    }
}

impl fmt::Debug for Workspace<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workspace")
            .field("manifest_path", &self.manifest_path())
            .field("package", &self.manifest.name)
            .finish_non_exhaustive()
    }
}
