//! Cross-process advisory file locks guarding directories shared between Quarry invocations.

use std::fs::{File, OpenOptions};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::{fmt, io};

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use fs4::{FileExt, lock_contended_error};
use tracing::trace;

use quarry_ui::components::Status;

use crate::core::Config;
use crate::internal::lazy_directory_creator::LazyDirectoryCreator;

/// An exclusively locked file. The lock is released when this guard is dropped.
#[derive(Debug)]
pub struct FileLockGuard {
    file: Option<File>,
    path: Utf8PathBuf,
}

impl FileLockGuard {
    pub fn path(&self) -> &Utf8Path {
        self.path.as_path()
    }
}

impl Drop for FileLockGuard {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            trace!("releasing file lock: {}", self.path);
            let _ = FileExt::unlock(&file);
        }
    }
}

/// An exclusive lock over a global entity identified by a path within a [`Filesystem`].
pub struct AdvisoryLock<'f> {
    path: Utf8PathBuf,
    description: String,
    file_lock: Mutex<
        // This Arc is shared between all guards within the process.
        // Here it is Weak, because AdvisoryLock itself does not keep the lock
        // (only guards do).
        Weak<FileLockGuard>,
    >,
    filesystem: &'f Filesystem,
    config: &'f Config,
}

/// RAII guard of an acquired [`AdvisoryLock`].
#[derive(Debug)]
pub struct AdvisoryLockGuard(#[allow(dead_code)] Arc<FileLockGuard>);

impl AdvisoryLock<'_> {
    /// Acquires this advisory lock, blocking the current thread until it is available.
    ///
    /// This lock is global per-process and can be acquired recursively.
    /// An RAII structure is returned to release the lock, and if this process abnormally
    /// terminates the lock is also released.
    pub fn acquire(&self) -> Result<AdvisoryLockGuard> {
        let mut slot = self
            .file_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let file_lock_arc = match slot.upgrade() {
            Some(arc) => arc,
            None => {
                let arc = Arc::new(self.filesystem.open_rw(
                    &self.path,
                    &self.description,
                    self.config,
                )?);
                *slot = Arc::downgrade(&arc);
                arc
            }
        };
        Ok(AdvisoryLockGuard(file_lock_arc))
    }

    /// Runs `f` while holding this lock.
    ///
    /// The lock is released on every exit path of `f`, including errors and panics.
    pub fn run<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let _guard = self.acquire()?;
        f()
    }
}

impl fmt::Debug for AdvisoryLock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdvisoryLock")
            .field("path", &self.path)
            .field("description", &self.description)
            .field("filesystem", &self.filesystem)
            .finish_non_exhaustive()
    }
}

/// A [`Filesystem`] is intended to be a globally shared, hence locked, resource in Quarry.
///
/// Functions on this structure are prepared to handle concurrent invocations across
/// multiple instances of Quarry.
///
/// All paths within a [`Filesystem`] must be UTF-8 encoded.
pub struct Filesystem {
    root: LazyDirectoryCreator,
}

impl Filesystem {
    /// Creates a new [`Filesystem`] to be rooted at the given path.
    pub fn new(root: Utf8PathBuf) -> Self {
        Self {
            root: LazyDirectoryCreator::new(root),
        }
    }

    /// Get path to this [`Filesystem`] root without ensuring the path exists.
    pub fn path_unchecked(&self) -> &Utf8Path {
        self.root.as_unchecked()
    }

    /// Opens exclusive access to a [`File`], returning the locked version of it.
    ///
    /// This function will create a file at `path` if it doesn't already exist (including
    /// intermediate directories) else if it does exist, it will be truncated. It will then acquire
    /// an exclusive lock on `path`. If the process must block waiting for the lock, the
    /// `description` annotated with _blocking_ status message is printed to [`Config::ui`].
    pub fn open_rw(
        &self,
        path: impl AsRef<Utf8Path>,
        description: &str,
        config: &Config,
    ) -> Result<FileLockGuard> {
        let path = self.root.as_existent()?.join(path.as_ref());

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .truncate(true)
            .create(true)
            .open(&path)
            .with_context(|| format!("failed to open: {path}"))?;

        acquire(&file, &path, description, config)?;

        Ok(FileLockGuard {
            file: Some(file),
            path,
        })
    }

    /// Construct an [`AdvisoryLock`] within this file system.
    pub fn advisory_lock<'a>(
        &'a self,
        path: impl AsRef<Utf8Path>,
        description: impl ToString,
        config: &'a Config,
    ) -> AdvisoryLock<'a> {
        AdvisoryLock {
            path: path.as_ref().to_path_buf(),
            description: description.to_string(),
            file_lock: Mutex::new(Weak::new()),
            filesystem: self,
            config,
        }
    }
}

impl fmt::Display for Filesystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}

impl fmt::Debug for Filesystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Filesystem").field(&self.root).finish()
    }
}

fn acquire(file: &File, path: &Utf8Path, description: &str, config: &Config) -> Result<()> {
    match FileExt::try_lock_exclusive(file) {
        Ok(()) => return Ok(()),
        Err(err) if err.kind() == io::ErrorKind::Unsupported => {
            // Ignore locking on filesystems that look like they don't implement file locking.
            return Ok(());
        }
        Err(err) if is_lock_contended_error(&err) => {
            // Pass-through
        }
        Err(err) => {
            Err(err).with_context(|| format!("failed to lock file: {path}"))?;
        }
    }

    config.ui().print(Status::with_color(
        "Blocking",
        "cyan",
        &format!("waiting for file lock on {description}"),
    ));

    FileExt::lock_exclusive(file).with_context(|| format!("failed to lock file: {path}"))?;

    Ok(())
}

fn is_lock_contended_error(err: &io::Error) -> bool {
    let t = lock_contended_error();
    err.raw_os_error() == t.raw_os_error() || err.kind() == t.kind()
}
