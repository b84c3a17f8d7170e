//! Mostly [`fs`] extensions with extra error messaging.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};

/// Equivalent to [`fs::canonicalize`] with better error messages.
///
/// Uses [`dunce`] to generate more familiar paths on Windows.
pub fn canonicalize(p: impl AsRef<Path>) -> Result<PathBuf> {
    return inner(p.as_ref());

    fn inner(p: &Path) -> Result<PathBuf> {
        dunce::canonicalize(p)
            .with_context(|| format!("failed to get absolute path of `{}`", p.display()))
    }
}

/// Equivalent to [`fs::canonicalize`], but for Utf-8 paths, with better error messages.
pub fn canonicalize_utf8(p: impl AsRef<Path>) -> Result<Utf8PathBuf> {
    canonicalize(p)?.try_into_utf8()
}

/// Equivalent to [`fs::create_dir_all`] with better error messages.
pub fn create_dir_all(p: impl AsRef<Path>) -> Result<()> {
    return inner(p.as_ref());

    fn inner(p: &Path) -> Result<()> {
        fs::create_dir_all(p)
            .with_context(|| format!("failed to create directory `{}`", p.display()))?;
        Ok(())
    }
}

/// Equivalent to [`fs::read_to_string`] with better error messages.
pub fn read_to_string(path: impl AsRef<Path>) -> Result<String> {
    return inner(path.as_ref());

    fn inner(path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("failed to read `{}`", path.display()))
    }
}

/// Removes `path` like `rm -rf` does.
///
/// Directories are removed recursively, while files and symbolic links (including links to
/// directories) are unlinked without touching what they point to.
/// Returns `Ok(false)` when there was nothing to remove.
///
/// Unlike other functions in this module, this one returns raw [`io::Error`], so that callers
/// can report the underlying reason next to the path themselves.
pub fn remove_all_if_exists(path: impl AsRef<Path>) -> io::Result<bool> {
    return inner(path.as_ref());

    fn inner(path: &Path) -> io::Result<bool> {
        let metadata = match fs::symlink_metadata(path) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(err) => return Err(err),
        };

        let result = if metadata.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        };

        match result {
            Ok(()) => Ok(true),
            // Someone else was faster.
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err),
        }
    }
}

pub trait PathUtf8Ext {
    fn try_as_utf8(&'_ self) -> Result<&'_ Utf8Path>;

    fn try_to_utf8(&self) -> Result<Utf8PathBuf> {
        self.try_as_utf8().map(|p| p.to_path_buf())
    }
}

pub trait PathBufUtf8Ext {
    fn try_into_utf8(self) -> Result<Utf8PathBuf>;
}

impl PathUtf8Ext for Path {
    fn try_as_utf8(&'_ self) -> Result<&'_ Utf8Path> {
        Utf8Path::from_path(self)
            .ok_or_else(|| anyhow!("path `{}` is not UTF-8 encoded", self.display()))
    }
}

impl PathUtf8Ext for PathBuf {
    fn try_as_utf8(&'_ self) -> Result<&'_ Utf8Path> {
        self.as_path().try_as_utf8()
    }
}

impl PathBufUtf8Ext for PathBuf {
    fn try_into_utf8(self) -> Result<Utf8PathBuf> {
        Utf8PathBuf::from_path_buf(self)
            .map_err(|path| anyhow!("path `{}` is not UTF-8 encoded", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use assert_fs::TempDir;
    use assert_fs::prelude::*;

    use super::remove_all_if_exists;

    #[test]
    fn removes_directory_tree() {
        let t = TempDir::new().unwrap();
        t.child("foo/bar/baz.txt").write_str("hello").unwrap();

        assert!(remove_all_if_exists(t.child("foo")).unwrap());
        t.child("foo").assert(predicates::path::missing());
    }

    #[test]
    fn removes_plain_file() {
        let t = TempDir::new().unwrap();
        t.child("foo").write_str("hello").unwrap();

        assert!(remove_all_if_exists(t.child("foo")).unwrap());
        t.child("foo").assert(predicates::path::missing());
    }

    #[test]
    fn missing_path_is_not_an_error() {
        let t = TempDir::new().unwrap();
        assert!(!remove_all_if_exists(t.child("foo")).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn does_not_follow_symlinks() {
        let t = TempDir::new().unwrap();
        t.child("real/file.txt").write_str("hello").unwrap();
        t.child("link").symlink_to_dir(t.child("real")).unwrap();

        assert!(remove_all_if_exists(t.child("link")).unwrap());
        t.child("link").assert(predicates::path::missing());
        t.child("real/file.txt").assert(predicates::path::is_file());
    }
}
