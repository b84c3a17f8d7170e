use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use once_cell::sync::OnceCell;
use tracing::trace;

use crate::internal::fsx;

/// A directory path which is created on disk (with all its parents) only when it is first needed.
#[derive(Debug)]
pub struct LazyDirectoryCreator {
    path: Utf8PathBuf,
    creation_lock: OnceCell<()>,
}

impl LazyDirectoryCreator {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            creation_lock: OnceCell::new(),
        }
    }

    pub fn as_unchecked(&self) -> &Utf8Path {
        &self.path
    }

    pub fn as_existent(&self) -> anyhow::Result<&Utf8Path> {
        self.ensure_created()?;
        Ok(&self.path)
    }

    fn ensure_created(&self) -> anyhow::Result<()> {
        self.creation_lock
            .get_or_try_init(|| {
                trace!("creating directory {}", &self.path);
                fsx::create_dir_all(&self.path)
            })
            .copied()
    }
}

impl fmt::Display for LazyDirectoryCreator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_unchecked())
    }
}
