use std::fs;

use assert_fs::TempDir;
use assert_fs::fixture::ChildPath;
use camino::Utf8Path;
use itertools::Itertools;

pub use internal_fsx::{PathBufUtf8Ext, PathUtf8Ext};

#[allow(unused)]
#[path = "../../../quarry/src/internal/fsx.rs"]
mod internal_fsx;

pub trait AssertFsUtf8Ext {
    fn utf8_path(&self) -> &Utf8Path;
}

impl AssertFsUtf8Ext for TempDir {
    fn utf8_path(&self) -> &Utf8Path {
        self.path().try_as_utf8().unwrap()
    }
}

impl AssertFsUtf8Ext for &TempDir {
    fn utf8_path(&self) -> &Utf8Path {
        self.path().try_as_utf8().unwrap()
    }
}

impl AssertFsUtf8Ext for ChildPath {
    fn utf8_path(&self) -> &Utf8Path {
        self.path().try_as_utf8().unwrap()
    }
}

impl AssertFsUtf8Ext for &ChildPath {
    fn utf8_path(&self) -> &Utf8Path {
        self.path().try_as_utf8().unwrap()
    }
}

pub trait ChildPathEx {
    fn read_to_string(&self) -> String;
    /// Sorted names of all entries of this directory, hidden ones included.
    fn files(&self) -> Vec<String>;
    fn assert_is_toml_document(&self) -> toml_edit::DocumentMut;
}

impl ChildPathEx for ChildPath {
    fn read_to_string(&self) -> String {
        fs::read_to_string(self.path()).unwrap()
    }

    fn files(&self) -> Vec<String> {
        self.read_dir()
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into())
            .sorted()
            .collect()
    }

    fn assert_is_toml_document(&self) -> toml_edit::DocumentMut {
        self.read_to_string().parse().unwrap()
    }
}
