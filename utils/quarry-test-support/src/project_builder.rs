use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use assert_fs::fixture::ChildPath;
use assert_fs::prelude::*;
use camino::Utf8PathBuf;
use toml_edit::{DocumentMut, Item, Value};

use crate::fsx::PathUtf8Ext;

/// Lays out a Quarry project on disk: its manifest, lock file and any build or fetched
/// dependency directories.
pub struct ProjectBuilder {
    name: String,
    version: String,
    files: BTreeMap<Utf8PathBuf, String>,
    dirs: Vec<Utf8PathBuf>,
    deps: Vec<(String, Value)>,
    locked: Vec<(String, String)>,
}

impl ProjectBuilder {
    pub fn start() -> Self {
        Self {
            name: "hello".to_string(),
            version: "0.1.0".to_string(),
            files: BTreeMap::new(),
            dirs: Vec::new(),
            deps: Vec::new(),
            locked: Vec::new(),
        }
    }

    pub fn name(mut self, name: impl ToString) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn version(mut self, version: impl ToString) -> Self {
        self.version = version.to_string();
        self
    }

    pub fn src(mut self, path: impl Into<Utf8PathBuf>, source: impl ToString) -> Self {
        self.files.insert(path.into(), source.to_string());
        self
    }

    pub fn dep(mut self, name: impl ToString, dep: impl DepBuilder) -> Self {
        self.deps.push((name.to_string(), dep.build()));
        self
    }

    /// Add a `[[package]]` entry to the lock file.
    pub fn locked(mut self, name: impl ToString, version: impl ToString) -> Self {
        self.locked.push((name.to_string(), version.to_string()));
        self
    }

    /// Pretend `name` has been compiled in environment `env`.
    pub fn built(self, env: &str, name: &str) -> Self {
        self.src(format!("_build/{env}/lib/{name}/ebin/{name}.app"), "")
    }

    /// Pretend sources of `name` have been fetched, without dependencies of their own.
    pub fn fetched(self, name: &str) -> Self {
        let manifest = format!("[package]\nname = \"{name}\"\nversion = \"1.0.0\"\n");
        self.src(format!("deps/{name}/Quarry.toml"), manifest)
    }

    /// Create an empty directory.
    pub fn dir(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.dirs.push(path.into());
        self
    }

    pub fn render_manifest(&self) -> String {
        let mut doc = DocumentMut::new();
        doc["package"] = toml_edit::table();
        doc["package"]["name"] = Item::Value(Value::from(self.name.clone()));
        doc["package"]["version"] = Item::Value(Value::from(self.version.clone()));
        doc["dependencies"] = toml_edit::table();
        for (name, dep) in &self.deps {
            doc["dependencies"][name.as_str()] = Item::Value(dep.clone());
        }
        doc.to_string()
    }

    pub fn render_lockfile(&self) -> Option<String> {
        if self.locked.is_empty() {
            return None;
        }

        let mut lockfile = "# Code generated by quarry; DO NOT EDIT.\nversion = 1\n".to_string();
        for (name, version) in &self.locked {
            lockfile.push_str(&format!(
                "\n[[package]]\nname = \"{name}\"\nversion = \"{version}\"\n"
            ));
        }
        Some(lockfile)
    }

    pub fn just_manifest(&self, t: &impl PathChild) {
        t.child("Quarry.toml")
            .write_str(&self.render_manifest())
            .unwrap();
    }

    pub fn build(&self, t: &impl PathChild) {
        self.just_manifest(t);

        if let Some(lockfile) = self.render_lockfile() {
            t.child("Quarry.lock").write_str(&lockfile).unwrap();
        }

        for (path, source) in &self.files {
            t.child(path).write_str(source).unwrap();
        }

        for path in &self.dirs {
            t.child(path).create_dir_all().unwrap();
        }
    }
}

pub trait DepBuilder {
    fn build(&self) -> Value;

    fn with(&self, key: impl ToString, value: impl Into<Value>) -> DepWith<'_, Self> {
        DepWith {
            dep: self,
            key: key.to_string(),
            value: value.into(),
        }
    }

    fn version(&self, version: impl ToString) -> DepWith<'_, Self> {
        self.with("version", version.to_string())
    }

    fn git(&self, url: impl ToString) -> DepWith<'_, Self> {
        self.with("git", url.to_string())
    }

    fn path(&self, path: impl ToString) -> DepWith<'_, Self> {
        self.with("path", path.to_string())
    }

    fn only(&self, envs: impl IntoIterator<Item = impl ToString>) -> DepWith<'_, Self> {
        self.with("only", tags(envs))
    }

    fn targets(&self, targets: impl IntoIterator<Item = impl ToString>) -> DepWith<'_, Self> {
        self.with("targets", tags(targets))
    }
}

fn tags(values: impl IntoIterator<Item = impl ToString>) -> Value {
    Value::Array(toml_edit::Array::from_iter(
        values.into_iter().map(|v| v.to_string()),
    ))
}

pub struct Dep;

impl DepBuilder for Dep {
    fn build(&self) -> Value {
        toml_edit::table().into_value().unwrap()
    }
}

impl DepBuilder for &str {
    fn build(&self) -> Value {
        Dep.version(*self).build()
    }
}

impl DepBuilder for &ChildPath {
    fn build(&self) -> Value {
        ChildPath::path(self).build()
    }
}

impl DepBuilder for &Path {
    fn build(&self) -> Value {
        Dep.path(self.try_to_utf8().unwrap()).build()
    }
}

impl DepBuilder for PathBuf {
    fn build(&self) -> Value {
        self.as_path().build()
    }
}

pub struct DepWith<'a, T: DepBuilder + ?Sized> {
    dep: &'a T,
    key: String,
    value: Value,
}

impl<T: DepBuilder + ?Sized> DepBuilder for DepWith<'_, T> {
    fn build(&self) -> Value {
        let mut table = self.dep.build();
        table
            .as_inline_table_mut()
            .unwrap()
            .insert(self.key.clone(), self.value.clone());
        table
    }
}
