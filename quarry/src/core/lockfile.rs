use std::collections::BTreeSet;

use anyhow::{Context, Result};
use toml_edit::DocumentMut;

const HEADER: &str = "# Code generated by quarry; DO NOT EDIT.";
const VERSION: i64 = 1;
const PACKAGE_KEY: &str = "package";

/// An editable view of `Quarry.lock`.
///
/// Only package entries are ever touched, everything else in the document, including formatting
/// of the remaining entries, is preserved as-is.
#[derive(Clone, Debug)]
pub struct Lockfile {
    doc: DocumentMut,
}

impl Lockfile {
    pub fn new() -> Self {
        let mut doc = DocumentMut::new();
        doc.insert("version", toml_edit::value(VERSION));
        Self { doc }
    }

    /// Names of all locked packages, in the order they appear in the document.
    pub fn package_names(&self) -> Vec<&str> {
        self.packages()
            .map(|packages| {
                packages
                    .iter()
                    .filter_map(|table| table.get("name").and_then(|name| name.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Removes all packages for which `should_remove` returns `true`.
    ///
    /// Returns names of the removed packages.
    pub fn remove_packages(
        &mut self,
        mut should_remove: impl FnMut(&str) -> bool,
    ) -> BTreeSet<String> {
        let mut removed = BTreeSet::new();
        if let Some(packages) = self
            .doc
            .get_mut(PACKAGE_KEY)
            .and_then(|item| item.as_array_of_tables_mut())
        {
            packages.retain(|table| {
                match table.get("name").and_then(|name| name.as_str()) {
                    Some(name) if should_remove(name) => {
                        removed.insert(name.to_string());
                        false
                    }
                    _ => true,
                }
            });
        }
        removed
    }

    pub fn render(&self) -> String {
        let body = self.doc.to_string();
        let body = body.trim_start();
        if body.starts_with(HEADER) {
            body.to_string()
        } else {
            format!("{HEADER}\n{body}")
        }
    }

    fn packages(&self) -> Option<&toml_edit::ArrayOfTables> {
        self.doc
            .get(PACKAGE_KEY)
            .and_then(|item| item.as_array_of_tables())
    }
}

impl Default for Lockfile {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<String> for Lockfile {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        if value.trim().is_empty() {
            return Ok(Self::new());
        }
        let doc = value
            .parse::<DocumentMut>()
            .context("failed to parse lockfile content")?;
        Ok(Self { doc })
    }
}
