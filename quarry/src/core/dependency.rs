use std::fmt;
use std::str::FromStr;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::core::errors::UsageError;

/// Name of a package, unique within a project.
///
/// Dependency names double as directory names in both the build and the dependencies directories,
/// so a valid name is always a single, non-special path segment. Hidden entries, such as lock
/// files, live next to dependency directories and must never be addressable by name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "SmolStr")]
pub struct DependencyName(SmolStr);

impl DependencyName {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    fn validate(name: &str) -> Result<(), &'static str> {
        if name.is_empty() {
            return Err("name cannot be empty");
        }
        if name == "." || name == ".." {
            return Err("name cannot be a relative path component");
        }
        if name.starts_with('.') {
            return Err("name cannot start with a dot");
        }
        if name.contains(['/', '\\']) {
            return Err("name cannot contain path separators");
        }
        if name.contains('\0') {
            return Err("name cannot contain NUL characters");
        }
        Ok(())
    }
}

impl FromStr for DependencyName {
    type Err = UsageError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::validate(name).map_err(|reason| UsageError::InvalidDependencyName {
            name: name.to_string(),
            reason,
        })?;
        Ok(Self(name.into()))
    }
}

impl TryFrom<String> for DependencyName {
    type Error = UsageError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

impl From<DependencyName> for SmolStr {
    fn from(name: DependencyName) -> Self {
        name.0
    }
}

impl AsRef<str> for DependencyName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for DependencyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of a build environment (`dev`, `test`, ...) or a compilation target.
///
/// Restricted to ASCII alphanumerics, `-` and `_`, because it becomes part of a directory name
/// pattern inside the build directory.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "SmolStr")]
pub struct ScopeName(SmolStr);

impl ScopeName {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for ScopeName {
    type Err = UsageError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let reason = if name.is_empty() {
            Some("name cannot be empty")
        } else if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            Some("only ASCII alphanumeric characters, `-` and `_` are allowed")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(UsageError::InvalidScopeName {
                name: name.to_string(),
                reason,
            }),
            None => Ok(Self(name.into())),
        }
    }
}

impl TryFrom<String> for ScopeName {
    type Error = UsageError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

impl From<ScopeName> for SmolStr {
    fn from(name: ScopeName) -> Self {
        name.0
    }
}

impl fmt::Display for ScopeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the sources of a dependency come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DependencySource {
    Registry { version: SmolStr },
    Git { url: SmolStr },
    /// An existing directory on the local filesystem, never materialized by fetching.
    Path { path: Utf8PathBuf },
}

impl DependencySource {
    /// Whether sources are fetched into the dependencies directory.
    pub fn is_fetchable(&self) -> bool {
        !matches!(self, Self::Path { .. })
    }
}

/// A single converged dependency of the project.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DependencySpec {
    pub name: DependencyName,
    pub source: DependencySource,
    /// Environments this dependency is used in; empty means all environments.
    pub only: Vec<ScopeName>,
    /// Targets this dependency is used for; empty means all targets.
    pub targets: Vec<ScopeName>,
}

impl DependencySpec {
    pub fn is_fetchable(&self) -> bool {
        self.source.is_fetchable()
    }
}
