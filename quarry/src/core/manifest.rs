use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use smol_str::SmolStr;

use crate::core::dependency::{DependencyName, DependencySource, DependencySpec, ScopeName};
use crate::internal::fsx;

/// Parsed and validated contents of a `Quarry.toml` file.
#[derive(Clone, Debug)]
pub struct Manifest {
    pub name: DependencyName,
    pub dependencies: Vec<DependencySpec>,
}

/// This type is used to deserialize `Quarry.toml` files.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TomlManifest {
    pub package: TomlPackage,
    #[serde(default)]
    pub dependencies: BTreeMap<DependencyName, TomlDependency>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TomlPackage {
    pub name: DependencyName,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TomlDependency {
    /// [`SmolStr`] is a version requirement.
    Simple(SmolStr),
    Detailed(DetailedTomlDependency),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DetailedTomlDependency {
    pub version: Option<SmolStr>,
    pub git: Option<SmolStr>,
    pub path: Option<Utf8PathBuf>,
    pub only: Option<OneOrMany<ScopeName>>,
    pub targets: Option<OneOrMany<ScopeName>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }
}

impl TomlManifest {
    pub fn read_from_path(path: &Utf8Path) -> Result<Self> {
        let contents = fsx::read_to_string(path)?;
        toml::from_str(&contents).with_context(|| format!("failed to parse manifest at `{path}`"))
    }

    pub fn to_manifest(self, manifest_path: &Utf8Path) -> Result<Manifest> {
        let root = manifest_path.parent().unwrap_or(Utf8Path::new("."));

        let dependencies = self
            .dependencies
            .into_iter()
            .map(|(name, dep)| dep.to_dependency_spec(name, root))
            .collect::<Result<Vec<_>>>()?;

        Ok(Manifest {
            name: self.package.name,
            dependencies,
        })
    }
}

impl TomlDependency {
    fn to_dependency_spec(self, name: DependencyName, root: &Utf8Path) -> Result<DependencySpec> {
        let dep = match self {
            Self::Simple(version) => DetailedTomlDependency {
                version: Some(version),
                ..Default::default()
            },
            Self::Detailed(dep) => dep,
        };

        // A path always wins: such dependency is never fetched, even if it also names a version.
        let source = match (dep.path, dep.git, dep.version) {
            (Some(path), _, _) => DependencySource::Path {
                path: root.join(path),
            },
            (None, Some(url), _) => DependencySource::Git { url },
            (None, None, Some(version)) => DependencySource::Registry { version },
            (None, None, None) => bail!(
                "dependency `{name}` must specify one of `version`, `git` or `path`"
            ),
        };

        Ok(DependencySpec {
            name,
            source,
            only: dep.only.map(OneOrMany::into_vec).unwrap_or_default(),
            targets: dep.targets.map(OneOrMany::into_vec).unwrap_or_default(),
        })
    }
}
