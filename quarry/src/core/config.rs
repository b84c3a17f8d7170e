use std::ffi::{OsStr, OsString};

use anyhow::{Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use tracing::trace;

use quarry_ui::{OutputFormat, Ui, Verbosity};

use crate::flock::Filesystem;
use crate::{DEFAULT_BUILD_DIR_NAME, DEFAULT_DEPS_DIR_NAME};

/// Explicit, per-invocation configuration of a Quarry run.
///
/// Everything that would otherwise be read from process-global state (project location,
/// directory roots, UI preferences) is collected here once and passed down explicitly.
#[derive(Debug)]
pub struct Config {
    manifest_path: Utf8PathBuf,
    root: Utf8PathBuf,
    build_dir: Filesystem,
    deps_dir: Filesystem,
    ui: Ui,
    log_filter_directive: OsString,
}

impl Config {
    pub fn builder(manifest_path: impl Into<Utf8PathBuf>) -> ConfigBuilder {
        ConfigBuilder::new(manifest_path.into())
    }

    pub fn manifest_path(&self) -> &Utf8Path {
        &self.manifest_path
    }

    /// Directory containing the manifest file.
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Root of compiled artifacts: `<build dir>/<env>/lib/<dependency>`.
    pub fn build_dir(&self) -> &Filesystem {
        &self.build_dir
    }

    /// Root of fetched dependency sources: `<deps dir>/<dependency>`.
    pub fn deps_dir(&self) -> &Filesystem {
        &self.deps_dir
    }

    pub fn ui(&self) -> &Ui {
        &self.ui
    }

    pub fn log_filter_directive(&self) -> &OsStr {
        &self.log_filter_directive
    }
}

#[derive(Debug)]
pub struct ConfigBuilder {
    manifest_path: Utf8PathBuf,
    build_dir_override: Option<Utf8PathBuf>,
    deps_dir_override: Option<Utf8PathBuf>,
    ui_verbosity: Verbosity,
    ui_output_format: OutputFormat,
    log_filter_directive: Option<OsString>,
}

impl ConfigBuilder {
    fn new(manifest_path: Utf8PathBuf) -> Self {
        Self {
            manifest_path,
            build_dir_override: None,
            deps_dir_override: None,
            ui_verbosity: Verbosity::Normal,
            ui_output_format: OutputFormat::Text,
            log_filter_directive: None,
        }
    }

    pub fn build_dir_override(mut self, build_dir_override: Option<Utf8PathBuf>) -> Self {
        self.build_dir_override = build_dir_override;
        self
    }

    pub fn deps_dir_override(mut self, deps_dir_override: Option<Utf8PathBuf>) -> Self {
        self.deps_dir_override = deps_dir_override;
        self
    }

    pub fn ui_verbosity(mut self, ui_verbosity: Verbosity) -> Self {
        self.ui_verbosity = ui_verbosity;
        self
    }

    pub fn ui_output_format(mut self, ui_output_format: OutputFormat) -> Self {
        self.ui_output_format = ui_output_format;
        self
    }

    pub fn log_filter_directive(
        mut self,
        log_filter_directive: Option<impl Into<OsString>>,
    ) -> Self {
        self.log_filter_directive = log_filter_directive.map(Into::into);
        self
    }

    pub fn build(self) -> Result<Config> {
        let root = self
            .manifest_path
            .parent()
            .ok_or_else(|| anyhow!("manifest path has no parent: {}", self.manifest_path))?
            .to_path_buf();

        let build_dir = self
            .build_dir_override
            .unwrap_or_else(|| root.join(DEFAULT_BUILD_DIR_NAME));
        let deps_dir = self
            .deps_dir_override
            .unwrap_or_else(|| root.join(DEFAULT_DEPS_DIR_NAME));

        trace!("manifest path: {}", self.manifest_path);
        trace!("build dir: {build_dir}");
        trace!("deps dir: {deps_dir}");

        Ok(Config {
            manifest_path: self.manifest_path,
            root,
            build_dir: Filesystem::new(build_dir),
            deps_dir: Filesystem::new(deps_dir),
            ui: Ui::new(self.ui_verbosity, self.ui_output_format),
            log_filter_directive: self.log_filter_directive.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use camino::Utf8PathBuf;

    use super::Config;

    #[test]
    fn default_directories_are_next_to_manifest() {
        let config = Config::builder("/work/hello/Quarry.toml").build().unwrap();
        assert_eq!(config.root().as_str(), "/work/hello");
        assert_eq!(config.build_dir().path_unchecked().as_str(), "/work/hello/_build");
        assert_eq!(config.deps_dir().path_unchecked().as_str(), "/work/hello/deps");
    }

    #[test]
    fn directories_can_be_overridden() {
        let config = Config::builder("/work/hello/Quarry.toml")
            .build_dir_override(Some(Utf8PathBuf::from("/tmp/build")))
            .deps_dir_override(Some(Utf8PathBuf::from("/tmp/deps")))
            .build()
            .unwrap();
        assert_eq!(config.build_dir().path_unchecked().as_str(), "/tmp/build");
        assert_eq!(config.deps_dir().path_unchecked().as_str(), "/tmp/deps");
    }
}
