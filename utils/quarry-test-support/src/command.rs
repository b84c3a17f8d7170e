use std::env;
use std::ffi::OsString;
use std::io::BufRead;
use std::path::PathBuf;
use std::process::Command as StdCommand;

use serde::de::DeserializeOwned;
use snapbox::cmd::Command as SnapboxCommand;

/// Environment variables which would leak the developer's setup into tests.
const ISOLATED_ENV: &[&str] = &[
    "QUARRY_MANIFEST_PATH",
    "QUARRY_BUILD_PATH",
    "QUARRY_DEPS_PATH",
    "QUARRY_UI_VERBOSITY",
    "QUARRY_TRACING_PROFILE",
];

/// Builder of `quarry` binary invocations.
pub struct Quarry {
    log: OsString,
    quarry_bin: PathBuf,
}

impl Quarry {
    pub fn new() -> Self {
        Self {
            log: "quarry=warn".into(),
            quarry_bin: cargo_bin("quarry"),
        }
    }

    #[cfg(feature = "quarry-config")]
    pub fn from_config(config: &quarry::core::Config) -> Self {
        Self {
            log: config.log_filter_directive().to_os_string(),
            quarry_bin: cargo_bin("quarry"),
        }
    }

    pub fn quick_snapbox() -> SnapboxCommand {
        Self::new().snapbox()
    }

    pub fn snapbox(self) -> SnapboxCommand {
        SnapboxCommand::from_std(self.std())
    }

    pub fn std(self) -> StdCommand {
        let mut cmd = StdCommand::new(self.quarry_bin);
        for var in ISOLATED_ENV {
            cmd.env_remove(var);
        }
        cmd.env("QUARRY_LOG", self.log);
        cmd
    }

    #[cfg(feature = "quarry-config")]
    pub fn test_config(manifest: impl crate::fsx::AssertFsUtf8Ext) -> quarry::core::Config {
        quarry::core::Config::builder(manifest.utf8_path())
            .ui_verbosity(quarry_ui::Verbosity::Verbose)
            .log_filter_directive(Some("quarry=trace"))
            .build()
            .unwrap()
    }
}

impl Default for Quarry {
    fn default() -> Self {
        Self::new()
    }
}

/// Nextest-compatible variant of [`snapbox::cmd::cargo_bin()`].
fn cargo_bin(name: &str) -> PathBuf {
    env::var_os(format!("NEXTEST_BIN_EXE_{name}"))
        .or_else(|| env::var_os(format!("CARGO_BIN_EXE_{name}")))
        .map(PathBuf::from)
        .unwrap_or_else(|| snapbox::cmd::cargo_bin(name))
}

pub trait CommandExt {
    /// Collect all NDJSON messages printed to stdout by a successful command.
    fn stdout_json_lines<T: DeserializeOwned>(self) -> Vec<T>;
}

impl CommandExt for SnapboxCommand {
    fn stdout_json_lines<T: DeserializeOwned>(self) -> Vec<T> {
        let output = self.output().expect("failed to spawn command");
        assert!(
            output.status.success(),
            "command failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        BufRead::split(output.stdout.as_slice(), b'\n')
            .map(|line| line.expect("failed to read line from stdout"))
            .filter(|line| !line.is_empty())
            .map(|line| {
                // help: make sure that the command outputs NDJSON (`--json` flag).
                serde_json::from_slice(&line).expect("stdout line is not valid JSON")
            })
            .collect()
    }
}
