use std::process::ExitCode;

use thiserror::Error;

/// The error type used at Quarry's CLI-layer to pick a specific exit code.
#[derive(Error, Debug)]
#[error("ErrorWithExitCode exit_code: {:?}", exit_code)]
pub struct ErrorWithExitCode {
    /// The error to display. This can be `None` in rare cases to exit with a
    /// code without displaying a message.
    #[source]
    pub source: Option<anyhow::Error>,
    /// The process exit code.
    pub exit_code: ExitCode,
}

impl ErrorWithExitCode {
    pub fn new(error: anyhow::Error, code: ExitCode) -> Self {
        Self {
            source: Some(error),
            exit_code: code,
        }
    }

    /// Invalid command line usage, reported before anything is touched on disk.
    pub fn usage(error: anyhow::Error) -> Self {
        Self::new(error, ExitCode::from(2))
    }
}
