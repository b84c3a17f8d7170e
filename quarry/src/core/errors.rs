use thiserror::Error;

/// Invalid use of a command, detected before anything on disk is touched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UsageError {
    #[error(
        "`quarry deps {command}` expects dependencies as arguments or a flag indicating which \
        dependencies to {command}\n\
        The --all option will {command} all dependencies while the --unused option will \
        {command} unused dependencies"
    )]
    MissingSelection { command: &'static str },

    #[error("invalid dependency name `{name}`: {reason}")]
    InvalidDependencyName { name: String, reason: &'static str },

    #[error("invalid scope name `{name}`: {reason}")]
    InvalidScopeName { name: String, reason: &'static str },
}
