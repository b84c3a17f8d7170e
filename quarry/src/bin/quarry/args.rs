#![deny(missing_docs)]

//! CLI arguments datastructures.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

use quarry::core::{DependencyName, ScopeName};
use quarry_ui::OutputFormat;
use quarry_ui::args::VerbositySpec;

/// A build tool and dependency manager.
#[derive(Parser, Clone, Debug)]
#[command(
    author,
    version,
    help_template = "\
{name} {version}
{author-with-newline}{about-with-newline}
Use -h for short descriptions and --help for more details.

{before-help}{usage-heading} {usage}

{all-args}{after-help}
"
)]
pub struct QuarryArgs {
    /// Path to Quarry.toml.
    #[arg(long, env = "QUARRY_MANIFEST_PATH", hide_short_help = true)]
    pub manifest_path: Option<Utf8PathBuf>,

    /// Directory for compiled artifacts of all environments.
    #[arg(
        long,
        env = "QUARRY_BUILD_PATH",
        value_name = "DIRECTORY",
        hide_short_help = true
    )]
    pub build_path: Option<Utf8PathBuf>,

    /// Directory for fetched dependency sources.
    #[arg(
        long,
        env = "QUARRY_DEPS_PATH",
        value_name = "DIRECTORY",
        hide_short_help = true
    )]
    pub deps_path: Option<Utf8PathBuf>,

    /// Logging verbosity.
    #[command(flatten)]
    pub verbose: VerbositySpec,

    /// Print machine-readable output in NDJSON format.
    #[arg(long)]
    pub json: bool,

    /// Subcommand and its arguments.
    #[command(subcommand)]
    pub command: Command,
}

impl QuarryArgs {
    /// Construct [`OutputFormat`] value from these arguments.
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::default()
        }
    }
}

/// Subcommand and its arguments.
#[derive(Subcommand, Clone, Debug)]
pub enum Command {
    /// Manage dependencies of the current project.
    #[command(subcommand)]
    Deps(DepsSubcommand),
}

/// Deps subcommand and its arguments.
#[derive(Subcommand, Clone, Debug)]
pub enum DepsSubcommand {
    /// Remove build artifacts and fetched sources of dependencies.
    ///
    /// Sources of path dependencies are never removed.
    Clean(DepsCleanArgs),
    /// Remove dependencies from the lock file, so that they are resolved again.
    Unlock(DepsUnlockArgs),
}

/// Which dependencies to operate on.
#[derive(Parser, Clone, Debug)]
pub struct DepsSelectionArgs {
    /// Names of dependencies.
    #[arg(value_name = "DEPENDENCY")]
    pub names: Vec<DependencyName>,

    /// Select all dependencies.
    #[arg(long)]
    pub all: bool,

    /// Select dependencies which are no longer used by the project.
    #[arg(long)]
    pub unused: bool,
}

/// Arguments accepted by the `deps clean` command.
#[derive(Parser, Clone, Debug)]
pub struct DepsCleanArgs {
    /// Dependencies to clean.
    #[command(flatten)]
    pub selection: DepsSelectionArgs,

    /// Only clean build artifacts of the given environment.
    #[arg(long, value_name = "ENV")]
    pub only: Option<ScopeName>,

    /// Only consider dependencies used for the given target.
    #[arg(long, value_name = "TARGET")]
    pub target: Option<ScopeName>,

    /// Only clean build artifacts, keeping fetched sources.
    #[arg(long)]
    pub build: bool,

    /// Also remove cleaned dependencies from the lock file.
    #[arg(long)]
    pub unlock: bool,
}

/// Arguments accepted by the `deps unlock` command.
#[derive(Parser, Clone, Debug)]
pub struct DepsUnlockArgs {
    /// Dependencies to unlock.
    #[command(flatten)]
    pub selection: DepsSelectionArgs,
}
