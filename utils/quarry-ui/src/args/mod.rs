//! This module provides reusable [`clap`] arguments for common tasks in Quarry.

pub use verbosity::*;

mod verbosity;
