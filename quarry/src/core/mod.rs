//! Core datastructures describing a Quarry project.

pub use config::*;
pub use dependency::*;
pub use errors::*;
pub use lockfile::*;
pub use manifest::*;
pub use selection::*;
pub use snapshot::*;
pub use workspace::*;

pub(crate) mod config;
pub(crate) mod dependency;
pub(crate) mod errors;
pub(crate) mod lockfile;
pub(crate) mod manifest;
pub(crate) mod selection;
pub(crate) mod snapshot;
pub(crate) mod workspace;
