//! All read operations and mutations available with a Quarry workspace.
//!
//! For datastructures describing the state, see [`crate::core`] module.

pub use converge::*;
pub use deps_clean::*;
pub use lockfile::*;
pub use manifest::*;
pub use unlock::*;
pub use workspace::*;

mod converge;
mod deps_clean;
mod lockfile;
mod manifest;
mod unlock;
mod workspace;
