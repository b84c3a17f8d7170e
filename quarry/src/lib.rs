//! Quarry is a build tool and dependency manager.
//!
//! This library backs the `quarry` binary. Workspace state lives in [`core`], while every
//! read operation and mutation is exposed from [`ops`].

#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![warn(rust_2018_idioms)]

pub mod core;
pub mod flock;
mod internal;
pub mod ops;

pub const MANIFEST_FILE_NAME: &str = "Quarry.toml";
pub const LOCK_FILE_NAME: &str = "Quarry.lock";
pub const DEFAULT_BUILD_DIR_NAME: &str = "_build";
pub const DEFAULT_DEPS_DIR_NAME: &str = "deps";
/// Per-environment subdirectory of the build directory holding compiled dependencies.
pub const BUILD_LIB_DIR_NAME: &str = "lib";
pub const BUILD_LOCK_FILE_NAME: &str = ".quarry-build.lock";
pub const DEPS_LOCK_FILE_NAME: &str = ".quarry-deps.lock";
