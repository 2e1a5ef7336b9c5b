//! Kestrel - a build-configuration compiler for C++ projects
//!
//! This crate turns a declarative `Kestrel.toml` into a toolchain-specific
//! ninja build graph and hands it to the executor.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

pub use core::{manifest::Manifest, workspace::Workspace};
