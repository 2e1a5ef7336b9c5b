//! Build script generation.
//!
//! This module translates a workspace into toolchain flags, discovers its
//! sources, constructs the build graph and serializes it for the executor.

pub mod compile_commands;
pub mod context;
pub mod discovery;
pub mod fingerprint;
pub mod flags;
pub mod generator;
pub mod graph;
pub mod script;
pub mod toolchain;

pub use context::BuildContext;
pub use discovery::{discover_sources, DiscoveredSources};
pub use generator::{generate, GeneratedBuild};
pub use graph::{BuildGraph, LinkRule};
pub use script::{NinjaScript, ScriptBuilder};
pub use toolchain::{toolchain_for, GccToolchain, MsvcToolchain, Toolchain};
