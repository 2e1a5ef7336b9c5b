//! Core data structures for Kestrel.
//!
//! This module contains the configuration model of a build:
//! - Build options and the compile-option registry
//! - Language standards and host platforms
//! - The Kestrel.toml manifest
//! - The workspace aggregate consumed by the builder

pub mod error;
pub mod manifest;
pub mod options;
pub mod platform;
pub mod standard;
pub mod workspace;

pub use error::BuildError;
pub use manifest::{Manifest, MANIFEST_NAME};
pub use options::{
    BuildOptions, CompileOption, Compiler, LinkMode, OptimizeLevel, OptionId, OptionRegistry,
    OutputKind, SanitizerMode, Section, ToolchainFamily,
};
pub use platform::Platform;
pub use standard::LanguageStandard;
pub use workspace::Workspace;
