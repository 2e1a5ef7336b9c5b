//! High-level operations.
//!
//! This module contains the implementation of Kestrel commands.

pub mod kestrel_build;
pub mod kestrel_clean;
pub mod kestrel_new;
pub mod kestrel_run;

pub use kestrel_build::{build, build_for_platform, BuildOptions, BuildResult};
pub use kestrel_clean::clean;
pub use kestrel_new::{new_project, NewOptions};
pub use kestrel_run::run;
