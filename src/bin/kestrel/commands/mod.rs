//! Command implementations

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::cli::ProjectArgs;
use kestrel::core::manifest::find_project_root;

pub mod build;
pub mod clean;
pub mod flags;
pub mod new;
pub mod run;

/// Locate the project root for `path` (or the current directory).
pub fn locate_project(path: Option<&Path>, backtrack: bool) -> Result<PathBuf> {
    let start = match path {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir().context("failed to read current directory")?,
    };
    if !start.exists() {
        bail!("path does not exist -> '{}'", start.display());
    }

    let start = start
        .canonicalize()
        .with_context(|| format!("failed to resolve {}", start.display()))?;
    find_project_root(&start, backtrack)
}

impl ProjectArgs {
    pub fn root(&self) -> Result<PathBuf> {
        locate_project(self.path.as_deref(), self.backtrack)
    }
}
