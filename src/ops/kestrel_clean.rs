//! Implementation of `kestrel clean`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::core::workspace::{BUILD_DIR, CACHE_DIR};
use crate::util::fs::remove_dir_all_if_exists;

/// Entries of the cache directory that survive a clean.
const PRESERVED: &[&str] = &["config.toml"];

/// Remove generated files: the build directory and everything in the
/// cache directory except the project configuration.
pub fn clean(root: &Path) -> Result<()> {
    remove_dir_all_if_exists(&root.join(BUILD_DIR))?;

    let cache_dir = root.join(CACHE_DIR);
    if !cache_dir.is_dir() {
        return Ok(());
    }

    for entry in fs::read_dir(&cache_dir)
        .with_context(|| format!("failed to read directory: {}", cache_dir.display()))?
    {
        let entry = entry?;
        let name = entry.file_name();
        if PRESERVED.iter().any(|keep| name.to_str() == Some(*keep)) {
            continue;
        }

        let path = entry.path();
        if entry.file_type()?.is_dir() {
            remove_dir_all_if_exists(&path)?;
        } else {
            fs::remove_file(&path)
                .with_context(|| format!("failed to remove file: {}", path.display()))?;
        }
    }

    // Drop the cache directory entirely when nothing worth keeping is left.
    if fs::read_dir(&cache_dir)?.next().is_none() {
        fs::remove_dir(&cache_dir)
            .with_context(|| format!("failed to remove directory: {}", cache_dir.display()))?;
    }

    tracing::debug!("cleaned {}", root.display());
    Ok(())
}
