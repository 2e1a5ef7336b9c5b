//! Source discovery.
//!
//! Walks the workspace's search roots for implementation files and merges
//! them with the explicitly declared build files.

use std::collections::HashSet;
use std::path::Path;

use walkdir::WalkDir;

use crate::core::error::BuildError;
use crate::core::workspace::Workspace;
use crate::util::diagnostic::Diagnostic;
use crate::util::fs::relative_path;

/// Recognized implementation-file extensions.
pub const SOURCE_EXTENSIONS: &[&str] = &["cpp", "cc", "cxx"];

/// Result of source discovery.
#[derive(Debug, Clone, Default)]
pub struct DiscoveredSources {
    /// Root-relative source paths, discovered first, then declared.
    pub files: Vec<String>,
    /// Recoverable problems found along the way.
    pub diagnostics: Vec<Diagnostic>,
}

fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SOURCE_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// Root-relative, forward-slash form of `path`.
fn normalize(root: &Path, path: &Path) -> String {
    let relative = if path.is_absolute() {
        relative_path(root, path)
    } else {
        path.to_path_buf()
    };
    let text = relative.to_string_lossy().replace('\\', "/");
    text.strip_prefix("./").map(str::to_string).unwrap_or(text)
}

/// Collect the sources of `ws`.
///
/// A missing search root is reported and skipped. Entries that cannot be
/// read during traversal are skipped silently. Paths are deduplicated,
/// keeping the first occurrence.
pub fn discover_sources(ws: &Workspace) -> DiscoveredSources {
    let root = ws.root();
    let mut result = DiscoveredSources::default();
    let mut seen = HashSet::new();

    for dir in &ws.source_dirs {
        let search_root = root.join(dir);
        if !search_root.is_dir() {
            let error = BuildError::MissingSearchRoot {
                path: search_root.clone(),
            };
            tracing::debug!("{}", error);
            result.diagnostics.push(error.to_diagnostic());
            continue;
        }

        tracing::debug!("searching {} for sources", search_root.display());
        let walker = WalkDir::new(&search_root)
            .follow_links(true)
            .sort_by_file_name();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::trace!("skipping unreadable entry: {}", err);
                    continue;
                }
            };
            if !entry.file_type().is_file() || !is_source_file(entry.path()) {
                continue;
            }

            let file = normalize(root, &relative_path(root, entry.path()));
            if seen.insert(file.clone()) {
                result.files.push(file);
            }
        }
    }

    for file in &ws.build_files {
        let file = normalize(root, Path::new(file));
        if seen.insert(file.clone()) {
            result.files.push(file);
        }
    }

    tracing::debug!("discovered {} source files", result.files.len());
    result
}
