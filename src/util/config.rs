//! Configuration file support for Kestrel.
//!
//! Kestrel reads tool settings from two locations:
//! - Global: `~/.kestrel/config.toml` - User-wide defaults
//! - Project: `.kestrel/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. Build descriptions
//! themselves live in `Kestrel.toml`, not here.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::util::diagnostic::Diagnostic;

/// Kestrel tool configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build settings
    pub build: BuildConfig,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BuildConfig {
    /// Build executor program (defaults to `ninja` on PATH)
    pub ninja: Option<PathBuf>,

    /// Parallel jobs passed to the executor (None = executor default)
    pub jobs: Option<usize>,

    /// Always print the generated script
    pub print_script: bool,

    /// Always emit compile_commands.json
    pub emit_compile_commands: bool,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration, falling back to defaults if the file is missing
    /// or unreadable. A file that exists but fails to load is reported as a
    /// warning diagnostic.
    pub fn load_or_default(path: &Path) -> (Self, Option<Diagnostic>) {
        if !path.exists() {
            return (Self::default(), None);
        }

        match Self::load(path) {
            Ok(config) => (config, None),
            Err(e) => {
                tracing::debug!("ignoring config {}: {:#}", path.display(), e);
                let diagnostic = Diagnostic::warning("failed to load config, using defaults")
                    .with_location(path)
                    .with_context(format!("{:#}", e));
                (Self::default(), Some(diagnostic))
            }
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.build.ninja.is_some() {
            self.build.ninja = other.build.ninja;
        }
        if other.build.jobs.is_some() {
            self.build.jobs = other.build.jobs;
        }
        if other.build.print_script {
            self.build.print_script = true;
        }
        if other.build.emit_compile_commands {
            self.build.emit_compile_commands = true;
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.kestrel/config.toml)
/// 2. Global config (~/.kestrel/config.toml)
/// 3. Defaults
///
/// Returns the merged config with a warning for every file that failed to load.
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> (Config, Vec<Diagnostic>) {
    let mut config = Config::default();
    let mut diagnostics = Vec::new();

    for path in global_path.into_iter().chain([project_path]) {
        let (loaded, diagnostic) = Config::load_or_default(path);
        config.merge(loaded);
        diagnostics.extend(diagnostic);
    }

    (config, diagnostics)
}

/// Load the configuration that applies to `project_root`.
pub fn load_for_project(project_root: &Path) -> (Config, Vec<Diagnostic>) {
    let global = global_config_path();
    load_config(global.as_deref(), &project_config_path(project_root))
}

/// Get the global kestrel config directory (~/.kestrel).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".kestrel"))
}

/// Get the global config path (~/.kestrel/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.kestrel/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".kestrel").join("config.toml")
}
