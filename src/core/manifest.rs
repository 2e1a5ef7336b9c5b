//! Kestrel.toml manifest parsing and schema.
//!
//! The manifest is the declarative description of one build: which
//! compiler to drive, which options to switch on, where the sources live
//! and what kind of artifact to produce.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::error::BuildError;
use crate::core::options::{Compiler, LinkMode, OptimizeLevel, OutputKind, SanitizerMode};
use crate::core::standard::LanguageStandard;

/// Manifest file name.
pub const MANIFEST_NAME: &str = "Kestrel.toml";

/// A parsed Kestrel.toml.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Manifest {
    pub project: ProjectSection,
    pub build: BuildSection,
    /// Named compile options, keyed by option name (e.g. `warn_all`)
    pub options: BTreeMap<String, bool>,
    pub sources: SourcesSection,
    pub paths: PathsSection,
    /// Named profiles selected with `--profile`
    pub profile: BTreeMap<String, Profile>,
}

/// `[project]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectSection {
    /// Output base name (defaults to the project directory name)
    pub name: Option<String>,
    /// What the link step produces
    pub output: OutputKind,
}

/// `[build]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct BuildSection {
    pub compiler: Compiler,
    pub std: LanguageStandard,
    pub optimization: OptimizeLevel,
    pub link_mode: LinkMode,
    pub sanitizer: SanitizerMode,
    /// Turn on the conservative warning preset
    pub recommended_warnings: bool,
}

/// `[sources]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourcesSection {
    /// Files compiled in declaration order, after discovered files
    pub files: Vec<String>,
    /// Directories searched recursively for implementation files
    pub dirs: Vec<String>,
}

/// `[paths]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct PathsSection {
    pub include: Vec<String>,
    pub defines: Vec<String>,
    pub force_include: Vec<String>,
    pub lib_dirs: Vec<String>,
    pub libs: Vec<String>,
    pub linker_flags: Vec<String>,
    /// Windows resource script (`.rc`)
    pub resource: Option<String>,
}

/// Build profile overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Profile {
    pub optimization: Option<OptimizeLevel>,
    pub sanitizer: Option<SanitizerMode>,
    pub link_mode: Option<LinkMode>,
    /// Option toggles layered over `[options]`
    pub options: BTreeMap<String, bool>,
    /// Extra preprocessor definitions
    pub defines: Vec<String>,
}

impl Manifest {
    /// Load a manifest from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("failed to parse manifest: {}", path.display()))
    }

    /// Parse manifest content.
    pub fn parse(content: &str) -> Result<Self> {
        let manifest: Manifest = toml::from_str(content)?;

        // Catch typos in option names at load time rather than mid-build.
        for name in manifest.options.keys() {
            name.parse::<crate::core::options::OptionId>()?;
        }
        for profile in manifest.profile.values() {
            for name in profile.options.keys() {
                name.parse::<crate::core::options::OptionId>()?;
            }
        }

        Ok(manifest)
    }

    /// Get a profile by name.
    pub fn profile(&self, name: &str) -> Result<&Profile, BuildError> {
        self.profile.get(name).ok_or_else(|| BuildError::UnknownProfile {
            name: name.to_string(),
            available: self.profile.keys().cloned().collect(),
        })
    }
}

/// Search for Kestrel.toml starting at `start`.
///
/// With `backtrack`, parent directories are searched too. Returns the
/// directory containing the manifest.
pub fn find_project_root(start: &Path, backtrack: bool) -> Result<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(MANIFEST_NAME);
        tracing::trace!("checking for manifest at: {}", candidate.display());
        if candidate.is_file() {
            return Ok(current);
        }

        match current.parent() {
            Some(parent) if backtrack => current = parent.to_path_buf(),
            _ if backtrack => bail!(
                "no {} found in `{}` or any parent directory",
                MANIFEST_NAME,
                start.display()
            ),
            _ => bail!("no {} found in `{}`", MANIFEST_NAME, start.display()),
        }
    }
}

/// Generate a default Kestrel.toml for an executable.
pub fn generate_exe_manifest(name: &str) -> String {
    format!(
        r#"[project]
name = "{name}"
output = "executable"

[build]
compiler = "{compiler}"
std = 20
recommended-warnings = true

[options]
warnings_are_errors = true

[sources]
dirs = ["src"]

[profile.release]
optimization = "speed"
"#,
        compiler = default_compiler().as_str()
    )
}

/// Generate a default Kestrel.toml for a static library.
pub fn generate_lib_manifest(name: &str) -> String {
    format!(
        r#"[project]
name = "{name}"
output = "static-library"

[build]
compiler = "{compiler}"
std = 20
recommended-warnings = true

[sources]
dirs = ["src"]

[paths]
include = ["include"]

[profile.release]
optimization = "speed"
"#,
        compiler = default_compiler().as_str()
    )
}

fn default_compiler() -> Compiler {
    if cfg!(target_os = "windows") {
        Compiler::Msvc
    } else {
        Compiler::Clang
    }
}
