//! Workspace - the root aggregate of one build invocation.
//!
//! A Workspace owns the build options, the project root, the output base
//! name and every list of paths and flags that feeds the build graph. It is
//! configured through additive `add_*` calls and then consumed once when
//! the build script is generated.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::error::BuildError;
use crate::core::manifest::{Manifest, Profile};
use crate::core::options::BuildOptions;
use crate::core::platform::{apply_output_suffix, Platform};

/// Cache directory (generated script, executor state) relative to the root.
pub const CACHE_DIR: &str = ".kestrel";

/// Build output directory relative to the root.
pub const BUILD_DIR: &str = "build";

/// Object file directory relative to the root.
pub const OBJECTS_DIR: &str = "build/objects";

/// A fully configured build.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub options: BuildOptions,
    root: PathBuf,
    output_name: String,

    pub build_files: Vec<String>,
    pub source_dirs: Vec<String>,
    pub include_dirs: Vec<String>,
    pub definitions: Vec<String>,
    pub force_includes: Vec<String>,
    pub library_dirs: Vec<String>,
    pub libraries: Vec<String>,
    pub linker_flags: Vec<String>,
    resource_file: Option<String>,
}

fn extend_strings(list: &mut Vec<String>, items: impl IntoIterator<Item = impl Into<String>>) {
    list.extend(items.into_iter().map(Into::into));
}

impl Workspace {
    /// Create an empty workspace rooted at `root`.
    ///
    /// The output name defaults to the root directory's file name.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let output_name = root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "a".to_string());

        Workspace {
            options: BuildOptions::default(),
            root,
            output_name,
            build_files: Vec::new(),
            source_dirs: Vec::new(),
            include_dirs: Vec::new(),
            definitions: Vec::new(),
            force_includes: Vec::new(),
            library_dirs: Vec::new(),
            libraries: Vec::new(),
            linker_flags: Vec::new(),
            resource_file: None,
        }
    }

    /// Load the manifest in `root` and build a workspace from it.
    pub fn load(root: &Path, profile: Option<&str>) -> Result<Self> {
        let manifest_path = root.join(crate::core::manifest::MANIFEST_NAME);
        let manifest = Manifest::load(&manifest_path)?;
        Self::from_manifest(root, &manifest, profile)
            .with_context(|| format!("invalid configuration in {}", manifest_path.display()))
    }

    /// Build a workspace from an already-parsed manifest.
    pub fn from_manifest(root: &Path, manifest: &Manifest, profile: Option<&str>) -> Result<Self> {
        let mut ws = Workspace::new(root);
        if let Some(ref name) = manifest.project.name {
            ws.set_output_name(name.clone());
        }

        let build = &manifest.build;
        ws.options.compiler = build.compiler;
        ws.options.standard = build.std;
        ws.options.output_kind = manifest.project.output;
        ws.options.optimization = build.optimization;
        ws.options.link_mode = build.link_mode;
        ws.options.sanitizer = build.sanitizer;

        if build.recommended_warnings && !ws.options.enable_recommended_warnings() {
            tracing::debug!(
                "no recommended warning preset for {}, skipping",
                ws.options.compiler
            );
        }

        for (name, enabled) in &manifest.options {
            ws.options.options.set_by_name(name, *enabled)?;
        }

        ws.add_build_files(manifest.sources.files.iter().cloned());
        ws.add_source_directories(manifest.sources.dirs.iter().cloned());

        let paths = &manifest.paths;
        ws.add_includes(paths.include.iter().cloned());
        ws.add_definitions(paths.defines.iter().cloned());
        ws.add_force_includes(paths.force_include.iter().cloned());
        ws.add_library_includes(paths.lib_dirs.iter().cloned());
        ws.add_libraries(paths.libs.iter().cloned());
        ws.add_linker_flags(paths.linker_flags.iter().cloned());
        if let Some(ref resource) = paths.resource {
            ws.set_resource_file(resource.clone());
        }

        if let Some(name) = profile {
            ws.apply_profile(manifest.profile(name)?)?;
            tracing::debug!("applied profile `{}`", name);
        }

        Ok(ws)
    }

    /// Layer a profile's overrides on top of the current settings.
    pub fn apply_profile(&mut self, profile: &Profile) -> Result<(), BuildError> {
        if let Some(optimization) = profile.optimization {
            self.options.optimization = optimization;
        }
        if let Some(sanitizer) = profile.sanitizer {
            self.options.sanitizer = sanitizer;
        }
        if let Some(link_mode) = profile.link_mode {
            self.options.link_mode = link_mode;
        }
        for (name, enabled) in &profile.options {
            self.options.options.set_by_name(name, *enabled)?;
        }
        self.add_definitions(profile.defines.iter().cloned());
        Ok(())
    }

    /// Get the project root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Output base name, without any platform suffix.
    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    /// Set the output base name.
    pub fn set_output_name(&mut self, name: impl Into<String>) {
        self.output_name = name.into();
    }

    /// Output file name with the platform suffix for the output kind.
    pub fn output_file_name(&self, platform: Platform) -> String {
        apply_output_suffix(
            &self.output_name,
            platform.output_suffix(self.options.output_kind),
        )
    }

    /// Root-relative path of the final artifact.
    pub fn output_path(&self, platform: Platform) -> String {
        format!("{}/{}", BUILD_DIR, self.output_file_name(platform))
    }

    /// Windows resource script, if one was declared.
    pub fn resource_file(&self) -> Option<&str> {
        self.resource_file.as_deref()
    }

    /// Declare a Windows resource script.
    ///
    /// It only produces a build edge on toolchains that can compile it.
    pub fn set_resource_file(&mut self, path: impl Into<String>) {
        self.resource_file = Some(path.into());
    }

    pub fn add_build_files(&mut self, files: impl IntoIterator<Item = impl Into<String>>) {
        extend_strings(&mut self.build_files, files);
    }

    pub fn add_source_directories(&mut self, dirs: impl IntoIterator<Item = impl Into<String>>) {
        extend_strings(&mut self.source_dirs, dirs);
    }

    pub fn add_includes(&mut self, dirs: impl IntoIterator<Item = impl Into<String>>) {
        extend_strings(&mut self.include_dirs, dirs);
    }

    pub fn add_definitions(&mut self, defs: impl IntoIterator<Item = impl Into<String>>) {
        extend_strings(&mut self.definitions, defs);
    }

    pub fn add_force_includes(&mut self, files: impl IntoIterator<Item = impl Into<String>>) {
        extend_strings(&mut self.force_includes, files);
    }

    pub fn add_library_includes(&mut self, dirs: impl IntoIterator<Item = impl Into<String>>) {
        extend_strings(&mut self.library_dirs, dirs);
    }

    pub fn add_libraries(&mut self, libs: impl IntoIterator<Item = impl Into<String>>) {
        extend_strings(&mut self.libraries, libs);
    }

    pub fn add_linker_flags(&mut self, flags: impl IntoIterator<Item = impl Into<String>>) {
        extend_strings(&mut self.linker_flags, flags);
    }

    /// Get the cache directory.
    pub fn cache_dir(&self) -> PathBuf {
        self.root.join(CACHE_DIR)
    }

    /// Get the build output directory.
    pub fn build_dir(&self) -> PathBuf {
        self.root.join(BUILD_DIR)
    }

    /// Path of the generated build script.
    pub fn script_path(&self) -> PathBuf {
        self.cache_dir().join("build.ninja")
    }
}
