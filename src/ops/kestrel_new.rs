//! Implementation of `kestrel new`.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::core::manifest::{generate_exe_manifest, generate_lib_manifest, MANIFEST_NAME};

/// Options for creating a new project.
#[derive(Debug, Clone)]
pub struct NewOptions {
    /// Project name
    pub name: String,

    /// Create a static library project
    pub lib: bool,
}

/// Create a new Kestrel project at `path`.
pub fn new_project(path: &Path, opts: &NewOptions) -> Result<()> {
    if path.exists() {
        bail!("destination `{}` already exists", path.display());
    }

    fs::create_dir_all(path)
        .with_context(|| format!("failed to create directory: {}", path.display()))?;

    let manifest_content = if opts.lib {
        generate_lib_manifest(&opts.name)
    } else {
        generate_exe_manifest(&opts.name)
    };
    fs::write(path.join(MANIFEST_NAME), manifest_content)
        .with_context(|| format!("failed to write {}", MANIFEST_NAME))?;

    let src_dir = path.join("src");
    fs::create_dir_all(&src_dir).with_context(|| "failed to create src directory")?;

    if opts.lib {
        let include_dir = path.join("include").join(&opts.name);
        fs::create_dir_all(&include_dir)
            .with_context(|| "failed to create include directory")?;

        let header_content = format!(
            r#"#pragma once

namespace {name} {{

void init();

}} // namespace {name}
"#,
            name = opts.name
        );
        fs::write(include_dir.join(format!("{}.hpp", opts.name)), header_content)?;

        let source_content = format!(
            r#"#include "{name}/{name}.hpp"

namespace {name} {{

void init() {{}}

}} // namespace {name}
"#,
            name = opts.name
        );
        fs::write(src_dir.join("lib.cpp"), source_content)?;
    } else {
        let main_content = r#"#include <iostream>

int main() {
    std::cout << "Hello, Kestrel!\n";
    return 0;
}
"#;
        fs::write(src_dir.join("main.cpp"), main_content)?;
    }

    let gitignore = r#"# Kestrel build artifacts
.kestrel/
build/
compile_commands.json
"#;
    fs::write(path.join(".gitignore"), gitignore)?;

    tracing::debug!("created project `{}` at {}", opts.name, path.display());
    Ok(())
}
