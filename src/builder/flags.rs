//! Flag translation from build options to toolchain command-line strings.
//!
//! Every function here is pure: identical inputs produce byte-identical
//! output. Tokens are joined with a single space, empty tokens contribute
//! nothing and the result never carries leading or trailing whitespace.

use crate::builder::toolchain::Toolchain;
use crate::core::error::BuildError;
use crate::core::options::{BuildOptions, CompileOption, OutputKind, Section};
use crate::core::platform::Platform;
use crate::core::standard::LanguageStandard;
use crate::core::workspace::Workspace;

/// Join flag tokens with single spaces, skipping empty ones.
pub fn join_flags<I, S>(tokens: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for token in tokens {
        let token = token.as_ref().trim();
        if token.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(token);
    }
    out
}

fn section_flags(
    options: &BuildOptions,
    wanted: fn(&Section) -> bool,
    flag: impl Fn(&CompileOption) -> &'static str,
) -> Vec<&'static str> {
    let mut flags = Vec::new();
    options.visit_options(|option| {
        if option.enabled && wanted(&option.section) {
            flags.push(flag(option));
        }
    });
    flags
}

/// Compile-time flags: enabled compile-section options in registry order,
/// then link mode, sanitizer and the optimization level.
pub fn compile_flags(options: &BuildOptions, toolchain: &dyn Toolchain) -> String {
    let mut tokens = section_flags(options, Section::applies_to_compile, |option| {
        toolchain.option_flag(option)
    });
    tokens.push(toolchain.link_mode_flags(options.link_mode));
    tokens.push(toolchain.sanitizer_flag(options.sanitizer));
    tokens.push(toolchain.optimize_flag(options.optimization));
    join_flags(tokens)
}

/// Link-time flags: enabled link-section options in registry order, in
/// the linker's spelling.
pub fn link_flags(options: &BuildOptions, toolchain: &dyn Toolchain) -> String {
    join_flags(section_flags(options, Section::applies_to_link, |option| {
        toolchain.option_link_flag(option)
    }))
}

/// Language standard flag.
pub fn standard_flag(
    toolchain: &dyn Toolchain,
    standard: LanguageStandard,
) -> Result<String, BuildError> {
    toolchain.standard_flag(standard)
}

fn prefixed<S: AsRef<str>>(prefix: &str, items: &[S]) -> String {
    join_flags(items.iter().map(|item| format!("{}{}", prefix, item.as_ref())))
}

pub fn include_directory_flags<S: AsRef<str>>(toolchain: &dyn Toolchain, dirs: &[S]) -> String {
    prefixed(toolchain.include_prefix(), dirs)
}

pub fn force_include_flags<S: AsRef<str>>(toolchain: &dyn Toolchain, files: &[S]) -> String {
    prefixed(toolchain.force_include_prefix(), files)
}

pub fn library_directory_flags<S: AsRef<str>>(toolchain: &dyn Toolchain, dirs: &[S]) -> String {
    prefixed(toolchain.library_dir_prefix(), dirs)
}

pub fn library_file_flags<S: AsRef<str>>(toolchain: &dyn Toolchain, libs: &[S]) -> String {
    join_flags(libs.iter().map(|lib| toolchain.library_flag(lib.as_ref())))
}

pub fn definition_flags<S: AsRef<str>>(toolchain: &dyn Toolchain, defines: &[S]) -> String {
    prefixed(toolchain.definition_prefix(), defines)
}

/// Compile flags implied by the output kind.
pub fn output_type_flags(
    toolchain: &dyn Toolchain,
    kind: OutputKind,
    platform: Platform,
) -> String {
    join_flags([toolchain.output_type_flags(kind, platform)])
}

/// Link flags implied by the output kind.
pub fn output_link_flags(toolchain: &dyn Toolchain, kind: OutputKind) -> String {
    join_flags([toolchain.output_link_flags(kind)])
}

/// The `cflags` value of the generated script.
pub fn script_cflags(
    ws: &Workspace,
    toolchain: &dyn Toolchain,
    platform: Platform,
) -> Result<String, BuildError> {
    let options = &ws.options;
    Ok(join_flags([
        compile_flags(options, toolchain),
        standard_flag(toolchain, options.standard)?,
        output_type_flags(toolchain, options.output_kind, platform),
        include_directory_flags(toolchain, &ws.include_dirs),
        force_include_flags(toolchain, &ws.force_includes),
        definition_flags(toolchain, &ws.definitions),
    ]))
}

/// The `lflags` value of the generated script.
///
/// Driver-level flags (runtime linkage, sanitizer) come first. On
/// toolchains with a linker passthrough token, everything meant for the
/// linker itself follows that token; the token is omitted when nothing
/// follows it.
pub fn script_lflags(ws: &Workspace, toolchain: &dyn Toolchain) -> String {
    let options = &ws.options;
    let driver = join_flags([
        toolchain.link_mode_flags(options.link_mode),
        toolchain.sanitizer_flag(options.sanitizer),
    ]);
    let linker = join_flags([
        link_flags(options, toolchain),
        output_link_flags(toolchain, options.output_kind),
        library_directory_flags(toolchain, &ws.library_dirs),
        library_file_flags(toolchain, &ws.libraries),
        join_flags(&ws.linker_flags),
    ]);

    match toolchain.linker_passthrough() {
        Some(token) if !linker.is_empty() => join_flags([driver.as_str(), token, linker.as_str()]),
        _ => join_flags([driver, linker]),
    }
}
