//! Toolchain abstraction for C++ compiler families.
//!
//! Each toolchain family (MSVC-like, Unix-like) speaks a different
//! command-line grammar. Everything that differs between them lives behind
//! the [`Toolchain`] trait so that callers never branch on the family
//! themselves; adding a family means adding one implementation.

use crate::builder::graph::LinkRule;
use crate::builder::script::DepsFormat;
use crate::core::error::BuildError;
use crate::core::options::{
    CompileOption, Compiler, LinkMode, OptimizeLevel, OutputKind, SanitizerMode, ToolchainFamily,
};
use crate::core::platform::Platform;
use crate::core::standard::LanguageStandard;

mod gcc;
mod msvc;

pub use gcc::GccToolchain;
pub use msvc::MsvcToolchain;

/// Capability set of one toolchain family.
///
/// Commands returned by the `*_command` methods are templates in the
/// executor's syntax and reference `$cxx`, `$cflags`, `$lflags`, `$in`
/// and `$out`.
pub trait Toolchain: Send + Sync {
    /// Get the toolchain family.
    fn family(&self) -> ToolchainFamily;

    /// The compiler this toolchain drives.
    fn compiler(&self) -> Compiler;

    /// Driver program written into the script.
    fn program(&self) -> &str {
        self.compiler().program()
    }

    /// Object file extension, without the dot.
    fn object_extension(&self) -> &str;

    /// Suffix appended to the output base name.
    fn output_suffix(&self, kind: OutputKind, platform: Platform) -> &'static str {
        platform.output_suffix(kind)
    }

    /// Compile-line flag contributed by an enabled option (may be empty).
    fn option_flag(&self, option: &CompileOption) -> &'static str {
        option.flag(self.family())
    }

    /// Link-line flag contributed by an enabled option (may be empty).
    fn option_link_flag(&self, option: &CompileOption) -> &'static str {
        option.link_flag(self.family())
    }

    /// Flag selecting the optimization level. Never empty.
    fn optimize_flag(&self, level: OptimizeLevel) -> &'static str;

    /// Flags requesting static runtime linkage (empty for dynamic).
    fn link_mode_flags(&self, mode: LinkMode) -> &'static str;

    /// Sanitizer flag (empty for none or when unsupported).
    fn sanitizer_flag(&self, mode: SanitizerMode) -> &'static str;

    /// Flag selecting the language standard.
    fn standard_flag(&self, standard: LanguageStandard) -> Result<String, BuildError>;

    /// Prefix for an include directory.
    fn include_prefix(&self) -> &'static str;

    /// Prefix for a forced include file.
    fn force_include_prefix(&self) -> &'static str;

    /// Prefix for a library search directory.
    fn library_dir_prefix(&self) -> &'static str;

    /// Prefix for a preprocessor definition.
    fn definition_prefix(&self) -> &'static str;

    /// Flag naming one library to link.
    fn library_flag(&self, name: &str) -> String;

    /// Compile-time flags implied by the output kind.
    fn output_type_flags(&self, kind: OutputKind, platform: Platform) -> &'static str;

    /// Link-time flags implied by the output kind.
    fn output_link_flags(&self, kind: OutputKind) -> &'static str;

    /// Token that separates driver flags from flags forwarded to the linker.
    fn linker_passthrough(&self) -> Option<&'static str> {
        None
    }

    /// Format of the dependency data the compiler emits.
    fn deps_format(&self) -> DepsFormat;

    /// Command template compiling one translation unit.
    fn compile_command(&self) -> &'static str;

    /// Command template for a link rule.
    fn link_command(&self, rule: LinkRule) -> &'static str;

    /// Whether resource scripts can be compiled and linked on `platform`.
    fn supports_resource_compilation(&self, platform: Platform) -> bool {
        let _ = platform;
        false
    }

    /// Command template compiling a resource script.
    fn resource_command(&self) -> Option<&'static str> {
        None
    }
}

/// Create the toolchain for `compiler`.
pub fn toolchain_for(compiler: Compiler) -> Box<dyn Toolchain> {
    match compiler.family() {
        ToolchainFamily::MsvcLike => Box::new(MsvcToolchain::new()),
        ToolchainFamily::UnixLike => Box::new(GccToolchain::new(compiler)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toolchain_for() {
        assert_eq!(toolchain_for(Compiler::Msvc).family(), ToolchainFamily::MsvcLike);
        assert_eq!(toolchain_for(Compiler::Gcc).family(), ToolchainFamily::UnixLike);
        assert_eq!(toolchain_for(Compiler::Gcc).program(), "g++");
        assert_eq!(toolchain_for(Compiler::Clang).program(), "clang++");
    }

    #[test]
    fn test_optimize_flag_never_empty() {
        for compiler in [Compiler::Msvc, Compiler::Gcc, Compiler::Clang] {
            let tc = toolchain_for(compiler);
            for level in [
                OptimizeLevel::Debug,
                OptimizeLevel::Size,
                OptimizeLevel::Speed,
                OptimizeLevel::MaxSpeed,
            ] {
                assert!(!tc.optimize_flag(level).is_empty());
            }
        }
    }

    #[test]
    fn test_link_rules_have_commands() {
        for compiler in [Compiler::Msvc, Compiler::Clang] {
            let tc = toolchain_for(compiler);
            for rule in LinkRule::ALL {
                assert!(tc.link_command(*rule).contains("$out"));
            }
        }
    }
}
