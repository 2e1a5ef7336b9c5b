//! GCC/Clang toolchain implementation.

use crate::builder::graph::LinkRule;
use crate::builder::script::DepsFormat;
use crate::core::error::BuildError;
use crate::core::options::{
    Compiler, LinkMode, OptimizeLevel, OutputKind, SanitizerMode, ToolchainFamily,
};
use crate::core::platform::Platform;
use crate::core::standard::LanguageStandard;

use super::Toolchain;

/// GCC/Clang toolchain (Unix-style driver).
#[derive(Debug, Clone)]
pub struct GccToolchain {
    /// Which Unix-style driver to invoke
    pub compiler: Compiler,
}

impl GccToolchain {
    /// Create a new GCC-style toolchain.
    pub fn new(compiler: Compiler) -> Self {
        debug_assert_eq!(compiler.family(), ToolchainFamily::UnixLike);
        GccToolchain { compiler }
    }
}

impl Toolchain for GccToolchain {
    fn family(&self) -> ToolchainFamily {
        ToolchainFamily::UnixLike
    }

    fn compiler(&self) -> Compiler {
        self.compiler
    }

    fn object_extension(&self) -> &str {
        "o"
    }

    fn optimize_flag(&self, level: OptimizeLevel) -> &'static str {
        match level {
            OptimizeLevel::Debug => "-Og",
            OptimizeLevel::Size => "-Os",
            OptimizeLevel::Speed => "-O2",
            OptimizeLevel::MaxSpeed => "-O3",
        }
    }

    fn link_mode_flags(&self, mode: LinkMode) -> &'static str {
        match mode {
            LinkMode::Static => "-static",
            LinkMode::Dynamic => "",
            LinkMode::MostlyStatic => "-static-libgcc -static-libstdc++",
        }
    }

    fn sanitizer_flag(&self, mode: SanitizerMode) -> &'static str {
        match mode {
            SanitizerMode::None => "",
            SanitizerMode::Address => "-fsanitize=address",
            SanitizerMode::Undefined => "-fsanitize=undefined",
            SanitizerMode::Thread => "-fsanitize=thread",
            SanitizerMode::Memory => "-fsanitize=memory",
            SanitizerMode::AddressAndUndefined => "-fsanitize=address,undefined",
        }
    }

    fn standard_flag(&self, standard: LanguageStandard) -> Result<String, BuildError> {
        Ok(format!("-std={}", standard.as_flag_value()))
    }

    fn include_prefix(&self) -> &'static str {
        "-isystem "
    }

    fn force_include_prefix(&self) -> &'static str {
        "-include "
    }

    fn library_dir_prefix(&self) -> &'static str {
        "-L"
    }

    fn definition_prefix(&self) -> &'static str {
        "-D"
    }

    fn library_flag(&self, name: &str) -> String {
        format!("-l{}", name)
    }

    fn output_type_flags(&self, kind: OutputKind, platform: Platform) -> &'static str {
        match kind {
            OutputKind::DynamicLibrary if platform.requires_pic() => "-fPIC",
            OutputKind::Executable | OutputKind::StaticLibrary | OutputKind::DynamicLibrary => "",
        }
    }

    fn output_link_flags(&self, _kind: OutputKind) -> &'static str {
        // -shared is part of the shared link rule itself.
        ""
    }

    fn deps_format(&self) -> DepsFormat {
        DepsFormat::Gcc
    }

    fn compile_command(&self) -> &'static str {
        "$cxx $cflags -MD -MF $out.d -o $out -c $in"
    }

    fn link_command(&self, rule: LinkRule) -> &'static str {
        match rule {
            LinkRule::Executable => "$cxx -o $out $in $lflags",
            LinkRule::Archive => "ar rcs $out $in",
            LinkRule::Shared => "$cxx -shared -o $out $in $lflags",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_flags_are_versioned() {
        let tc = GccToolchain::new(Compiler::Clang);
        assert_eq!(tc.standard_flag(LanguageStandard::Cpp23).unwrap(), "-std=c++23");
        assert_eq!(tc.standard_flag(LanguageStandard::Cpp98).unwrap(), "-std=c++98");
        assert_eq!(tc.standard_flag(LanguageStandard::Cpp03).unwrap(), "-std=c++03");
    }

    #[test]
    fn test_pic_depends_on_platform() {
        let tc = GccToolchain::new(Compiler::Gcc);
        assert_eq!(tc.output_type_flags(OutputKind::DynamicLibrary, Platform::Linux), "-fPIC");
        assert_eq!(tc.output_type_flags(OutputKind::DynamicLibrary, Platform::MacOs), "");
        assert_eq!(tc.output_type_flags(OutputKind::Executable, Platform::Linux), "");
    }

    #[test]
    fn test_no_resource_support() {
        let tc = GccToolchain::new(Compiler::Clang);
        assert!(!tc.supports_resource_compilation(Platform::Windows));
        assert!(tc.resource_command().is_none());
    }
}
