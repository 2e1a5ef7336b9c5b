//! MSVC toolchain implementation.

use crate::builder::graph::LinkRule;
use crate::builder::script::DepsFormat;
use crate::core::error::BuildError;
use crate::core::options::{
    Compiler, LinkMode, OptimizeLevel, OutputKind, SanitizerMode, ToolchainFamily,
};
use crate::core::platform::Platform;
use crate::core::standard::LanguageStandard;

use super::Toolchain;

/// MSVC toolchain (Windows).
#[derive(Debug, Clone, Default)]
pub struct MsvcToolchain;

impl MsvcToolchain {
    /// Create a new MSVC toolchain.
    pub fn new() -> Self {
        MsvcToolchain
    }
}

impl Toolchain for MsvcToolchain {
    fn family(&self) -> ToolchainFamily {
        ToolchainFamily::MsvcLike
    }

    fn compiler(&self) -> Compiler {
        Compiler::Msvc
    }

    fn object_extension(&self) -> &str {
        "obj"
    }

    fn optimize_flag(&self, level: OptimizeLevel) -> &'static str {
        match level {
            OptimizeLevel::Debug => "/Od",
            OptimizeLevel::Size => "/Os",
            OptimizeLevel::Speed => "/O2",
            OptimizeLevel::MaxSpeed => "/Ox",
        }
    }

    fn link_mode_flags(&self, mode: LinkMode) -> &'static str {
        // cl links the CRT statically with /MT; there is no finer split.
        match mode {
            LinkMode::Static | LinkMode::MostlyStatic => "/MT",
            LinkMode::Dynamic => "",
        }
    }

    fn sanitizer_flag(&self, mode: SanitizerMode) -> &'static str {
        match mode {
            SanitizerMode::Address | SanitizerMode::AddressAndUndefined => "/fsanitize=address",
            SanitizerMode::None
            | SanitizerMode::Undefined
            | SanitizerMode::Thread
            | SanitizerMode::Memory => "",
        }
    }

    fn standard_flag(&self, standard: LanguageStandard) -> Result<String, BuildError> {
        if standard == LanguageStandard::LATEST {
            return Ok("/std:c++latest".to_string());
        }
        if standard < LanguageStandard::Cpp14 {
            return Err(BuildError::InvalidStandardValue {
                value: standard.to_string(),
                reason: "cl.exe has no switch for standards older than C++14".to_string(),
            });
        }
        Ok(format!("/std:{}", standard.as_flag_value()))
    }

    fn include_prefix(&self) -> &'static str {
        "/I"
    }

    fn force_include_prefix(&self) -> &'static str {
        "/FI"
    }

    fn library_dir_prefix(&self) -> &'static str {
        "/LIBPATH:"
    }

    fn definition_prefix(&self) -> &'static str {
        "/D"
    }

    fn library_flag(&self, name: &str) -> String {
        format!("{}.lib", name)
    }

    fn output_type_flags(&self, kind: OutputKind, _platform: Platform) -> &'static str {
        match kind {
            OutputKind::DynamicLibrary => "/LD",
            OutputKind::Executable | OutputKind::StaticLibrary => "",
        }
    }

    fn output_link_flags(&self, kind: OutputKind) -> &'static str {
        match kind {
            OutputKind::DynamicLibrary => "/DLL",
            OutputKind::Executable | OutputKind::StaticLibrary => "",
        }
    }

    fn linker_passthrough(&self) -> Option<&'static str> {
        Some("/link")
    }

    fn deps_format(&self) -> DepsFormat {
        DepsFormat::Msvc
    }

    fn compile_command(&self) -> &'static str {
        "$cxx /nologo /EHsc $cflags /Fo$out /Fd:build/vc140.pdb /FS /showIncludes /Zc:__cplusplus /c $in"
    }

    fn link_command(&self, rule: LinkRule) -> &'static str {
        match rule {
            LinkRule::Executable => "$cxx /nologo /Fe$out $in $lflags",
            LinkRule::Archive => "lib /nologo /out:$out $in",
            LinkRule::Shared => "$cxx /nologo /LD /Fe$out $in $lflags",
        }
    }

    fn supports_resource_compilation(&self, platform: Platform) -> bool {
        platform == Platform::Windows
    }

    fn resource_command(&self) -> Option<&'static str> {
        Some("rc.exe /nologo /fo$out $in")
    }
}
