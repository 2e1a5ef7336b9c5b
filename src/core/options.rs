//! Build options: compiler choice, optimization, sanitizers and the
//! registry of named compile options.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::BuildError;
use crate::core::platform::Platform;
use crate::core::standard::LanguageStandard;
use crate::util::diagnostic::Diagnostic;

/// Command-line grammar class of a compiler driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolchainFamily {
    /// `cl.exe` style: `/flag`, `/Fo<out>`, `.obj`
    MsvcLike,
    /// gcc/clang style: `-flag`, `-o <out>`, `.o`
    UnixLike,
}

/// Supported compiler drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Compiler {
    /// GNU g++
    Gcc,
    /// Microsoft cl.exe
    Msvc,
    /// LLVM clang++
    #[default]
    Clang,
}

impl Compiler {
    /// The toolchain family whose flag vocabulary this compiler speaks.
    pub fn family(&self) -> ToolchainFamily {
        match self {
            Compiler::Msvc => ToolchainFamily::MsvcLike,
            Compiler::Gcc | Compiler::Clang => ToolchainFamily::UnixLike,
        }
    }

    /// Driver program written into the generated script.
    pub fn program(&self) -> &'static str {
        match self {
            Compiler::Gcc => "g++",
            Compiler::Msvc => "cl",
            Compiler::Clang => "clang++",
        }
    }

    /// Get the compiler name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Compiler::Gcc => "gcc",
            Compiler::Msvc => "msvc",
            Compiler::Clang => "clang",
        }
    }

    /// Whether this compiler can run on `platform`.
    pub fn supported_on(&self, platform: Platform) -> bool {
        match self {
            Compiler::Msvc => platform == Platform::Windows,
            Compiler::Gcc | Compiler::Clang => true,
        }
    }
}

impl fmt::Display for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Compiler::Gcc => "GCC",
            Compiler::Msvc => "MSVC",
            Compiler::Clang => "Clang",
        };
        f.write_str(name)
    }
}

/// How the runtime libraries are linked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LinkMode {
    /// Fully static
    #[serde(alias = "statically")]
    Static,
    /// Shared runtime libraries
    #[default]
    #[serde(alias = "dynamically")]
    Dynamic,
    /// Static language runtime, everything else shared
    #[serde(alias = "mostly_static")]
    MostlyStatic,
}

/// Runtime sanitizer instrumentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SanitizerMode {
    #[default]
    None,
    Address,
    Undefined,
    Thread,
    Memory,
    #[serde(alias = "address_and_undefined")]
    AddressAndUndefined,
}

/// Optimization level, ordered from least to most aggressive.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum OptimizeLevel {
    #[default]
    Debug,
    Size,
    Speed,
    #[serde(alias = "max_speed")]
    MaxSpeed,
}

/// What the link step produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OutputKind {
    #[default]
    #[serde(alias = "exe")]
    Executable,
    #[serde(alias = "staticlib")]
    StaticLibrary,
    #[serde(alias = "sharedlib", alias = "shared-library")]
    DynamicLibrary,
}

impl OutputKind {
    /// Get the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputKind::Executable => "executable",
            OutputKind::StaticLibrary => "static-library",
            OutputKind::DynamicLibrary => "dynamic-library",
        }
    }
}

/// Which command lines a compile option belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Compile,
    Link,
    Both,
}

impl Section {
    /// Whether options of this section go on the compile line.
    pub fn applies_to_compile(&self) -> bool {
        matches!(self, Section::Compile | Section::Both)
    }

    /// Whether options of this section go on the link line.
    pub fn applies_to_link(&self) -> bool {
        matches!(self, Section::Link | Section::Both)
    }
}

/// Picks the link-line flag: the explicit one when given, else the compile flag.
macro_rules! link_flag_or {
    ($flag:literal) => {
        $flag
    };
    ($flag:literal, $link:literal) => {
        $link
    };
}

macro_rules! compile_options {
    ($(
        $id:ident => $name:literal,
        msvc: $msvc:literal $(link $msvc_link:literal)?,
        unix: $unix:literal $(link $unix_link:literal)?,
        $section:ident;
    )*) => {
        /// Identifier of a named compile option.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum OptionId {
            $( $id, )*
        }

        impl OptionId {
            /// Every option, in registry order.
            pub const ALL: &'static [OptionId] = &[ $( OptionId::$id, )* ];

            /// Manifest key for this option.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( OptionId::$id => $name, )*
                }
            }

            /// Default (disabled) descriptor for this option.
            pub fn descriptor(&self) -> CompileOption {
                match self {
                    $( OptionId::$id => CompileOption {
                        id: OptionId::$id,
                        msvc_flag: $msvc,
                        unix_flag: $unix,
                        msvc_link_flag: link_flag_or!($msvc $(, $msvc_link)?),
                        unix_link_flag: link_flag_or!($unix $(, $unix_link)?),
                        section: Section::$section,
                        enabled: false,
                    }, )*
                }
            }
        }
    };
}

compile_options! {
    WarnAll => "warn_all", msvc: "/Wall", unix: "-Wall", Compile;
    WarnExtra => "warn_extra", msvc: "/W4", unix: "-Wextra", Compile;
    WarnExtraTokens => "warn_extra_tokens", msvc: "", unix: "-Wextra-tokens", Compile;
    WarnPedantic => "warn_pedantic", msvc: "/permissive-", unix: "-Wpedantic", Compile;
    WarnOldStyleCasts => "warn_old_style_casts", msvc: "", unix: "-Wold-style-cast", Compile;
    WarnCastQualifiers => "warn_cast_qualifiers", msvc: "", unix: "-Wcast-qual", Compile;
    WarningsAreErrors => "warnings_are_errors", msvc: "/WX", unix: "-Werror", Compile;
    WarnUnused => "warn_unused", msvc: "/wd4101 /wd4102 /wd4189", unix: "-Wunused", Compile;
    WarnUninitialized => "warn_uninitialized", msvc: "/we4700", unix: "-Wuninitialized", Compile;
    WarnArrayBounds => "warn_array_bounds", msvc: "", unix: "-Warray-bounds", Compile;
    WarnSignConversion => "warn_sign_conversion", msvc: "/we4365", unix: "-Wsign-conversion", Compile;
    WarnFromSystemHeaders => "warn_from_system_headers", msvc: "/external:W4", unix: "-Wsystem-headers", Compile;
    WarnShadow => "warn_shadow", msvc: "/we4456 /we4457 /we4458 /we4459", unix: "-Wshadow", Compile;
    WarnNonVirtualDtor => "warn_non_virtual_dtor", msvc: "/we4265", unix: "-Wnon-virtual-dtor", Compile;
    WarnConversion => "warn_conversion", msvc: "/we4244 /we4267", unix: "-Wconversion", Compile;
    WarnMisleadingIndentation => "warn_misleading_indentation", msvc: "", unix: "-Wmisleading-indentation", Compile;
    WarnNullDereference => "warn_null_dereference", msvc: "", unix: "-Wnull-dereference", Compile;
    WarnImplicitFallthrough => "warn_implicit_fallthrough", msvc: "/we5262", unix: "-Wimplicit-fallthrough", Compile;
    ErrorPedantic => "error_pedantic", msvc: "/permissive-", unix: "-pedantic-errors", Compile;
    WarnUndef => "warn_undef", msvc: "", unix: "-Wundef", Compile;
    WarnFloatEqual => "warn_float_equal", msvc: "", unix: "-Wfloat-equal", Compile;
    WarnPointerArith => "warn_pointer_arith", msvc: "", unix: "-Wpointer-arith", Compile;
    WarnCastAlign => "warn_cast_align", msvc: "", unix: "-Wcast-align", Compile;
    WarnSwitchDefault => "warn_switch_default", msvc: "/w14062", unix: "-Wswitch-default", Compile;
    WarnSwitchEnum => "warn_switch_enum", msvc: "/w14061", unix: "-Wswitch-enum", Compile;
    WarnUnreachableCode => "warn_unreachable_code", msvc: "/w14702", unix: "-Wunreachable-code", Compile;
    WarnAggregateReturn => "warn_aggregate_return", msvc: "", unix: "-Waggregate-return", Compile;
    WarnWriteStrings => "warn_write_strings", msvc: "", unix: "-Wwrite-strings", Compile;
    WarnStrictPrototypes => "warn_strict_prototypes", msvc: "", unix: "-Wstrict-prototypes", Compile;
    WarnMissingPrototypes => "warn_missing_prototypes", msvc: "", unix: "-Wmissing-prototypes", Compile;
    WarnOldStyleDefinition => "warn_old_style_definition", msvc: "", unix: "-Wold-style-definition", Compile;
    SaveTemps => "save_temps", msvc: "", unix: "-save-temps", Compile;
    StripExecutableSymbols => "strip_executable_symbols", msvc: "/DEBUG:NONE", unix: "-s", Link;
    LinkTimeOptimization => "link_time_optimization", msvc: "/GL" link "/LTCG", unix: "-flto", Both;
    DebugSymbols => "debug_symbols", msvc: "/Zi" link "/DEBUG", unix: "-g", Both;
}

impl std::str::FromStr for OptionId {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OptionId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| BuildError::UnknownOption {
                name: s.to_string(),
                suggestions: similar_option_names(s),
            })
    }
}

/// Option names sharing a prefix or substring with `name`.
fn similar_option_names(name: &str) -> Vec<String> {
    let needle = name.trim_end_matches('s');
    OptionId::ALL
        .iter()
        .map(|id| id.as_str())
        .filter(|candidate| {
            !needle.is_empty() && (candidate.starts_with(needle) || candidate.contains(needle))
        })
        .take(3)
        .map(str::to_string)
        .collect()
}

/// A named toggle carrying one flag per toolchain family.
///
/// Compiler drivers and linkers do not always share a spelling (`/Zi` on
/// `cl` is `/DEBUG` on `link`), so the link line has its own flag. An
/// empty flag means the option has no equivalent on that family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOption {
    pub id: OptionId,
    pub msvc_flag: &'static str,
    pub unix_flag: &'static str,
    pub msvc_link_flag: &'static str,
    pub unix_link_flag: &'static str,
    pub section: Section,
    pub enabled: bool,
}

impl CompileOption {
    /// The compile-line flag for `family`.
    pub fn flag(&self, family: ToolchainFamily) -> &'static str {
        match family {
            ToolchainFamily::MsvcLike => self.msvc_flag,
            ToolchainFamily::UnixLike => self.unix_flag,
        }
    }

    /// The link-line flag for `family`.
    pub fn link_flag(&self, family: ToolchainFamily) -> &'static str {
        match family {
            ToolchainFamily::MsvcLike => self.msvc_link_flag,
            ToolchainFamily::UnixLike => self.unix_link_flag,
        }
    }
}

/// Ordered table of every compile option and whether it is enabled.
///
/// Iteration order is the declaration order of [`OptionId::ALL`] and
/// never changes, so generated flag strings are reproducible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionRegistry {
    options: Vec<CompileOption>,
}

impl Default for OptionRegistry {
    fn default() -> Self {
        OptionRegistry {
            options: OptionId::ALL.iter().map(|id| id.descriptor()).collect(),
        }
    }
}

impl OptionRegistry {
    fn index_of(id: OptionId) -> usize {
        // ALL is generated in declaration order, so the discriminant is the index.
        id as usize
    }

    /// Look up an option by id.
    pub fn get(&self, id: OptionId) -> &CompileOption {
        &self.options[Self::index_of(id)]
    }

    /// Enable or disable an option.
    pub fn set(&mut self, id: OptionId, enabled: bool) {
        self.options[Self::index_of(id)].enabled = enabled;
    }

    /// Enable or disable an option by its manifest key.
    pub fn set_by_name(&mut self, name: &str, enabled: bool) -> Result<(), BuildError> {
        let id: OptionId = name.parse()?;
        self.set(id, enabled);
        Ok(())
    }

    /// Whether an option is enabled.
    pub fn is_enabled(&self, id: OptionId) -> bool {
        self.get(id).enabled
    }

    /// Visit every option in registry order.
    pub fn visit(&self, mut visitor: impl FnMut(&CompileOption)) {
        for option in &self.options {
            visitor(option);
        }
    }

    /// Iterate over every option in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &CompileOption> {
        self.options.iter()
    }

    /// Iterate over the enabled options only.
    pub fn enabled(&self) -> impl Iterator<Item = &CompileOption> {
        self.options.iter().filter(|option| option.enabled)
    }
}

/// The full knob set for one build.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuildOptions {
    pub compiler: Compiler,
    pub standard: LanguageStandard,
    pub output_kind: OutputKind,
    pub link_mode: LinkMode,
    pub sanitizer: SanitizerMode,
    pub optimization: OptimizeLevel,
    pub options: OptionRegistry,
}

/// Options switched on by [`BuildOptions::enable_recommended_warnings`].
const RECOMMENDED_WARNINGS: &[OptionId] = &[
    OptionId::WarnAll,
    OptionId::WarnExtra,
    OptionId::WarnShadow,
    OptionId::WarnNonVirtualDtor,
    OptionId::WarnPedantic,
];

impl BuildOptions {
    /// Toolchain family of the selected compiler.
    pub fn family(&self) -> ToolchainFamily {
        self.compiler.family()
    }

    /// Visit every compile option in registry order.
    pub fn visit_options(&self, visitor: impl FnMut(&CompileOption)) {
        self.options.visit(visitor);
    }

    /// Toggle a conservative warning preset on.
    ///
    /// Only Unix-like compilers have a preset; for MSVC this returns
    /// `false` and leaves every option untouched.
    pub fn enable_recommended_warnings(&mut self) -> bool {
        if self.family() != ToolchainFamily::UnixLike {
            return false;
        }

        for id in RECOMMENDED_WARNINGS {
            self.options.set(*id, true);
        }
        true
    }

    /// Check options that cannot work on `platform`.
    pub fn validate(&self, platform: Platform) -> Result<(), BuildError> {
        if !self.compiler.supported_on(platform) {
            return Err(BuildError::ToolchainPlatformMismatch {
                compiler: self.compiler.to_string(),
                platform: platform.to_string(),
            });
        }
        Ok(())
    }

    /// Resolve conflicting settings, returning a warning for each change.
    ///
    /// Debug symbols force the optimization level down to `debug`.
    pub fn normalize(&mut self) -> Vec<Diagnostic> {
        let mut warnings = Vec::new();

        let debug_symbols = self.options.is_enabled(OptionId::DebugSymbols);
        if debug_symbols && self.optimization > OptimizeLevel::Debug {
            tracing::debug!(
                "debug symbols requested with {:?}, lowering optimization",
                self.optimization
            );
            self.optimization = OptimizeLevel::Debug;
            warnings.push(Diagnostic::warning(
                "debug symbols enabled, forcing optimization to debug level",
            ));
        }

        if self.family() == ToolchainFamily::MsvcLike
            && !matches!(
                self.sanitizer,
                SanitizerMode::None | SanitizerMode::Address | SanitizerMode::AddressAndUndefined
            )
        {
            warnings.push(Diagnostic::warning(format!(
                "{:?} sanitizer is not supported by MSVC and will be ignored",
                self.sanitizer
            )));
        }

        warnings
    }
}
