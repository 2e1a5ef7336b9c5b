//! Host platform identification.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::options::OutputKind;

/// Operating system family the build runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// macOS
    MacOs,
    /// Linux and other ELF-based Unix systems
    Linux,
    /// Windows
    Windows,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn host() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Linux
        }
    }

    /// Conventional file suffix for an output of the given kind.
    pub fn output_suffix(&self, kind: OutputKind) -> &'static str {
        match (self, kind) {
            (Platform::Windows, OutputKind::Executable) => ".exe",
            (Platform::Windows, OutputKind::StaticLibrary) => ".lib",
            (Platform::Windows, OutputKind::DynamicLibrary) => ".dll",
            (_, OutputKind::Executable) => "",
            (_, OutputKind::StaticLibrary) => ".a",
            (Platform::MacOs, OutputKind::DynamicLibrary) => ".dylib",
            (Platform::Linux, OutputKind::DynamicLibrary) => ".so",
        }
    }

    /// Whether shared objects must be built as position-independent code.
    pub fn requires_pic(&self) -> bool {
        matches!(self, Platform::Linux)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::MacOs => "MacOS",
            Platform::Linux => "Linux",
            Platform::Windows => "Windows",
        };
        f.write_str(name)
    }
}

/// Append `suffix` to `name` unless it is already there.
///
/// Safe to call repeatedly on its own output.
pub fn apply_output_suffix(name: &str, suffix: &str) -> String {
    if suffix.is_empty() || name.ends_with(suffix) {
        name.to_string()
    } else {
        format!("{}{}", name, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_suffixes() {
        assert_eq!(Platform::Linux.output_suffix(OutputKind::Executable), "");
        assert_eq!(Platform::Linux.output_suffix(OutputKind::DynamicLibrary), ".so");
        assert_eq!(Platform::MacOs.output_suffix(OutputKind::DynamicLibrary), ".dylib");
        assert_eq!(Platform::Windows.output_suffix(OutputKind::Executable), ".exe");
        assert_eq!(Platform::Windows.output_suffix(OutputKind::StaticLibrary), ".lib");
        assert_eq!(Platform::MacOs.output_suffix(OutputKind::StaticLibrary), ".a");
    }

    #[test]
    fn test_apply_output_suffix_is_idempotent() {
        let once = apply_output_suffix("app", ".dll");
        let twice = apply_output_suffix(&once, ".dll");
        assert_eq!(once, "app.dll");
        assert_eq!(once, twice);

        assert_eq!(apply_output_suffix("app", ""), "app");
    }

    #[test]
    fn test_pic_only_on_linux() {
        assert!(Platform::Linux.requires_pic());
        assert!(!Platform::MacOs.requires_pic());
        assert!(!Platform::Windows.requires_pic());
    }
}
