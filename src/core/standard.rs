//! C++ language standard versions.

use serde::{Deserialize, Serialize};

use crate::core::error::BuildError;

/// C++ standard version.
///
/// The ordering follows publication order, not the numeric suffix
/// (`Cpp98 < Cpp03 < Cpp11`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum LanguageStandard {
    /// C++98
    Cpp98,
    /// C++03
    Cpp03,
    /// C++11
    Cpp11,
    /// C++14
    Cpp14,
    /// C++17
    Cpp17,
    /// C++20
    Cpp20,
    /// C++23
    Cpp23,
}

impl LanguageStandard {
    /// All standards, oldest first.
    pub const ALL: [LanguageStandard; 7] = [
        LanguageStandard::Cpp98,
        LanguageStandard::Cpp03,
        LanguageStandard::Cpp11,
        LanguageStandard::Cpp14,
        LanguageStandard::Cpp17,
        LanguageStandard::Cpp20,
        LanguageStandard::Cpp23,
    ];

    /// The newest standard known to this build of kestrel.
    pub const LATEST: LanguageStandard = LanguageStandard::Cpp23;

    /// The two-digit year suffix (e.g. `17` for C++17, `3` for C++03).
    pub fn year(&self) -> u8 {
        match self {
            LanguageStandard::Cpp98 => 98,
            LanguageStandard::Cpp03 => 3,
            LanguageStandard::Cpp11 => 11,
            LanguageStandard::Cpp14 => 14,
            LanguageStandard::Cpp17 => 17,
            LanguageStandard::Cpp20 => 20,
            LanguageStandard::Cpp23 => 23,
        }
    }

    /// Get the standard as a compiler flag value (e.g., "c++17").
    pub fn as_flag_value(&self) -> String {
        format!("c++{:02}", self.year())
    }
}

impl Default for LanguageStandard {
    fn default() -> Self {
        LanguageStandard::Cpp17
    }
}

impl TryFrom<u8> for LanguageStandard {
    type Error = BuildError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        LanguageStandard::ALL
            .into_iter()
            .find(|std| std.year() == value)
            .ok_or_else(|| BuildError::InvalidStandardValue {
                value: value.to_string(),
                reason: "valid values: 98, 03, 11, 14, 17, 20, 23".to_string(),
            })
    }
}

impl From<LanguageStandard> for u8 {
    fn from(value: LanguageStandard) -> Self {
        value.year()
    }
}

impl std::str::FromStr for LanguageStandard {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .trim_start_matches("c++")
            .trim_start_matches("cpp");

        digits
            .parse::<u8>()
            .map_err(|_| BuildError::InvalidStandardValue {
                value: s.to_string(),
                reason: "expected a two-digit year such as 17 or c++20".to_string(),
            })
            .and_then(LanguageStandard::try_from)
    }
}

impl std::fmt::Display for LanguageStandard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "C++{:02}", self.year())
    }
}
