//! Error types for configuration, translation and orchestration.

use std::io;
use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

/// Errors raised while turning a workspace into a build script.
///
/// Validation and translation errors are raised before anything is
/// written to disk. `MissingSearchRoot` is only ever reported as a
/// diagnostic; discovery carries on without the missing root.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum BuildError {
    #[error("{compiler} compiler is only supported on Windows (host is {platform})")]
    #[diagnostic(
        code(kestrel::toolchain::platform_mismatch),
        help("select `gcc` or `clang` in [build] compiler")
    )]
    ToolchainPlatformMismatch { compiler: String, platform: String },

    #[error("invalid C++ standard `{value}`: {reason}")]
    #[diagnostic(code(kestrel::options::invalid_standard))]
    InvalidStandardValue { value: String, reason: String },

    #[error("path does not exist -> '{}'", path.display())]
    #[diagnostic(code(kestrel::sources::missing_root))]
    MissingSearchRoot { path: PathBuf },

    #[error("failed to create cache directory `{}`", path.display())]
    #[diagnostic(code(kestrel::build::cache_dir))]
    CacheDirectoryCreationFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("build failed: `{program}` exited with {}", display_status(*code))]
    #[diagnostic(code(kestrel::build::executor_failed))]
    ExecutorInvocationFailure { program: String, code: Option<i32> },

    #[error("build executor `{program}` not found")]
    #[diagnostic(
        code(kestrel::build::executor_not_found),
        help("install ninja or set [build] ninja in .kestrel/config.toml")
    )]
    ExecutorNotFound { program: String },

    #[error("unknown compile option `{name}`")]
    #[diagnostic(code(kestrel::options::unknown_option))]
    UnknownOption { name: String, suggestions: Vec<String> },

    #[error("`{first}` and `{second}` both compile to `{object}`")]
    #[diagnostic(
        code(kestrel::graph::object_collision),
        help("rename one of the sources so their stems differ")
    )]
    ObjectPathCollision {
        object: String,
        first: String,
        second: String,
    },

    #[error("unknown profile `{name}`")]
    #[diagnostic(code(kestrel::manifest::unknown_profile))]
    UnknownProfile { name: String, available: Vec<String> },
}

fn display_status(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "a signal".to_string(),
    }
}

impl BuildError {
    /// Convert to a user-facing diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());

        match self {
            BuildError::MissingSearchRoot { .. } => Diagnostic::warning(self.to_string()),
            BuildError::UnknownOption { suggestions, .. } if !suggestions.is_empty() => {
                diag.with_suggestion(format!("did you mean `{}`?", suggestions.join("`, `")))
            }
            BuildError::UnknownProfile { available, .. } => {
                if available.is_empty() {
                    diag.with_context("no [profile.*] sections are declared")
                } else {
                    diag.with_context(format!("available profiles: {}", available.join(", ")))
                }
            }
            BuildError::ObjectPathCollision { .. } => {
                diag.with_suggestion("rename one of the sources so their stems differ")
            }
            BuildError::CacheDirectoryCreationFailure { source, .. } => {
                diag.with_context(source.to_string())
            }
            _ => diag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_root_message() {
        let err = BuildError::MissingSearchRoot {
            path: PathBuf::from("lib/src"),
        };
        assert_eq!(err.to_string(), "path does not exist -> 'lib/src'");
        assert!(err
            .to_diagnostic()
            .format(false)
            .starts_with("[kestrel] warning: path does not exist"));
    }

    #[test]
    fn test_executor_failure_message() {
        let err = BuildError::ExecutorInvocationFailure {
            program: "ninja".to_string(),
            code: Some(1),
        };
        assert_eq!(err.to_string(), "build failed: `ninja` exited with exit code 1");
    }

    #[test]
    fn test_unknown_option_suggestion() {
        let err = BuildError::UnknownOption {
            name: "warn_al".to_string(),
            suggestions: vec!["warn_all".to_string()],
        };
        let text = err.to_diagnostic().format(false);
        assert!(text.contains("unknown compile option `warn_al`"));
        assert!(text.contains("did you mean `warn_all`?"));
    }
}
