//! User-facing diagnostic messages.
//!
//! Every message printed to the diagnostic stream carries the fixed
//! `[kestrel]` prefix so it can be told apart from the output of the
//! build executor, which is passed through untouched.

use std::fmt;
use std::path::PathBuf;

/// Prefix written before every diagnostic line.
pub const PREFIX: &str = "[kestrel]";

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message with optional context and suggestions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
    /// Related location (file path)
    pub location: Option<PathBuf>,
}

impl Diagnostic {
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity,
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }


    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add a file location.
    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let severity = if color {
            match self.severity {
                Severity::Error => "\x1b[1;31merror\x1b[0m",
                Severity::Warning => "\x1b[1;33mwarning\x1b[0m",
            }
        } else {
            match self.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            }
        };

        let mut output = format!("{} {}: {}\n", PREFIX, severity, self.message);

        if let Some(ref path) = self.location {
            output.push_str(&format!("  --> {}\n", path.display()));
        }

        for ctx in &self.context {
            output.push_str(&format!("  = {}\n", ctx));
        }

        for suggestion in &self.suggestions {
            output.push_str(&format!("  help: {}\n", suggestion));
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}

/// Print a batch of diagnostics to stderr, in order.
pub fn emit_all<'a>(diagnostics: impl IntoIterator<Item = &'a Diagnostic>, color: bool) {
    for diagnostic in diagnostics {
        emit(diagnostic, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_formatting() {
        let diag = Diagnostic::error("MSVC compiler is only supported on Windows")
            .with_location("Kestrel.toml")
            .with_context("host is Linux")
            .with_suggestion("select `clang` in [build] compiler");

        let output = diag.format(false);
        assert!(output.starts_with("[kestrel] error: MSVC compiler"));
        assert!(output.contains("--> Kestrel.toml"));
        assert!(output.contains("= host is Linux"));
        assert!(output.contains("help: select `clang`"));
    }

    #[test]
    fn test_warning_prefix() {
        let diag =
            Diagnostic::warning("debug symbols enabled, forcing optimization to debug level");
        assert_eq!(
            diag.to_string(),
            "[kestrel] warning: debug symbols enabled, forcing optimization to debug level\n"
        );
    }
}
