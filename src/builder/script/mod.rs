//! Build script accumulation.
//!
//! A [`ScriptBuilder`] collects variables, rules and build edges as typed
//! records; rendering to concrete syntax happens once, at the end.

mod ninja;

pub use ninja::{escape_path, escape_value, NinjaScript};

/// Dependency data format emitted by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepsFormat {
    /// Makefile-style depfile (`-MD -MF`)
    Gcc,
    /// `/showIncludes` output
    Msvc,
}

impl DepsFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DepsFormat::Gcc => "gcc",
            DepsFormat::Msvc => "msvc",
        }
    }

    /// Per-output dependency file the compiler writes, if any.
    ///
    /// MSVC reports headers on stdout, which ninja parses itself.
    pub fn depfile(&self) -> Option<&'static str> {
        match self {
            DepsFormat::Gcc => Some("$out.d"),
            DepsFormat::Msvc => None,
        }
    }
}

/// A rule definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub name: String,
    pub command: String,
    pub description: Option<String>,
    pub depfile: Option<String>,
    pub deps: Option<DepsFormat>,
}

impl Rule {
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Rule {
            name: name.into(),
            command: command.into(),
            description: None,
            depfile: None,
            deps: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declare the dependency format, and the depfile when it has one.
    pub fn dependencies(mut self, deps: DepsFormat) -> Self {
        self.depfile = deps.depfile().map(str::to_string);
        self.deps = Some(deps);
        self
    }
}

/// One accumulated script statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Variable { name: String, value: String },
    Rule(Rule),
    Build {
        output: String,
        rule: String,
        inputs: Vec<String>,
    },
}

/// Append-only script accumulator.
///
/// `render` may be called any number of times and returns identical text
/// for identical accumulated state.
pub trait ScriptBuilder {
    fn add_variable(&mut self, name: &str, value: &str);

    fn add_rule(&mut self, rule: Rule);

    fn add_build_edge(&mut self, output: &str, rule: &str, inputs: &[String]);

    /// Everything accumulated so far, in insertion order.
    fn statements(&self) -> &[Statement];

    fn render(&self) -> String;
}
