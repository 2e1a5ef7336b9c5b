//! Ninja serialization.

use std::fmt::Write;

use super::{Rule, ScriptBuilder, Statement};

/// Ninja build file accumulator.
#[derive(Debug, Clone, Default)]
pub struct NinjaScript {
    builddir: String,
    statements: Vec<Statement>,
}

impl NinjaScript {
    /// Create an empty script whose executor state lives in `builddir`.
    pub fn new(builddir: impl Into<String>) -> Self {
        NinjaScript {
            builddir: builddir.into(),
            statements: Vec::new(),
        }
    }
}

/// Escape a path for use in a `build` line.
pub fn escape_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        match c {
            '$' | ' ' | ':' => {
                out.push('$');
                out.push(c);
            }
            '\n' => out.push_str("$\n"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a variable value so ninja passes it through literally.
///
/// Unlike paths, spaces and colons are significant only on `build` lines.
pub fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '$' => out.push_str("$$"),
            '\n' => out.push_str("$\n"),
            _ => out.push(c),
        }
    }
    out
}

fn render_rule(out: &mut String, rule: &Rule) {
    let _ = writeln!(out, "rule {}", rule.name);
    let _ = writeln!(out, "  command = {}", rule.command);
    if let Some(ref description) = rule.description {
        let _ = writeln!(out, "  description = {}", description);
    }
    if let Some(ref depfile) = rule.depfile {
        let _ = writeln!(out, "  depfile = {}", depfile);
    }
    if let Some(deps) = rule.deps {
        let _ = writeln!(out, "  deps = {}", deps.as_str());
    }
}

impl ScriptBuilder for NinjaScript {
    fn add_variable(&mut self, name: &str, value: &str) {
        self.statements.push(Statement::Variable {
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    fn add_rule(&mut self, rule: Rule) {
        self.statements.push(Statement::Rule(rule));
    }

    fn add_build_edge(&mut self, output: &str, rule: &str, inputs: &[String]) {
        self.statements.push(Statement::Build {
            output: output.to_string(),
            rule: rule.to_string(),
            inputs: inputs.to_vec(),
        });
    }

    fn statements(&self) -> &[Statement] {
        &self.statements
    }

    fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# Generated by kestrel. Do not edit.");
        let _ = writeln!(out, "builddir = {}", self.builddir);

        let mut previous_was_rule = false;
        let mut first = true;
        for statement in &self.statements {
            let is_rule = matches!(statement, Statement::Rule(_));
            // Blank line between groups and around every rule block.
            if first || is_rule || previous_was_rule {
                out.push('\n');
            }
            first = false;
            previous_was_rule = is_rule;

            match statement {
                Statement::Variable { name, value } => {
                    let _ = writeln!(out, "{} = {}", name, escape_value(value));
                }
                Statement::Rule(rule) => render_rule(&mut out, rule),
                Statement::Build {
                    output,
                    rule,
                    inputs,
                } => {
                    let _ = write!(out, "build {}: {}", escape_path(output), rule);
                    for input in inputs {
                        let _ = write!(out, " {}", escape_path(input));
                    }
                    out.push('\n');
                }
            }
        }
        out
    }
}
