//! compile_commands.json emission for IDE integration.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::builder::context::BuildContext;
use crate::builder::graph::BuildGraph;
use crate::util::fs::write_string;

/// File name written at the project root.
pub const COMPILE_COMMANDS_FILE: &str = "compile_commands.json";

/// compile_commands.json entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileCommand {
    pub directory: String,
    pub file: String,
    pub command: String,
    pub output: String,
}

/// Expand the compile rule template for one edge.
fn expand(template: &str, cxx: &str, cflags: &str, source: &str, object: &str) -> String {
    let command = template
        .replace("$cxx", cxx)
        .replace("$cflags", cflags)
        .replace("$out", object)
        .replace("$in", source);
    command.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One entry per compile edge, in graph order.
pub fn compile_commands(
    root: &Path,
    ctx: &BuildContext,
    graph: &BuildGraph,
    cflags: &str,
) -> Vec<CompileCommand> {
    let toolchain = ctx.toolchain.as_ref();
    let directory = root.display().to_string();

    graph
        .compile_edges
        .iter()
        .map(|edge| CompileCommand {
            directory: directory.clone(),
            file: edge.source.clone(),
            command: expand(
                toolchain.compile_command(),
                toolchain.program(),
                cflags,
                &edge.source,
                &edge.object,
            ),
            output: edge.object.clone(),
        })
        .collect()
}

/// Write compile_commands.json into `root`.
pub fn emit_compile_commands(
    root: &Path,
    ctx: &BuildContext,
    graph: &BuildGraph,
    cflags: &str,
) -> Result<()> {
    let commands = compile_commands(root, ctx, graph, cflags);
    let json = serde_json::to_string_pretty(&commands)?;
    let path = root.join(COMPILE_COMMANDS_FILE);
    write_string(&path, &json)?;
    tracing::debug!("wrote {} entries to {}", commands.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::Compiler;
    use crate::core::platform::Platform;
    use crate::core::workspace::Workspace;
    use tempfile::TempDir;

    #[test]
    fn test_commands_expand_rule_template() {
        let mut ws = Workspace::new("/p/app");
        ws.add_build_files(["src/main.cpp"]);
        let ctx = BuildContext::new(Compiler::Clang, Platform::Linux);
        let graph = BuildGraph::construct(&ws, &ws.build_files, &ctx).unwrap();

        let commands = compile_commands(Path::new("/p/app"), &ctx, &graph, "-Og -std=c++17");
        assert_eq!(commands.len(), 1);
        assert_eq!(
            commands[0].command,
            "clang++ -Og -std=c++17 -MD -MF build/objects/src/main.o.d -o build/objects/src/main.o -c src/main.cpp"
        );
        assert_eq!(commands[0].file, "src/main.cpp");
        assert_eq!(commands[0].output, "build/objects/src/main.o");
    }

    #[test]
    fn test_emit_writes_json() {
        let tmp = TempDir::new().unwrap();
        let mut ws = Workspace::new(tmp.path());
        ws.add_build_files(["a.cpp"]);
        let ctx = BuildContext::new(Compiler::Gcc, Platform::Linux);
        let graph = BuildGraph::construct(&ws, &ws.build_files, &ctx).unwrap();

        emit_compile_commands(tmp.path(), &ctx, &graph, "").unwrap();
        let content = std::fs::read_to_string(tmp.path().join(COMPILE_COMMANDS_FILE)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed[0]["file"], "a.cpp");
        assert_eq!(parsed[0]["output"], "build/objects/a.o");
    }
}
