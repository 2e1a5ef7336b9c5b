//! Script generation: workspace in, rendered build script out.

use crate::builder::context::BuildContext;
use crate::builder::discovery::discover_sources;
use crate::builder::flags::{script_cflags, script_lflags};
use crate::builder::graph::{BuildGraph, COMPILE_RULE, RESOURCE_RULE};
use crate::builder::script::{NinjaScript, Rule, ScriptBuilder};
use crate::core::error::BuildError;
use crate::core::workspace::{Workspace, CACHE_DIR};
use crate::util::diagnostic::Diagnostic;

/// Everything produced by one generation run.
#[derive(Debug, Clone)]
pub struct GeneratedBuild {
    pub graph: BuildGraph,
    pub cflags: String,
    pub lflags: String,
    /// Rendered script text
    pub script: String,
    /// Recoverable problems found during discovery
    pub diagnostics: Vec<Diagnostic>,
}

/// Translate flags, discover sources, build the graph and render it.
///
/// Translation errors are returned before any filesystem access.
pub fn generate(ws: &Workspace, ctx: &BuildContext) -> Result<GeneratedBuild, BuildError> {
    let toolchain = ctx.toolchain.as_ref();
    let cflags = script_cflags(ws, toolchain, ctx.platform)?;
    let lflags = script_lflags(ws, toolchain);

    let discovered = discover_sources(ws);
    let graph = BuildGraph::construct(ws, &discovered.files, ctx)?;

    let mut script = NinjaScript::new(format!("{}/", CACHE_DIR));
    emit_script(&mut script, ctx, &graph, &cflags, &lflags);

    Ok(GeneratedBuild {
        script: script.render(),
        graph,
        cflags,
        lflags,
        diagnostics: discovered.diagnostics,
    })
}

/// Feed variables, rules and edges for `graph` into `builder`.
pub fn emit_script(
    builder: &mut dyn ScriptBuilder,
    ctx: &BuildContext,
    graph: &BuildGraph,
    cflags: &str,
    lflags: &str,
) {
    let toolchain = ctx.toolchain.as_ref();

    builder.add_variable("cxx", toolchain.program());
    builder.add_variable("cflags", cflags);
    builder.add_variable("lflags", lflags);

    builder.add_rule(
        Rule::new(COMPILE_RULE, toolchain.compile_command())
            .description("Compiling $in")
            .dependencies(toolchain.deps_format()),
    );

    let resource = graph
        .resource_edge
        .as_ref()
        .zip(toolchain.resource_command());
    if let Some((_, command)) = resource {
        builder.add_rule(Rule::new(RESOURCE_RULE, command).description("Compiling resource $in"));
    }

    let link = &graph.link_edge;
    builder.add_rule(
        Rule::new(link.rule.name(), toolchain.link_command(link.rule))
            .description(link.rule.description()),
    );

    for edge in &graph.compile_edges {
        builder.add_build_edge(&edge.object, COMPILE_RULE, std::slice::from_ref(&edge.source));
    }
    if let Some((edge, _)) = resource {
        builder.add_build_edge(&edge.output, RESOURCE_RULE, std::slice::from_ref(&edge.source));
    }
    builder.add_build_edge(&link.output, link.rule.name(), &link.inputs);
}
