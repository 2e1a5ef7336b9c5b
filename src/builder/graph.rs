//! Build graph construction.
//!
//! Maps the merged source list of a workspace onto compile edges, an
//! optional resource edge and exactly one link edge.

use std::collections::HashMap;
use std::path::{Component, Path};

use crate::builder::context::BuildContext;
use crate::core::error::BuildError;
use crate::core::options::OutputKind;
use crate::core::platform::apply_output_suffix;
use crate::core::workspace::{Workspace, BUILD_DIR, OBJECTS_DIR};

/// Rule compiling one translation unit.
pub const COMPILE_RULE: &str = "compile";

/// Rule compiling a Windows resource script.
pub const RESOURCE_RULE: &str = "compile_rc";

/// Link step selected by the output kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkRule {
    Executable,
    Archive,
    Shared,
}

impl LinkRule {
    pub const ALL: &'static [LinkRule] =
        &[LinkRule::Executable, LinkRule::Archive, LinkRule::Shared];

    /// Link rule for an output kind.
    pub fn for_output(kind: OutputKind) -> Self {
        match kind {
            OutputKind::Executable => LinkRule::Executable,
            OutputKind::StaticLibrary => LinkRule::Archive,
            OutputKind::DynamicLibrary => LinkRule::Shared,
        }
    }

    /// Rule name in the generated script.
    pub fn name(&self) -> &'static str {
        match self {
            LinkRule::Executable => "link_exe",
            LinkRule::Archive => "link_static_lib",
            LinkRule::Shared => "link_shared_lib",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            LinkRule::Executable => "Linking executable $out",
            LinkRule::Archive => "Archiving static library $out",
            LinkRule::Shared => "Linking shared library $out",
        }
    }
}

/// One source file compiled to one object file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileEdge {
    pub source: String,
    pub object: String,
}

/// A resource script compiled to a linkable resource object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEdge {
    pub source: String,
    pub output: String,
}

/// The single edge producing the final artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEdge {
    pub rule: LinkRule,
    pub output: String,
    pub inputs: Vec<String>,
}

/// Complete edge set for one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildGraph {
    pub compile_edges: Vec<CompileEdge>,
    pub resource_edge: Option<ResourceEdge>,
    pub link_edge: LinkEdge,
}

impl BuildGraph {
    /// Build the graph for `sources` (root-relative paths).
    ///
    /// Fails when two sources map to the same object file, e.g. `a.cpp`
    /// and `a.cc` in one directory.
    pub fn construct(
        ws: &Workspace,
        sources: &[String],
        ctx: &BuildContext,
    ) -> Result<Self, BuildError> {
        let toolchain = ctx.toolchain.as_ref();
        let extension = toolchain.object_extension();

        let mut producers: HashMap<String, &str> = HashMap::new();
        let mut compile_edges = Vec::with_capacity(sources.len());
        for source in sources {
            let object = object_path(source, extension);
            if let Some(first) = producers.insert(object.clone(), source) {
                return Err(BuildError::ObjectPathCollision {
                    object,
                    first: first.to_string(),
                    second: source.clone(),
                });
            }
            compile_edges.push(CompileEdge {
                source: source.clone(),
                object,
            });
        }

        let resource_edge = match ws.resource_file() {
            Some(resource)
                if toolchain.supports_resource_compilation(ctx.platform)
                    && toolchain.resource_command().is_some() =>
            {
                Some(ResourceEdge {
                    source: resource.to_string(),
                    output: resource_output_path(resource),
                })
            }
            Some(resource) => {
                tracing::debug!(
                    "resource file `{}` ignored: not supported by {} on {}",
                    resource,
                    toolchain.compiler(),
                    ctx.platform
                );
                None
            }
            None => None,
        };

        let mut inputs: Vec<String> = compile_edges.iter().map(|e| e.object.clone()).collect();
        if let Some(ref edge) = resource_edge {
            inputs.push(edge.output.clone());
        }

        let kind = ws.options.output_kind;
        let suffix = toolchain.output_suffix(kind, ctx.platform);
        let file_name = apply_output_suffix(ws.output_name(), suffix);
        let link_edge = LinkEdge {
            rule: LinkRule::for_output(kind),
            output: format!("{}/{}", BUILD_DIR, file_name),
            inputs,
        };

        Ok(BuildGraph {
            compile_edges,
            resource_edge,
            link_edge,
        })
    }

    /// Number of compile-type edges, including the resource edge.
    pub fn compile_edge_count(&self) -> usize {
        self.compile_edges.len() + usize::from(self.resource_edge.is_some())
    }
}

/// Object path for a root-relative source path.
///
/// The extension is replaced and the relative directory structure is kept
/// under the objects directory. Parent components are mapped to `__` so
/// that objects never escape it.
pub fn object_path(source: &str, extension: &str) -> String {
    let relative = Path::new(source).with_extension(extension);
    let mut path = String::from(OBJECTS_DIR);
    for component in relative.components() {
        let part = match component {
            Component::Normal(part) => part.to_string_lossy(),
            Component::ParentDir => "__".into(),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => continue,
        };
        path.push('/');
        path.push_str(&part);
    }
    path
}

fn resource_output_path(resource: &str) -> String {
    let stem = Path::new(resource)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "resource".to_string());
    format!("{}/{}.res", BUILD_DIR, stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::Compiler;
    use crate::core::platform::Platform;

    fn sources(files: &[&str]) -> Vec<String> {
        files.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn test_object_path() {
        assert_eq!(object_path("a.cpp", "o"), "build/objects/a.o");
        assert_eq!(object_path("src/net/socket.cc", "obj"), "build/objects/src/net/socket.obj");
        assert_eq!(object_path("./main.cxx", "o"), "build/objects/main.o");
        assert_eq!(object_path("../shared/x.cpp", "o"), "build/objects/__/shared/x.o");
    }

    #[test]
    fn test_link_rule_selection() {
        assert_eq!(LinkRule::for_output(OutputKind::Executable).name(), "link_exe");
        assert_eq!(LinkRule::for_output(OutputKind::StaticLibrary).name(), "link_static_lib");
        assert_eq!(LinkRule::for_output(OutputKind::DynamicLibrary).name(), "link_shared_lib");
    }

    #[test]
    fn test_graph_completeness() {
        let ws = Workspace::new("/p/app");
        let ctx = BuildContext::new(Compiler::Clang, Platform::Linux);
        let files = sources(&["a.cpp", "src/b.cc", "src/c.cxx"]);
        let graph = BuildGraph::construct(&ws, &files, &ctx).unwrap();

        assert_eq!(graph.compile_edges.len(), 3);
        assert_eq!(graph.compile_edge_count(), 3);
        let objects: Vec<&str> = graph.compile_edges.iter().map(|e| e.object.as_str()).collect();
        assert_eq!(graph.link_edge.inputs, objects);
        assert_eq!(graph.link_edge.output, "build/app");
        assert_eq!(graph.link_edge.rule, LinkRule::Executable);
    }

    #[test]
    fn test_resource_edge_only_when_supported() {
        let mut ws = Workspace::new("/p/app");
        ws.set_resource_file("res/icon.rc");
        ws.options.compiler = Compiler::Msvc;
        let files = sources(&["main.cpp"]);

        let windows = BuildContext::new(Compiler::Msvc, Platform::Windows);
        let graph = BuildGraph::construct(&ws, &files, &windows).unwrap();
        let edge = graph.resource_edge.clone().unwrap();
        assert_eq!(edge.output, "build/icon.res");
        assert_eq!(graph.compile_edge_count(), 2);
        assert_eq!(graph.link_edge.inputs, vec!["build/objects/main.obj", "build/icon.res"]);
        assert_eq!(graph.link_edge.output, "build/app.exe");

        let linux = BuildContext::new(Compiler::Gcc, Platform::Linux);
        let graph = BuildGraph::construct(&ws, &files, &linux).unwrap();
        assert!(graph.resource_edge.is_none());
        assert_eq!(graph.link_edge.inputs, vec!["build/objects/main.o"]);
    }

    #[test]
    fn test_library_suffix_applied_once() {
        let mut ws = Workspace::new("/p/engine");
        ws.options.output_kind = OutputKind::DynamicLibrary;
        ws.set_output_name("engine.dll");
        let ctx = BuildContext::new(Compiler::Msvc, Platform::Windows);
        let graph = BuildGraph::construct(&ws, &[], &ctx).unwrap();
        assert_eq!(graph.link_edge.output, "build/engine.dll");
        assert_eq!(graph.link_edge.rule, LinkRule::Shared);
    }

    #[test]
    fn test_same_stem_sources_collide() {
        let ws = Workspace::new("/p/app");
        let ctx = BuildContext::new(Compiler::Gcc, Platform::Linux);
        let files = vec!["src/a.cpp".to_string(), "src/a.cc".to_string()];

        match BuildGraph::construct(&ws, &files, &ctx) {
            Err(BuildError::ObjectPathCollision {
                object,
                first,
                second,
            }) => {
                assert_eq!(object, "build/objects/src/a.o");
                assert_eq!(first, "src/a.cpp");
                assert_eq!(second, "src/a.cc");
            }
            other => panic!("expected a collision, got {:?}", other),
        }

        let distinct = vec!["src/a.cpp".to_string(), "lib/a.cc".to_string()];
        assert!(BuildGraph::construct(&ws, &distinct, &ctx).is_ok());
    }
}
