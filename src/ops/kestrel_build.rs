//! Implementation of `kestrel build`.
//!
//! Validates the workspace, generates the script, writes it to the cache
//! directory and hands it to the build executor.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::builder::compile_commands::emit_compile_commands;
use crate::builder::fingerprint::{FingerprintCache, ScriptFingerprint};
use crate::builder::{generate, BuildContext};
use crate::core::error::BuildError;
use crate::core::platform::Platform;
use crate::core::workspace::{Workspace, CACHE_DIR, OBJECTS_DIR};
use crate::ops::kestrel_clean::clean;
use crate::util::config::Config;
use crate::util::diagnostic::{emit_all, Diagnostic};
use crate::util::fs::write_string;
use crate::util::process::{find_executable, ProcessBuilder};

/// Default executor program.
pub const DEFAULT_EXECUTOR: &str = "ninja";

/// Options for the build command.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Remove previous outputs first
    pub clean: bool,

    /// Print the generated script to stdout
    pub print_script: bool,

    /// Emit compile_commands.json at the project root
    pub emit_compile_commands: bool,

    /// Generate the script but do not run the executor
    pub no_exec: bool,

    /// Number of parallel jobs
    pub jobs: Option<usize>,

    /// Colorize diagnostics
    pub color: bool,
}

impl BuildOptions {
    /// Fill unset options from the tool configuration.
    pub fn with_config(mut self, config: &Config) -> Self {
        self.print_script |= config.build.print_script;
        self.emit_compile_commands |= config.build.emit_compile_commands;
        if self.jobs.is_none() {
            self.jobs = config.build.jobs;
        }
        self
    }
}

/// Build result.
#[derive(Debug)]
pub struct BuildResult {
    /// Final artifact, relative to the project root
    pub output: String,

    /// Path of the generated script
    pub script_path: PathBuf,

    /// Whether the script was (re)written
    pub script_written: bool,

    /// Whether the executor ran
    pub executed: bool,

    /// Every diagnostic reported during the build
    pub diagnostics: Vec<Diagnostic>,
}

/// Build the workspace on the host platform.
pub fn build(ws: &mut Workspace, config: &Config, opts: &BuildOptions) -> Result<BuildResult> {
    build_for_platform(ws, config, opts, Platform::host())
}

/// Build the workspace as if running on `platform`.
pub fn build_for_platform(
    ws: &mut Workspace,
    config: &Config,
    opts: &BuildOptions,
    platform: Platform,
) -> Result<BuildResult> {
    ws.options.validate(platform)?;

    let mut diagnostics = ws.options.normalize();
    emit_all(&diagnostics, opts.color);

    let ctx = BuildContext::new(ws.options.compiler, platform);
    tracing::debug!("generating script with {:?}", ctx);
    let generated = generate(ws, &ctx)?;
    emit_all(&generated.diagnostics, opts.color);
    diagnostics.extend(generated.diagnostics.iter().cloned());

    if opts.clean {
        clean(ws.root())?;
    }

    create_dir(&ws.cache_dir())?;
    create_dir(&ws.root().join(OBJECTS_DIR))?;

    let script_path = ws.script_path();
    let fingerprint = ScriptFingerprint::of(&generated.script);
    let cache = FingerprintCache::new(&ws.cache_dir());
    let script_written = if cache.is_fresh(&script_path, &fingerprint) {
        tracing::debug!("{} is up to date", script_path.display());
        false
    } else {
        write_string(&script_path, &generated.script)?;
        cache.save(&fingerprint)?;
        tracing::debug!("wrote {}", script_path.display());
        true
    };

    if opts.print_script {
        print!("{}", generated.script);
    }

    if opts.emit_compile_commands {
        emit_compile_commands(ws.root(), &ctx, &generated.graph, &generated.cflags)
            .context("failed to write compile_commands.json")?;
    }

    let mut result = BuildResult {
        output: generated.graph.link_edge.output.clone(),
        script_path,
        script_written,
        executed: false,
        diagnostics,
    };

    if opts.no_exec {
        return Ok(result);
    }

    let executor = resolve_executor(config)?;
    run_executor(&executor, ws.root(), opts.jobs)?;
    result.executed = true;
    Ok(result)
}

fn create_dir(path: &Path) -> Result<(), BuildError> {
    std::fs::create_dir_all(path).map_err(|source| BuildError::CacheDirectoryCreationFailure {
        path: path.to_path_buf(),
        source,
    })
}

/// Locate the build executor: the configured program, or `ninja` on PATH.
pub fn resolve_executor(config: &Config) -> Result<PathBuf, BuildError> {
    match config.build.ninja {
        Some(ref program) if program.is_file() => Ok(program.clone()),
        Some(ref program) => {
            let name = program.to_string_lossy();
            find_executable(&name).ok_or_else(|| BuildError::ExecutorNotFound {
                program: name.into_owned(),
            })
        }
        None => find_executable(DEFAULT_EXECUTOR).ok_or_else(|| BuildError::ExecutorNotFound {
            program: DEFAULT_EXECUTOR.to_string(),
        }),
    }
}

/// Run the executor against the generated script in `root`.
pub fn run_executor(executor: &Path, root: &Path, jobs: Option<usize>) -> Result<()> {
    let script = format!("{}/build.ninja", CACHE_DIR);
    let mut process = ProcessBuilder::new(executor).args(["-f", script.as_str()]).cwd(root);
    if let Some(jobs) = jobs {
        process = process.arg("-j").arg(jobs.to_string());
    }

    let status = process.status()?;
    if !status.success() {
        return Err(BuildError::ExecutorInvocationFailure {
            program: executor.display().to_string(),
            code: status.code(),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::{Compiler, OptimizeLevel, OptionId};
    use std::fs;
    use tempfile::TempDir;

    fn workspace(root: &Path) -> Workspace {
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/main.cpp"), "int main() {}").unwrap();
        let mut ws = Workspace::new(root);
        ws.options.compiler = Compiler::Gcc;
        ws.add_source_directories(["src"]);
        ws
    }

    fn no_exec() -> BuildOptions {
        BuildOptions {
            no_exec: true,
            ..BuildOptions::default()
        }
    }

    fn build_on_linux(ws: &mut Workspace) -> Result<BuildResult> {
        build_for_platform(ws, &Config::default(), &no_exec(), Platform::Linux)
    }

    #[test]
    fn test_build_writes_script_and_layout() {
        let tmp = TempDir::new().unwrap();
        let mut ws = workspace(tmp.path());
        let result = build_on_linux(&mut ws).unwrap();

        assert!(result.script_written);
        assert!(!result.executed);
        assert!(tmp.path().join(".kestrel/build.ninja").is_file());
        assert!(tmp.path().join(".kestrel/build_cache.txt").is_file());
        assert!(tmp.path().join("build/objects").is_dir());
        let script = fs::read_to_string(&result.script_path).unwrap();
        assert!(script.contains("build build/objects/src/main.o: compile src/main.cpp"));
    }

    #[test]
    fn test_unchanged_script_is_not_rewritten() {
        let tmp = TempDir::new().unwrap();
        let mut ws = workspace(tmp.path());
        let first = build_on_linux(&mut ws).unwrap();
        let second = build_on_linux(&mut ws).unwrap();
        assert!(first.script_written);
        assert!(!second.script_written);
    }

    #[test]
    fn test_platform_mismatch_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let mut ws = workspace(tmp.path());
        ws.options.compiler = Compiler::Msvc;
        let err = build_on_linux(&mut ws).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<BuildError>(),
            Some(BuildError::ToolchainPlatformMismatch { .. })
        ));
        assert!(!tmp.path().join(".kestrel").exists());
        assert!(!tmp.path().join("build").exists());
    }

    #[test]
    fn test_debug_symbols_normalize_optimization() {
        let tmp = TempDir::new().unwrap();
        let mut ws = workspace(tmp.path());
        ws.options.options.set(OptionId::DebugSymbols, true);
        ws.options.optimization = OptimizeLevel::MaxSpeed;

        let result = build_on_linux(&mut ws).unwrap();
        assert_eq!(ws.options.optimization, OptimizeLevel::Debug);
        assert!(result
            .diagnostics
            .iter()
            .any(|d| d.message.contains("forcing optimization to debug level")));
    }

    #[test]
    fn test_missing_root_is_reported_not_fatal() {
        let tmp = TempDir::new().unwrap();
        let mut ws = workspace(tmp.path());
        ws.add_source_directories(["gone"]);
        let result = build_on_linux(&mut ws).unwrap();
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.output, "build/".to_string() + ws.output_name());
    }

    #[test]
    fn test_missing_configured_executor() {
        let mut config = Config::default();
        config.build.ninja = Some(PathBuf::from("kestrel-no-such-ninja"));
        assert!(matches!(
            resolve_executor(&config),
            Err(BuildError::ExecutorNotFound { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_executor_failure_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let err = run_executor(Path::new("false"), tmp.path(), None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BuildError>(),
            Some(BuildError::ExecutorInvocationFailure { code: Some(1), .. })
        ));
    }

    #[test]
    fn test_options_pick_up_config() {
        let mut config = Config::default();
        config.build.jobs = Some(3);
        config.build.print_script = true;
        let opts = BuildOptions::default().with_config(&config);
        assert_eq!(opts.jobs, Some(3));
        assert!(opts.print_script);
    }
}
