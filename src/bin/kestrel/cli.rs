//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Kestrel - compile a declarative C++ build description into a ninja build
#[derive(Parser)]
#[command(name = "kestrel")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new Kestrel project
    New(NewArgs),

    /// Generate the build script and run ninja
    Build(BuildArgs),

    /// Build, then run the produced executable
    Run(RunArgs),

    /// Remove build artifacts and generated files
    Clean(CleanArgs),

    /// Show the translated compile and link flags
    Flags(FlagsArgs),
}

/// Where to look for Kestrel.toml.
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Project directory (defaults to the current directory)
    pub path: Option<PathBuf>,

    /// Search parent directories for Kestrel.toml
    #[arg(short, long)]
    pub backtrack: bool,
}

#[derive(Args)]
pub struct NewArgs {
    /// Project name
    pub name: String,

    /// Create a static library instead of an executable
    #[arg(long)]
    pub lib: bool,

    /// Directory to create the project in (defaults to name)
    #[arg(long)]
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Remove previous outputs before building
    #[arg(long)]
    pub clean: bool,

    /// Apply a [profile.<name>] section from Kestrel.toml
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Print the generated build script
    #[arg(long)]
    pub print_script: bool,

    /// Emit compile_commands.json
    #[arg(long)]
    pub emit_compile_commands: bool,

    /// Generate the build script without running ninja
    #[arg(long)]
    pub no_exec: bool,

    /// Number of parallel jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

#[derive(Args)]
pub struct RunArgs {
    /// Project directory (defaults to the current directory)
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Search parent directories for Kestrel.toml
    #[arg(short, long)]
    pub backtrack: bool,

    /// Apply a [profile.<name>] section from Kestrel.toml
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Number of parallel jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Arguments passed to the executable
    #[arg(last = true)]
    pub args: Vec<String>,
}

#[derive(Args)]
pub struct CleanArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

#[derive(Args)]
pub struct FlagsArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Apply a [profile.<name>] section from Kestrel.toml
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Only show compile flags
    #[arg(long, conflicts_with = "link")]
    pub compile: bool,

    /// Only show link flags
    #[arg(long)]
    pub link: bool,
}
