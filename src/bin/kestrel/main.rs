//! Kestrel CLI - compile Kestrel.toml into a ninja build and run it

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use kestrel::core::error::BuildError;
use kestrel::util::diagnostic::{emit, Diagnostic, Severity};

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();

    if let Err(e) = run(cli, color) {
        emit(&error_diagnostic(&e), color);
        std::process::exit(1);
    }
}

/// Render a top-level error, keeping the help attached to known build errors.
fn error_diagnostic(e: &anyhow::Error) -> Diagnostic {
    let mut diagnostic = match e.downcast_ref::<BuildError>() {
        Some(err) => err.to_diagnostic(),
        None => Diagnostic::error(String::new()),
    };
    diagnostic.severity = Severity::Error;
    diagnostic.message = format!("{:#}", e);
    diagnostic
}

fn run(cli: Cli, color: bool) -> Result<()> {
    let filter = if cli.verbose {
        EnvFilter::new("kestrel=debug")
    } else if cli.quiet {
        EnvFilter::new("kestrel=error")
    } else {
        EnvFilter::new("kestrel=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        Commands::New(args) => commands::new::execute(args),
        Commands::Build(args) => commands::build::execute(args, color),
        Commands::Run(args) => commands::run::execute(args, color),
        Commands::Clean(args) => commands::clean::execute(args),
        Commands::Flags(args) => commands::flags::execute(args),
    }
}
