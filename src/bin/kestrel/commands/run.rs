//! `kestrel run` command

use anyhow::Result;

use crate::cli::RunArgs;
use crate::commands::locate_project;
use kestrel::core::Workspace;
use kestrel::ops::kestrel_build::{build, BuildOptions};
use kestrel::ops::kestrel_run::run;
use kestrel::util::config::load_for_project;
use kestrel::util::diagnostic::emit_all;

pub fn execute(args: RunArgs, color: bool) -> Result<()> {
    let root = locate_project(args.path.as_deref(), args.backtrack)?;
    let mut ws = Workspace::load(&root, args.profile.as_deref())?;
    let (config, config_diagnostics) = load_for_project(&root);
    emit_all(&config_diagnostics, color);

    let opts = BuildOptions {
        jobs: args.jobs,
        color,
        ..BuildOptions::default()
    }
    .with_config(&config);

    let result = build(&mut ws, &config, &opts)?;
    eprintln!("     Running `{}`", result.output);

    let code = run(&ws, &result.output, &args.args)?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
