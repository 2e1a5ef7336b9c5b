//! `kestrel build` command

use anyhow::Result;

use crate::cli::BuildArgs;
use kestrel::core::Workspace;
use kestrel::ops::kestrel_build::{build, BuildOptions};
use kestrel::util::config::load_for_project;
use kestrel::util::diagnostic::emit_all;

pub fn execute(args: BuildArgs, color: bool) -> Result<()> {
    let root = args.project.root()?;
    let mut ws = Workspace::load(&root, args.profile.as_deref())?;
    let (config, config_diagnostics) = load_for_project(&root);
    emit_all(&config_diagnostics, color);

    let opts = BuildOptions {
        clean: args.clean,
        print_script: args.print_script,
        emit_compile_commands: args.emit_compile_commands,
        no_exec: args.no_exec,
        jobs: args.jobs,
        color,
    }
    .with_config(&config);

    let result = build(&mut ws, &config, &opts)?;

    if result.executed {
        eprintln!("    Finished `{}` -> {}", ws.output_name(), result.output);
    } else {
        eprintln!("   Generated {}", result.script_path.display());
    }

    Ok(())
}
