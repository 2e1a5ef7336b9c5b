//! `kestrel flags` command

use anyhow::Result;

use crate::cli::FlagsArgs;
use kestrel::builder::flags::{script_cflags, script_lflags};
use kestrel::builder::BuildContext;
use kestrel::core::Workspace;
use kestrel::util::diagnostic::emit_all;

pub fn execute(args: FlagsArgs) -> Result<()> {
    let root = args.project.root()?;
    let mut ws = Workspace::load(&root, args.profile.as_deref())?;
    emit_all(&ws.options.normalize(), false);

    let ctx = BuildContext::host(ws.options.compiler);
    let toolchain = ctx.toolchain.as_ref();

    println!("# {} on {}", toolchain.compiler(), ctx.platform);
    println!("cxx = {}", toolchain.program());
    if !args.link {
        println!("cflags = {}", script_cflags(&ws, toolchain, ctx.platform)?);
    }
    if !args.compile {
        println!("lflags = {}", script_lflags(&ws, toolchain));
    }

    Ok(())
}
