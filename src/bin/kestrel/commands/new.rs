//! `kestrel new` command

use anyhow::Result;

use crate::cli::NewArgs;
use kestrel::ops::kestrel_new::{new_project, NewOptions};

pub fn execute(args: NewArgs) -> Result<()> {
    let path = args.path.unwrap_or_else(|| args.name.clone().into());

    let opts = NewOptions {
        name: args.name.clone(),
        lib: args.lib,
    };
    new_project(&path, &opts)?;

    let kind = if args.lib { "library" } else { "binary (application)" };
    eprintln!("     Created {} `{}` project", kind, args.name);

    Ok(())
}
