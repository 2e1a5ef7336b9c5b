//! `kestrel clean` command

use anyhow::Result;

use crate::cli::CleanArgs;
use kestrel::ops::kestrel_clean::clean;

pub fn execute(args: CleanArgs) -> Result<()> {
    let root = args.project.root()?;
    clean(&root)?;
    eprintln!("     Cleaned {}", root.display());
    Ok(())
}
