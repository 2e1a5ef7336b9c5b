//! Implementation of `kestrel run`.

use anyhow::{bail, Result};

use crate::core::options::OutputKind;
use crate::core::workspace::Workspace;
use crate::util::process::ProcessBuilder;

/// Run the built executable of `ws` with `args`, returning its exit code.
///
/// `output` is the root-relative artifact path reported by the build.
pub fn run(ws: &Workspace, output: &str, args: &[String]) -> Result<i32> {
    if ws.options.output_kind != OutputKind::Executable {
        bail!(
            "`{}` is a {}, only executables can be run",
            ws.output_name(),
            ws.options.output_kind.as_str()
        );
    }

    let program = ws.root().join(output);
    if !program.is_file() {
        bail!("executable not found: {}", program.display());
    }

    let status = ProcessBuilder::new(&program)
        .args(args)
        .cwd(ws.root())
        .status()?;

    Ok(status.code().unwrap_or(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_run_rejects_libraries() {
        let tmp = TempDir::new().unwrap();
        let mut ws = Workspace::new(tmp.path());
        ws.options.output_kind = OutputKind::StaticLibrary;
        let err = run(&ws, "build/lib.a", &[]).unwrap_err();
        assert!(err.to_string().contains("only executables can be run"));
    }

    #[test]
    fn test_run_missing_executable() {
        let tmp = TempDir::new().unwrap();
        let ws = Workspace::new(tmp.path());
        let err = run(&ws, "build/app", &[]).unwrap_err();
        assert!(err.to_string().contains("executable not found"));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_forwards_exit_code() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let build = tmp.path().join("build");
        std::fs::create_dir_all(&build).unwrap();
        let script = build.join("app");
        std::fs::write(&script, "#!/bin/sh\nexit $1\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let ws = Workspace::new(tmp.path());
        assert_eq!(run(&ws, "build/app", &["7".to_string()]).unwrap(), 7);
    }
}
