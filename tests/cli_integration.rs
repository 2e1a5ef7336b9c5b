//! CLI integration tests for Kestrel.
//!
//! These tests drive the binary from project creation through script
//! generation. Nothing here requires ninja or a C++ compiler.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the kestrel binary command.
fn kestrel() -> Command {
    Command::cargo_bin("kestrel").unwrap()
}

/// Create a temporary directory for test projects.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

/// Write a project with the given manifest and sources.
fn write_project(root: &Path, manifest: &str, sources: &[&str]) {
    fs::write(root.join("Kestrel.toml"), manifest).unwrap();
    for source in sources {
        let path = root.join(source);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "int main() { return 0; }\n").unwrap();
    }
}

// ============================================================================
// kestrel new
// ============================================================================

#[test]
fn test_new_creates_executable_project() {
    let tmp = temp_dir();
    let project_dir = tmp.path().join("myapp");

    kestrel()
        .args(["new", "myapp"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Created binary (application) `myapp`"));

    assert!(project_dir.join("Kestrel.toml").exists());
    assert!(project_dir.join("src/main.cpp").exists());

    let manifest = fs::read_to_string(project_dir.join("Kestrel.toml")).unwrap();
    assert!(manifest.contains("name = \"myapp\""));
    assert!(manifest.contains("output = \"executable\""));
}

#[test]
fn test_new_creates_library_project() {
    let tmp = temp_dir();
    let project_dir = tmp.path().join("mylib");

    kestrel()
        .args(["new", "mylib", "--lib"])
        .current_dir(tmp.path())
        .assert()
        .success();

    assert!(project_dir.join("include/mylib/mylib.hpp").exists());
    assert!(project_dir.join("src/lib.cpp").exists());
    let manifest = fs::read_to_string(project_dir.join("Kestrel.toml")).unwrap();
    assert!(manifest.contains("output = \"static-library\""));
}

#[test]
fn test_new_fails_if_exists() {
    let tmp = temp_dir();
    fs::create_dir(tmp.path().join("existing")).unwrap();

    kestrel()
        .args(["new", "existing"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

// ============================================================================
// kestrel build
// ============================================================================

#[test]
fn test_build_no_exec_writes_script() {
    let tmp = temp_dir();
    write_project(
        tmp.path(),
        "[project]\nname = \"demo\"\n\n[build]\ncompiler = \"gcc\"\n\n[sources]\ndirs = [\"src\"]\n",
        &["src/main.cpp"],
    );

    kestrel()
        .args(["build", "--no-exec"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Generated"));

    let script = fs::read_to_string(tmp.path().join(".kestrel/build.ninja")).unwrap();
    assert!(script.contains("builddir = .kestrel/"));
    assert!(script.contains("build build/objects/src/main.o: compile src/main.cpp"));
    assert!(tmp.path().join("build/objects").is_dir());
}

#[test]
fn test_build_print_script_round_trip() {
    let tmp = temp_dir();
    write_project(
        tmp.path(),
        r#"
[project]
name = "pair"

[build]
compiler = "clang"

[sources]
files = ["a.cpp", "b.cpp"]
"#,
        &["a.cpp", "b.cpp"],
    );

    let expected_link = if cfg!(windows) {
        "build build/pair.exe: link_exe build/objects/a.o build/objects/b.o"
    } else {
        "build build/pair: link_exe build/objects/a.o build/objects/b.o"
    };

    kestrel()
        .args(["build", "--no-exec", "--print-script"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("rule compile\n"))
        .stdout(predicate::str::contains("build build/objects/a.o: compile a.cpp"))
        .stdout(predicate::str::contains("build build/objects/b.o: compile b.cpp"))
        .stdout(predicate::str::contains(expected_link));
}

#[test]
fn test_build_reports_missing_search_root() {
    let tmp = temp_dir();
    write_project(
        tmp.path(),
        "[build]\ncompiler = \"gcc\"\n\n[sources]\ndirs = [\"nope\", \"src\"]\n",
        &["src/x.cpp", "src/y.cc", "src/z.cxx"],
    );

    kestrel()
        .args(["build", "--no-exec", "--print-script"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("[kestrel] warning: path does not exist"))
        .stdout(predicate::str::contains(": compile ").count(3));
}

#[test]
fn test_build_debug_symbols_warning() {
    let tmp = temp_dir();
    write_project(
        tmp.path(),
        "[build]\ncompiler = \"gcc\"\noptimization = \"speed\"\n\n[options]\ndebug_symbols = true\n\n[sources]\nfiles = [\"main.cpp\"]\n",
        &["main.cpp"],
    );

    kestrel()
        .args(["build", "--no-exec", "--print-script"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "[kestrel] warning: debug symbols enabled, forcing optimization to debug level",
        ))
        .stdout(predicate::str::contains("-Og"))
        .stdout(predicate::str::contains("-O2").not());
}

#[cfg(not(windows))]
#[test]
fn test_build_msvc_off_windows_fails() {
    let tmp = temp_dir();
    write_project(
        tmp.path(),
        "[build]\ncompiler = \"msvc\"\n\n[sources]\nfiles = [\"main.cpp\"]\n",
        &["main.cpp"],
    );

    kestrel()
        .args(["build", "--no-exec"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "[kestrel] error: MSVC compiler is only supported on Windows",
        ));

    assert!(!tmp.path().join(".kestrel").exists());
}

#[test]
fn test_build_backtrack_finds_manifest() {
    let tmp = temp_dir();
    write_project(
        tmp.path(),
        "[build]\ncompiler = \"gcc\"\n\n[sources]\nfiles = [\"main.cpp\"]\n",
        &["main.cpp"],
    );
    let nested = tmp.path().join("deep/inside");
    fs::create_dir_all(&nested).unwrap();

    kestrel()
        .args(["build", "--no-exec"])
        .current_dir(&nested)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no Kestrel.toml found"));

    kestrel()
        .args(["build", "--no-exec", "--backtrack"])
        .current_dir(&nested)
        .assert()
        .success();
    assert!(tmp.path().join(".kestrel/build.ninja").is_file());
}

#[test]
fn test_build_unknown_profile() {
    let tmp = temp_dir();
    write_project(tmp.path(), "[profile.release]\noptimization = \"speed\"\n", &[]);

    kestrel()
        .args(["build", "--no-exec", "--profile", "fast"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown profile `fast`"))
        .stderr(predicate::str::contains("available profiles: release"));
}

#[test]
fn test_build_rejects_unknown_option() {
    let tmp = temp_dir();
    write_project(tmp.path(), "[options]\nwarn_al = true\n", &[]);

    kestrel()
        .args(["build", "--no-exec"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("[kestrel] error:"))
        .stderr(predicate::str::contains("unknown compile option `warn_al`"));

    assert!(!tmp.path().join(".kestrel").exists());
}

#[test]
fn test_build_warns_on_malformed_config() {
    let tmp = temp_dir();
    write_project(
        tmp.path(),
        "[build]\ncompiler = \"gcc\"\n\n[sources]\nfiles = [\"main.cpp\"]\n",
        &["main.cpp"],
    );
    fs::create_dir_all(tmp.path().join(".kestrel")).unwrap();
    fs::write(tmp.path().join(".kestrel/config.toml"), "[build\n").unwrap();

    kestrel()
        .args(["build", "--no-exec"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "[kestrel] warning: failed to load config, using defaults",
        ));
}

#[test]
fn test_build_emit_compile_commands() {
    let tmp = temp_dir();
    write_project(
        tmp.path(),
        "[build]\ncompiler = \"gcc\"\n\n[sources]\nfiles = [\"main.cpp\"]\n",
        &["main.cpp"],
    );

    kestrel()
        .args(["build", "--no-exec", "--emit-compile-commands"])
        .current_dir(tmp.path())
        .assert()
        .success();

    let json = fs::read_to_string(tmp.path().join("compile_commands.json")).unwrap();
    assert!(json.contains("\"file\": \"main.cpp\""));
}

#[test]
fn test_build_path_does_not_exist() {
    let tmp = temp_dir();

    kestrel()
        .args(["build", "--no-exec", "missing-dir"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("path does not exist"));
}

// ============================================================================
// kestrel clean
// ============================================================================

#[test]
fn test_clean_removes_generated_files() {
    let tmp = temp_dir();
    write_project(
        tmp.path(),
        "[build]\ncompiler = \"gcc\"\n\n[sources]\nfiles = [\"main.cpp\"]\n",
        &["main.cpp"],
    );

    kestrel()
        .args(["build", "--no-exec"])
        .current_dir(tmp.path())
        .assert()
        .success();
    assert!(tmp.path().join("build").exists());

    kestrel()
        .arg("clean")
        .current_dir(tmp.path())
        .assert()
        .success();

    assert!(!tmp.path().join("build").exists());
    assert!(!tmp.path().join(".kestrel/build.ninja").exists());
}

// ============================================================================
// kestrel flags
// ============================================================================

#[test]
fn test_flags_shows_translated_flags() {
    let tmp = temp_dir();
    write_project(
        tmp.path(),
        r#"
[build]
compiler = "gcc"
std = 20

[options]
warn_all = true

[paths]
include = ["include"]
defines = ["FAST=1"]
libs = ["m"]
"#,
        &[],
    );

    kestrel()
        .arg("flags")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("cxx = g++"))
        .stdout(predicate::str::contains("cflags = -Wall -Og -std=c++20"))
        .stdout(predicate::str::contains("-isystem include -DFAST=1"))
        .stdout(predicate::str::contains("lflags = -lm"));
}

#[test]
fn test_flags_link_only() {
    let tmp = temp_dir();
    write_project(tmp.path(), "[build]\ncompiler = \"clang\"\n", &[]);

    kestrel()
        .args(["flags", "--link"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("cflags").not());
}

// ============================================================================
// kestrel --help
// ============================================================================

#[test]
fn test_help() {
    kestrel()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("clean"))
        .stdout(predicate::str::contains("flags"));
}
