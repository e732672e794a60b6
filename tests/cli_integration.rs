//! CLI integration tests for Gangway.
//!
//! These tests verify the CLI surface: argument handling, the flags view
//! over installed dependency metadata, and the hidden resource-compiler
//! shim entry point.

use std::fs;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the gangway binary command.
fn gangway() -> Command {
    Command::cargo_bin("gangway").unwrap()
}

/// Create a temporary directory for test projects.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

// ============================================================================
// gangway --help
// ============================================================================

#[test]
fn test_help_lists_commands() {
    gangway()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("flags"));
}

#[test]
fn test_hidden_shim_is_not_advertised() {
    gangway()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("rc-shim").not());
}

#[test]
fn test_unknown_command_fails() {
    gangway().arg("frobnicate").assert().failure();
}

// ============================================================================
// gangway flags
// ============================================================================

#[test]
fn test_flags_with_no_dependencies() {
    let tmp = temp_dir();

    gangway()
        .arg("flags")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Cflags:"))
        .stdout(predicate::str::contains("Libs:"));
}

#[test]
fn test_flags_resolves_pc_metadata() {
    let tmp = temp_dir();
    let deps = tmp.path().join("gangway_modules");
    fs::create_dir_all(&deps).unwrap();
    fs::write(
        deps.join("foo.pc"),
        "prefix=/usr\n\
         includedir=${prefix}/include\n\
         Cflags: -I${includedir}\n\
         Libs: -L${prefix}/lib -lfoo\n",
    )
    .unwrap();

    gangway()
        .arg("flags")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("-I/usr/include"))
        .stdout(predicate::str::contains("-L/usr/lib"))
        .stdout(predicate::str::contains("-lfoo"));
}

#[test]
fn test_flags_strict_rejects_unresolved_reference() {
    let tmp = temp_dir();
    let deps = tmp.path().join("gangway_modules");
    fs::create_dir_all(&deps).unwrap();
    fs::write(deps.join("bad.pc"), "Cflags: -I${nowhere}\n").unwrap();

    gangway()
        .args(["flags", "--strict"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unresolved variable"));

    // The permissive default tolerates the same file.
    gangway()
        .arg("flags")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("${nowhere}"));
}

// ============================================================================
// gangway rc-shim (hidden)
// ============================================================================

#[cfg(unix)]
#[test]
fn test_rc_shim_propagates_backend_exit_code() {
    // `true` accepts the translated invocation and exits zero.
    gangway()
        .args(["rc-shim", "true", "-DFOO=1", "in.rc"])
        .assert()
        .success();

    gangway()
        .args(["rc-shim", "false", "-DFOO=1", "in.rc"])
        .assert()
        .failure();
}

// ============================================================================
// gangway completions
// ============================================================================

#[test]
fn test_completions_generate() {
    gangway()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gangway"));
}
