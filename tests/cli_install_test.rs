//! Integration tests for the dialsvc binary surface.
//!
//! These drive the built executable: help/version output, exit codes, the
//! JSON error shape, the non-Windows fail-fast, and the setup log.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a Command for the dialsvc binary with the setup log redirected into
/// a temp directory.
fn dialsvc_in(dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_dialsvc"));
    cmd.env("DIALSVC_SETUP_LOG", dir.path().join("setup.log"));
    cmd
}

// === Surface ===

#[test]
fn test_no_args_is_an_error() {
    let temp = TempDir::new().unwrap();

    dialsvc_in(&temp).assert().failure();
}

#[test]
fn test_help_lists_subcommands() {
    let temp = TempDir::new().unwrap();

    dialsvc_in(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("remove"))
        .stdout(predicate::str::contains("start"))
        .stdout(predicate::str::contains("dialer"));
}

#[test]
fn test_dialer_help_lists_subcommands() {
    let temp = TempDir::new().unwrap();

    dialsvc_in(&temp)
        .args(["dialer", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("register"))
        .stdout(predicate::str::contains("unregister"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn test_version_prints_package_version() {
    let temp = TempDir::new().unwrap();

    dialsvc_in(&temp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

// === Non-Windows fail-fast ===

#[cfg(not(windows))]
#[test]
fn test_dialer_status_fails_off_windows() {
    let temp = TempDir::new().unwrap();

    dialsvc_in(&temp)
        .args(["dialer", "status", "--path", r"C:\dialsvc\dialer.dll"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("unavailable on this platform"));
}

#[cfg(not(windows))]
#[test]
fn test_install_fails_off_windows() {
    let temp = TempDir::new().unwrap();

    dialsvc_in(&temp)
        .arg("install")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unavailable on this platform"));
}

#[cfg(not(windows))]
#[test]
fn test_json_error_shape() {
    let temp = TempDir::new().unwrap();

    dialsvc_in(&temp)
        .args(["--json", "dialer", "status"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(r#"{"error": ""#));
}

// === Setup log ===

#[test]
fn test_invocation_is_appended_to_setup_log() {
    let temp = TempDir::new().unwrap();

    // Outcome is platform-dependent; the log line is written either way.
    dialsvc_in(&temp)
        .args(["dialer", "status", "--path", r"C:\dialsvc\dialer.dll"])
        .assert();

    let contents = std::fs::read_to_string(temp.path().join("setup.log")).unwrap();
    assert!(contents.contains("\"command\":\"dialer status\""));
    assert!(contents.contains("\"duration_ms\""));
}

#[test]
fn test_setup_log_accumulates_invocations() {
    let temp = TempDir::new().unwrap();

    dialsvc_in(&temp).args(["dialer", "status"]).assert();
    dialsvc_in(&temp).args(["dialer", "unregister"]).assert();

    let contents = std::fs::read_to_string(temp.path().join("setup.log")).unwrap();
    assert_eq!(contents.lines().count(), 2);
    assert!(contents.contains("\"command\":\"dialer unregister\""));
}
