//! Integration tests for the `glinet` CLI binary.
//!
//! These cover argument parsing, help output, shell completions, config
//! inspection and error exit codes, all without a reachable router.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `glinet` binary with env isolation.
///
/// Clears all `GLINET_*` env vars and points config directories at a
/// temporary path so tests never touch the user's real configuration.
fn glinet_cmd(home: &std::path::Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("glinet");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG")
        .env_remove("GLINET_PROFILE")
        .env_remove("GLINET_HOST")
        .env_remove("GLINET_USERNAME")
        .env_remove("GLINET_PASSWORD")
        .env_remove("GLINET_OUTPUT")
        .env_remove("GLINET_INSECURE")
        .env_remove("GLINET_TIMEOUT");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = glinet_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = tempfile::tempdir().unwrap();
    glinet_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("GL-iNet")
            .and(predicate::str::contains("clients"))
            .and(predicate::str::contains("wireguard"))
            .and(predicate::str::contains("watch")),
    );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    glinet_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("glinet"));
}

#[test]
fn test_unknown_subcommand_is_usage_error() {
    let home = tempfile::tempdir().unwrap();
    glinet_cmd(home.path())
        .arg("frobnicate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_wifi_enable_requires_interface() {
    let home = tempfile::tempdir().unwrap();
    glinet_cmd(home.path())
        .args(["wifi", "enable"])
        .assert()
        .code(2);
}

#[test]
fn test_wireguard_peer_must_be_numeric() {
    let home = tempfile::tempdir().unwrap();
    glinet_cmd(home.path())
        .args(["wireguard", "start", "office"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid value"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    glinet_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("glinet"));
}

#[test]
fn test_completions_zsh() {
    let home = tempfile::tempdir().unwrap();
    glinet_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Config commands ─────────────────────────────────────────────────

#[test]
fn test_config_path_points_at_config_toml() {
    let home = tempfile::tempdir().unwrap();
    glinet_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_defaults_without_file() {
    let home = tempfile::tempdir().unwrap();
    glinet_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("[defaults]")
                .and(predicate::str::contains("consider_home = 180")),
        );
}

#[test]
fn test_config_show_json() {
    let home = tempfile::tempdir().unwrap();
    let output = glinet_cmd(home.path())
        .args(["config", "show", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["defaults"]["timeout"], 30);
}

#[test]
fn test_config_use_unknown_profile() {
    let home = tempfile::tempdir().unwrap();
    glinet_cmd(home.path())
        .args(["config", "use", "office"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("office"));
}

// ── Router commands without a router ────────────────────────────────

#[test]
fn test_unknown_profile_exits_not_found() {
    let home = tempfile::tempdir().unwrap();
    glinet_cmd(home.path())
        .args(["--profile", "office", "status"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("office"));
}

#[test]
fn test_bad_host_scheme_is_usage_error() {
    let home = tempfile::tempdir().unwrap();
    glinet_cmd(home.path())
        .env("GLINET_PASSWORD", "goodlife")
        .args(["--host", "ftp://192.168.8.1", "status"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("scheme"));
}
