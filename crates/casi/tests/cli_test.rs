//! Integration tests for the `casi` CLI binary.
//!
//! These validate argument parsing, help output, shell completions, and
//! error handling -- all without touching the booking service.
#![allow(clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `casi` binary with env isolation.
///
/// Clears all `CASI_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn casi_cmd() -> Command {
    let mut cmd = Command::cargo_bin("casi").unwrap();
    cmd.env("HOME", "/tmp/casi-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/casi-cli-test-nonexistent")
        .env("XDG_CACHE_HOME", "/tmp/casi-cli-test-nonexistent")
        .env_remove("CASI_PROFILE")
        .env_remove("CASI_BASE_URL")
        .env_remove("CASI_OUTPUT")
        .env_remove("CASI_TIMEOUT")
        .env_remove("CASI_CACHE_DIR")
        .env_remove("CASI_USERNAME")
        .env_remove("CASI_PASSWORD")
        .env_remove("CASI_API_KEY");
    cmd
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    casi_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("car-sharing")
            .and(predicate::str::contains("data"))
            .and(predicate::str::contains("refresh"))
            .and(predicate::str::contains("stats")),
    );
}

#[test]
fn test_version_flag() {
    casi_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("casi"));
}

#[test]
fn test_no_args_without_terminal_is_a_usage_error() {
    // The interactive menu refuses to run without a tty.
    let assert = casi_cmd().assert().failure();
    let output = assert.get_output();
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("terminal"),
        "expected terminal hint in stderr:\n{stderr}"
    );
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    casi_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    casi_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("casi"));
}

// ── Config commands ─────────────────────────────────────────────────

#[test]
fn test_config_path_prints_a_path() {
    casi_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_reports_active_profile() {
    casi_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("active profile: default"));
}

// ── Range validation ────────────────────────────────────────────────

#[test]
fn test_data_rejects_malformed_date() {
    casi_cmd()
        .args(["data", "--from", "not-a-date", "--to", "2024-06-01"])
        .env("CASI_USERNAME", "driver")
        .env("CASI_PASSWORD", "hunter2")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("invalid date"));
}

#[test]
fn test_data_rejects_lone_bound() {
    casi_cmd()
        .args(["data", "--from", "2024-01-01"])
        .env("CASI_USERNAME", "driver")
        .env("CASI_PASSWORD", "hunter2")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("together"));
}

#[test]
fn test_stats_rejects_inverted_range() {
    casi_cmd()
        .args(["stats", "--from", "2024-06-01", "--to", "2024-01-01"])
        .env("CASI_USERNAME", "driver")
        .env("CASI_PASSWORD", "hunter2")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("before end"));
}

// ── Global flags ────────────────────────────────────────────────────

#[test]
fn test_bad_base_url_is_a_usage_error() {
    casi_cmd()
        .args(["data", "--base-url", "not a url"])
        .env("CASI_USERNAME", "driver")
        .env("CASI_PASSWORD", "hunter2")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("invalid URL"));
}

#[test]
fn test_unknown_subcommand_fails() {
    casi_cmd().arg("frobnicate").assert().failure();
}
