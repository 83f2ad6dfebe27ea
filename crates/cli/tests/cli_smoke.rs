//! CLI smoke tests for bp2build.
//!
//! These tests verify that the commands parse their arguments and return
//! appropriate exit codes.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

/// Get a Command for the bp2build binary.
fn bp2build_cmd() -> Command {
  cargo_bin_cmd!("bp2build")
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_works() {
  bp2build_cmd()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage"));
}

#[test]
fn version_flag_works() {
  bp2build_cmd()
    .arg("--version")
    .assert()
    .success()
    .stdout(predicate::str::contains("bp2build"));
}

#[test]
fn subcommand_help_works() {
  for cmd in &["generate", "check"] {
    bp2build_cmd()
      .arg(cmd)
      .arg("--help")
      .assert()
      .success()
      .stdout(predicate::str::contains("--graph"));
  }
}

// =============================================================================
// Argument errors
// =============================================================================

#[test]
fn missing_subcommand_fails() {
  bp2build_cmd().assert().failure();
}

#[test]
fn graph_is_required() {
  bp2build_cmd()
    .arg("generate")
    .assert()
    .failure()
    .stderr(predicate::str::contains("--graph"));
}

#[test]
fn unknown_mode_is_rejected() {
  bp2build_cmd()
    .args(["generate", "--graph", "g.json", "--mode", "soong"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid value"));
}
