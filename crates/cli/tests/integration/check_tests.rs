//! Tests for `bp2build check`.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn empty_output_is_out_of_date() {
  let env = TestEnv::new();

  env
    .cmd("check", "bp2build")
    .assert()
    .failure()
    .stdout(predicate::str::contains("bp2build/foo/BUILD.bazel"))
    .stderr(predicate::str::contains("out of date"));
}

#[test]
fn freshly_generated_tree_is_up_to_date() {
  let env = TestEnv::new();
  env.cmd("generate", "queryview").assert().success();

  env
    .cmd("check", "queryview")
    .assert()
    .success()
    .stdout(predicate::str::contains("queryview tree is up to date"));
}

#[test]
fn check_does_not_write() {
  let env = TestEnv::new();

  env.cmd("check", "bp2build").assert().failure();

  assert!(!env.out_root().exists());
}

#[test]
fn edited_and_stale_files_are_reported() {
  let env = TestEnv::new();
  env.cmd("generate", "bp2build").assert().success();
  std::fs::write(env.out_root().join("bp2build/foo/BUILD.bazel"), "edited\n").unwrap();
  std::fs::create_dir_all(env.out_root().join("bp2build/old")).unwrap();
  std::fs::write(env.out_root().join("bp2build/old/BUILD.bazel"), "").unwrap();

  let output = env.cmd("check", "bp2build").arg("--json").output().unwrap();
  assert!(!output.status.success());

  let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(report["up_to_date"], false);
  assert_eq!(report["build"]["changed"], serde_json::json!(["foo/BUILD.bazel"]));
  assert_eq!(report["build"]["stale"], serde_json::json!(["old/BUILD.bazel"]));
  assert_eq!(report["injection"]["missing"], serde_json::json!([]));
}
