//! Tests for `bp2build generate`.

use predicates::prelude::*;

use super::common::{TestEnv, bp2build_cmd, fixture_path, list_files};

const HANDCRAFTED_BAR: &str = "exports_files([\"bar.h\"])\n";

#[test]
fn bp2build_writes_expected_tree() {
  let env = TestEnv::new();
  env.write_src("bar/BUILD", HANDCRAFTED_BAR);

  env
    .cmd("generate", "bp2build")
    .assert()
    .success()
    .stdout(predicate::str::contains("Generated 2 bp2build file(s)"))
    .stdout(predicate::str::contains("Kept existing configuration in external/zlib"));

  assert_eq!(
    list_files(&env.out_root()),
    vec![
      "bp2build/bar/BUILD.bazel",
      "bp2build/foo/BUILD.bazel",
      "injection/cc_toolchain/BUILD.bazel",
      "injection/cc_toolchain/constants.bzl",
      "injection/module_name_to_label/BUILD.bazel",
    ]
  );
}

#[test]
fn bp2build_package_file_contents() {
  let env = TestEnv::new();
  env.cmd("generate", "bp2build").assert().success();

  assert_eq!(
    env.read_out("bp2build/foo/BUILD.bazel"),
    r#"# READ THIS FIRST:
# This file was automatically generated by bp2build for the Bazel migration project.
# Feel free to edit or test it, but do *not* check it into your version control system.
package(default_visibility = ["//visibility:public"])
load("//build/bazel/rules:cc_library.bzl", "cc_library")
load("//build/bazel/rules:cc_test.bzl", "cc_test_")

cc_test_(
    name = "foo_test",
    srcs = ["foo_test.cc"],
)

cc_library(
    name = "libfoo",
    srcs = [
        "a.cc",
        "b.cc",
    ],
)
"#
  );
}

#[test]
fn handcrafted_content_is_merged_not_clobbered() {
  let env = TestEnv::new();
  env.write_src("bar/BUILD", HANDCRAFTED_BAR);

  env.cmd("generate", "bp2build").assert().success();

  let bar = env.read_out("bp2build/bar/BUILD.bazel");
  assert!(bar.contains("name = \"libbar\""));
  assert!(bar.contains("# Section: Handcrafted targets."));
  assert!(bar.ends_with(HANDCRAFTED_BAR));
  assert!(!bar.contains("//visibility:public"));
}

#[test]
fn missing_handcrafted_file_is_tolerated() {
  let env = TestEnv::new();

  env.cmd("generate", "bp2build").assert().success();

  assert!(env.read_out("bp2build/bar/BUILD.bazel").contains("//visibility:public"));
}

#[test]
fn injection_files_are_written() {
  let env = TestEnv::new();
  env.cmd("generate", "bp2build").assert().success();

  let aliases = env.read_out("injection/module_name_to_label/BUILD.bazel");
  assert!(aliases.contains("actual = \"@//foo:libfoo\""));
  assert!(aliases.contains("actual = \"@//external/zlib:libz\""));

  let constants = env.read_out("injection/cc_toolchain/constants.bzl");
  assert!(constants.contains("_ClangVersion = \"r450784\""));
  assert!(constants.contains("    ArmCflags = _ArmCflags,"));
}

#[test]
fn queryview_writes_scaffolding_and_variant_targets() {
  let env = TestEnv::new();

  env.cmd("generate", "queryview").assert().success();

  for path in [
    "queryview/WORKSPACE",
    "queryview/BUILD.bazel",
    "queryview/build/bazel/queryview_rules/BUILD.bazel",
    "queryview/build/bazel/queryview_rules/providers.bzl",
    "queryview/build/bazel/queryview_rules/module.bzl",
    "queryview/build/bazel/queryview_rules/cc_library.bzl",
    "queryview/build/bazel/queryview_rules/cc_test_.bzl",
    "queryview/build/bazel/queryview_rules/genrule.bzl",
    "queryview/gen/BUILD.bazel",
    "queryview/external/zlib/BUILD.bazel",
  ] {
    assert!(env.out_exists(path), "missing {}", path);
  }

  let foo = env.read_out("queryview/foo/BUILD.bazel");
  assert!(foo.starts_with("package(default_visibility = [\"//visibility:public\"])\n"));
  assert!(foo.contains("name = \"foo_test__android_arm64\""));
  assert!(foo.contains("module_deps = [\"//foo:libfoo__android_arm64\"]"));
  assert!(!foo.contains("installable"));
}

#[test]
fn generate_is_deterministic() {
  let first = TestEnv::new();
  let second = TestEnv::new();

  let a = first.cmd("generate", "bp2build").arg("--json").output().unwrap();
  let b = second.cmd("generate", "bp2build").arg("--json").output().unwrap();

  let a: serde_json::Value = serde_json::from_slice(&a.stdout).unwrap();
  let b: serde_json::Value = serde_json::from_slice(&b.stdout).unwrap();
  assert_eq!(a["digest"], b["digest"]);
  assert_eq!(
    first.read_out("bp2build/foo/BUILD.bazel"),
    second.read_out("bp2build/foo/BUILD.bazel")
  );
}

#[test]
fn json_summary() {
  let env = TestEnv::new();

  let output = env.cmd("generate", "bp2build").arg("--json").output().unwrap();
  assert!(output.status.success());

  let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(summary["mode"], "bp2build");
  assert_eq!(summary["files"], 2);
  assert_eq!(summary["injection_files"], 3);
  assert_eq!(summary["skipped"], serde_json::json!(["external/zlib"]));
  assert_eq!(summary["digest"].as_str().unwrap().len(), 64);
}

#[test]
fn clean_removes_stale_files() {
  let env = TestEnv::new();
  std::fs::create_dir_all(env.out_root().join("bp2build/old")).unwrap();
  std::fs::write(env.out_root().join("bp2build/old/BUILD.bazel"), "").unwrap();

  env.cmd("generate", "bp2build").arg("--clean").assert().success();

  assert!(!env.out_exists("bp2build/old/BUILD.bazel"));
  assert!(env.out_exists("bp2build/foo/BUILD.bazel"));
}

#[test]
fn missing_graph_fails() {
  let env = TestEnv::new();

  bp2build_cmd()
    .arg("generate")
    .arg("--graph")
    .arg(env.temp.path().join("nope.json"))
    .arg("--out")
    .arg(env.out_root())
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to load module graph"));
}

#[test]
fn invalid_alias_label_fails_without_writing() {
  let env = TestEnv::new();
  let config = env.temp.path().join("bad.json");
  std::fs::write(&config, r#"{ "name_to_label": [{ "name": "libfoo", "label": "foo:libfoo" }] }"#).unwrap();

  bp2build_cmd()
    .arg("generate")
    .arg("--graph")
    .arg(fixture_path("graph.json"))
    .arg("--config")
    .arg(&config)
    .arg("--out")
    .arg(env.out_root())
    .assert()
    .failure()
    .stderr(predicate::str::contains("foo:libfoo"));

  assert!(!env.out_root().exists());
}
