//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;
use walkdir::WalkDir;

/// Get path to a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

/// Isolated test environment.
///
/// Each test gets its own source tree and output root inside one temporary directory.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  /// Write a file relative to the source tree.
  pub fn write_src(&self, relative_path: &str, content: &str) {
    let path = self.src_root().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  pub fn src_root(&self) -> PathBuf {
    self.temp.path().join("src")
  }

  pub fn out_root(&self) -> PathBuf {
    self.temp.path().join("out")
  }

  /// Read a generated file relative to the output root.
  pub fn read_out(&self, relative_path: &str) -> String {
    let path = self.out_root().join(relative_path);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
  }

  pub fn out_exists(&self, relative_path: &str) -> bool {
    self.out_root().join(relative_path).exists()
  }

  /// A `bp2build <subcommand>` invocation over the fixture graph and config.
  pub fn cmd(&self, subcommand: &str, mode: &str) -> Command {
    let mut cmd = bp2build_cmd();
    cmd
      .arg(subcommand)
      .arg("--graph")
      .arg(fixture_path("graph.json"))
      .arg("--config")
      .arg(fixture_path("config.json"))
      .arg("--mode")
      .arg(mode)
      .arg("--out")
      .arg(self.out_root())
      .arg("--src-root")
      .arg(self.src_root());
    cmd
  }
}

pub fn bp2build_cmd() -> Command {
  cargo_bin_cmd!("bp2build")
}

/// Every file under `root`, relative and sorted.
pub fn list_files(root: &Path) -> Vec<String> {
  let mut files: Vec<String> = WalkDir::new(root)
    .sort_by_file_name()
    .into_iter()
    .map(|entry| entry.unwrap())
    .filter(|entry| entry.file_type().is_file())
    .map(|entry| entry.path().strip_prefix(root).unwrap().display().to_string())
    .collect();
  files.sort();
  files
}
