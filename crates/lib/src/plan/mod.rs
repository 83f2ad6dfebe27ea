//! Output file planning.
//!
//! The two conversion modes share the target and package model but have
//! independent output contracts, so each owns its planner:
//!
//! - [`queryview`] - schema mirror for `bazel query`: scaffolding, rule shims,
//!   the module loader, and one package file per directory
//! - [`bp2build`] - real build files, coexisting with handcrafted ones and
//!   honoring the keep-existing skip policy
//!
//! [`injection`] plans the files written next to either tree: toolchain
//! constants and the name-to-label aliases.

pub mod bp2build;
pub mod injection;
pub mod queryview;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::ConvertError;
use crate::module::ModuleGraph;

/// One file of the output set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputFile {
  /// Directory relative to the output root, `""` for the root.
  pub dir: String,
  pub basename: String,
  pub contents: String,
}

impl OutputFile {
  pub fn new(dir: &str, basename: &str, contents: impl Into<String>) -> Self {
    Self {
      dir: dir.to_string(),
      basename: basename.to_string(),
      contents: contents.into(),
    }
  }

  pub fn relative_path(&self) -> PathBuf {
    Path::new(&self.dir).join(&self.basename)
  }
}

/// Fail if two files share a path.
pub fn ensure_unique(files: &[OutputFile]) -> Result<(), ConvertError> {
  let mut seen = BTreeSet::new();
  for file in files {
    let path = file.relative_path();
    if !seen.insert(path.clone()) {
      return Err(ConvertError::DuplicateOutput {
        path: path.display().to_string(),
      });
    }
  }
  Ok(())
}

/// Decides which directories keep their existing, checked-in configuration.
///
/// Only consulted in bp2build mode.
pub trait SkipPolicy {
  fn should_keep_existing(&self, dir: &str) -> bool;
}

impl<F: Fn(&str) -> bool> SkipPolicy for F {
  fn should_keep_existing(&self, dir: &str) -> bool {
    self(dir)
  }
}

/// Directories whose build files are kept, each optionally covering its whole subtree.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct KeepExistingDirs {
  /// Directory to "applies to subdirectories too".
  dirs: BTreeMap<String, bool>,
}

impl KeepExistingDirs {
  pub fn new(dirs: BTreeMap<String, bool>) -> Self {
    Self { dirs }
  }
}

impl SkipPolicy for KeepExistingDirs {
  fn should_keep_existing(&self, dir: &str) -> bool {
    if self.dirs.contains_key(dir) {
      return true;
    }
    if self.dirs.get("") == Some(&true) {
      return true;
    }
    let mut ancestor = dir;
    while let Some((parent, _)) = ancestor.rsplit_once('/') {
      if self.dirs.get(parent) == Some(&true) {
        return true;
      }
      ancestor = parent;
    }
    false
  }
}

/// Everything a planner reads.
pub struct PlanContext<'a> {
  pub graph: &'a ModuleGraph,
  /// Directory to content of its checked-in build file.
  pub handcrafted: &'a BTreeMap<String, String>,
  pub skip: &'a dyn SkipPolicy,
}

/// Files planned for the build tree by one mode.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildPlan {
  pub files: Vec<OutputFile>,
  /// Directories left to their existing configuration, sorted.
  pub skipped: Vec<String>,
}

/// The conversion mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CodegenMode {
  /// Introspection: mirror the module schema for `bazel query`.
  QueryView,
  /// Real build: generate build files Bazel can execute.
  Bp2Build,
}

impl CodegenMode {
  pub fn as_str(self) -> &'static str {
    match self {
      CodegenMode::QueryView => "queryview",
      CodegenMode::Bp2Build => "bp2build",
    }
  }

  pub fn plan_files(self, ctx: &PlanContext<'_>) -> Result<BuildPlan, ConvertError> {
    match self {
      CodegenMode::QueryView => queryview::plan_files(ctx),
      CodegenMode::Bp2Build => bp2build::plan_files(ctx),
    }
  }
}

impl fmt::Display for CodegenMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}
