//! One conversion run, end to end.
//!
//! ```text
//! ModuleGraph -> Targets -> Packages (canonical) -> OutputFiles
//!                                   CompatLayer -> injection OutputFiles
//! ```
//!
//! No I/O happens here: the caller loads the graph, the config and handcrafted
//! contents, and writes the result.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;

use crate::alias::CompatLayer;
use crate::error::ConvertError;
use crate::module::ModuleGraph;
use crate::plan::injection::injection_files;
use crate::plan::{CodegenMode, OutputFile, PlanContext, SkipPolicy, ensure_unique};
use crate::toolchain::ToolchainValue;
use crate::util::hash::{ContentHash, hash_entries};

/// Directory name, under the output root, of the injection files.
pub const INJECTION_DIR: &str = "injection";

/// Everything besides the module graph that a run reads.
pub struct ConversionInput<'a> {
  pub mode: CodegenMode,
  pub compat: &'a CompatLayer,
  pub toolchain_vars: &'a BTreeMap<String, ToolchainValue>,
  /// Directory to content of its checked-in build file.
  pub handcrafted: &'a BTreeMap<String, String>,
  pub skip: &'a dyn SkipPolicy,
}

/// The planned output of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionOutput {
  pub mode: CodegenMode,
  /// Files of the build tree, relative to its root.
  pub files: Vec<OutputFile>,
  /// Files of the injection tree, relative to its root.
  pub injection: Vec<OutputFile>,
  /// Directories that kept their existing configuration.
  pub skipped: Vec<String>,
}

impl ConversionOutput {
  /// Digest of both trees, laid out as `<mode>/...` and `injection/...`.
  pub fn digest(&self) -> ContentHash {
    let build = self.files.iter().map(|f| {
      (
        format!("{}/{}", self.mode, f.relative_path().display()),
        f.contents.as_str(),
      )
    });
    let injection = self.injection.iter().map(|f| {
      (
        format!("{}/{}", INJECTION_DIR, f.relative_path().display()),
        f.contents.as_str(),
      )
    });
    hash_entries(build.chain(injection))
  }
}

/// Run one conversion.
///
/// # Errors
///
/// Any schema error, naming collision, unresolvable dependency or duplicate
/// output path aborts the run; no partial output is returned.
pub fn convert(graph: &ModuleGraph, input: &ConversionInput<'_>) -> Result<ConversionOutput, ConvertError> {
  let ctx = PlanContext {
    graph,
    handcrafted: input.handcrafted,
    skip: input.skip,
  };
  let plan = input.mode.plan_files(&ctx)?;
  ensure_unique(&plan.files)?;

  let injection = injection_files(input.compat, input.toolchain_vars);
  ensure_unique(&injection)?;

  info!(
    mode = %input.mode,
    modules = graph.modules.len(),
    files = plan.files.len(),
    injection = injection.len(),
    skipped = plan.skipped.len(),
    aliases = input.compat.len(),
    "conversion planned"
  );

  Ok(ConversionOutput {
    mode: input.mode,
    files: plan.files,
    injection,
    skipped: plan.skipped,
  })
}
