//! Implementation of the `bp2build check` command.
//!
//! Plans a conversion and compares it with the trees on disk without writing
//! anything. The tree is out of date when a planned file is missing or differs,
//! or when a file that would no longer be generated is still present.

use anyhow::{Context, Result};
use serde::Serialize;

use bp2build_lib::convert::INJECTION_DIR;
use bp2build_lib::output::{CheckReport, check_files};
use bp2build_lib::plan::CodegenMode;

use super::run_conversion;
use crate::InputArgs;
use crate::output::{OutputFormat, print_json, print_path_change, print_success, print_warning, symbols};

#[derive(Debug, Serialize)]
struct CheckSummary {
  mode: CodegenMode,
  up_to_date: bool,
  build: CheckReport,
  injection: CheckReport,
}

/// Returns whether both trees are up to date.
pub fn cmd_check(inputs: &InputArgs, output: OutputFormat) -> Result<bool> {
  let result = run_conversion(inputs)?;

  let build_root = inputs.out.join(result.mode.as_str());
  let injection_root = inputs.out.join(INJECTION_DIR);
  let build =
    check_files(&build_root, &result.files).with_context(|| format!("Failed to check {}", build_root.display()))?;
  let injection = check_files(&injection_root, &result.injection)
    .with_context(|| format!("Failed to check {}", injection_root.display()))?;

  let summary = CheckSummary {
    mode: result.mode,
    up_to_date: build.is_up_to_date() && injection.is_up_to_date(),
    build,
    injection,
  };

  if output.is_json() {
    print_json(&summary)?;
    return Ok(summary.up_to_date);
  }

  if summary.up_to_date {
    print_success(&format!(
      "{} tree is up to date ({} file(s))",
      summary.mode,
      summary.build.unchanged.len() + summary.injection.unchanged.len()
    ));
    return Ok(true);
  }

  for (prefix, report) in [(result.mode.as_str(), &summary.build), (INJECTION_DIR, &summary.injection)] {
    for path in &report.missing {
      print_path_change(symbols::ADD, &format!("{}/{}", prefix, path.display()));
    }
    for path in &report.changed {
      print_path_change(symbols::MODIFY, &format!("{}/{}", prefix, path.display()));
    }
    for path in &report.stale {
      print_path_change(symbols::REMOVE, &format!("{}/{}", prefix, path.display()));
    }
  }
  let out_of_date = [&summary.build, &summary.injection]
    .iter()
    .map(|r| r.missing.len() + r.changed.len() + r.stale.len())
    .sum::<usize>();
  print_warning(&format!(
    "{} file(s) out of date, run `bp2build generate` to update",
    out_of_date
  ));

  Ok(false)
}
