//! Implementation of the `bp2build generate` command.
//!
//! Runs one conversion and writes the build tree to `<out>/<mode>` and the
//! injection files to `<out>/injection`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use bp2build_lib::convert::INJECTION_DIR;
use bp2build_lib::output::{clean_dir, write_files};
use bp2build_lib::plan::CodegenMode;

use super::run_conversion;
use crate::InputArgs;
use crate::output::{OutputFormat, print_info, print_json, print_stat, print_success, truncate_hash};

#[derive(Debug, Serialize)]
struct GenerateSummary {
  mode: CodegenMode,
  build_root: PathBuf,
  injection_root: PathBuf,
  files: usize,
  injection_files: usize,
  skipped: Vec<String>,
  digest: String,
}

pub fn cmd_generate(inputs: &InputArgs, clean: bool, output: OutputFormat) -> Result<()> {
  let result = run_conversion(inputs)?;

  let build_root = inputs.out.join(result.mode.as_str());
  let injection_root = inputs.out.join(INJECTION_DIR);

  if clean {
    for root in [&build_root, &injection_root] {
      clean_dir(root).with_context(|| format!("Failed to clean {}", root.display()))?;
    }
  }

  let files = write_files(&build_root, &result.files)
    .with_context(|| format!("Failed to write build files to {}", build_root.display()))?;
  let injection_files = write_files(&injection_root, &result.injection)
    .with_context(|| format!("Failed to write injection files to {}", injection_root.display()))?;

  let summary = GenerateSummary {
    mode: result.mode,
    build_root,
    injection_root,
    files,
    injection_files,
    skipped: result.skipped.clone(),
    digest: result.digest().0,
  };

  if output.is_json() {
    print_json(&summary)?;
    return Ok(());
  }

  print_success(&format!(
    "Generated {} {} file(s) in {}",
    summary.files,
    summary.mode,
    summary.build_root.display()
  ));
  print_stat("Injection files", &summary.injection_files.to_string());
  print_stat("Injection root", &summary.injection_root.display().to_string());
  print_stat("Digest", truncate_hash(&summary.digest));
  for dir in &summary.skipped {
    print_info(&format!("Kept existing configuration in {}", display_dir(dir)));
  }

  Ok(())
}

fn display_dir(dir: &str) -> &str {
  if dir.is_empty() { "<root>" } else { dir }
}
