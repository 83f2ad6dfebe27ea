//! Files injected next to the build tree in both modes.

use std::collections::BTreeMap;

use super::OutputFile;
use crate::alias::CompatLayer;
use crate::consts::{
  ALIAS_DIR, DEFAULT_VISIBILITY, GENERATED_BUILD_FILE_NAME, TOOLCHAIN_CONSTANTS_FILE_NAME, TOOLCHAIN_DIR,
};
use crate::render::{assemble_file, render_target};
use crate::toolchain::{ToolchainValue, toolchain_constants_bzl};

/// The toolchain package (an empty marker and `constants.bzl`) and the
/// name-to-label alias package, in that order.
pub fn injection_files(compat: &CompatLayer, toolchain_vars: &BTreeMap<String, ToolchainValue>) -> Vec<OutputFile> {
  vec![
    OutputFile::new(TOOLCHAIN_DIR, GENERATED_BUILD_FILE_NAME, ""),
    OutputFile::new(
      TOOLCHAIN_DIR,
      TOOLCHAIN_CONSTANTS_FILE_NAME,
      toolchain_constants_bzl(toolchain_vars),
    ),
    OutputFile::new(ALIAS_DIR, GENERATED_BUILD_FILE_NAME, alias_package(compat)),
  ]
}

fn alias_package(compat: &CompatLayer) -> String {
  let targets = compat
    .alias_targets()
    .iter()
    .map(render_target)
    .collect::<Vec<_>>()
    .join("\n\n");
  assemble_file(&[DEFAULT_VISIBILITY, &targets])
}
