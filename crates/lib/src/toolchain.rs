//! Toolchain constants exported to Bazel.
//!
//! Toolchain variables (flags, paths) computed by the module system are written
//! to `cc_toolchain/constants.bzl` so Bazel toolchain definitions can read the
//! exact same values.

use std::collections::BTreeMap;
use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::render::pretty_print;
use crate::target::AttributeValue;

const CONSTANTS_HEADER: &str = "# GENERATED FOR BAZEL FROM BP2BUILD. DO NOT EDIT.\n";

/// A toolchain variable value as written in the conversion config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolchainValue {
  String(String),
  List(Vec<String>),
}

impl ToolchainValue {
  fn to_attribute(&self) -> AttributeValue {
    match self {
      ToolchainValue::String(s) => AttributeValue::from(s.as_str()),
      ToolchainValue::List(items) => AttributeValue::string_list(items),
    }
  }
}

/// Render `constants.bzl`: one private binding per variable, then a `constants`
/// struct exposing them, all in sorted order.
pub fn toolchain_constants_bzl(vars: &BTreeMap<String, ToolchainValue>) -> String {
  let mut out = String::from(CONSTANTS_HEADER);
  out.push('\n');
  for (name, value) in vars {
    let _ = writeln!(out, "_{} = {}", name, pretty_print(&value.to_attribute(), 0));
    out.push('\n');
  }
  out.push_str("constants = struct(\n");
  for name in vars.keys() {
    let _ = writeln!(out, "    {} = _{},", name, name);
  }
  out.push_str(")\n");
  out
}
