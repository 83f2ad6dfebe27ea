//! Starlark rendering of targets and packages.
//!
//! Output is a pure function of the canonical [`Package`] and [`Target`] values:
//! lists keep their construction order, maps and attributes are emitted in key
//! order, and nothing depends on hash map iteration. Two runs over the same
//! input produce the same bytes.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::consts::HANDCRAFTED_BANNER;
use crate::target::{AttributeValue, Package, Target};

const INDENT: &str = "    ";

fn indent(level: usize) -> String {
  INDENT.repeat(level)
}

/// Quote a string as a Starlark string literal.
pub fn quote(value: &str) -> String {
  let mut out = String::with_capacity(value.len() + 2);
  out.push('"');
  for c in value.chars() {
    match c {
      '"' => out.push_str("\\\""),
      '\\' => out.push_str("\\\\"),
      '\n' => out.push_str("\\n"),
      '\r' => out.push_str("\\r"),
      '\t' => out.push_str("\\t"),
      c => out.push(c),
    }
  }
  out.push('"');
  out
}

/// Render a value at the given nesting level.
///
/// Multi-line lists and maps put one element per line at `level + 1`, and close
/// at `level`.
pub fn pretty_print(value: &AttributeValue, level: usize) -> String {
  match value {
    AttributeValue::String(s) | AttributeValue::Label(s) => quote(s),
    AttributeValue::Bool(true) => "True".to_string(),
    AttributeValue::Bool(false) => "False".to_string(),
    AttributeValue::Int(i) => i.to_string(),
    AttributeValue::List(items) => match items.as_slice() {
      [] => "[]".to_string(),
      [item] => format!("[{}]", pretty_print(item, level)),
      items => {
        let mut out = String::from("[\n");
        for item in items {
          let _ = writeln!(out, "{}{},", indent(level + 1), pretty_print(item, level + 1));
        }
        out.push_str(&indent(level));
        out.push(']');
        out
      }
    },
    AttributeValue::Map(entries) => pretty_print_map(entries, level),
  }
}

fn pretty_print_map(entries: &BTreeMap<String, AttributeValue>, level: usize) -> String {
  if entries.is_empty() {
    return "{}".to_string();
  }
  let mut out = String::from("{\n");
  for (key, value) in entries {
    let _ = writeln!(out, "{}{}: {},", indent(level + 1), quote(key), pretty_print(value, level + 1));
  }
  out.push_str(&indent(level));
  out.push('}');
  out
}

/// Render one target as a rule invocation.
pub fn render_target(target: &Target) -> String {
  let mut out = format!("{}(\n", target.rule_class);
  let _ = writeln!(out, "{}name = {},", indent(1), quote(&target.name));
  for (key, value) in &target.attributes {
    let _ = writeln!(out, "{}{} = {},", indent(1), key, pretty_print(value, 1));
  }
  out.push(')');
  out
}

/// Render the targets of a package, separated by blank lines.
///
/// Handcrafted content, if any, follows the generated targets under a banner so it
/// is easy to find when debugging a merged file.
pub fn render_targets(package: &Package) -> String {
  let mut sections: Vec<String> = package.targets.iter().map(render_target).collect();
  if let Some(handcrafted) = &package.handcrafted {
    sections.push(format!("{}\n{}", HANDCRAFTED_BANNER, handcrafted.trim_end()));
  }
  sections.join("\n\n")
}

/// `load(...)` statements for every rule class loaded from a `.bzl` file, one per
/// file, files and symbols in sorted order.
pub fn load_statements(package: &Package) -> String {
  package
    .loaded_symbols()
    .into_iter()
    .map(|(bzl, symbols)| load_statement(bzl, symbols))
    .collect::<Vec<_>>()
    .join("\n")
}

/// A single `load(...)` statement.
pub fn load_statement<'a>(bzl: &str, symbols: impl IntoIterator<Item = &'a str>) -> String {
  let mut out = format!("load({}", quote(bzl));
  for symbol in symbols {
    out.push_str(", ");
    out.push_str(&quote(symbol));
  }
  out.push(')');
  out
}

/// Join file sections with a blank line and end the file with one newline.
pub fn assemble_file(sections: &[&str]) -> String {
  let body = sections
    .iter()
    .map(|s| s.trim_end_matches('\n'))
    .filter(|s| !s.is_empty())
    .collect::<Vec<_>>()
    .join("\n\n");
  if body.is_empty() { body } else { body + "\n" }
}
