//! Rule shims for query view mode.
//!
//! Query view mirrors the shape of every module type as a Starlark rule, so
//! `bazel query` can reason about modules without any real build logic behind
//! them. Each module type seen in the graph gets a shim file defining one rule
//! whose attrs mirror the type's eligible properties. A single shared loader
//! (`module.bzl`) exposes the `bp_module` macro that every query view target
//! calls; it dispatches on `module_type` to the matching shim rule.

use std::fmt::Write;

use crate::consts::{
  GENERIC_MODULE_RULE, MODULE_IDENTITY_ATTRS, MODULE_MACRO, MODULE_PROVIDER, QUERYVIEW_RULES_DIR,
};
use crate::error::SchemaError;
use crate::filter::eligible_properties;
use crate::module::{ModuleGraph, PropertyKind};
use crate::render::{load_statement, quote};
use crate::target::canonicalize_module_type;

/// Static provider definition shared by all shims.
pub const PROVIDERS_BZL: &str = r#"BpModuleInfo = provider(
    fields = {
        "name": "Name of the module",
        "type": "Type of the module",
        "variant": "Variant of the module",
    },
)
"#;

/// Attr declarations for [`MODULE_IDENTITY_ATTRS`], in the same order.
const MODULE_ATTR_DECLS: [&str; 4] = [
  "attr.string(mandatory = True)",
  "attr.string(mandatory = True)",
  "attr.string()",
  "attr.label_list(providers = [BpModuleInfo])",
];

/// The generated rule mirroring one module type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleShim {
  pub module_type: String,
  /// Canonical rule name, also the shim's file stem.
  pub rule_name: String,
  pub content: String,
}

impl RuleShim {
  pub fn file_name(&self) -> String {
    format!("{}.bzl", self.rule_name)
  }
}

fn providers_label() -> String {
  format!("//{}:providers.bzl", QUERYVIEW_RULES_DIR)
}

fn attr_for_kind(kind: &PropertyKind) -> Option<&'static str> {
  match kind {
    PropertyKind::Bool => Some("attr.bool()"),
    PropertyKind::Int => Some("attr.int()"),
    PropertyKind::String => Some("attr.string()"),
    PropertyKind::StringList => Some("attr.string_list()"),
    PropertyKind::Label => Some("attr.label()"),
    PropertyKind::LabelList => Some("attr.label_list()"),
    PropertyKind::StringDict => Some("attr.string_dict()"),
    PropertyKind::StringListDict => Some("attr.string_list_dict()"),
    PropertyKind::Interface | PropertyKind::Unsupported(_) => None,
  }
}

/// One shim per module type used in the graph, sorted by rule name.
///
/// # Errors
///
/// Fails if a used module type has no schema. Properties the shim cannot mirror
/// (unsupported kinds, identity attr names) are left out; a module setting one
/// fails when its target is built.
pub fn generate_rule_shims(graph: &ModuleGraph) -> Result<Vec<RuleShim>, SchemaError> {
  let mut shims = Vec::new();
  for module_type in graph.module_types_in_use() {
    let schema = graph
      .module_types
      .get(module_type)
      .ok_or_else(|| SchemaError::UnknownModuleType {
        module: graph
          .modules
          .iter()
          .find(|m| m.module_type == module_type)
          .map(|m| m.name.clone())
          .unwrap_or_default(),
        module_type: module_type.to_string(),
      })?;

    let rule_name = canonicalize_module_type(module_type);
    let mut attrs: Vec<(&str, &str)> = MODULE_IDENTITY_ATTRS.into_iter().zip(MODULE_ATTR_DECLS).collect();
    for (name, descriptor) in eligible_properties(schema) {
      if MODULE_IDENTITY_ATTRS.contains(&name) {
        continue;
      }
      if let Some(attr) = attr_for_kind(&descriptor.kind) {
        attrs.push((name, attr));
      }
    }

    shims.push(RuleShim {
      module_type: module_type.to_string(),
      content: rule_shim_content(&rule_name, &attrs),
      rule_name,
    });
  }
  shims.sort_by(|a, b| a.rule_name.cmp(&b.rule_name));
  Ok(shims)
}

fn rule_shim_content(rule_name: &str, attrs: &[(&str, &str)]) -> String {
  let mut out = load_statement(&providers_label(), [MODULE_PROVIDER]);
  out.push_str("\n\n");
  let _ = writeln!(out, "def _{}_impl(ctx):", rule_name);
  let _ = writeln!(
    out,
    "    return [{}(name = ctx.attr.module_name, type = ctx.attr.module_type, variant = ctx.attr.module_variant)]",
    MODULE_PROVIDER
  );
  out.push('\n');
  let _ = writeln!(out, "{} = rule(", rule_name);
  let _ = writeln!(out, "    implementation = _{}_impl,", rule_name);
  out.push_str("    attrs = {\n");
  for (name, attr) in attrs {
    let _ = writeln!(out, "        {}: {},", quote(name), attr);
  }
  out.push_str("    },\n)\n");
  out
}

/// The shared loader: loads every shim rule and defines the `bp_module` macro.
pub fn generate_loader_bzl(shims: &[RuleShim]) -> String {
  let mut out = load_statement(":providers.bzl", [MODULE_PROVIDER]);
  out.push('\n');
  for shim in shims {
    let _ = writeln!(out, "{}", load_statement(&format!(":{}", shim.file_name()), [shim.rule_name.as_str()]));
  }
  out.push('\n');

  let _ = writeln!(out, "def _{}_impl(ctx):", GENERIC_MODULE_RULE);
  let _ = writeln!(
    out,
    "    return [{}(name = ctx.attr.module_name, type = ctx.attr.module_type, variant = ctx.attr.module_variant)]",
    MODULE_PROVIDER
  );
  out.push('\n');
  let _ = writeln!(out, "{} = rule(", GENERIC_MODULE_RULE);
  let _ = writeln!(out, "    implementation = _{}_impl,", GENERIC_MODULE_RULE);
  out.push_str("    attrs = {\n");
  for (name, attr) in MODULE_IDENTITY_ATTRS.into_iter().zip(MODULE_ATTR_DECLS) {
    let _ = writeln!(out, "        {}: {},", quote(name), attr);
  }
  out.push_str("    },\n)\n\n");

  out.push_str("module_rule_map = {\n");
  for shim in shims {
    let _ = writeln!(out, "    {}: {},", quote(&shim.rule_name), shim.rule_name);
  }
  out.push_str("}\n\n");

  out.push_str(MACRO_BODY.replace("{macro}", MODULE_MACRO).replace("{generic}", GENERIC_MODULE_RULE).as_str());
  out
}

const MACRO_BODY: &str = r#"_SUPPORTED_TYPES = ["bool", "int", "string", "list", "dict"]

def _is_supported(value):
    if type(value) not in _SUPPORTED_TYPES:
        return False
    if type(value) == "list":
        for item in value:
            if type(item) not in _SUPPORTED_TYPES:
                return False
    return True

# Dispatches on module_type to the rule mirroring that type. Unknown types fall
# back to the generic rule, which only keeps the module_* attrs.
def {macro}(name, module_type, **kwargs):
    module_rule = module_rule_map.get(module_type)
    if module_rule == None:
        {generic}(
            name = name,
            module_type = module_type,
            module_name = kwargs.pop("module_name", ""),
            module_variant = kwargs.pop("module_variant", ""),
            module_deps = kwargs.pop("module_deps", []),
        )
        return
    supported_kwargs = {}
    for key, value in kwargs.items():
        if _is_supported(value):
            supported_kwargs[key] = value
    module_rule(
        name = name,
        module_type = module_type,
        **supported_kwargs
    )
"#;
