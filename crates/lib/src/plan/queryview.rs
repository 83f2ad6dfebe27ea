//! Query view planning.
//!
//! Every module variant becomes a `bp_module` target carrying the module's
//! identity (`module_name`, `module_type`, `module_variant`, `module_deps`) and
//! its eligible properties. The rule shims and the loader let Bazel resolve each
//! target to a rule mirroring its module type.

use std::collections::BTreeSet;

use tracing::debug;

use super::{BuildPlan, OutputFile, PlanContext};
use crate::consts::{
  DEFAULT_VISIBILITY, GENERATED_BUILD_FILE_NAME, MODULE_IDENTITY_ATTRS, MODULE_LOADER_FILE_NAME, MODULE_MACRO,
  PROVIDERS_FILE_NAME, QUERYVIEW_RULES_DIR, WORKSPACE_FILE_NAME,
};
use crate::error::{ConvertError, SchemaError};
use crate::module::{Module, ModuleGraph, ModuleIndex};
use crate::render::{assemble_file, load_statement, render_targets};
use crate::shim::{PROVIDERS_BZL, generate_loader_bzl, generate_rule_shims};
use crate::target::{AttributeValue, Package, Packages, Target, module_target, package_label};

/// Plan the query view tree.
///
/// Handcrafted content and the skip policy do not apply here: the query view
/// tree is a separate workspace and never shares directories with the source tree.
pub fn plan_files(ctx: &PlanContext<'_>) -> Result<BuildPlan, ConvertError> {
  let shims = generate_rule_shims(ctx.graph)?;

  let index = ctx.graph.index();
  let mut packages = Packages::new();
  for module in &ctx.graph.modules {
    packages.insert(&module.dir, queryview_target(ctx.graph, &index, module)?);
  }
  let packages = packages.canonicalize()?;

  let mut files = vec![OutputFile::new("", WORKSPACE_FILE_NAME, "")];
  // A root package file doubles as the root package marker.
  if !packages.iter().any(|p| p.directory.is_empty()) {
    files.push(OutputFile::new("", GENERATED_BUILD_FILE_NAME, ""));
  }
  files.push(OutputFile::new(QUERYVIEW_RULES_DIR, GENERATED_BUILD_FILE_NAME, ""));
  files.push(OutputFile::new(QUERYVIEW_RULES_DIR, PROVIDERS_FILE_NAME, PROVIDERS_BZL));
  for shim in &shims {
    files.push(OutputFile::new(QUERYVIEW_RULES_DIR, &shim.file_name(), shim.content.as_str()));
  }
  files.push(OutputFile::new(
    QUERYVIEW_RULES_DIR,
    MODULE_LOADER_FILE_NAME,
    generate_loader_bzl(&shims),
  ));

  for package in &packages {
    debug!(dir = %package.directory, targets = package.targets.len(), "planned query view package");
    files.push(OutputFile::new(
      &package.directory,
      GENERATED_BUILD_FILE_NAME,
      package_contents(package),
    ));
  }

  Ok(BuildPlan {
    files,
    skipped: Vec::new(),
  })
}

/// The `bp_module` target for one module variant.
///
/// `index` must be built from `graph`.
///
/// # Errors
///
/// Besides schema errors, fails with [`ConvertError::UnknownDependency`] for a
/// dependency missing from the graph, and with [`SchemaError::ReservedProperty`]
/// if the module sets a property named like an identity attr.
pub fn queryview_target(
  graph: &ModuleGraph,
  index: &ModuleIndex<'_>,
  module: &Module,
) -> Result<Target, ConvertError> {
  let converted = module_target(graph, module)?;
  if let Some(property) = MODULE_IDENTITY_ATTRS.iter().find(|a| converted.attributes.contains_key(**a)) {
    return Err(
      SchemaError::ReservedProperty {
        module_type: module.module_type.clone(),
        property: property.to_string(),
      }
      .into(),
    );
  }

  let mut deps = BTreeSet::new();
  for dep in &module.deps {
    let resolved = index.find(dep).ok_or_else(|| ConvertError::UnknownDependency {
      module: module.variant_name(),
      dep: dep.to_string(),
    })?;
    deps.insert(package_label(&resolved.dir, &resolved.variant_name()));
  }

  let mut target = Target::from_module(&module.variant_name(), MODULE_MACRO, module);
  target.attributes = converted.attributes;
  target
    .attributes
    .insert("module_name".to_string(), AttributeValue::from(module.name.as_str()));
  target
    .attributes
    .insert("module_type".to_string(), AttributeValue::from(converted.rule_class));
  target
    .attributes
    .insert("module_variant".to_string(), AttributeValue::from(module.variant.as_str()));
  target
    .attributes
    .insert("module_deps".to_string(), AttributeValue::label_list(&deps));
  Ok(target)
}

fn loader_label() -> String {
  format!("//{}:{}", QUERYVIEW_RULES_DIR, MODULE_LOADER_FILE_NAME)
}

fn package_contents(package: &Package) -> String {
  let header = format!("{}\n{}", DEFAULT_VISIBILITY, load_statement(&loader_label(), [MODULE_MACRO]));
  assemble_file(&[&header, &render_targets(package)])
}
