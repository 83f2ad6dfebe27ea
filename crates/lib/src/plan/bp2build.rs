//! Bp2build planning.
//!
//! Generated build files are adopted progressively, so they have to live next
//! to handcrafted ones:
//! - a directory the skip policy keeps is not written at all
//! - a directory with a checked-in build file gets its content appended after
//!   the generated targets, and no file-level declarations of its own
//! - everything else gets a fully generated file with a public default visibility
//!
//! Bp2build converts module definitions, not variants. A module present in
//! several variants yields one target, taken from the variant that sorts first.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use tracing::{debug, info};

use super::{BuildPlan, OutputFile, PlanContext};
use crate::consts::{DEFAULT_VISIBILITY, DISCLAIMER_HEADER, GENERATED_BUILD_FILE_NAME, HANDCRAFTED_NOTICE};
use crate::error::ConvertError;
use crate::module::{Module, ModuleGraph};
use crate::render::{assemble_file, load_statements, render_targets};
use crate::target::{Package, Packages, module_target};

/// Plan the bp2build tree.
///
/// Naming collisions are reported even for directories the skip policy keeps.
pub fn plan_files(ctx: &PlanContext<'_>) -> Result<BuildPlan, ConvertError> {
  let mut packages = Packages::new();
  for module in convertible_modules(ctx.graph)? {
    packages.insert(&module.dir, module_target(ctx.graph, module)?);
  }
  for (dir, content) in ctx.handcrafted {
    packages.set_handcrafted(dir, content);
  }

  let mut plan = BuildPlan::default();
  for package in packages.canonicalize()? {
    if ctx.skip.should_keep_existing(&package.directory) {
      info!(dir = %package.directory, "not writing generated BUILD file, keeping existing one");
      plan.skipped.push(package.directory);
      continue;
    }
    debug!(
      dir = %package.directory,
      targets = package.targets.len(),
      handcrafted = package.has_handcrafted_targets(),
      "planned bp2build package"
    );
    plan.files.push(OutputFile::new(
      &package.directory,
      GENERATED_BUILD_FILE_NAME,
      package_contents(&package),
    ));
  }
  Ok(plan)
}

/// One module per `(dir, name, type)` whose type bp2build converts.
fn convertible_modules(graph: &ModuleGraph) -> Result<Vec<&Module>, ConvertError> {
  let mut definitions: BTreeMap<(&str, &str, &str), &Module> = BTreeMap::new();
  for module in &graph.modules {
    let schema = graph.schema_for(module)?;
    if !schema.bp2build {
      debug!(module = %module.name, module_type = %module.module_type, "module type not converted by bp2build");
      continue;
    }
    let key = (module.dir.as_str(), module.name.as_str(), module.module_type.as_str());
    match definitions.entry(key) {
      Entry::Vacant(slot) => {
        slot.insert(module);
      }
      Entry::Occupied(mut slot) => {
        let (kept, dropped) = if module.variant < slot.get().variant {
          (module, slot.insert(module))
        } else {
          (*slot.get(), module)
        };
        debug!(
          module = %kept.name,
          kept = %kept.variant,
          dropped = %dropped.variant,
          "converting one variant per module"
        );
      }
    }
  }
  Ok(definitions.into_values().collect())
}

/// Full content of one generated build file.
pub fn package_contents(package: &Package) -> String {
  let mut header = String::from(DISCLAIMER_HEADER);
  if package.has_handcrafted_targets() {
    // The checked-in file owns package-level declarations.
    header.push_str(HANDCRAFTED_NOTICE);
  } else {
    header.push_str(DEFAULT_VISIBILITY);
  }
  header.push('\n');
  header.push_str(&load_statements(package));
  assemble_file(&[&header, &render_targets(package)])
}
