mod check;
mod generate;

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use tracing::debug;

use bp2build_lib::config::ConversionConfig;
use bp2build_lib::convert::{ConversionInput, ConversionOutput, convert};
use bp2build_lib::module::ModuleGraph;
use bp2build_lib::output::read_handcrafted;
use bp2build_lib::plan::CodegenMode;

use crate::InputArgs;

pub use check::cmd_check;
pub use generate::cmd_generate;

/// Load every input named on the command line and run the conversion.
fn run_conversion(inputs: &InputArgs) -> Result<ConversionOutput> {
  let graph = ModuleGraph::load(&inputs.graph).context("Failed to load module graph")?;
  debug!(
    path = %inputs.graph.display(),
    modules = graph.modules.len(),
    module_types = graph.module_types.len(),
    "loaded module graph"
  );
  let config = match &inputs.config {
    Some(path) => ConversionConfig::load(path).context("Failed to load conversion config")?,
    None => ConversionConfig::default(),
  };

  let mode = CodegenMode::from(inputs.mode);
  let compat = config.compat_layer().context("Invalid name_to_label entries")?;
  let handcrafted = match mode {
    CodegenMode::Bp2Build => {
      read_handcrafted(&inputs.src_root, &config.handcrafted).context("Failed to read handcrafted BUILD files")?
    }
    CodegenMode::QueryView => BTreeMap::new(),
  };
  let keep = config.keep_existing_dirs();

  convert(
    &graph,
    &ConversionInput {
      mode,
      compat: &compat,
      toolchain_vars: &config.toolchain_vars,
      handcrafted: &handcrafted,
      skip: &keep,
    },
  )
  .with_context(|| format!("Conversion failed in {} mode", mode))
}
