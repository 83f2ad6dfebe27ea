//! Conversion configuration.
//!
//! Everything a run needs besides the module graph, read from one JSON file:
//!
//! ```json
//! {
//!   "keep_existing": { "external/zlib": false, "prebuilts": true },
//!   "handcrafted": ["build/soong"],
//!   "name_to_label": [{ "name": "libc", "label": "//bionic/libc:libc" }],
//!   "toolchain_vars": { "ClangVersion": "r450784", "ArmCflags": ["-O2"] }
//! }
//! ```
//!
//! Every key is optional. Unknown keys are rejected so a misspelled key does not
//! silently change the output.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::alias::{CompatEntry, CompatLayer};
use crate::error::ConvertError;
use crate::plan::KeepExistingDirs;
use crate::toolchain::ToolchainValue;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config {}: {source}", path.display())]
  Read { path: PathBuf, source: std::io::Error },

  #[error("failed to parse config {}: {source}", path.display())]
  Parse { path: PathBuf, source: serde_json::Error },
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConversionConfig {
  /// Directory to "also keep every subdirectory". Only used in bp2build mode.
  pub keep_existing: BTreeMap<String, bool>,
  /// Directories whose checked-in `BUILD` file is merged into the generated one.
  pub handcrafted: Vec<String>,
  pub name_to_label: Vec<CompatEntry>,
  pub toolchain_vars: BTreeMap<String, ToolchainValue>,
}

impl ConversionConfig {
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
      path: path.to_path_buf(),
      source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
      path: path.to_path_buf(),
      source: e,
    })
  }

  pub fn keep_existing_dirs(&self) -> KeepExistingDirs {
    KeepExistingDirs::new(self.keep_existing.clone())
  }

  /// Validate the name-to-label entries.
  pub fn compat_layer(&self) -> Result<CompatLayer, ConvertError> {
    CompatLayer::from_entries(&self.name_to_label)
  }
}
