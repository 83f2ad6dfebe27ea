//! Aliases bridging internal module names to Bazel labels.
//!
//! The compatibility layer maps a module name to the fully qualified label that
//! now provides it, so Bazel code can keep referring to modules by name through
//! `//module_name_to_label:<name>`.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::{Deserialize, Serialize};

use crate::consts::{ALIAS_RULE, LABEL_ROOT};
use crate::error::ConvertError;
use crate::target::{AttributeValue, Target};

/// One `name -> label` entry as written in the conversion config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompatEntry {
  pub name: String,
  pub label: String,
}

impl CompatEntry {
  pub fn new(name: &str, label: &str) -> Self {
    Self {
      name: name.to_string(),
      label: label.to_string(),
    }
  }
}

/// Validated mapping from internal module names to labels rooted at `//`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CompatLayer {
  name_to_label: BTreeMap<String, String>,
}

impl CompatLayer {
  /// Build the layer, failing on the first malformed label or repeated name.
  pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a CompatEntry>) -> Result<Self, ConvertError> {
    let mut name_to_label: BTreeMap<String, String> = BTreeMap::new();
    for entry in entries {
      if !entry.label.starts_with(LABEL_ROOT) || entry.label.len() == LABEL_ROOT.len() {
        return Err(ConvertError::MalformedLabel {
          name: entry.name.clone(),
          label: entry.label.clone(),
        });
      }
      match name_to_label.entry(entry.name.clone()) {
        Entry::Occupied(existing) => {
          return Err(ConvertError::DuplicateAlias {
            name: entry.name.clone(),
            first: existing.get().clone(),
            second: entry.label.clone(),
          });
        }
        Entry::Vacant(slot) => {
          slot.insert(entry.label.clone());
        }
      }
    }
    Ok(Self { name_to_label })
  }

  pub fn len(&self) -> usize {
    self.name_to_label.len()
  }

  pub fn is_empty(&self) -> bool {
    self.name_to_label.is_empty()
  }

  pub fn label_for(&self, name: &str) -> Option<&str> {
    self.name_to_label.get(name).map(String::as_str)
  }

  /// One `alias` target per entry, sorted by name.
  ///
  /// `actual` is prefixed with `@` so it resolves in the main repository even
  /// when the alias package is loaded from another one.
  pub fn alias_targets(&self) -> Vec<Target> {
    self
      .name_to_label
      .iter()
      .map(|(name, label)| {
        Target::new(name, ALIAS_RULE).with_attribute("actual", AttributeValue::label(&format!("@{}", label)))
      })
      .collect()
  }
}
