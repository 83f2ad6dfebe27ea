use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::consts::TEST_RULE_SUFFIX;
use crate::error::ConvertError;
use crate::module::Module;

/// The value of one target attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
  String(String),
  Bool(bool),
  Int(i64),
  /// A reference to another target, possibly in another package.
  Label(String),
  /// Keeps construction order.
  List(Vec<AttributeValue>),
  /// Always rendered in key order.
  Map(BTreeMap<String, AttributeValue>),
}

impl AttributeValue {
  pub fn label(label: &str) -> Self {
    AttributeValue::Label(label.to_string())
  }

  pub fn string_list<S: AsRef<str>>(items: impl IntoIterator<Item = S>) -> Self {
    AttributeValue::List(items.into_iter().map(|s| AttributeValue::from(s.as_ref())).collect())
  }

  pub fn label_list<S: AsRef<str>>(items: impl IntoIterator<Item = S>) -> Self {
    AttributeValue::List(items.into_iter().map(|s| AttributeValue::label(s.as_ref())).collect())
  }
}

impl From<&str> for AttributeValue {
  fn from(value: &str) -> Self {
    AttributeValue::String(value.to_string())
  }
}

impl From<String> for AttributeValue {
  fn from(value: String) -> Self {
    AttributeValue::String(value)
  }
}

impl From<bool> for AttributeValue {
  fn from(value: bool) -> Self {
    AttributeValue::Bool(value)
  }
}

impl From<i64> for AttributeValue {
  fn from(value: i64) -> Self {
    AttributeValue::Int(value)
  }
}

/// One generated unit of external build configuration.
///
/// `name` is not part of `attributes`; renderers always emit it first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
  pub name: String,
  pub rule_class: String,
  /// `.bzl` label the rule class is loaded from, `None` for native rules.
  pub load: Option<String>,
  pub attributes: BTreeMap<String, AttributeValue>,
  /// The module this target was converted from, as named in error messages.
  pub origin: Option<String>,
}

impl Target {
  pub fn new(name: &str, rule_class: &str) -> Self {
    Self {
      name: name.to_string(),
      rule_class: rule_class.to_string(),
      load: None,
      attributes: BTreeMap::new(),
      origin: None,
    }
  }

  /// Name the module a target comes from.
  pub fn from_module(name: &str, rule_class: &str, module: &Module) -> Self {
    let mut target = Self::new(name, rule_class);
    target.origin = Some(module.describe());
    target
  }

  /// The originating module if known, otherwise the rule class.
  pub fn origin(&self) -> &str {
    self.origin.as_deref().unwrap_or(&self.rule_class)
  }

  pub fn with_load(mut self, load: &str) -> Self {
    self.load = Some(load.to_string());
    self
  }

  pub fn with_attribute(mut self, key: &str, value: impl Into<AttributeValue>) -> Self {
    self.attributes.insert(key.to_string(), value.into());
    self
  }
}

/// All targets destined for one output file, in canonical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
  pub directory: String,
  pub targets: Vec<Target>,
  /// Verbatim content of the checked-in build file sharing this directory.
  pub handcrafted: Option<String>,
}

impl Package {
  pub fn has_handcrafted_targets(&self) -> bool {
    self.handcrafted.is_some()
  }

  /// `.bzl` label to sorted, de-duplicated rule classes loaded from it.
  pub fn loaded_symbols(&self) -> BTreeMap<&str, BTreeSet<&str>> {
    let mut loads: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for target in &self.targets {
      if let Some(load) = &target.load {
        loads.entry(load.as_str()).or_default().insert(target.rule_class.as_str());
      }
    }
    loads
  }
}

/// Label of `name` in package `dir`.
pub fn package_label(dir: &str, name: &str) -> String {
  format!("//{}:{}", dir, name)
}

/// Targets collected per directory, in no particular order.
#[derive(Debug, Default)]
pub struct Packages {
  targets: HashMap<String, Vec<Target>>,
  handcrafted: HashMap<String, String>,
}

impl Packages {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, dir: &str, target: Target) {
    self.targets.entry(dir.to_string()).or_default().push(target);
  }

  pub fn set_handcrafted(&mut self, dir: &str, content: &str) {
    self.handcrafted.insert(dir.to_string(), content.to_string());
  }

  /// Impose canonical order: packages by directory, targets by name.
  ///
  /// # Errors
  ///
  /// Returns [`ConvertError::NamingCollision`] if two targets of one package share
  /// a name.
  pub fn canonicalize(mut self) -> Result<Vec<Package>, ConvertError> {
    let dirs: BTreeSet<String> = self.targets.keys().chain(self.handcrafted.keys()).cloned().collect();

    let mut packages = Vec::with_capacity(dirs.len());
    for dir in dirs {
      let mut targets = self.targets.remove(&dir).unwrap_or_default();
      targets.sort_by(|a, b| {
        a.name
          .cmp(&b.name)
          .then_with(|| a.rule_class.cmp(&b.rule_class))
          .then_with(|| a.origin().cmp(b.origin()))
      });

      if let Some(pair) = targets.windows(2).find(|pair| pair[0].name == pair[1].name) {
        return Err(ConvertError::NamingCollision {
          package: dir.clone(),
          name: pair[0].name.clone(),
          first: pair[0].origin().to_string(),
          second: pair[1].origin().to_string(),
        });
      }

      let handcrafted = self.handcrafted.remove(&dir);
      packages.push(Package {
        directory: dir,
        targets,
        handcrafted,
      });
    }
    Ok(packages)
  }
}

/// Rule class for a module type.
///
/// Bazel forces everything depending on a `*_test` rule to be test-only, a
/// constraint the module graph does not have, so such types get a trailing `_`.
pub fn canonicalize_module_type(module_type: &str) -> String {
  if module_type.ends_with(TEST_RULE_SUFFIX) {
    format!("{}_", module_type)
  } else {
    module_type.to_string()
  }
}
