use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::consts::VARIANT_SEPARATOR;
use crate::error::SchemaError;

/// Errors that can occur while loading a module graph.
#[derive(Debug, Error)]
pub enum GraphError {
  #[error("failed to read module graph {}: {source}", path.display())]
  Read { path: PathBuf, source: std::io::Error },

  #[error("failed to parse module graph {}: {source}", path.display())]
  Parse { path: PathBuf, source: serde_json::Error },
}

/// The declared kind of a module property.
///
/// Kinds are written as plain strings in the graph (`"string_list"`, `"bool"`, ...).
/// Strings that name no known kind are kept as [`PropertyKind::Unsupported`] so the
/// filter can report them against the property that uses them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PropertyKind {
  Bool,
  Int,
  String,
  StringList,
  Label,
  LabelList,
  StringDict,
  StringListDict,
  /// A property whose value shape depends on context (arch- or target-specific
  /// overrides). Never converted.
  Interface,
  Unsupported(String),
}

impl PropertyKind {
  pub fn as_str(&self) -> &str {
    match self {
      PropertyKind::Bool => "bool",
      PropertyKind::Int => "int",
      PropertyKind::String => "string",
      PropertyKind::StringList => "string_list",
      PropertyKind::Label => "label",
      PropertyKind::LabelList => "label_list",
      PropertyKind::StringDict => "string_dict",
      PropertyKind::StringListDict => "string_list_dict",
      PropertyKind::Interface => "interface",
      PropertyKind::Unsupported(kind) => kind,
    }
  }
}

impl From<String> for PropertyKind {
  fn from(kind: String) -> Self {
    match kind.as_str() {
      "bool" => PropertyKind::Bool,
      "int" => PropertyKind::Int,
      "string" => PropertyKind::String,
      "string_list" => PropertyKind::StringList,
      "label" => PropertyKind::Label,
      "label_list" => PropertyKind::LabelList,
      "string_dict" => PropertyKind::StringDict,
      "string_list_dict" => PropertyKind::StringListDict,
      "interface" => PropertyKind::Interface,
      _ => PropertyKind::Unsupported(kind),
    }
  }
}

impl From<PropertyKind> for String {
  fn from(kind: PropertyKind) -> Self {
    kind.as_str().to_string()
  }
}

impl fmt::Display for PropertyKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

fn default_true() -> bool {
  true
}

/// Schema entry for one property of a module type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyDescriptor {
  pub kind: PropertyKind,
  /// False for fields internal to the module implementation.
  #[serde(default = "default_true")]
  pub exported: bool,
  /// True for fields only set by graph mutators, never by users.
  #[serde(default)]
  pub mutated: bool,
}

impl PropertyDescriptor {
  pub fn new(kind: PropertyKind) -> Self {
    Self {
      kind,
      exported: true,
      mutated: false,
    }
  }

  pub fn unexported(mut self) -> Self {
    self.exported = false;
    self
  }

  pub fn mutated(mut self) -> Self {
    self.mutated = true;
    self
  }
}

impl From<PropertyKind> for PropertyDescriptor {
  fn from(kind: PropertyKind) -> Self {
    PropertyDescriptor::new(kind)
  }
}

/// Statically declared description of a module type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleTypeSchema {
  #[serde(default)]
  pub properties: BTreeMap<String, PropertyDescriptor>,
  /// `.bzl` label defining the rule class in bp2build mode. `None` for native rules.
  #[serde(default)]
  pub load: Option<String>,
  /// Whether modules of this type are converted in bp2build mode.
  #[serde(default = "default_true")]
  pub bp2build: bool,
}

impl Default for ModuleTypeSchema {
  fn default() -> Self {
    Self {
      properties: BTreeMap::new(),
      load: None,
      bp2build: true,
    }
  }
}

impl ModuleTypeSchema {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_property(mut self, name: &str, descriptor: impl Into<PropertyDescriptor>) -> Self {
    self.properties.insert(name.to_string(), descriptor.into());
    self
  }

  pub fn with_load(mut self, load: &str) -> Self {
    self.load = Some(load.to_string());
    self
  }

  pub fn without_bp2build(mut self) -> Self {
    self.bp2build = false;
    self
  }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DepSpec {
  Name(String),
  Full {
    name: String,
    #[serde(default)]
    variant: String,
  },
}

/// A direct dependency of a module, naming one variant of another module.
///
/// Written either as a bare module name (empty variant) or as
/// `{ "name": ..., "variant": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "DepSpec")]
pub struct DepRef {
  pub name: String,
  pub variant: String,
}

impl DepRef {
  pub fn new(name: &str, variant: &str) -> Self {
    Self {
      name: name.to_string(),
      variant: variant.to_string(),
    }
  }
}

impl From<DepSpec> for DepRef {
  fn from(spec: DepSpec) -> Self {
    match spec {
      DepSpec::Name(name) => DepRef {
        name,
        variant: String::new(),
      },
      DepSpec::Full { name, variant } => DepRef { name, variant },
    }
  }
}

impl fmt::Display for DepRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.variant.is_empty() {
      write!(f, "{}", self.name)
    } else {
      write!(f, "{}{}{}", self.name, VARIANT_SEPARATOR, self.variant)
    }
  }
}

/// One module of the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Module {
  pub name: String,
  #[serde(rename = "type")]
  pub module_type: String,
  /// Source directory relative to the tree root, `""` for the root itself.
  #[serde(default)]
  pub dir: String,
  #[serde(default)]
  pub variant: String,
  #[serde(default)]
  pub deps: Vec<DepRef>,
  /// Raw property values; `null` means unset.
  #[serde(default)]
  pub properties: BTreeMap<String, Value>,
}

impl Module {
  pub fn new(name: &str, module_type: &str, dir: &str) -> Self {
    Self {
      name: name.to_string(),
      module_type: module_type.to_string(),
      dir: dir.to_string(),
      variant: String::new(),
      deps: Vec::new(),
      properties: BTreeMap::new(),
    }
  }

  pub fn with_variant(mut self, variant: &str) -> Self {
    self.variant = variant.to_string();
    self
  }

  pub fn with_dep(mut self, dep: DepRef) -> Self {
    self.deps.push(dep);
    self
  }

  pub fn with_property(mut self, name: &str, value: Value) -> Self {
    self.properties.insert(name.to_string(), value);
    self
  }

  /// Name unique across variants: `name` or `name__variant`.
  pub fn variant_name(&self) -> String {
    DepRef::new(&self.name, &self.variant).to_string()
  }

  /// How the module is named in error messages: type, name and variant.
  pub fn describe(&self) -> String {
    if self.variant.is_empty() {
      format!("{} module \"{}\"", self.module_type, self.name)
    } else {
      format!("{} module \"{}\" variant \"{}\"", self.module_type, self.name, self.variant)
    }
  }
}

/// A fully resolved module graph snapshot.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleGraph {
  #[serde(default)]
  pub module_types: BTreeMap<String, ModuleTypeSchema>,
  #[serde(default)]
  pub modules: Vec<Module>,
}

impl ModuleGraph {
  pub fn new() -> Self {
    Self::default()
  }

  /// Load a graph from a JSON file.
  pub fn load(path: &Path) -> Result<Self, GraphError> {
    let content = fs::read_to_string(path).map_err(|e| GraphError::Read {
      path: path.to_path_buf(),
      source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| GraphError::Parse {
      path: path.to_path_buf(),
      source: e,
    })
  }

  pub fn with_module_type(mut self, name: &str, schema: ModuleTypeSchema) -> Self {
    self.module_types.insert(name.to_string(), schema);
    self
  }

  pub fn with_module(mut self, module: Module) -> Self {
    self.modules.push(module);
    self
  }

  /// Schema of a module's type.
  pub fn schema_for(&self, module: &Module) -> Result<&ModuleTypeSchema, SchemaError> {
    self
      .module_types
      .get(&module.module_type)
      .ok_or_else(|| SchemaError::UnknownModuleType {
        module: module.name.clone(),
        module_type: module.module_type.clone(),
      })
  }

  /// Distinct module types used by at least one module, sorted.
  pub fn module_types_in_use(&self) -> BTreeSet<&str> {
    self.modules.iter().map(|m| m.module_type.as_str()).collect()
  }

  /// Index the modules by name and variant for dependency lookups.
  pub fn index(&self) -> ModuleIndex<'_> {
    let mut by_ref: HashMap<(&str, &str), &Module> = HashMap::with_capacity(self.modules.len());
    for module in &self.modules {
      let key = (module.name.as_str(), module.variant.as_str());
      // Same name and variant in two directories: the lowest directory wins.
      by_ref
        .entry(key)
        .and_modify(|existing| {
          if module.dir < existing.dir {
            *existing = module;
          }
        })
        .or_insert(module);
    }
    ModuleIndex { by_ref }
  }
}

/// Modules of one graph keyed by `(name, variant)`.
#[derive(Debug)]
pub struct ModuleIndex<'a> {
  by_ref: HashMap<(&'a str, &'a str), &'a Module>,
}

impl<'a> ModuleIndex<'a> {
  pub fn find(&self, dep: &DepRef) -> Option<&'a Module> {
    self.by_ref.get(&(dep.name.as_str(), dep.variant.as_str())).copied()
  }

  pub fn len(&self) -> usize {
    self.by_ref.len()
  }

  pub fn is_empty(&self) -> bool {
    self.by_ref.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  mod property_kind {
    use super::*;

    #[test]
    fn known_kinds_parse() {
      let kind: PropertyKind = serde_json::from_value(json!("label_list")).unwrap();
      assert_eq!(kind, PropertyKind::LabelList);
    }

    #[test]
    fn unknown_kind_is_kept_by_name() {
      let kind: PropertyKind = serde_json::from_value(json!("float")).unwrap();
      assert_eq!(kind, PropertyKind::Unsupported("float".to_string()));
      assert_eq!(kind.as_str(), "float");
    }

    #[test]
    fn serializes_back_to_its_name() {
      assert_eq!(serde_json::to_value(PropertyKind::StringDict).unwrap(), json!("string_dict"));
    }
  }

  mod graph {
    use super::*;

    const GRAPH: &str = r#"{
      "module_types": {
        "cc_library": {
          "load": "//build/bazel/rules:cc_library.bzl",
          "properties": {
            "srcs": { "kind": "label_list" },
            "enabled": { "kind": "bool", "mutated": true },
            "internal_state": { "kind": "string", "exported": false }
          }
        },
        "genrule": { "bp2build": false }
      },
      "modules": [
        { "name": "libfoo", "type": "cc_library", "dir": "foo",
          "deps": ["libbar", { "name": "libbaz", "variant": "arm64" }],
          "properties": { "srcs": ["a.cc"] } },
        { "name": "gen", "type": "genrule" }
      ]
    }"#;

    #[test]
    fn parses_schema_defaults() {
      let graph: ModuleGraph = serde_json::from_str(GRAPH).unwrap();

      let cc = &graph.module_types["cc_library"];
      assert!(cc.bp2build);
      assert_eq!(cc.load.as_deref(), Some("//build/bazel/rules:cc_library.bzl"));
      assert!(cc.properties["srcs"].exported);
      assert!(!cc.properties["srcs"].mutated);
      assert!(cc.properties["enabled"].mutated);
      assert!(!cc.properties["internal_state"].exported);

      assert!(!graph.module_types["genrule"].bp2build);
    }

    #[test]
    fn parses_both_dependency_forms() {
      let graph: ModuleGraph = serde_json::from_str(GRAPH).unwrap();

      assert_eq!(
        graph.modules[0].deps,
        vec![DepRef::new("libbar", ""), DepRef::new("libbaz", "arm64")]
      );
    }

    #[test]
    fn module_defaults_to_root_directory() {
      let graph: ModuleGraph = serde_json::from_str(GRAPH).unwrap();
      assert_eq!(graph.modules[1].dir, "");
      assert_eq!(graph.modules[1].variant, "");
    }

    #[test]
    fn rejects_unknown_module_fields() {
      let result: Result<ModuleGraph, _> =
        serde_json::from_str(r#"{ "modules": [{ "name": "a", "type": "t", "srcs": [] }] }"#);
      assert!(result.is_err());
    }

    #[test]
    fn unknown_module_type_is_a_schema_error() {
      let graph = ModuleGraph::new().with_module(Module::new("a", "mystery", ""));

      let err = graph.schema_for(&graph.modules[0]).unwrap_err();
      assert_eq!(
        err,
        SchemaError::UnknownModuleType {
          module: "a".to_string(),
          module_type: "mystery".to_string(),
        }
      );
    }

    #[test]
    fn module_types_in_use_are_sorted_and_distinct() {
      let graph = ModuleGraph::new()
        .with_module(Module::new("b", "cc_library", ""))
        .with_module(Module::new("a", "cc_binary", ""))
        .with_module(Module::new("c", "cc_library", "x"));

      let types: Vec<&str> = graph.module_types_in_use().into_iter().collect();
      assert_eq!(types, vec!["cc_binary", "cc_library"]);
    }

    #[test]
    fn load_reports_missing_file() {
      let temp = tempfile::TempDir::new().unwrap();
      let err = ModuleGraph::load(&temp.path().join("missing.json")).unwrap_err();
      assert!(matches!(err, GraphError::Read { .. }));
    }
  }

  mod index {
    use super::*;

    #[test]
    fn finds_modules_by_name_and_variant() {
      let graph = ModuleGraph::new()
        .with_module(Module::new("libfoo", "cc_library", "foo"))
        .with_module(Module::new("libfoo", "cc_library", "foo").with_variant("arm64"));
      let index = graph.index();

      assert_eq!(index.len(), 2);
      assert_eq!(index.find(&DepRef::new("libfoo", "")).map(|m| m.variant.as_str()), Some(""));
      assert_eq!(index.find(&DepRef::new("libfoo", "arm64")).map(|m| m.variant.as_str()), Some("arm64"));
      assert!(index.find(&DepRef::new("libfoo", "x86")).is_none());
      assert!(index.find(&DepRef::new("libbar", "")).is_none());
    }

    #[test]
    fn duplicate_reference_resolves_to_lowest_directory() {
      let forward = ModuleGraph::new()
        .with_module(Module::new("libfoo", "cc_library", "z"))
        .with_module(Module::new("libfoo", "cc_library", "a"));
      let mut backward = forward.clone();
      backward.modules.reverse();

      for graph in [&forward, &backward] {
        let found = graph.index().find(&DepRef::new("libfoo", "")).map(|m| m.dir.clone());
        assert_eq!(found.as_deref(), Some("a"));
      }
    }

    #[test]
    fn indexes_large_graphs() {
      let mut graph = ModuleGraph::new();
      for i in 0..20_000 {
        graph = graph.with_module(Module::new(&format!("m{i}"), "cc_library", "big"));
      }
      let index = graph.index();

      assert_eq!(index.len(), 20_000);
      assert_eq!(index.find(&DepRef::new("m19999", "")).map(|m| m.name.as_str()), Some("m19999"));
    }
  }

  #[test]
  fn describe_names_type_module_and_variant() {
    assert_eq!(Module::new("libfoo", "cc_library", "").describe(), r#"cc_library module "libfoo""#);
    assert_eq!(
      Module::new("libfoo", "cc_library", "").with_variant("arm64").describe(),
      r#"cc_library module "libfoo" variant "arm64""#
    );
  }

  #[test]
  fn variant_name_appends_variant() {
    assert_eq!(Module::new("libfoo", "cc_library", "").variant_name(), "libfoo");
    assert_eq!(
      Module::new("libfoo", "cc_library", "").with_variant("android_arm64").variant_name(),
      "libfoo__android_arm64"
    );
  }
}
