//! Schema-driven conversion of module properties into target attributes.

use std::collections::BTreeMap;

use serde_json::Value;

use super::types::{AttributeValue, Target, canonicalize_module_type};
use crate::error::SchemaError;
use crate::filter::{is_eligible, should_generate_attribute};
use crate::module::{Module, ModuleGraph, PropertyKind};

/// The target a module converts to: its name, its canonical rule class, and its
/// eligible attributes.
pub fn module_target(graph: &ModuleGraph, module: &Module) -> Result<Target, SchemaError> {
  let schema = graph.schema_for(module)?;
  let mut target = Target::from_module(&module.name, &canonicalize_module_type(&module.module_type), module);
  target.load = schema.load.clone();
  target.attributes = extract_attributes(graph, module)?;
  Ok(target)
}

/// Eligible, set properties of a module as attributes.
///
/// # Errors
///
/// - [`SchemaError::UnknownModuleType`] if the module's type has no schema
/// - [`SchemaError::UnknownProperty`] for a non-blocklisted property the schema does not declare
/// - [`SchemaError::UnsupportedKind`] / [`SchemaError::KindMismatch`] for values that
///   cannot be classified
pub fn extract_attributes(
  graph: &ModuleGraph,
  module: &Module,
) -> Result<BTreeMap<String, AttributeValue>, SchemaError> {
  let schema = graph.schema_for(module)?;

  let mut attributes = BTreeMap::new();
  for (name, value) in &module.properties {
    if !should_generate_attribute(name) {
      continue;
    }
    let descriptor = schema.properties.get(name).ok_or_else(|| SchemaError::UnknownProperty {
      module_type: module.module_type.clone(),
      property: name.clone(),
    })?;
    if !is_eligible(&module.module_type, name, descriptor)? || value.is_null() {
      continue;
    }
    let attribute = convert_value(&descriptor.kind, value).ok_or_else(|| SchemaError::KindMismatch {
      module: module.name.clone(),
      property: name.clone(),
      expected: descriptor.kind.to_string(),
      actual: json_type_name(value).to_string(),
    })?;
    attributes.insert(name.clone(), attribute);
  }
  Ok(attributes)
}

fn convert_value(kind: &PropertyKind, value: &Value) -> Option<AttributeValue> {
  match kind {
    PropertyKind::Bool => value.as_bool().map(AttributeValue::Bool),
    PropertyKind::Int => value.as_i64().map(AttributeValue::Int),
    PropertyKind::String => value.as_str().map(AttributeValue::from),
    PropertyKind::Label => value.as_str().map(AttributeValue::label),
    PropertyKind::StringList => convert_list(value, |v| v.as_str().map(AttributeValue::from)),
    PropertyKind::LabelList => convert_list(value, |v| v.as_str().map(AttributeValue::label)),
    PropertyKind::StringDict => convert_map(value, |v| v.as_str().map(AttributeValue::from)),
    PropertyKind::StringListDict => convert_map(value, |v| {
      convert_list(v, |item| item.as_str().map(AttributeValue::from))
    }),
    PropertyKind::Interface | PropertyKind::Unsupported(_) => None,
  }
}

fn convert_list(value: &Value, item: impl Fn(&Value) -> Option<AttributeValue>) -> Option<AttributeValue> {
  let items = value.as_array()?;
  items.iter().map(item).collect::<Option<Vec<_>>>().map(AttributeValue::List)
}

fn convert_map(value: &Value, entry: impl Fn(&Value) -> Option<AttributeValue>) -> Option<AttributeValue> {
  let entries = value.as_object()?;
  entries
    .iter()
    .map(|(k, v)| entry(v).map(|v| (k.clone(), v)))
    .collect::<Option<BTreeMap<_, _>>>()
    .map(AttributeValue::Map)
}

fn json_type_name(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "bool",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "list",
    Value::Object(_) => "dict",
  }
}
