//! Property eligibility for attribute generation.
//!
//! A property becomes an attribute only if:
//! - its name is not in [`IGNORED_PROPERTY_NAMES`]
//! - it is exported and not mutator-only
//! - its kind is not `interface`
//!
//! Everything here is a pure function of the property name and its schema entry.

use crate::consts::IGNORED_PROPERTY_NAMES;
use crate::error::SchemaError;
use crate::module::{ModuleTypeSchema, PropertyDescriptor, PropertyKind};

/// False for blocklisted property names.
pub fn should_generate_attribute(name: &str) -> bool {
  !IGNORED_PROPERTY_NAMES.contains(&name)
}

/// True for properties that exist only for internal bookkeeping, and for
/// interface-typed properties.
pub fn should_skip_property(descriptor: &PropertyDescriptor) -> bool {
  !descriptor.exported || descriptor.mutated || descriptor.kind == PropertyKind::Interface
}

/// Decide whether a declared property becomes an attribute.
///
/// # Errors
///
/// Returns [`SchemaError::UnsupportedKind`] for an otherwise eligible property
/// whose kind is not understood.
pub fn is_eligible(module_type: &str, name: &str, descriptor: &PropertyDescriptor) -> Result<bool, SchemaError> {
  if !should_generate_attribute(name) || should_skip_property(descriptor) {
    return Ok(false);
  }
  if let PropertyKind::Unsupported(kind) = &descriptor.kind {
    return Err(SchemaError::UnsupportedKind {
      module_type: module_type.to_string(),
      property: name.to_string(),
      kind: kind.clone(),
    });
  }
  Ok(true)
}

/// Eligible properties of a module type with a supported kind, sorted by name.
///
/// Unsupported kinds are left out rather than reported: a schema may declare
/// one that no module sets. [`is_eligible`] fails once a module sets it.
pub fn eligible_properties(schema: &ModuleTypeSchema) -> Vec<(&str, &PropertyDescriptor)> {
  schema
    .properties
    .iter()
    .filter(|(name, descriptor)| should_generate_attribute(name) && !should_skip_property(descriptor))
    .filter(|(_, descriptor)| !matches!(descriptor.kind, PropertyKind::Unsupported(_)))
    .map(|(name, descriptor)| (name.as_str(), descriptor))
    .collect()
}
