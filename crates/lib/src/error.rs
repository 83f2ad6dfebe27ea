//! Errors raised by a conversion run.
//!
//! Every variant is fatal: a run either produces its complete output set or
//! returns one of these, never a partial result.

use thiserror::Error;

/// A module property that cannot be classified against its type's schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
  #[error("module '{module}' has unknown type '{module_type}'")]
  UnknownModuleType { module: String, module_type: String },

  #[error("property '{property}' is not declared by module type '{module_type}'")]
  UnknownProperty { module_type: String, property: String },

  #[error("property '{property}' of module type '{module_type}' has unsupported kind '{kind}'")]
  UnsupportedKind {
    module_type: String,
    property: String,
    kind: String,
  },

  /// Query view carries the module identity in attrs of the same name.
  #[error("property '{property}' of module type '{module_type}' clashes with a query view identity attr")]
  ReservedProperty { module_type: String, property: String },

  #[error("property '{property}' of module '{module}' should be {expected}, got {actual}")]
  KindMismatch {
    module: String,
    property: String,
    expected: String,
    actual: String,
  },
}

/// Errors that abort a conversion run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
  #[error(transparent)]
  Schema(#[from] SchemaError),

  /// Two targets resolved to the same name within one package.
  #[error("target name collision in //{package}:{name}: {first} and {second}")]
  NamingCollision {
    package: String,
    name: String,
    first: String,
    second: String,
  },

  /// Two compatibility entries share an internal name.
  #[error("alias '{name}' defined twice: {first} and {second}")]
  DuplicateAlias { name: String, first: String, second: String },

  #[error("label '{label}' for '{name}' is not rooted at '//'")]
  MalformedLabel { name: String, label: String },

  #[error("module '{module}' depends on unknown module '{dep}'")]
  UnknownDependency { module: String, dep: String },

  #[error("output file planned twice: {path}")]
  DuplicateOutput { path: String },
}
