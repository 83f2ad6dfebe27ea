//! Targets and packages.
//!
//! A [`Target`] is one generated unit of Bazel configuration. Targets are
//! collected per destination directory in [`Packages`] and turned into ordered
//! [`Package`]s by [`Packages::canonicalize`], the only place where the
//! unordered module collection gets a canonical order.
//!
//! # Submodules
//!
//! - [`extract`] - Module properties to target attributes

pub mod extract;
mod types;

pub use extract::{extract_attributes, module_target};
pub use types::*;
