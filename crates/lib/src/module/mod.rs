//! The module graph consumed by a conversion run.
//!
//! The graph is produced by an external evaluator and handed over as JSON. It
//! carries two things:
//! - `module_types`: a statically declared schema per module type, saying for
//!   each property its kind and whether it is user-settable
//! - `modules`: the modules themselves, in no meaningful order
//!
//! Nothing in this module knows about Bazel; see [`crate::target`] for how
//! modules become targets.

mod types;

pub use types::*;
