//! Fixed names shared by the planners and renderers.

/// Basename of every generated build file, and of the namespace markers.
pub const GENERATED_BUILD_FILE_NAME: &str = "BUILD.bazel";

/// Basename of a checked-in, manually maintained build file.
pub const HANDCRAFTED_BUILD_FILE_NAME: &str = "BUILD";

/// Root workspace marker written in query view mode.
pub const WORKSPACE_FILE_NAME: &str = "WORKSPACE";

/// Directory holding the rule shims, the providers file and the module loader.
pub const QUERYVIEW_RULES_DIR: &str = "build/bazel/queryview_rules";

pub const PROVIDERS_FILE_NAME: &str = "providers.bzl";

pub const MODULE_LOADER_FILE_NAME: &str = "module.bzl";

/// Files written in query view mode on top of the package files and the rule shims:
/// `WORKSPACE`, root `BUILD.bazel`, rules `BUILD.bazel`, `providers.bzl` and `module.bzl`.
pub const QUERYVIEW_SCAFFOLDING_FILES: usize = 5;

/// Macro exported by the module loader. Every query view target is an invocation of it.
pub const MODULE_MACRO: &str = "bp_module";

/// Attrs carrying the module identity on every query view target.
pub const MODULE_IDENTITY_ATTRS: [&str; 4] = ["module_name", "module_type", "module_variant", "module_deps"];

/// Fallback rule used by the loader for module types without a shim.
pub const GENERIC_MODULE_RULE: &str = "generic_bp_module";

/// Provider returned by every shim rule.
pub const MODULE_PROVIDER: &str = "BpModuleInfo";

/// Separates a module name from its variant in query view target names.
pub const VARIANT_SEPARATOR: &str = "__";

pub const TOOLCHAIN_DIR: &str = "cc_toolchain";

pub const TOOLCHAIN_CONSTANTS_FILE_NAME: &str = "constants.bzl";

pub const ALIAS_DIR: &str = "module_name_to_label";

pub const ALIAS_RULE: &str = "alias";

/// Header of every generated build file in bp2build mode.
///
/// Tooling greps for this text; keep it verbatim.
pub const DISCLAIMER_HEADER: &str = "# READ THIS FIRST:
# This file was automatically generated by bp2build for the Bazel migration project.
# Feel free to edit or test it, but do *not* check it into your version control system.
";

pub const DEFAULT_VISIBILITY: &str = r#"package(default_visibility = ["//visibility:public"])"#;

pub const HANDCRAFTED_NOTICE: &str =
  "# This file contains generated targets and handcrafted targets that are manually managed in the source tree.";

pub const HANDCRAFTED_BANNER: &str = "# -----------------------------
# Section: Handcrafted targets.
# -----------------------------
";

/// Property names that never become attributes.
pub const IGNORED_PROPERTY_NAMES: &[&str] = &[
  "name",       // already the target's own name
  "from",       // reserved keyword
  "in",         // reserved keyword
  "size",       // reserved for tests
  "arch",       // interface-typed, not modeled yet
  "multilib",   // interface-typed, not modeled yet
  "target",     // interface-typed, not modeled yet
  "visibility", // Bazel has its own visibility semantics
  "features",   // collides with the built-in `features` attribute
];

/// Suffix that makes Bazel treat a rule as test-only.
pub const TEST_RULE_SUFFIX: &str = "_test";

/// Every label in the compatibility layer must start with this.
pub const LABEL_ROOT: &str = "//";
