//! CLI integration tests for bp2build.

mod check_tests;
mod common;
mod generate_tests;
