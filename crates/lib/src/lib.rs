//! bp2build-lib: conversion of a build-module graph into Bazel build files.
//!
//! The engine reads a [`module::ModuleGraph`] and produces an ordered set of
//! [`plan::OutputFile`]s in one of two modes:
//! - `Bp2Build`: real build files that coexist with handcrafted ones
//! - `QueryView`: a mirror of the module-type schema for `bazel query`
//!
//! [`convert::convert`] runs the whole pipeline. Everything up to it is free of
//! I/O; [`config`], [`module::ModuleGraph::load`] and [`output`] touch the disk.

pub mod alias;
pub mod config;
pub mod consts;
pub mod convert;
pub mod error;
pub mod filter;
pub mod module;
pub mod output;
pub mod plan;
pub mod render;
pub mod shim;
pub mod target;
pub mod toolchain;
pub mod util;
