//! Bosun - a BUILD-file linter and dependency-graph query tool.
//!
//! This crate provides the core library functionality for bosun:
//! build-file parsing, the target model, structural validation, and
//! dependency-graph queries over per-directory `BUILD.toml` declarations.

pub mod core;
pub mod ops;
pub mod util;

/// Test fixtures for bosun unit tests.
///
/// Only compiled for tests. Provides a workspace fixture that
/// materializes build files and source trees into a temp directory.
#[cfg(test)]
pub mod test_support;

pub use self::core::{
    address::Address, build_file::BuildFile, graph::TargetGraph, owners::SourceIndex,
    target::Target, target::TargetKind, workspace::Workspace,
};

pub use util::context::GlobalContext;
