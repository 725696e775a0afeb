//! Test utilities for bosun unit tests.

pub mod fixtures;

pub use fixtures::WorkspaceFixture;
