//! Core data structures for bosun.
//!
//! This module contains the foundational types used throughout bosun:
//! - Target addresses (`//dir:name`)
//! - Target declarations and kinds
//! - Build files and the workspace scan
//! - The dependency graph and the source-ownership index

pub mod address;
pub mod build_file;
pub mod graph;
pub mod owners;
pub mod target;
pub mod workspace;

pub use address::{Address, AddressError};
pub use build_file::{BuildFile, BUILD_FILE_NAME};
pub use graph::TargetGraph;
pub use owners::SourceIndex;
pub use target::{Target, TargetKind};
pub use workspace::{Workspace, CONFIG_FILE_NAME};
