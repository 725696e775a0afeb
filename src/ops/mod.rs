//! High-level operations.
//!
//! This module contains the implementation of bosun commands; the binary
//! wraps these in thin clap handlers.

pub mod check;
pub mod init;
pub mod query;
pub mod tailor;

pub use check::{check, format_report, CheckReport, Finding};
pub use init::init_workspace;
pub use query::{list_targets, render_tree, ListEntry, ListFilter};
pub use tailor::{render_stanzas, tailor, write_stanzas, PutativeTarget};
