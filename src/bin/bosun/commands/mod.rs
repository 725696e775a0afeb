//! Command implementations

pub mod check;
pub mod completions;
pub mod deps;
pub mod init;
pub mod list;
pub mod rdeps;
pub mod tailor;
pub mod tree;

use anyhow::Result;
use bosun::core::workspace::Workspace;
use bosun::util::GlobalContext;

/// Discover the workspace root from the cwd and scan it.
pub fn load_workspace() -> Result<Workspace> {
    let ctx = GlobalContext::new()?;
    let root = ctx.require_root()?;
    Workspace::load(root, ctx.config().clone())
}
