//! `bosun tree` command

use anyhow::Result;

use crate::cli::TreeArgs;
use crate::commands::load_workspace;
use bosun::core::graph::TargetGraph;
use bosun::ops::query::{render_tree, resolve_cli_address};

pub fn execute(args: TreeArgs) -> Result<()> {
    let ws = load_workspace()?;
    let graph = TargetGraph::build(&ws);

    let root = resolve_cli_address(&graph, &args.address)?;
    print!(
        "{}",
        render_tree(&graph, root, args.depth.unwrap_or(usize::MAX))
    );

    Ok(())
}
