//! `bosun deps` command

use anyhow::Result;

use crate::cli::DepsArgs;
use crate::commands::load_workspace;
use bosun::core::graph::TargetGraph;
use bosun::ops::query::resolve_cli_address;

pub fn execute(args: DepsArgs) -> Result<()> {
    let ws = load_workspace()?;
    let graph = TargetGraph::build(&ws);

    let address = resolve_cli_address(&graph, &args.address)?;
    let deps = if args.transitive {
        graph.transitive_deps(&address)
    } else {
        graph.deps(&address)
    };

    for dep in deps {
        println!("{}", dep);
    }

    Ok(())
}
