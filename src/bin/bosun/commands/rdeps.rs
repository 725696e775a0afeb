//! `bosun rdeps` command

use anyhow::Result;

use crate::cli::RdepsArgs;
use crate::commands::load_workspace;
use bosun::core::graph::TargetGraph;
use bosun::ops::query::resolve_cli_address;

pub fn execute(args: RdepsArgs) -> Result<()> {
    let ws = load_workspace()?;
    let graph = TargetGraph::build(&ws);

    let address = resolve_cli_address(&graph, &args.address)?;
    let rdeps = if args.transitive {
        graph.transitive_rdeps(&address)
    } else {
        graph.rdeps(&address)
    };

    for rdep in rdeps {
        println!("{}", rdep);
    }

    Ok(())
}
