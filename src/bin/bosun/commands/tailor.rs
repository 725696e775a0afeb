//! `bosun tailor` command

use anyhow::Result;

use crate::cli::TailorArgs;
use crate::commands::load_workspace;
use bosun::core::owners::SourceIndex;
use bosun::ops::{render_stanzas, tailor, write_stanzas};

pub fn execute(args: TailorArgs) -> Result<()> {
    let ws = load_workspace()?;
    let index = SourceIndex::build(&ws)?;
    let proposals = tailor(&ws, &index)?;

    if proposals.is_empty() {
        println!("Nothing to tailor: every recognized file has an owner");
        return Ok(());
    }

    if args.write {
        let touched = write_stanzas(&ws, &proposals)?;
        for proposal in &proposals {
            println!("Added {} ({})", proposal.address(), proposal.kind);
        }
        println!(
            "Updated {} build file{}",
            touched,
            if touched == 1 { "" } else { "s" }
        );
    } else {
        print!("{}", render_stanzas(&proposals));
        eprintln!("\nRe-run with --write to apply");
    }

    Ok(())
}
