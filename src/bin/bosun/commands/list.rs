//! `bosun list` command

use anyhow::Result;

use crate::cli::{ListArgs, OutputFormat};
use crate::commands::load_workspace;
use bosun::ops::{list_targets, ListFilter};

pub fn execute(args: ListArgs) -> Result<()> {
    let ws = load_workspace()?;

    let filter = ListFilter {
        kind: args.kind.as_deref().map(str::parse).transpose()?,
        tag: args.tag,
    };
    let entries = list_targets(&ws, &filter);

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Text => {
            for entry in entries {
                println!("{} ({})", entry.address, entry.kind);
            }
        }
    }

    Ok(())
}
