//! `bosun check` command

use anyhow::Result;

use crate::cli::{CheckArgs, OutputFormat};
use crate::commands::load_workspace;
use bosun::ops::{check, format_report};

pub fn execute(args: CheckArgs, no_color: bool) -> Result<()> {
    let ws = load_workspace()?;
    let report = check(&ws)?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            let color = !no_color;
            eprint!("{}", format_report(&report, color));
        }
    }

    if report.has_errors() {
        std::process::exit(1);
    }
    Ok(())
}
