//! `bosun init` command

use anyhow::Result;

use crate::cli::InitArgs;
use bosun::ops::init_workspace;

pub fn execute(args: InitArgs) -> Result<()> {
    let dir = match args.path {
        Some(path) => path,
        None => std::env::current_dir()?,
    };

    let path = init_workspace(&dir)?;
    println!("Created {}", path.display());
    Ok(())
}
