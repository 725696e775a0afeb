//! Bosun CLI - BUILD-file linting and dependency-graph queries

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("bosun=debug")
    } else {
        EnvFilter::new("bosun=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    // Execute command
    match cli.command {
        Commands::Init(args) => commands::init::execute(args),
        Commands::Check(args) => commands::check::execute(args, cli.no_color),
        Commands::List(args) => commands::list::execute(args),
        Commands::Tree(args) => commands::tree::execute(args),
        Commands::Deps(args) => commands::deps::execute(args),
        Commands::Rdeps(args) => commands::rdeps::execute(args),
        Commands::Tailor(args) => commands::tailor::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
