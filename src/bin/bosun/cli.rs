//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Bosun - BUILD-file linting and dependency-graph queries for monorepos
#[derive(Parser)]
#[command(name = "bosun")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Mark the current directory as the workspace root
    Init(InitArgs),

    /// Validate every BUILD.toml in the workspace
    Check(CheckArgs),

    /// List declared targets
    List(ListArgs),

    /// Display the dependency tree of a target
    Tree(TreeArgs),

    /// Show what a target depends on
    Deps(DepsArgs),

    /// Show what depends on a target
    Rdeps(RdepsArgs),

    /// Propose targets for source files no target owns
    Tailor(TailorArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Directory to initialize (defaults to current directory)
    pub path: Option<std::path::PathBuf>,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only show targets of this kind (library, distribution, resources, test)
    #[arg(long)]
    pub kind: Option<String>,

    /// Only show targets carrying this tag
    #[arg(long)]
    pub tag: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct TreeArgs {
    /// Target address (e.g. //src/base:base)
    pub address: String,

    /// Maximum depth to display
    #[arg(short, long)]
    pub depth: Option<usize>,
}

#[derive(Args)]
pub struct DepsArgs {
    /// Target address (e.g. //src/base:base)
    pub address: String,

    /// Include transitive dependencies
    #[arg(long)]
    pub transitive: bool,
}

#[derive(Args)]
pub struct RdepsArgs {
    /// Target address (e.g. //src/base:base)
    pub address: String,

    /// Include transitive dependents
    #[arg(long)]
    pub transitive: bool,
}

#[derive(Args)]
pub struct TailorArgs {
    /// Write the proposed stanzas into the build files
    #[arg(long)]
    pub write: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
