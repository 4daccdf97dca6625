//! specimen: build sample object graphs from type descriptors
//!
//! ## Example Usage
//!
//! ```bash
//! # A list of three widgets from a catalog file
//! specimen --catalog shop.json resolve "List<Widget>"
//!
//! # Greedy constructors, five items per collection, fixed seed
//! specimen --catalog shop.json resolve Order --greedy --count 5 --seed 7
//!
//! # Which constructors would be tried, in order
//! specimen --catalog shop.json candidates Order
//!
//! # Outline of the resolution graph
//! specimen graph
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod specimen_cli;

use specimen_cli::{candidates::CandidatesCmd, graph::GraphCmd, resolve::ResolveCmd};

#[derive(Parser)]
#[command(
    name = "specimen",
    author,
    version,
    about = "Build populated sample values from type descriptors"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON catalog of types, loaded on top of the built-in collection types
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Log resolution steps to stderr (RUST_LOG overrides the level)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a value of a type and print it as JSON
    Resolve(ResolveCmd),

    /// List constructor and factory candidates for a type, in try order
    Candidates(CandidatesCmd),

    /// Print the resolution graph
    Graph(GraphCmd),
}

fn main() -> Result<()> {
    let Cli {
        command,
        catalog,
        verbose,
    } = Cli::parse();

    if verbose {
        specimen_cli::init_logging();
    }

    let catalog = specimen_cli::load_catalog(catalog.as_deref())?;
    match command {
        Commands::Resolve(cmd) => cmd.execute(catalog),
        Commands::Candidates(cmd) => cmd.execute(catalog),
        Commands::Graph(cmd) => cmd.execute(catalog),
    }
}
