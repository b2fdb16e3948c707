// Copyright 2026 Benchscrape Contributors
// SPDX-License-Identifier: Apache-2.0

//! Command-line entry point.

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use benchscrape::cli::search_cmd::{self, SearchArgs};
use benchscrape::portal;

const EXAMPLES: &str = "\
Examples:
  # Search by name
  benchscrape search --name \"Doe, John\"

  # Search by case number
  benchscrape search --case-number 24TR123456

  # Search with date range
  benchscrape search --name \"Smith, Jane\" --opened-from 2024-01-01 --opened-to 2024-12-31

  # Save results to file
  benchscrape search --name \"Johnson, Bob\" --output results.json";

#[derive(Parser)]
#[command(
    name = "benchscrape",
    version,
    about = "Search court cases on Tyler Benchmark portals",
    after_help = EXAMPLES
)]
struct Cli {
    /// Portal base URL (default: COURT_BASE_URL env var, then the Atlanta
    /// Municipal Court)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for court cases
    Search(SearchArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let base_url = cli
        .base_url
        .clone()
        .or_else(|| std::env::var("COURT_BASE_URL").ok())
        .unwrap_or_else(|| portal::DEFAULT_BASE_URL.to_string());

    let result = match &cli.command {
        Commands::Search(args) => search_cmd::run(&base_url, args).await,
    };

    if let Err(err) = result {
        error!("command failed: {err:#}");
        std::process::exit(1);
    }
}

/// Logs go to stderr so piped JSON output stays clean. RUST_LOG overrides
/// the verbosity flag.
fn init_logging(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(default_level.into()))
        .with_writer(std::io::stderr)
        .init();
}
