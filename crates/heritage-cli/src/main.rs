//! Heritage CLI - load site and boundary files and query them
//!
//! Every invocation builds the catalog from the files it is given, runs one
//! command against it, and exits.

mod cli;
mod commands;
mod config_loader;
mod output;
mod output_types;
mod session;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

fn main() -> Result<()> {
    // Logs go to stderr so `--json` output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    commands::execute(cli)
}
