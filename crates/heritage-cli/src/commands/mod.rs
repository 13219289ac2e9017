//! Command implementations

mod catalog;
mod config;
mod load;
mod query;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;
use crate::session::Session;
use anyhow::Result;

/// Execute a CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let session = Session::open(&cli)?;

    let needs_sites = !matches!(cli.command, Commands::Load | Commands::Counties | Commands::Config);
    if needs_sites && session.load.total_sites == 0 {
        output.warning("No sites loaded; pass --sites <FILE>");
    }

    match cli.command {
        Commands::Load => load::execute(&session, &output),
        Commands::Nearby(args) => query::nearby(args, &session, &output),
        Commands::Polygon(args) => query::polygon(args, &session, &output),
        Commands::Buffer(args) => query::buffer(args, &session, &output),
        Commands::Region(args) => query::region(args, &session, &output),
        Commands::Timeline(args) => query::timeline(args, &session, &output),
        Commands::Categories => catalog::categories(&session, &output),
        Commands::Counties => catalog::counties(&session, &output),
        Commands::Config => config::execute(&session, &output),
    }
}
