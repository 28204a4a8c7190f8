//! ax CLI - search Apps in Toss documentation from the terminal
//!
//! Each subcommand lives in its own module under `commands`.

use anyhow::Result;
use ax_core::Config;
use clap::Parser;

mod cli;
mod commands;
mod utils;

use cli::{Cli, Commands};
use utils::logging::initialize_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_logging(&cli)?;

    let config = Config::load()?;
    tracing::debug!("Using cache root {}", config.paths.cache_root.display());

    execute_command(cli, &config).await
}

async fn execute_command(cli: Cli, config: &Config) -> Result<()> {
    match cli.command {
        Commands::Search {
            corpus,
            query,
            limit,
            max_content_length,
        } => commands::search(corpus, &query, limit, max_content_length, config).await,
        Commands::Get { target, id } => commands::get_document(target, &id, config).await,
        Commands::List { target } => commands::list_documents(target, config).await,
    }
}
