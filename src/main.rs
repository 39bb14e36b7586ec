use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use query_stash::cli;
use query_stash::logging::init_logging;

#[derive(Parser)]
#[command(name = "query-stash")]
#[command(about = "Run SQL against configured connections, render the results, and stash them for later search")]
struct Args {
    /// Log level for stderr diagnostics
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a query and stash the rendered result
    Query {
        /// SQL to run
        query: String,

        /// Path to the query-stash.toml config file
        #[arg(long)]
        config_path: Option<PathBuf>,

        /// Name of the configured connection to use
        #[arg(short, long)]
        connection: Option<String>,

        /// Free-form tags stored alongside the stashed query
        #[arg(short, long, default_value = "")]
        tags: String,

        /// Print the table without stashing it
        #[arg(long)]
        no_stash: bool,
    },

    /// Full-text search over stashed queries and their rendered results
    Search {
        /// Search terms (FTS5 query syntax)
        #[arg(required = true)]
        terms: Vec<String>,

        /// Maximum number of hits to print
        #[arg(short, long, default_value_t = 25)]
        limit: u32,

        /// Emit hits as JSON
        #[arg(long)]
        json: bool,
    },

    /// List configured connections
    Connections {
        /// Path to the query-stash.toml config file
        #[arg(long)]
        config_path: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    match args.command {
        Commands::Query {
            query,
            config_path,
            connection,
            tags,
            no_stash,
        } => cli::query_command(query, config_path, connection, tags, no_stash).await,
        Commands::Search { terms, limit, json } => cli::search_command(terms, limit, json).await,
        Commands::Connections { config_path } => cli::connections_command(config_path),
    }
}
