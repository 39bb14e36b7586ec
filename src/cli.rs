use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::config::StashConfig;
use crate::connectors::Backend;
use crate::error::StashError;
use crate::render::{render_rows, RenderPolicy};
use crate::stash::QueryStasher;

/// Run a query against a configured connection, print the rendered table,
/// and stash it for later search.
pub async fn query_command(
    query: String,
    config_path: Option<PathBuf>,
    connection: Option<String>,
    tags: String,
    no_stash: bool,
) -> Result<()> {
    let config = StashConfig::load(config_path.as_deref())?;
    let (connection_name, connection_config) = config.connection(connection.as_deref())?;
    info!("running query against connection: {connection_name}");

    let backend = Backend::connect(connection_config).await?;
    let rows = backend.fetch_rows(&query).await?;
    debug!("fetched {} rows", rows.len());

    let policy = RenderPolicy::default();
    let rendered = match render_rows(rows, &policy) {
        Ok(rendered) => rendered,
        Err(err @ StashError::EmptyResult) => {
            println!("{}", err.user_message());
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    // Print before stashing so a broken stash never eats the table.
    let table_text = rendered.to_string();
    println!("{table_text}");

    if !no_stash {
        match QueryStasher::open_default().await {
            Ok(stasher) => {
                stasher
                    .stash(
                        &query,
                        &table_text,
                        &tags,
                        connection_name,
                        backend.type_name(),
                    )
                    .await?;
                debug!("query stashed");
            }
            Err(err) => warn!("could not open the stash database: {err}"),
        }
    }

    Ok(())
}

/// Full-text search over stashed queries and their rendered results.
pub async fn search_command(terms: Vec<String>, limit: u32, json: bool) -> Result<()> {
    let stasher = QueryStasher::open_default().await?;
    let hits = stasher.search(&terms.join(" "), limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }

    if hits.is_empty() {
        println!("No stashed queries matched");
        return Ok(());
    }

    for hit in &hits {
        println!(
            "{} [{}/{}]",
            hit.queried_at, hit.db_connection_type, hit.db_connection_name
        );
        if !hit.tags.is_empty() {
            println!("  tags: {}", hit.tags);
        }
        println!("  {}", hit.query_text);
        println!("  {}", hit.snippet);
        println!();
    }
    println!("{} stashed queries matched", hits.len());

    Ok(())
}

/// List the connections in the config file.
pub fn connections_command(config_path: Option<PathBuf>) -> Result<()> {
    let config = StashConfig::load(config_path.as_deref())?;
    for (name, connection) in &config.connections {
        println!("{name} ({})", connection.type_name());
    }
    Ok(())
}
