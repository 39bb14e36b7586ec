//! Query history persistence.
//!
//! Every rendered query lands in a local SQLite FTS5 table so both the SQL
//! and the table text it produced are searchable later.

use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;
use tracing::{debug, info};

use crate::config::expand_home;
use crate::error::{StashError, StashResult};

pub const DEFAULT_STASH_DB_PATH: &str = "~/.query-stash.db";

const CREATE_TABLE_QUERY: &str = r#"
CREATE VIRTUAL TABLE IF NOT EXISTS queries USING fts5(
    query_text,
    results_as_table_text,
    tags,
    queried_at,
    db_connection_type,
    db_connection_name
)
"#;

const INSERT_ROW_QUERY: &str = r#"
INSERT INTO queries (
    query_text,
    results_as_table_text,
    tags,
    db_connection_type,
    db_connection_name,
    queried_at
)
VALUES (?, ?, ?, ?, ?, CURRENT_TIMESTAMP)
"#;

const SEARCH_QUERY: &str = r#"
SELECT
    query_text,
    snippet(queries, 1, '', '', '…', 20) AS snippet,
    tags,
    queried_at,
    db_connection_type,
    db_connection_name
FROM queries
WHERE queries MATCH ?
ORDER BY bm25(queries)
LIMIT ?
"#;

/// One full-text search hit from the stash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StashedQuery {
    pub query_text: String,
    pub snippet: String,
    pub tags: String,
    pub queried_at: String,
    pub db_connection_type: String,
    pub db_connection_name: String,
}

pub struct QueryStasher {
    pool: SqlitePool,
}

impl QueryStasher {
    /// Open (and create if missing) the stash at `~/.query-stash.db`.
    pub async fn open_default() -> StashResult<Self> {
        Self::open(&expand_home(DEFAULT_STASH_DB_PATH)).await
    }

    pub async fn open(db_path: &Path) -> StashResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);
        // A single connection: SQLite writes serialize anyway, and it keeps
        // an in-memory stash on one shared database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| StashError::database("open stash database", e))?;
        let stasher = Self { pool };
        stasher.init_schema().await?;
        Ok(stasher)
    }

    async fn init_schema(&self) -> StashResult<()> {
        sqlx::query(CREATE_TABLE_QUERY)
            .execute(&self.pool)
            .await
            .map_err(|e| StashError::database("create stash schema", e))?;
        debug!("stash schema ready");
        Ok(())
    }

    /// Stash one query together with its rendered table text.
    pub async fn stash(
        &self,
        query: &str,
        results_as_table_text: &str,
        tags: &str,
        db_connection_name: &str,
        db_connection_type: &str,
    ) -> StashResult<()> {
        sqlx::query(INSERT_ROW_QUERY)
            .bind(query)
            .bind(results_as_table_text)
            .bind(tags)
            .bind(db_connection_type)
            .bind(db_connection_name)
            .execute(&self.pool)
            .await
            .map_err(|e| StashError::database("stash query", e))?;
        debug!("stashed query against {db_connection_name}");
        Ok(())
    }

    /// Full-text search across stashed queries and their rendered results,
    /// best matches first.
    pub async fn search(&self, terms: &str, limit: u32) -> StashResult<Vec<StashedQuery>> {
        debug!("executing stash search: {terms}");
        let rows = sqlx::query(SEARCH_QUERY)
            .bind(terms)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StashError::database("search stash", e))?;

        let results: Vec<StashedQuery> = rows
            .into_iter()
            .map(|row| StashedQuery {
                query_text: row.get("query_text"),
                snippet: row.get("snippet"),
                tags: row.get("tags"),
                queried_at: row.get("queried_at"),
                db_connection_type: row.get("db_connection_type"),
                db_connection_name: row.get("db_connection_name"),
            })
            .collect();

        info!("found {} stashed queries", results.len());
        Ok(results)
    }
}
