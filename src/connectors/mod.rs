//! Database backends.
//!
//! Each backend connects from a [`ConnectionConfig`] and produces the
//! normalized `Vec<Row>` the renderer consumes. Row decoding lives with the
//! backend that owns the wire types; everything downstream only ever sees
//! [`crate::types::Value`].

pub mod mysql;
pub mod postgres;
pub mod sqlite;

use crate::config::ConnectionConfig;
use crate::error::StashResult;
use crate::types::Row;

/// A connected database backend, tagged by flavor.
pub enum Backend {
    Postgres(sqlx::PgPool),
    MySql(sqlx::MySqlPool),
    Sqlite(sqlx::SqlitePool),
}

impl Backend {
    pub async fn connect(config: &ConnectionConfig) -> StashResult<Self> {
        match config {
            ConnectionConfig::Postgres {
                host,
                port,
                user,
                password,
                dbname,
            } => postgres::connect(host, *port, user, password, dbname)
                .await
                .map(Backend::Postgres),
            ConnectionConfig::Mysql {
                host,
                port,
                user,
                password,
                dbname,
            } => mysql::connect(host, *port, user, password, dbname)
                .await
                .map(Backend::MySql),
            ConnectionConfig::Sqlite { path } => {
                sqlite::connect(path).await.map(Backend::Sqlite)
            }
        }
    }

    /// Run a query and decode every row into the ordered name -> value
    /// mapping the renderer expects.
    pub async fn fetch_rows(&self, query: &str) -> StashResult<Vec<Row>> {
        match self {
            Backend::Postgres(pool) => postgres::fetch_rows(pool, query).await,
            Backend::MySql(pool) => mysql::fetch_rows(pool, query).await,
            Backend::Sqlite(pool) => sqlite::fetch_rows(pool, query).await,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Backend::Postgres(_) => "postgres",
            Backend::MySql(_) => "mysql",
            Backend::Sqlite(_) => "sqlite",
        }
    }
}
