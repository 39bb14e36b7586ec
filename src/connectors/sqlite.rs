use chrono::{NaiveDate, NaiveDateTime};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Row as SqlxRow, TypeInfo};
use std::path::Path;
use tracing::debug;

use crate::error::{StashError, StashResult};
use crate::types::{Row, Value};

/// Connect to a local SQLite file. The file must already exist; a typo'd
/// path should fail loudly instead of querying a fresh empty database.
pub async fn connect(path: &Path) -> StashResult<SqlitePool> {
    let options = SqliteConnectOptions::new().filename(path).read_only(true);
    debug!("connecting to sqlite at {}", path.display());
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(|e| StashError::database(format!("connect to sqlite at {}", path.display()), e))
}

pub async fn fetch_rows(pool: &SqlitePool, query: &str) -> StashResult<Vec<Row>> {
    let sqlite_rows = sqlx::query(query)
        .fetch_all(pool)
        .await
        .map_err(|e| StashError::database("execute sqlite query", e))?;
    Ok(sqlite_rows.iter().map(decode_row).collect())
}

fn decode_row(row: &SqliteRow) -> Row {
    let mut decoded = Row::with_capacity(row.columns().len());
    for (index, column) in row.columns().iter().enumerate() {
        let value = decode_value(row, index, column.type_info().name());
        decoded.insert(column.name().to_string(), value);
    }
    decoded
}

/// Decode one cell by its declared type. SQLite typing is dynamic, so the
/// fallback path matters more here than for the other backends.
fn decode_value(row: &SqliteRow, index: usize, type_name: &str) -> Value {
    match type_name {
        "INTEGER" => row
            .try_get::<Option<i64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Int)
            .unwrap_or(Value::Null),
        "REAL" => row
            .try_get::<Option<f64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Float)
            .unwrap_or(Value::Null),
        "DATETIME" => row
            .try_get::<Option<NaiveDateTime>, _>(index)
            .ok()
            .flatten()
            .map(Value::DateTime)
            .unwrap_or(Value::Null),
        "DATE" => row
            .try_get::<Option<NaiveDate>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::Text(v.to_string()))
            .unwrap_or(Value::Null),
        "BOOLEAN" => row
            .try_get::<Option<bool>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::Text(v.to_string()))
            .unwrap_or(Value::Null),
        "TEXT" => row
            .try_get::<Option<String>, _>(index)
            .ok()
            .flatten()
            .map(Value::Text)
            .unwrap_or(Value::Null),
        "NULL" => Value::Null,
        _ => row
            .try_get::<Option<String>, _>(index)
            .ok()
            .flatten()
            .map(Value::Text)
            .unwrap_or(Value::Null),
    }
}
