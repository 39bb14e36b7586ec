use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Column, Row as SqlxRow, TypeInfo};
use tracing::debug;

use crate::error::{StashError, StashResult};
use crate::types::{Row, Value};

pub async fn connect(
    host: &str,
    port: u16,
    user: &str,
    password: &str,
    dbname: &str,
) -> StashResult<PgPool> {
    let url = format!("postgres://{user}:{password}@{host}:{port}/{dbname}");
    debug!("connecting to postgres at {host}:{port}/{dbname}");
    PgPoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .map_err(|e| StashError::database(format!("connect to postgres at {host}:{port}"), e))
}

pub async fn fetch_rows(pool: &PgPool, query: &str) -> StashResult<Vec<Row>> {
    let pg_rows = sqlx::query(query)
        .fetch_all(pool)
        .await
        .map_err(|e| StashError::database("execute postgres query", e))?;
    Ok(pg_rows.iter().map(decode_row).collect())
}

fn decode_row(row: &PgRow) -> Row {
    let mut decoded = Row::with_capacity(row.columns().len());
    for (index, column) in row.columns().iter().enumerate() {
        let value = decode_value(row, index, column.type_info().name());
        decoded.insert(column.name().to_string(), value);
    }
    decoded
}

/// Decode one cell by its declared type. Unknown types fall back to a string
/// rendition; anything undecodable becomes null rather than failing the row.
fn decode_value(row: &PgRow, index: usize, type_name: &str) -> Value {
    match type_name {
        "INT2" => row
            .try_get::<Option<i16>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::Int(i64::from(v)))
            .unwrap_or(Value::Null),
        "INT4" => row
            .try_get::<Option<i32>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::Int(i64::from(v)))
            .unwrap_or(Value::Null),
        "INT8" => row
            .try_get::<Option<i64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Int)
            .unwrap_or(Value::Null),
        "FLOAT4" => row
            .try_get::<Option<f32>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::Float(f64::from(v)))
            .unwrap_or(Value::Null),
        "FLOAT8" => row
            .try_get::<Option<f64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Float)
            .unwrap_or(Value::Null),
        "NUMERIC" => row
            .try_get::<Option<Decimal>, _>(index)
            .ok()
            .flatten()
            .map(Value::Decimal)
            .unwrap_or(Value::Null),
        "TIMESTAMP" => row
            .try_get::<Option<NaiveDateTime>, _>(index)
            .ok()
            .flatten()
            .map(Value::DateTime)
            .unwrap_or(Value::Null),
        "TIMESTAMPTZ" => row
            .try_get::<Option<DateTime<Utc>>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::DateTime(v.naive_utc()))
            .unwrap_or(Value::Null),
        "DATE" => row
            .try_get::<Option<NaiveDate>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::Text(v.to_string()))
            .unwrap_or(Value::Null),
        "BOOL" => row
            .try_get::<Option<bool>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::Text(v.to_string()))
            .unwrap_or(Value::Null),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => row
            .try_get::<Option<String>, _>(index)
            .ok()
            .flatten()
            .map(Value::Text)
            .unwrap_or(Value::Null),
        _ => row
            .try_get::<Option<String>, _>(index)
            .ok()
            .flatten()
            .map(Value::Text)
            .unwrap_or(Value::Null),
    }
}
