use chrono::NaiveDateTime;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use std::fmt;

/// One result row: an ordered mapping from column name to cell value.
///
/// Every row of a result set carries the identical key set in the identical
/// order; the connectors guarantee this because they decode each row from the
/// same column list.
pub type Row = IndexMap<String, Value>;

/// A dynamically-typed cell value as produced by the database connectors.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    DateTime(NaiveDateTime),
    Text(String),
    Null,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// SQL NULL and float NaN both render as the null glyph and are excluded
    /// from column width statistics.
    pub fn is_null_like(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float(x) => x.is_nan(),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    /// The plain, unformatted string form of a value.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Decimal(d) => write!(f, "{d}"),
            Value::DateTime(d) => write!(f, "{}", d.format("%Y-%m-%d %H:%M:%S")),
            Value::Text(s) => f.write_str(s),
            Value::Null => f.write_str("∅"),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(d: NaiveDateTime) -> Self {
        Value::DateTime(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}
