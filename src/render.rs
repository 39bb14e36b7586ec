//! Tabular rendering of query results.
//!
//! Takes the normalized rows a connector produced and turns them into an
//! aligned, fixed-width text table: header cleaning, per-column type
//! inference, formatting policy selection, cell formatting, and layout.
//! Result sets with more than one row render as a grid; a single row
//! renders pivoted (keys down the left, values down the right).

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::error::{StashError, StashResult};
use crate::types::{Row, Value};

pub const NULL_CHAR: char = '∅';

/// Column-name keywords that trigger thousands-separator formatting.
pub const COMMA_KEYWORDS: &[&str] = &[
    "sum", "count", "total", "num", "SUM", "COUNT", "TOTAL", "NUM", "ct", "CT",
];

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W").expect("valid regex"));

/// Immutable knobs for the rendering engine, injected rather than read from
/// globals so tests can pin behavior with a known policy.
#[derive(Debug, Clone)]
pub struct RenderPolicy {
    pub null_glyph: char,
    pub comma_keywords: Vec<String>,
}

impl Default for RenderPolicy {
    fn default() -> Self {
        Self {
            null_glyph: NULL_CHAR,
            comma_keywords: COMMA_KEYWORDS.iter().map(|kw| kw.to_string()).collect(),
        }
    }
}

impl RenderPolicy {
    /// Name-based heuristic for integer columns that read better with
    /// thousands separators: `count(*)`, `total_groups`, and plain plurals
    /// like `groups`. Intentionally never looks at values.
    pub fn should_format_with_commas(&self, column_name: &str) -> bool {
        let starts_with_comma_word = self
            .comma_keywords
            .iter()
            .any(|kw| column_name.starts_with(kw.as_str()));
        let ends_with_comma_word = self
            .comma_keywords
            .iter()
            .any(|kw| column_name.ends_with(&format!("_{kw}")));
        starts_with_comma_word || ends_with_comma_word || column_name.ends_with('s')
    }
}

/// The inferred semantic type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Integer,
    Decimal,
    DateTime,
    Text,
}

/// Guess a column's kind from its first and last row only.
///
/// Loosely-typed sources mix numeric and string values within one column;
/// a textual value at either end classifies the whole column as text.
/// This is a deliberate O(1) heuristic, not a full-column scan.
pub fn infer_kind(rows: &[Row], column_name: &str) -> Kind {
    let first = rows.first().and_then(|r| r.get(column_name));
    let last = rows.last().and_then(|r| r.get(column_name));
    if matches!(first, Some(Value::Text(_))) || matches!(last, Some(Value::Text(_))) {
        return Kind::Text;
    }
    match first {
        Some(Value::Int(_)) => Kind::Integer,
        Some(Value::Float(_)) | Some(Value::Decimal(_)) => Kind::Decimal,
        Some(Value::DateTime(_)) => Kind::DateTime,
        _ => Kind::Text,
    }
}

/// `YYYY-MM-DD HH:MM:SS`, left-justified to 19 characters.
pub fn pretty_datetime(d: &chrono::NaiveDateTime) -> String {
    let pretty = d.format("%Y-%m-%d %H:%M:%S").to_string();
    format!("{pretty:<19}")
}

/// Thousands-grouped integer, no fractional part.
pub fn pretty_int(n: i64) -> String {
    add_thousands_separator(&n.to_string())
}

/// Add thousands separators to the integer part of a numeric string.
fn add_thousands_separator(s: &str) -> String {
    let mut parts = s.splitn(2, '.');
    let integer_part = parts.next().unwrap_or_default();
    let decimal_part = parts.next();

    let negative = integer_part.starts_with('-');
    let digits: String = integer_part.chars().filter(|c| c.is_ascii_digit()).collect();

    let mut result = String::new();
    let len = digits.len();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    if negative {
        result = format!("-{result}");
    }
    if let Some(decimal) = decimal_part {
        result.push('.');
        result.push_str(decimal);
    }
    result
}

/// Strip trailing fractional zeros from a fixed-precision rendition,
/// keeping exactly one zero when the fraction would vanish entirely
/// (never emit a bare trailing `.`).
fn strip_trailing_zeros(fixed: &str) -> String {
    let stripped = fixed.trim_end_matches('0');
    if stripped.ends_with('.') {
        format!("{stripped}0")
    } else {
        stripped.to_string()
    }
}

/// How the cells of one column get rendered before padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formatter {
    /// The value's default string form.
    Plain,
    /// `YYYY-MM-DD HH:MM:SS` within a fixed 19-character field.
    DateTime,
    /// Eight fractional digits, trailing zeros stripped to one, grouped
    /// integer part.
    GenericDecimal,
    /// Thousands-grouped integer.
    CommaInt,
}

impl Formatter {
    /// Unpadded rendition of a value. Total: a value the formatter does not
    /// recognize falls back to its plain string form rather than failing,
    /// because a partially-wrong cell beats losing the whole table.
    /// Embedded newlines are stripped to protect the fixed-width grid.
    fn raw(&self, value: &Value) -> String {
        let rendered = match (self, value) {
            (Formatter::DateTime, Value::DateTime(d)) => pretty_datetime(d),
            (Formatter::GenericDecimal, Value::Float(x)) => {
                strip_trailing_zeros(&add_thousands_separator(&format!("{x:.8}")))
            }
            (Formatter::GenericDecimal, Value::Decimal(d)) => {
                strip_trailing_zeros(&add_thousands_separator(&format!("{d:.8}")))
            }
            (Formatter::GenericDecimal, Value::Int(i)) => {
                strip_trailing_zeros(&add_thousands_separator(&format!("{:.8}", *i as f64)))
            }
            (Formatter::CommaInt, Value::Int(i)) => pretty_int(*i),
            (Formatter::CommaInt, Value::Float(x)) => add_thousands_separator(&format!("{x:.0}")),
            _ => value.to_string(),
        };
        rendered.replace('\n', "")
    }
}

/// The render policy for one column: its normalized name, the formatter its
/// cells go through, and the fixed display width.
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub name: String,
    pub formatter: Formatter,
    pub width: usize,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, formatter: Formatter, width: usize) -> Self {
        Self {
            name: name.into(),
            formatter,
            width,
        }
    }

    /// Render one cell to exactly `width` characters: nulls become the glyph,
    /// long values are truncated to `width - 1` characters plus `…`, and
    /// everything is left-justified. Widths count characters, not bytes.
    pub fn transform(&self, value: &Value, width: Option<usize>, policy: &RenderPolicy) -> String {
        let width = width.unwrap_or(self.width);
        let rendered = if value.is_null_like() {
            let glyph = policy.null_glyph;
            match self.formatter {
                // Datetime columns have a wide fixed field; center the glyph.
                Formatter::DateTime => format!("{glyph:^19}"),
                _ => glyph.to_string(),
            }
        } else {
            self.formatter.raw(value)
        };
        justify(&rendered, width)
    }
}

/// Left-justify to `width` characters, truncating with a single `…` when the
/// value is too long. The output is always exactly `width` characters.
fn justify(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        format!("{s:<width$}")
    } else {
        let truncated: String = s.chars().take(width.saturating_sub(1)).collect();
        format!("{truncated}…")
    }
}

/// Clean one raw column header into a stable identifier: every non-word
/// character becomes `_`, then leading/trailing underscores are stripped.
/// `count(distinct barcode)` -> `count_distinct_barcode`, `one?` -> `one`.
pub fn clean_header(header: &str) -> String {
    let cleaned = NON_WORD.replace_all(header, "_");
    cleaned.trim_matches('_').to_string()
}

pub fn clean_headers(original_headers: &[String]) -> Vec<String> {
    original_headers.iter().map(|h| clean_header(h)).collect()
}

/// Rewrite every row with cleaned headers, preserving column order. Produces
/// a new row view; the caller's rows are left untouched. If two distinct
/// headers clean to the same name the last one wins, silently dropping a
/// column -- surprising, but pinned by test as the current behavior.
pub fn clean_column_headers(rows: &[Row]) -> StashResult<Vec<Row>> {
    let first = rows.first().ok_or(StashError::EmptyResult)?;
    let headers: Vec<String> = first.keys().cloned().collect();
    let cleaned = clean_headers(&headers);
    Ok(rows
        .iter()
        .map(|row| {
            let mut renamed = Row::with_capacity(row.len());
            for (old, new) in headers.iter().zip(&cleaned) {
                if let Some(value) = row.get(old) {
                    renamed.insert(new.clone(), value.clone());
                }
            }
            renamed
        })
        .collect())
}

/// Widest printable rendition across the column name and all values.
/// Headers are never truncated below their own display need.
fn max_printable_width(name: &str, values: &[&Value], formatter: Formatter) -> usize {
    let mut max_width = name.chars().count();
    for value in values {
        let width = formatter.raw(value).chars().count();
        if width > max_width {
            max_width = width;
        }
    }
    max_width
}

/// Map a column's inferred kind and name to a concrete formatter and width.
pub fn select_column_spec(
    column_name: &str,
    kind: Kind,
    non_null_values: &[&Value],
    policy: &RenderPolicy,
) -> ColumnSpec {
    match kind {
        Kind::DateTime => ColumnSpec::new(column_name, Formatter::DateTime, 19),
        Kind::Decimal => ColumnSpec::new(
            column_name,
            Formatter::GenericDecimal,
            max_printable_width(column_name, non_null_values, Formatter::GenericDecimal),
        ),
        Kind::Integer if policy.should_format_with_commas(column_name) => ColumnSpec::new(
            column_name,
            Formatter::CommaInt,
            max_printable_width(column_name, non_null_values, Formatter::CommaInt),
        ),
        Kind::Integer | Kind::Text => ColumnSpec::new(
            column_name,
            Formatter::Plain,
            max_printable_width(column_name, non_null_values, Formatter::Plain),
        ),
    }
}

fn join_items_to_pipes(items: &[String]) -> String {
    format!("| {} |", items.join(" | "))
}

/// A multi-row result set laid out as a fixed-width grid.
///
/// Can turn:
/// ```text
/// rows = [
///     {"id": 1, "name": "Sam"},
///     {"id": 2, "name": "Layla"},
///     {"id": 3, "name": "Jack Gabriel"},
/// ]
/// ```
///
/// into:
/// ```text
/// | id   | name     |
/// | ---- | -------- |
/// | 1    | Sam      |
/// | 2    | Layla    |
/// | 3    | Jack Ga… |
/// | ---- | -------- |
/// ```
#[derive(Debug, Clone)]
pub struct RenderedTable {
    pub column_specs: Vec<ColumnSpec>,
    pub rows: Vec<Row>,
    policy: RenderPolicy,
}

impl RenderedTable {
    pub fn new(column_specs: Vec<ColumnSpec>, rows: Vec<Row>, policy: RenderPolicy) -> Self {
        Self {
            column_specs,
            rows,
            policy,
        }
    }

    pub fn header_row(&self) -> String {
        let items: Vec<String> = self
            .column_specs
            .iter()
            .map(|spec| {
                let width = spec.width;
                if spec.name.chars().count() <= width {
                    format!("{:<width$}", spec.name).to_lowercase()
                } else {
                    let truncated: String = spec.name.chars().take(width - 1).collect();
                    format!("{truncated}…")
                }
            })
            .collect();
        join_items_to_pipes(&items)
    }

    pub fn break_line(&self) -> String {
        let items: Vec<String> = self
            .column_specs
            .iter()
            .map(|spec| "-".repeat(spec.width))
            .collect();
        join_items_to_pipes(&items)
    }

    fn make_printable_row(&self, row: &Row) -> String {
        let items: Vec<String> = self
            .column_specs
            .iter()
            .zip(row.values())
            .map(|(spec, value)| spec.transform(value, None, &self.policy))
            .collect();
        join_items_to_pipes(&items)
    }

    pub fn printable_rows(&self) -> String {
        self.rows
            .iter()
            .map(|row| self.make_printable_row(row))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for RenderedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n{}\n{}\n{}",
            self.header_row(),
            self.break_line(),
            self.printable_rows(),
            self.break_line()
        )
    }
}

/// A single-row result set laid out pivoted: one line per column, the key in
/// a narrow left column and the formatted value in a wide right column.
///
/// Can turn:
/// ```text
/// rows = [
///     {"id": 1, "name": "Sam"},
/// ]
/// ```
///
/// into:
/// ```text
/// | ---- | --- |
/// | id   | 1   |
/// | name | Sam |
/// | ---- | --- |
/// ```
#[derive(Debug, Clone)]
pub struct RenderedPivotedTable {
    pub column_specs: Vec<ColumnSpec>,
    pub rows: Vec<Row>,
    policy: RenderPolicy,
}

impl RenderedPivotedTable {
    pub fn new(column_specs: Vec<ColumnSpec>, rows: Vec<Row>, policy: RenderPolicy) -> Self {
        Self {
            column_specs,
            rows,
            policy,
        }
    }

    pub fn key_column_width(&self) -> usize {
        self.column_specs
            .iter()
            .map(|spec| spec.name.chars().count())
            .max()
            .unwrap_or(0)
    }

    pub fn values_column_width(&self) -> usize {
        self.column_specs
            .iter()
            .map(|spec| spec.width)
            .max()
            .unwrap_or(0)
    }

    pub fn break_line(&self) -> String {
        let key_line = "-".repeat(self.key_column_width());
        let value_line = "-".repeat(self.values_column_width());
        format!("| {key_line} | {value_line} |")
    }

    fn make_printable_row(&self, spec: &ColumnSpec, row: &Row) -> String {
        let key_width = self.key_column_width();
        let key = format!("{:<key_width$}", spec.name).to_lowercase();
        let value_width = Some(self.values_column_width());
        let value = match row.get(&spec.name) {
            Some(value) => spec.transform(value, value_width, &self.policy),
            None => spec.transform(&Value::Null, value_width, &self.policy),
        };
        join_items_to_pipes(&[key, value])
    }

    pub fn printable_rows(&self) -> String {
        let Some(row) = self.rows.first() else {
            return String::new();
        };
        self.column_specs
            .iter()
            .map(|spec| self.make_printable_row(spec, row))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for RenderedPivotedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n{}\n{}",
            self.break_line(),
            self.printable_rows(),
            self.break_line()
        )
    }
}

/// The final rendered value: grid for multi-row result sets, pivoted for a
/// single row.
#[derive(Debug, Clone)]
pub enum Rendered {
    Table(RenderedTable),
    Pivoted(RenderedPivotedTable),
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rendered::Table(table) => table.fmt(f),
            Rendered::Pivoted(pivoted) => pivoted.fmt(f),
        }
    }
}

/// Render rows with standard column specs: cleaned headers, comma-formatted
/// integer columns, cleanly-formatted datetimes.
pub fn render_rows(rows: Vec<Row>, policy: &RenderPolicy) -> StashResult<Rendered> {
    let rows = clean_column_headers(&rows)?;
    let first = rows.first().ok_or(StashError::EmptyResult)?;
    let column_names: Vec<String> = first.keys().cloned().collect();

    let mut column_specs = Vec::with_capacity(column_names.len());
    for column_name in &column_names {
        let kind = infer_kind(&rows, column_name);
        let values: Vec<&Value> = rows
            .iter()
            .filter_map(|row| row.get(column_name))
            .filter(|value| !value.is_null_like())
            .collect();
        column_specs.push(select_column_spec(column_name, kind, &values, policy));
    }

    if rows.len() == 1 {
        Ok(Rendered::Pivoted(RenderedPivotedTable::new(
            column_specs,
            rows,
            policy.clone(),
        )))
    } else {
        Ok(Rendered::Table(RenderedTable::new(
            column_specs,
            rows,
            policy.clone(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn row<const N: usize>(pairs: [(&str, Value); N]) -> Row {
        pairs
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }

    fn some_sunday() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2019, 3, 10)
            .unwrap()
            .and_hms_opt(15, 27, 34)
            .unwrap()
    }

    #[test]
    fn test_pretty_datetime_returns_readable_string() {
        assert_eq!("2019-03-10 15:27:34", pretty_datetime(&some_sunday()));
    }

    #[test]
    fn test_null_datetime_centers_the_glyph() {
        let spec = ColumnSpec::new("created_at", Formatter::DateTime, 19);
        let policy = RenderPolicy::default();
        assert_eq!(
            "         ∅         ",
            spec.transform(&Value::Null, None, &policy)
        );
    }

    #[test]
    fn test_transform_output_is_exactly_width_chars() {
        let spec = ColumnSpec::new("name", Formatter::Plain, 8);
        let policy = RenderPolicy::default();
        for value in [
            Value::from("Sam"),
            Value::from("Jack Gabriel"),
            Value::Int(7),
            Value::Null,
        ] {
            let cell = spec.transform(&value, None, &policy);
            assert_eq!(8, cell.chars().count(), "cell {cell:?}");
        }
    }

    #[test]
    fn test_transform_truncates_with_ellipsis() {
        let spec = ColumnSpec::new("name", Formatter::Plain, 8);
        let policy = RenderPolicy::default();
        assert_eq!(
            "Jack Ga…",
            spec.transform(&Value::from("Jack Gabriel"), None, &policy)
        );
    }

    #[test]
    fn test_transform_renders_null_as_glyph_not_literal() {
        let spec = ColumnSpec::new("x", Formatter::Plain, 4);
        let policy = RenderPolicy::default();
        assert_eq!("∅   ", spec.transform(&Value::Null, None, &policy));
        assert_eq!("∅   ", spec.transform(&Value::Float(f64::NAN), None, &policy));
    }

    #[test]
    fn test_transform_strips_embedded_newlines() {
        let spec = ColumnSpec::new("payload", Formatter::Plain, 6);
        let policy = RenderPolicy::default();
        assert_eq!(
            "[1,2] ",
            spec.transform(&Value::from("[1,\n2]"), None, &policy)
        );
    }

    #[test]
    fn test_clean_headers() {
        let headers = vec!["count(*)".to_string()];
        assert_eq!(vec!["count"], clean_headers(&headers));

        let headers = vec!["count(distinct wombats)".to_string()];
        assert_eq!(vec!["count_distinct_wombats"], clean_headers(&headers));

        let headers = vec!["sum(wombats)".to_string()];
        assert_eq!(vec!["sum_wombats"], clean_headers(&headers));

        let headers = vec!["one?".to_string()];
        assert_eq!(vec!["one"], clean_headers(&headers));
    }

    #[test]
    fn test_clean_column_headers_renames_across_rows() {
        let rows = vec![row([
            ("id", Value::Int(1)),
            ("count(distinct barcode)", Value::Int(27596962761)),
        ])];
        let cleaned = clean_column_headers(&rows).unwrap();
        let keys: Vec<&String> = cleaned[0].keys().collect();
        assert_eq!(vec!["id", "count_distinct_barcode"], keys);
        assert_eq!(Some(&Value::Int(27596962761)), cleaned[0].get("count_distinct_barcode"));
    }

    #[test]
    fn test_clean_column_headers_is_idempotent() {
        let rows = vec![row([("count_distinct_barcode", Value::Int(1))])];
        let once = clean_column_headers(&rows).unwrap();
        let twice = clean_column_headers(&once).unwrap();
        assert_eq!(once, twice);
    }

    // Two headers cleaning to the same name collapse to one column with the
    // later value. Pins the current last-write-wins behavior so any future
    // change is deliberate.
    #[test]
    fn test_header_collision_is_last_write_wins() {
        let rows = vec![row([("one?", Value::Int(1)), ("one!", Value::Int(2))])];
        let cleaned = clean_column_headers(&rows).unwrap();
        assert_eq!(1, cleaned[0].len());
        assert_eq!(Some(&Value::Int(2)), cleaned[0].get("one"));
    }

    #[test]
    fn test_clean_column_headers_fails_on_zero_rows() {
        assert!(matches!(
            clean_column_headers(&[]),
            Err(StashError::EmptyResult)
        ));
    }

    #[test]
    fn test_comma_heuristic_matches_count_columns() {
        let policy = RenderPolicy::default();
        assert!(policy.should_format_with_commas("count(*)"));
        assert!(policy.should_format_with_commas("count_this_thing"));
        assert!(policy.should_format_with_commas("this_thing_count"));
    }

    #[test]
    fn test_comma_heuristic_matches_sum_and_total_columns() {
        let policy = RenderPolicy::default();
        assert!(policy.should_format_with_commas("sum(*)"));
        assert!(policy.should_format_with_commas("sum_this_thing"));
        assert!(policy.should_format_with_commas("total"));
        assert!(policy.should_format_with_commas("total_groups"));
        assert!(policy.should_format_with_commas("this_thing_total"));
    }

    #[test]
    fn test_comma_heuristic_matches_plurals() {
        let policy = RenderPolicy::default();
        assert!(policy.should_format_with_commas("groups"));
    }

    #[test]
    fn test_comma_heuristic_knows_when_not_to_match() {
        let policy = RenderPolicy::default();
        assert!(!policy.should_format_with_commas("zcountz(*)"));
    }

    #[test]
    fn test_pretty_int_groups_thousands() {
        assert_eq!("1,234,567", pretty_int(1234567));
        assert_eq!("123", pretty_int(123));
        assert_eq!("-1,234", pretty_int(-1234));
    }

    #[test]
    fn test_decimal_formatting_strips_trailing_zeros_to_one() {
        let spec = ColumnSpec::new("amount", Formatter::GenericDecimal, 12);
        let policy = RenderPolicy::default();
        let cell = |v: Value| spec.transform(&v, None, &policy).trim_end().to_string();
        assert_eq!("2.5", cell(Value::Float(2.5)));
        assert_eq!("100.0", cell(Value::Float(100.0)));
        assert_eq!("1,234.5", cell(Value::Float(1234.5)));
        assert_eq!("0.125", cell(Value::Float(0.125)));
        assert_eq!("2.5", cell(Value::Decimal(Decimal::new(25, 1))));
    }

    #[test]
    fn test_infer_kind_uses_first_and_last_row_only() {
        let rows = vec![
            row([("n", Value::Int(1))]),
            row([("n", Value::from("not a number"))]),
            row([("n", Value::Int(3))]),
        ];
        // A textual middle row is invisible to the heuristic.
        assert_eq!(Kind::Integer, infer_kind(&rows, "n"));

        let rows = vec![
            row([("n", Value::Int(1))]),
            row([("n", Value::from("three"))]),
        ];
        assert_eq!(Kind::Text, infer_kind(&rows, "n"));

        let rows = vec![row([("d", Value::Float(0.5))]), row([("d", Value::Int(2))])];
        assert_eq!(Kind::Decimal, infer_kind(&rows, "d"));

        let rows = vec![row([("t", Value::DateTime(some_sunday()))])];
        assert_eq!(Kind::DateTime, infer_kind(&rows, "t"));
    }

    fn sample_table() -> RenderedTable {
        let rows = vec![
            row([("id", Value::Int(1)), ("name", Value::from("Sam"))]),
            row([("id", Value::Int(2)), ("name", Value::from("Layla"))]),
            row([("id", Value::Int(3)), ("name", Value::from("Jack Gabriel"))]),
        ];
        let column_specs = vec![
            ColumnSpec::new("id", Formatter::Plain, 4),
            ColumnSpec::new("name", Formatter::Plain, 8),
        ];
        RenderedTable::new(column_specs, rows, RenderPolicy::default())
    }

    #[test]
    fn test_table_formats_the_header_row() {
        assert_eq!("| id   | name     |", sample_table().header_row());
    }

    #[test]
    fn test_table_formats_break_lines() {
        assert_eq!("| ---- | -------- |", sample_table().break_line());
    }

    #[test]
    fn test_table_prints_itself() {
        let expected = "\
| id   | name     |
| ---- | -------- |
| 1    | Sam      |
| 2    | Layla    |
| 3    | Jack Ga… |
| ---- | -------- |";
        assert_eq!(expected, sample_table().to_string());
    }

    #[test]
    fn test_table_line_widths_are_constant() {
        let text = sample_table().to_string();
        let widths: Vec<usize> = text.lines().map(|line| line.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "{widths:?}");
    }

    fn sample_pivoted_table() -> RenderedPivotedTable {
        let rows = vec![row([("id", Value::Int(1)), ("name", Value::from("Sam"))])];
        let column_specs = vec![
            ColumnSpec::new("id", Formatter::Plain, 2),
            ColumnSpec::new("name", Formatter::Plain, 3),
        ];
        RenderedPivotedTable::new(column_specs, rows, RenderPolicy::default())
    }

    #[test]
    fn test_pivoted_table_knows_its_widths() {
        let it = sample_pivoted_table();
        assert_eq!(4, it.key_column_width());
        assert_eq!(3, it.values_column_width());
    }

    #[test]
    fn test_pivoted_table_break_line() {
        assert_eq!("| ---- | --- |", sample_pivoted_table().break_line());
    }

    #[test]
    fn test_pivoted_table_prints_itself() {
        let expected = "\
| ---- | --- |
| id   | 1   |
| name | Sam |
| ---- | --- |";
        assert_eq!(expected, sample_pivoted_table().to_string());
    }

    #[test]
    fn test_render_rows_handles_count_headers_and_commas() {
        let rows = vec![
            row([
                ("id", Value::Int(1)),
                ("count(distinct barcode)", Value::Int(100)),
            ]),
            row([
                ("id", Value::Int(2)),
                ("count(distinct barcode)", Value::Int(27596962761)),
            ]),
        ];
        let expected = "\
| id | count_distinct_barcode |
| -- | ---------------------- |
| 1  | 100                    |
| 2  | 27,596,962,761         |
| -- | ---------------------- |";
        let rendered = render_rows(rows, &RenderPolicy::default()).unwrap();
        assert_eq!(expected, rendered.to_string());
    }

    #[test]
    fn test_render_rows_pivots_a_single_row() {
        let rows = vec![row([
            ("id", Value::Int(1)),
            ("groups", Value::Int(27596962761)),
        ])];
        let expected = "\
| ------ | -------------- |
| id     | 1              |
| groups | 27,596,962,761 |
| ------ | -------------- |";
        let rendered = render_rows(rows, &RenderPolicy::default()).unwrap();
        assert!(matches!(rendered, Rendered::Pivoted(_)));
        assert_eq!(expected, rendered.to_string());
    }

    #[test]
    fn test_render_rows_fails_on_zero_rows() {
        assert!(matches!(
            render_rows(vec![], &RenderPolicy::default()),
            Err(StashError::EmptyResult)
        ));
    }

    #[test]
    fn test_render_rows_skips_nulls_when_sizing_columns() {
        let rows = vec![
            row([("id", Value::Int(1)), ("note", Value::Null)]),
            row([("id", Value::Int(2)), ("note", Value::Null)]),
        ];
        let expected = "\
| id | note |
| -- | ---- |
| 1  | ∅    |
| 2  | ∅    |
| -- | ---- |";
        let rendered = render_rows(rows, &RenderPolicy::default()).unwrap();
        assert_eq!(expected, rendered.to_string());
    }
}
