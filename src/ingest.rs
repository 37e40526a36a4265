use crate::datasource::{DataSource, DataSourceRegistry};
use crate::table::Row;
use csv::ReaderBuilder;
use serde_json::Value;
use thiserror::Error;

/// Ingestion failure. Registry state is never touched on error.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV input has no header row")]
    EmptyInput,
}

/// Parsed tabular data: the header row and one map per record.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTable {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

/// Parse CSV text with a header row. Header names are trimmed, values are
/// dynamically typed (numbers, booleans, empty fields become null) and
/// blank lines are skipped. Records longer than the header lose their
/// extra fields; shorter records leave the remaining columns absent.
pub fn parse_csv(text: &str) -> Result<ParsedTable, ParseError> {
    let text = text.trim_start_matches('\u{feff}');
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let mut columns: Vec<String> = Vec::with_capacity(headers.len());
    for header in headers.iter() {
        if !columns.iter().any(|c| c == header) {
            columns.push(header.to_string());
        }
    }
    if columns.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = Row::new();
        for (header, field) in headers.iter().zip(record.iter()) {
            row.insert(header.to_string(), dynamic_type(field));
        }
        rows.push(row);
    }

    Ok(ParsedTable { columns, rows })
}

/// Parse CSV text into a ready [`DataSource`] with a fresh id and preview.
pub fn data_source_from_csv(name: &str, text: &str) -> Result<DataSource, ParseError> {
    let table = parse_csv(text)?;
    Ok(DataSource::new(name, table.columns, table.rows))
}

/// Full import flow: parse, register the new source and mark it active.
/// Returns the new source id.
pub fn ingest_csv(
    registry: &mut DataSourceRegistry,
    name: &str,
    text: &str,
) -> Result<String, ParseError> {
    let source = data_source_from_csv(name, text)?;
    let id = registry.add(source);
    registry.set_active(Some(&id));
    Ok(id)
}

/// Mirror the ingestion collaborator's typing: numeric-looking strings
/// become numbers, `true`/`false` become booleans, empty fields become
/// null and everything else stays text.
fn dynamic_type(field: &str) -> Value {
    if field.is_empty() {
        return Value::Null;
    }
    match field {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    let trimmed = field.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Value::from(n);
    }
    if looks_numeric(trimmed) {
        if let Ok(f) = trimmed.parse::<f64>() {
            if f.is_finite() {
                return Value::from(f);
            }
        }
    }
    Value::String(field.to_string())
}

/// Digits plus sign/exponent/decimal characters only. Keeps words like
/// "inf" and dates like "2024-01" out of the numeric path.
fn looks_numeric(s: &str) -> bool {
    s.bytes().any(|b| b.is_ascii_digit())
        && s.bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'.' | b'-' | b'+' | b'e' | b'E'))
}
