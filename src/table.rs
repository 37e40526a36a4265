use serde_json::Value;

/// A single record of a data source: column name to cell value.
/// Columns missing from a row are simply absent, never an error.
pub type Row = serde_json::Map<String, Value>;

/// Placeholder shown for absent, null or empty cells.
pub const EMPTY_CELL: &str = "-";

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Text shown for a cell in a rendered table.
pub fn display_cell(cell: Option<&Value>) -> String {
    match cell {
        None | Some(Value::Null) => EMPTY_CELL.to_string(),
        Some(Value::String(s)) if s.is_empty() => EMPTY_CELL.to_string(),
        Some(other) => value_text(other),
    }
}

/// Numeric view of a cell without coercion. Only JSON numbers qualify.
pub fn as_number(value: &Value) -> Option<f64> {
    value.as_f64()
}

/// Numeric coercion used by aggregation and range filters. Numbers pass
/// through, numeric strings are parsed, everything else is rejected.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Lowercased textual sort key. Absent and null cells sort as the empty
/// string so they group at the start of an ascending sort.
pub fn sort_text(cell: Option<&Value>) -> String {
    match cell {
        None | Some(Value::Null) => String::new(),
        Some(value) => value_text(value).to_lowercase(),
    }
}

/// Grouping key for categorical aggregation. Scalars keep their natural
/// textual form; absent and null cells share the empty key.
pub fn group_key(cell: Option<&Value>) -> String {
    match cell {
        None | Some(Value::Null) => String::new(),
        Some(value) => value_text(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn display_cell_uses_placeholder_for_missing_values() {
        assert_eq!(display_cell(None), "-");
        assert_eq!(display_cell(Some(&Value::Null)), "-");
        assert_eq!(display_cell(Some(&json!(""))), "-");
        assert_eq!(display_cell(Some(&json!("east"))), "east");
        assert_eq!(display_cell(Some(&json!(0))), "0");
        assert_eq!(display_cell(Some(&json!(false))), "false");
    }

    #[test]
    fn coerce_number_accepts_numeric_strings_only() {
        assert_eq!(coerce_number(&json!(12.5)), Some(12.5));
        assert_eq!(coerce_number(&json!(" 42 ")), Some(42.0));
        assert_eq!(coerce_number(&json!("1e3")), Some(1000.0));
        assert_eq!(coerce_number(&json!("abc")), None);
        assert_eq!(coerce_number(&json!("")), None);
        assert_eq!(coerce_number(&json!(true)), None);
        assert_eq!(coerce_number(&Value::Null), None);
    }

    #[test]
    fn sort_text_lowercases_and_defaults_to_empty() {
        assert_eq!(sort_text(Some(&json!("East"))), "east");
        assert_eq!(sort_text(Some(&json!(10))), "10");
        assert_eq!(sort_text(None), "");
        assert_eq!(sort_text(Some(&Value::Null)), "");
    }
}
