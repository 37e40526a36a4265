use crate::table::{coerce_number, Row};
use serde_json::{Map, Value};

/// Per-column predicate set. The value decides the predicate form: a scalar
/// means equality, an array means set membership, an object with a `min` or
/// `max` key means an inclusive range. Null and empty-string entries are
/// vacuous and match everything.
pub type FilterSpec = Map<String, Value>;

/// Keep the rows matching every filter entry, preserving input order.
pub fn apply_filters(rows: &[Row], filters: Option<&FilterSpec>) -> Vec<Row> {
    match filters {
        Some(filters) if !filters.is_empty() => rows
            .iter()
            .filter(|row| row_matches(row, filters))
            .cloned()
            .collect(),
        _ => rows.to_vec(),
    }
}

/// A row matches iff it satisfies every entry (logical AND).
pub fn row_matches(row: &Row, filters: &FilterSpec) -> bool {
    filters
        .iter()
        .all(|(column, predicate)| matches_predicate(row.get(column), predicate))
}

fn matches_predicate(cell: Option<&Value>, predicate: &Value) -> bool {
    match predicate {
        Value::Null => true,
        Value::String(s) if s.is_empty() => true,
        Value::Object(bounds) if bounds.contains_key("min") || bounds.contains_key("max") => {
            in_range(cell, bounds)
        }
        Value::Array(allowed) => cell.map_or(false, |cell| {
            allowed.iter().any(|value| values_equal(cell, value))
        }),
        scalar => cell.map_or(false, |cell| values_equal(cell, scalar)),
    }
}

/// Strict-type equality, except that all numbers compare by value.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn in_range(cell: Option<&Value>, bounds: &Map<String, Value>) -> bool {
    let min = bounds.get("min").filter(|v| !v.is_null());
    let max = bounds.get("max").filter(|v| !v.is_null());
    if min.is_none() && max.is_none() {
        return true;
    }
    let Some(cell) = cell else {
        return false;
    };
    if cell.is_null() {
        return false;
    }
    let above_min = min.map_or(true, |bound| {
        compare(cell, bound).map_or(false, |ord| ord.is_ge())
    });
    let below_max = max.map_or(true, |bound| {
        compare(cell, bound).map_or(false, |ord| ord.is_le())
    });
    above_min && below_max
}

/// Order a cell against a bound. String pairs compare lexicographically,
/// anything else is coerced numerically; non-coercible values fail the
/// predicate.
fn compare(cell: &Value, bound: &Value) -> Option<std::cmp::Ordering> {
    match (cell, bound) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => {
            let a = coerce_number(cell)?;
            let b = coerce_number(bound)?;
            a.partial_cmp(&b)
        }
    }
}
