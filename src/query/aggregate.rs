use crate::table::{coerce_number, group_key, Row};
use hashlink::LinkedHashMap;
use serde::Serialize;

/// One categorical slice: the shape charts consume directly.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryTotal {
    pub name: String,
    pub value: f64,
}

/// Group rows by the category column and sum the value column, keeping
/// groups in first-seen order. Non-numeric and missing values count as 0.
///
/// With `pre_aggregated` set the rows are taken as ready `(category,
/// value)` pairs and mapped through without summing.
pub fn aggregate_by_category(
    rows: &[Row],
    category: &str,
    value: &str,
    pre_aggregated: bool,
) -> Vec<CategoryTotal> {
    if pre_aggregated {
        return rows
            .iter()
            .map(|row| CategoryTotal {
                name: group_key(row.get(category)),
                value: row.get(value).and_then(coerce_number).unwrap_or(0.0),
            })
            .collect();
    }

    let mut totals: LinkedHashMap<String, f64> = LinkedHashMap::new();
    for row in rows {
        let key = group_key(row.get(category));
        let amount = row.get(value).and_then(coerce_number).unwrap_or(0.0);
        *totals.entry(key).or_insert(0.0) += amount;
    }
    totals
        .into_iter()
        .map(|(name, value)| CategoryTotal { name, value })
        .collect()
}
