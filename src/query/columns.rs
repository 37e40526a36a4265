/// Columns a table widget should display.
///
/// With no requested list every source column is shown. A requested list is
/// intersected with the source columns, keeping source order, so stale
/// names from an earlier binding drop out silently. An empty requested
/// list therefore selects nothing.
pub fn select_columns(source_columns: &[String], requested: Option<&[String]>) -> Vec<String> {
    match requested {
        Some(requested) => source_columns
            .iter()
            .filter(|column| requested.contains(column))
            .cloned()
            .collect(),
        None => source_columns.to_vec(),
    }
}
