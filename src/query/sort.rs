use crate::table::{as_number, sort_text, Row};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Active sort of a rendered table. UI-local state, never persisted.
/// `None` at the call sites means unsorted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortState {
    pub column: String,
    pub direction: SortDirection,
}

impl SortState {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Advance the sort state for a header click on `column`. Repeated clicks
/// on one column cycle unsorted -> ascending -> descending -> unsorted;
/// clicking a different column starts ascending there.
pub fn toggle_sort(current: Option<&SortState>, column: &str) -> Option<SortState> {
    match current {
        Some(state) if state.column == column => match state.direction {
            SortDirection::Asc => Some(SortState::desc(column)),
            SortDirection::Desc => None,
        },
        _ => Some(SortState::asc(column)),
    }
}

/// Stable in-place sort. When both cells are numbers they compare
/// numerically; otherwise both sides compare by their lowercased textual
/// form, with absent and null cells reading as empty strings.
pub fn sort_rows(rows: &mut [Row], sort: Option<&SortState>) {
    let Some(sort) = sort else {
        return;
    };
    rows.sort_by(|a, b| {
        let ord = compare_cells(a.get(&sort.column), b.get(&sort.column));
        match sort.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

fn compare_cells(a: Option<&serde_json::Value>, b: Option<&serde_json::Value>) -> Ordering {
    match (a.and_then(as_number), b.and_then(as_number)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => sort_text(a).cmp(&sort_text(b)),
    }
}
