//! Per-type cell comparison for the multi-key sort.
//!
//! Null sort keys follow plain JS coercion (`Number(null)` is 0,
//! `String(null ?? "")` is "") — distinct from the query stage's
//! Null-is-1 quirk, which applies only to `>` / `<` predicates.

use std::cmp::Ordering;

use crate::types::{CellValue, ColumnType};

/// Compare two cell values under a column's declared type.
pub(crate) fn compare_values(column_type: ColumnType, a: &CellValue, b: &CellValue) -> Ordering {
    match column_type {
        ColumnType::Number | ColumnType::Boolean => {
            let (a, b) = (sort_number(a), sort_number(b));
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        ColumnType::String => collate(&a.display(), &b.display()),
    }
}

/// Numeric sort key: booleans as 0/1, Null and unparseable text as 0.
fn sort_number(cell: &CellValue) -> f64 {
    cell.as_number().unwrap_or(0.0)
}

/// Locale-style string comparison: case-insensitive primary order with a
/// codepoint tie-break so "a" and "A" stay distinguishable.
fn collate(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}
