//! Human-readable filter chips.
//!
//! The chip bar always lists facets as projection, then sort, then
//! query. Expanded mode yields one chip per entry; collapsed mode
//! summarizes each multi-entry facet with a count (single entries keep
//! their expanded text). Entries referencing unknown columns are
//! skipped, matching the compile stage.

use serde::Serialize;

use crate::types::{
    ColumnSchema, ColumnType, FacetKind, FilterState, ProjectionOp, QueryOp, SortDirection,
};

/// One rendered chip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterChip {
    /// The facet this chip belongs to.
    pub facet: FacetKind,
    /// Column id, absent for collapsed summary chips.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    /// Display text.
    pub text: String,
}

/// Render the chip list for a filter state.
pub fn describe(state: &FilterState, schema: &ColumnSchema, expanded: bool) -> Vec<FilterChip> {
    let mut chips = Vec::new();
    projection_chips(state, schema, expanded, &mut chips);
    sort_chips(state, schema, expanded, &mut chips);
    query_chips(state, schema, expanded, &mut chips);
    chips
}

fn projection_chips(
    state: &FilterState,
    schema: &ColumnSchema,
    expanded: bool,
    chips: &mut Vec<FilterChip>,
) {
    let Some(projection) = &state.projection else {
        return;
    };
    let known: Vec<&str> = projection
        .columns
        .iter()
        .filter(|c| schema.contains(c))
        .map(String::as_str)
        .collect();
    if known.is_empty() {
        return;
    }
    if !expanded && known.len() > 1 {
        let text = match projection.op {
            ProjectionOp::Include => format!("{} columns shown", known.len()),
            ProjectionOp::Exclude => format!("{} columns hidden", known.len()),
        };
        chips.push(FilterChip {
            facet: FacetKind::Projection,
            column: None,
            text,
        });
        return;
    }
    for column in known {
        let title = column_title(schema, column);
        let text = match projection.op {
            ProjectionOp::Include => format!("Show '{title}'"),
            ProjectionOp::Exclude => format!("Hide '{title}'"),
        };
        chips.push(FilterChip {
            facet: FacetKind::Projection,
            column: Some(column.to_string()),
            text,
        });
    }
}

fn sort_chips(
    state: &FilterState,
    schema: &ColumnSchema,
    expanded: bool,
    chips: &mut Vec<FilterChip>,
) {
    let known: Vec<(&str, SortDirection, ColumnType)> = state
        .sort
        .iter()
        .filter_map(|(column, direction)| {
            schema
                .column(column)
                .map(|c| (column.as_str(), *direction, c.column_type))
        })
        .collect();
    if known.is_empty() {
        return;
    }
    if !expanded && known.len() > 1 {
        chips.push(FilterChip {
            facet: FacetKind::Sort,
            column: None,
            text: format!("Sorted by {} columns", known.len()),
        });
        return;
    }
    for (column, direction, column_type) in known {
        let title = column_title(schema, column);
        let range = match (column_type, direction) {
            (ColumnType::String, SortDirection::Ascending) => "A - Z",
            (ColumnType::String, SortDirection::Descending) => "Z - A",
            (_, SortDirection::Ascending) => "1 - 9",
            (_, SortDirection::Descending) => "9 - 1",
        };
        chips.push(FilterChip {
            facet: FacetKind::Sort,
            column: Some(column.to_string()),
            text: format!("Sort '{title}' {range}"),
        });
    }
}

fn query_chips(
    state: &FilterState,
    schema: &ColumnSchema,
    expanded: bool,
    chips: &mut Vec<FilterChip>,
) {
    let known: Vec<_> = state
        .query
        .iter()
        .filter(|(column, _)| schema.contains(column))
        .collect();
    if known.is_empty() {
        return;
    }
    if !expanded && known.len() > 1 {
        chips.push(FilterChip {
            facet: FacetKind::Query,
            column: None,
            text: format!("{} conditions", known.len()),
        });
        return;
    }
    for (column, rule) in known {
        let title = column_title(schema, column);
        let operand = &rule.operand;
        let text = match rule.op {
            QueryOp::Eq => format!("'{title}' is '{operand}'"),
            QueryOp::Ne => format!("'{title}' is not '{operand}'"),
            QueryOp::Gt => format!("'{title}' over '{operand}'"),
            QueryOp::Lt => format!("'{title}' under '{operand}'"),
        };
        chips.push(FilterChip {
            facet: FacetKind::Query,
            column: Some(column.clone()),
            text,
        });
    }
}

fn column_title<'a>(schema: &'a ColumnSchema, column: &'a str) -> &'a str {
    schema.column(column).map_or(column, |c| c.title.as_str())
}
