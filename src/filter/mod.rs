//! Filter/sort/projection engine.
//!
//! Compiles a `FilterState` against a column schema into a
//! `CompiledFilter`: the visible column list plus a row transform that
//! filters, then sorts (filtering first so comparators only run over the
//! surviving rows). Projection restricts columns only, never rows, so it
//! is independent of the row stages.
//!
//! Compilation is pure and side-effect-free: identical inputs yield
//! identical outputs, safe to memoize. Facet entries referencing
//! column ids absent from the schema are ignored (logged at `warn`),
//! never fatal.

mod describe;
mod query;
mod sort;

pub use describe::{describe, FilterChip};

use std::cmp::Ordering;

use crate::types::{ColumnSchema, ColumnType, FilterState, ProjectionOp, QueryRule, Row, SortDirection};

/// The result of compiling a `FilterState` against a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFilter {
    visible_columns: Vec<String>,
    query: Vec<(String, QueryRule)>,
    sort: Vec<(String, SortDirection, ColumnType)>,
}

impl CompiledFilter {
    /// Visible column ids, in display order.
    pub fn visible_columns(&self) -> &[String] {
        &self.visible_columns
    }

    /// Whether any row constraint or ordering is configured.
    pub fn constrains_rows(&self) -> bool {
        !self.query.is_empty() || !self.sort.is_empty()
    }

    /// Filter then stably sort, returning references in display order.
    /// Rows are immutable snapshots; this never copies or mutates them.
    pub fn apply<'a>(&self, rows: &'a [Row]) -> Vec<&'a Row> {
        let mut out: Vec<&Row> = rows.iter().filter(|row| self.row_passes(row)).collect();
        if !self.sort.is_empty() {
            // sort_by is stable: full ties keep original relative order.
            out.sort_by(|a, b| self.compare_rows(a, b));
        }
        out
    }

    /// Like `apply`, but yields indices into `rows` instead of
    /// references.
    pub fn apply_indices(&self, rows: &[Row]) -> Vec<usize> {
        let mut out: Vec<usize> = rows
            .iter()
            .enumerate()
            .filter(|(_, row)| self.row_passes(row))
            .map(|(i, _)| i)
            .collect();
        if !self.sort.is_empty() {
            out.sort_by(|a, b| match (rows.get(*a), rows.get(*b)) {
                (Some(a), Some(b)) => self.compare_rows(a, b),
                _ => Ordering::Equal,
            });
        }
        out
    }

    /// Whether a row passes every configured query rule (logical AND).
    /// An empty query mapping imposes no constraint.
    pub fn row_passes(&self, row: &Row) -> bool {
        self.query
            .iter()
            .all(|(column, rule)| query::rule_passes(rule, &row.value(column)))
    }

    /// Multi-key comparison in sort-priority order. The first key
    /// producing a non-equal result settles the pair.
    pub fn compare_rows(&self, a: &Row, b: &Row) -> Ordering {
        for (column, direction, column_type) in &self.sort {
            let ord = sort::compare_values(*column_type, &a.value(column), &b.value(column));
            let ord = match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

/// Compile a filter state against a schema.
pub fn compile(state: &FilterState, schema: &ColumnSchema) -> CompiledFilter {
    let query = state
        .query
        .iter()
        .filter(|(column, _)| known_column(schema, column, "query"))
        .cloned()
        .collect();

    let sort = state
        .sort
        .iter()
        .filter_map(|(column, direction)| {
            schema
                .column(column)
                .map(|c| (column.clone(), *direction, c.column_type))
                .or_else(|| {
                    log::warn!("sort references unknown column '{column}', ignoring");
                    None
                })
        })
        .collect();

    CompiledFilter {
        visible_columns: project_columns(state, schema),
        query,
        sort,
    }
}

/// Resolve the visible column set and order from the projection facet.
///
/// An absent projection or an empty column list means every schema
/// column is visible, in schema order.
pub fn project_columns(state: &FilterState, schema: &ColumnSchema) -> Vec<String> {
    let projection = match &state.projection {
        Some(p) if !p.columns.is_empty() => p,
        _ => {
            return schema.columns().iter().map(|c| c.id.clone()).collect();
        }
    };

    match projection.op {
        // Show only the listed columns, in their given order.
        ProjectionOp::Include => projection
            .columns
            .iter()
            .filter(|column| known_column(schema, column, "projection"))
            .cloned()
            .collect(),
        // Hide the listed columns, keep schema order for the rest.
        ProjectionOp::Exclude => schema
            .columns()
            .iter()
            .filter(|c| !projection.columns.contains(&c.id))
            .map(|c| c.id.clone())
            .collect(),
    }
}

fn known_column(schema: &ColumnSchema, column: &str, facet: &str) -> bool {
    if schema.contains(column) {
        true
    } else {
        log::warn!("{facet} references unknown column '{column}', ignoring");
        false
    }
}
