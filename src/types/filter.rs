//! Filter state: the declarative value the engine compiles.
//!
//! A `FilterState` has three independent optional facets (projection,
//! sort, query). It is a pure value: deriving a new state never mutates
//! the original. Updates are explicit field-level copies, so nothing
//! non-serializable can be silently lost along the way.
//!
//! `sort` and `query` are ordered mappings stored as pair lists —
//! insertion order is tie-break priority and must survive JSON
//! round-trips.

use serde::{Deserialize, Serialize};

/// Whether a projection shows only the listed columns or hides them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum ProjectionOp {
    /// `1`: show only the listed columns, in their given order.
    Include,
    /// `-1`: hide the listed columns, keep schema order for the rest.
    Exclude,
}

impl TryFrom<i8> for ProjectionOp {
    type Error = String;

    fn try_from(v: i8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(ProjectionOp::Include),
            -1 => Ok(ProjectionOp::Exclude),
            other => Err(format!("projection op must be 1 or -1, got {other}")),
        }
    }
}

impl From<ProjectionOp> for i8 {
    fn from(op: ProjectionOp) -> i8 {
        match op {
            ProjectionOp::Include => 1,
            ProjectionOp::Exclude => -1,
        }
    }
}

/// Sort direction for one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum SortDirection {
    /// `1`
    Ascending,
    /// `-1`
    Descending,
}

impl TryFrom<i8> for SortDirection {
    type Error = String;

    fn try_from(v: i8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(SortDirection::Ascending),
            -1 => Ok(SortDirection::Descending),
            other => Err(format!("sort direction must be 1 or -1, got {other}")),
        }
    }
}

impl From<SortDirection> for i8 {
    fn from(dir: SortDirection) -> i8 {
        match dir {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        }
    }
}

/// Comparison operator of a query rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryOp {
    /// Stringified cell equals the operand.
    #[serde(rename = "=")]
    Eq,
    /// Inverse of `=`.
    #[serde(rename = "!=")]
    Ne,
    /// Numeric cell coercion greater than numeric operand.
    #[serde(rename = ">")]
    Gt,
    /// Numeric cell coercion less than numeric operand.
    #[serde(rename = "<")]
    Lt,
}

impl QueryOp {
    /// Parse the operator from its wire form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "=" => Some(QueryOp::Eq),
            "!=" => Some(QueryOp::Ne),
            ">" => Some(QueryOp::Gt),
            "<" => Some(QueryOp::Lt),
            _ => None,
        }
    }
}

/// One per-column predicate descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRule {
    /// Comparison operator.
    #[serde(rename = "operator")]
    pub op: QueryOp,
    /// Raw operand string; numeric operators coerce it on evaluation.
    pub operand: String,
}

/// Column show/hide selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    /// Show-only or hide.
    pub op: ProjectionOp,
    /// Ordered set of column ids. Empty list has no effect.
    pub columns: Vec<String>,
}

/// The three facet kinds, in their fixed description order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacetKind {
    /// Column show/hide selection.
    Projection,
    /// Multi-key row ordering.
    Sort,
    /// Per-column row predicates.
    Query,
}

impl FacetKind {
    /// Parse the facet kind from its wire form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "projection" => Some(FacetKind::Projection),
            "sort" => Some(FacetKind::Sort),
            "query" => Some(FacetKind::Query),
            _ => None,
        }
    }
}

/// A single facet entry to add to a `FilterState`.
#[derive(Debug, Clone, PartialEq)]
pub enum FacetEntry {
    /// Add a column to the projection and set its op.
    Projection {
        /// Column to show/hide.
        column: String,
        /// Show-only or hide; applies to the whole facet.
        op: ProjectionOp,
    },
    /// Add or replace a sort key. New keys append (lowest priority).
    Sort {
        /// Column to sort by.
        column: String,
        /// Ascending or descending.
        direction: SortDirection,
    },
    /// Add or replace a query rule for a column.
    Query {
        /// Column to constrain.
        column: String,
        /// Predicate descriptor.
        rule: QueryRule,
    },
}

/// Immutable, round-trippable filter/sort/projection state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    /// Column show/hide selection. `None` and an empty column list are
    /// both "no effect".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projection: Option<Projection>,
    /// Ordered sort keys, primary first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<(String, SortDirection)>,
    /// Ordered per-column query rules, ANDed together.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub query: Vec<(String, QueryRule)>,
}

impl FilterState {
    /// Whether no facet has any effect.
    pub fn is_empty(&self) -> bool {
        self.projection.as_ref().is_none_or(|p| p.columns.is_empty())
            && self.sort.is_empty()
            && self.query.is_empty()
    }

    /// Derive a new state with one facet entry added or replaced.
    /// The receiver is never mutated.
    #[must_use]
    pub fn with_entry(&self, entry: FacetEntry) -> FilterState {
        let mut next = self.clone();
        match entry {
            FacetEntry::Projection { column, op } => {
                let projection = next.projection.get_or_insert_with(|| Projection {
                    op,
                    columns: Vec::new(),
                });
                projection.op = op;
                if !projection.columns.contains(&column) {
                    projection.columns.push(column);
                }
            }
            FacetEntry::Sort { column, direction } => {
                if let Some(slot) = next.sort.iter_mut().find(|(c, _)| *c == column) {
                    slot.1 = direction;
                } else {
                    next.sort.push((column, direction));
                }
            }
            FacetEntry::Query { column, rule } => {
                if let Some(slot) = next.query.iter_mut().find(|(c, _)| *c == column) {
                    slot.1 = rule;
                } else {
                    next.query.push((column, rule));
                }
            }
        }
        next
    }

    /// Derive a new state with the entry for `column` removed from one
    /// facet. Removing the last projection column leaves the facet
    /// present with an empty column list.
    #[must_use]
    pub fn without_entry(&self, facet: FacetKind, column: &str) -> FilterState {
        let mut next = self.clone();
        match facet {
            FacetKind::Projection => {
                if let Some(projection) = next.projection.as_mut() {
                    projection.columns.retain(|c| c != column);
                }
            }
            FacetKind::Sort => next.sort.retain(|(c, _)| c != column),
            FacetKind::Query => next.query.retain(|(c, _)| c != column),
        }
        next
    }
}
