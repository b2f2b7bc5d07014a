//! Column schema types.
//!
//! The schema is a read-only description of the dataset's columns,
//! supplied by an external collaborator. The engine never mutates it;
//! column order is semantic (default visibility and `op = -1`
//! projections preserve it).

use serde::{Deserialize, Serialize};

/// Declared value type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Free-form text.
    String,
    /// Numeric values.
    Number,
    /// True/false values.
    Boolean,
}

/// A single column definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Unique, stable identifier.
    pub id: String,
    /// Display title shown in the header row.
    pub title: String,
    /// Declared value type.
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Whether a value is required on item creation.
    pub required: bool,
}

/// Ordered, read-only description of the dataset's columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    columns: Vec<Column>,
}

impl ColumnSchema {
    /// Build a schema from an ordered column list.
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// All columns in schema order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look up a column by id.
    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Whether a column id exists in the schema.
    pub fn contains(&self, id: &str) -> bool {
        self.column(id).is_some()
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
