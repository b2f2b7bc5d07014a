//! Row and cell value types.
//!
//! Rows are immutable snapshots. Filtering and sorting only select and
//! reorder references; nothing in the engine writes through a `Row`.

use serde::{Deserialize, Serialize};
use serde_json::Map;

/// A single cell value.
///
/// `Null` covers both absent and explicitly-null cells; the two are
/// indistinguishable to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Absent or null.
    Null,
    /// True/false.
    Bool(bool),
    /// Numeric.
    Number(f64),
    /// Text.
    Text(String),
}

impl CellValue {
    /// Stringified form used for display, `=`/`!=` comparison, and text
    /// measurement. Null stringifies to the empty string.
    pub fn display(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Number(n) => format!("{n}"),
            CellValue::Text(s) => s.clone(),
        }
    }

    /// Numeric form where one exists. Coercion policy for comparisons
    /// (what Null and unparseable text become) belongs to the caller.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Null => None,
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Convert from a raw JSON value at the network boundary.
    /// Unexpected shapes (objects, arrays) fall back to their string form.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => CellValue::Null,
            serde_json::Value::Bool(b) => CellValue::Bool(*b),
            serde_json::Value::Number(n) => CellValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => CellValue::Text(s.clone()),
            other => CellValue::Text(other.to_string()),
        }
    }
}

/// One dataset row: a stable id plus its per-column values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Stable row identifier.
    pub id: String,
    /// Values keyed by column id. Missing keys read as `Null`.
    pub values: Map<String, serde_json::Value>,
}

impl Row {
    /// Value for a column, `Null` when the column is absent.
    pub fn value(&self, column_id: &str) -> CellValue {
        self.values
            .get(column_id)
            .map(CellValue::from_json)
            .unwrap_or(CellValue::Null)
    }
}
