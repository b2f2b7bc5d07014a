//! Boundary normalization of network payloads.
//!
//! The fetch collaborator delivers schema and rows as plain structured
//! data:
//!
//! ```json
//! { "properties": { "colId": { "title": "...", "type": "string" } },
//!   "required": ["colId"] }
//! ```
//!
//! ```json
//! [ { "_id": "...", "data_values": { "colId": 1 } } ]
//! ```
//!
//! This module is the one place that surfaces hard errors: a schema
//! payload of the wrong shape is `GridError::Schema`. Row cells of
//! unexpected JSON types degrade to their string form instead.

use serde::Deserialize;
use serde_json::Map;

use crate::error::{GridError, Result};
use crate::types::{Column, ColumnSchema, ColumnType, Row};

#[derive(Deserialize)]
struct SchemaProperty {
    title: String,
    #[serde(rename = "type")]
    column_type: ColumnType,
}

#[derive(Deserialize)]
struct SchemaPayload {
    // serde_json's preserve_order keeps the property order, which becomes
    // the schema column order.
    properties: Map<String, serde_json::Value>,
    #[serde(default)]
    required: Vec<String>,
}

#[derive(Deserialize)]
struct RowPayload {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    data_values: Map<String, serde_json::Value>,
}

/// Normalize a schema payload into a `ColumnSchema`.
///
/// # Errors
/// Returns `GridError::Schema` when the payload shape is invalid or a
/// property is not a valid column definition.
pub fn parse_schema(json: &str) -> Result<ColumnSchema> {
    let payload: SchemaPayload =
        serde_json::from_str(json).map_err(|e| GridError::Schema(e.to_string()))?;
    schema_from_payload(payload)
}

/// Normalize an already-parsed schema payload value.
///
/// # Errors
/// Returns `GridError::Schema` when the payload shape is invalid.
pub fn schema_from_value(value: serde_json::Value) -> Result<ColumnSchema> {
    let payload: SchemaPayload =
        serde_json::from_value(value).map_err(|e| GridError::Schema(e.to_string()))?;
    schema_from_payload(payload)
}

fn schema_from_payload(payload: SchemaPayload) -> Result<ColumnSchema> {
    let mut columns = Vec::with_capacity(payload.properties.len());
    for (id, value) in payload.properties {
        let property: SchemaProperty = serde_json::from_value(value)
            .map_err(|e| GridError::Schema(format!("property '{id}': {e}")))?;
        columns.push(Column {
            required: payload.required.iter().any(|r| *r == id),
            id,
            title: property.title,
            column_type: property.column_type,
        });
    }
    Ok(ColumnSchema::new(columns))
}

/// Normalize a row-list payload into engine rows.
///
/// # Errors
/// Returns `GridError::Json` when the payload is not a list of row
/// objects.
pub fn parse_rows(json: &str) -> Result<Vec<Row>> {
    let payload: Vec<RowPayload> = serde_json::from_str(json)?;
    Ok(payload.into_iter().map(row_from_payload).collect())
}

/// Normalize a single already-parsed row payload value.
///
/// # Errors
/// Returns `GridError::Json` when the value is not a row object.
pub fn row_from_value(value: serde_json::Value) -> Result<Row> {
    let payload: RowPayload = serde_json::from_value(value)?;
    Ok(row_from_payload(payload))
}

fn row_from_payload(payload: RowPayload) -> Row {
    Row {
        id: payload.id,
        values: payload.data_values,
    }
}
