//! Shared fixtures for the integration tests.
#![allow(dead_code, clippy::unwrap_used)]

use gridview::payload::{parse_rows, parse_schema};
use gridview::{ColumnSchema, Row};

/// Four-column schema covering every declared column type.
pub fn people_schema() -> ColumnSchema {
    parse_schema(
        r#"{
            "properties": {
                "name": {"title": "Name", "type": "string"},
                "age": {"title": "Age", "type": "number"},
                "active": {"title": "Active", "type": "boolean"},
                "email": {"title": "Email", "type": "string"}
            },
            "required": ["name"]
        }"#,
    )
    .unwrap()
}

pub fn people_schema_json() -> &'static str {
    r#"{
        "properties": {
            "name": {"title": "Name", "type": "string"},
            "age": {"title": "Age", "type": "number"},
            "active": {"title": "Active", "type": "boolean"},
            "email": {"title": "Email", "type": "string"}
        },
        "required": ["name"]
    }"#
}

pub fn people_rows_json() -> &'static str {
    r#"[
        {"_id": "r1", "data_values": {"name": "Carol", "age": 34, "active": true, "email": "carol@example.com"}},
        {"_id": "r2", "data_values": {"name": "alice", "age": 29, "active": false, "email": "alice@example.com"}},
        {"_id": "r3", "data_values": {"name": "Bob", "age": 29, "active": true, "email": "bob@example.com"}},
        {"_id": "r4", "data_values": {"name": "Dave", "age": null, "active": null}},
        {"_id": "r5", "data_values": {"name": "erin", "age": 41, "active": false, "email": "erin@example.com"}}
    ]"#
}

pub fn people_rows() -> Vec<Row> {
    parse_rows(people_rows_json()).unwrap()
}

/// Display-order row ids for a slice of row references.
pub fn ids<'a>(rows: &'a [&'a Row]) -> Vec<&'a str> {
    rows.iter().map(|r| r.id.as_str()).collect()
}
