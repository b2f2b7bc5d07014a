//! gridview - interactive data-grid engine for the web
//!
//! The non-DOM brain of a browser data grid, compiled to WebAssembly:
//! - Filter/sort/projection engine over a typed column schema
//! - Content-driven column widths via cached canvas text measurement
//! - Row/column virtualization windows
//! - Multi-surface scroll synchronization behind one clamped offset
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { GridView } from 'gridview';
//! await init();
//! const grid = new GridView();
//! grid.loadSchema(schemaJson);
//! grid.loadRows(rowsJson);
//! grid.setViewportSize(width, height);
//! grid.attachSurface('body', 'both', bodyEl);
//! grid.attachSurface('header', 'x', headerEl);
//! ```

pub mod error;
pub mod filter;
pub mod layout;
pub mod payload;
pub mod sync;
pub mod types;
pub mod viewer;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub use error::{GridError, Result};
pub use viewer::GridCore;
#[cfg(target_arch = "wasm32")]
pub use viewer::GridView;

pub use types::*;

/// Parse a filter-state JSON payload and return its chip descriptions
/// without constructing a viewer. Useful for rendering saved views.
///
/// # Errors
/// Returns an error if either payload fails to parse.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = "describeFilter")]
pub fn describe_filter(
    filter_json: &str,
    schema_json: &str,
    expanded: bool,
) -> std::result::Result<JsValue, JsValue> {
    let state: FilterState = serde_json::from_str(filter_json).map_err(GridError::from)?;
    let schema = payload::parse_schema(schema_json)?;
    let chips = filter::describe(&state, &schema, expanded);
    serde_wasm_bindgen::to_value(&chips).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Get the library version
#[must_use]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
