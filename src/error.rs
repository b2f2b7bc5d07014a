//! Structured error types for gridview.
//!
//! Only genuinely exceptional conditions surface as errors (an invalid
//! schema payload, malformed JSON at a load boundary). Everything on the
//! render path degrades to a documented value instead of failing.

/// All errors that can occur while loading data into the grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// The schema payload did not have the expected shape.
    #[error("Invalid schema: {0}")]
    Schema(String),

    /// JSON (de)serialization error at a load boundary.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<String> for GridError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for GridError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
