//! Layout engine: content-driven column widths and virtualization
//! parameters.
//!
//! This module handles:
//! - Measuring column widths from header/cell text via a cached
//!   off-screen measuring surface
//! - Pre-computing cumulative column positions for O(log n) lookup
//! - Deriving totals, scroll bounds, and the visible row/column window
//!
//! It supplies accurate per-index sizes and totals; rendering the
//! window is the caller's job.

mod grid_layout;
mod measure;

pub use grid_layout::{GridLayout, LayoutWindow, ScrollBounds};
pub use measure::{
    measured_text_width, HeuristicMeasurer, TextMeasure, BODY_FONT, CELL_PADDING_X, HEADER_FONT,
    MIN_COLUMN_WIDTH, ROW_HEIGHT,
};
