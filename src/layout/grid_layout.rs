//! Derived grid layout: column widths, totals, scroll bounds, and the
//! visible window.
//!
//! `GridLayout` is derived state, recomputed whenever the schema,
//! visible columns, rows, or viewport size change. It is never
//! persisted.

use crate::types::{ColumnSchema, Row};

use super::measure::{
    measured_text_width, TextMeasure, BODY_FONT, CELL_PADDING_X, HEADER_FONT, MIN_COLUMN_WIDTH,
    ROW_HEIGHT,
};

/// Maximum scroll offset per axis: `max(totalContent - viewport, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollBounds {
    /// Horizontal bound.
    pub x: f32,
    /// Vertical bound.
    pub y: f32,
}

/// Inclusive visible row/column index ranges for a scroll offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutWindow {
    /// First visible row index.
    pub row_start: usize,
    /// Last visible row index.
    pub row_end: usize,
    /// First visible column index.
    pub col_start: usize,
    /// Last visible column index.
    pub col_end: usize,
}

/// Pre-computed layout for the current grid contents.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    /// Per-column pixel widths, in visible-column order.
    col_widths: Vec<f32>,
    /// Cumulative positions (`col_positions[i]` = x of column i's left
    /// edge; one extra entry for the right edge of the last column).
    col_positions: Vec<f32>,
    row_count: usize,
    row_height: f32,
    viewport_width: f32,
    viewport_height: f32,
}

impl GridLayout {
    /// The degenerate zero-size layout (nothing to show, or no
    /// measuring surface / viewport yet).
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0, ROW_HEIGHT, 0.0, 0.0)
    }

    /// Build a layout from measured column widths.
    pub fn new(
        col_widths: Vec<f32>,
        row_count: usize,
        row_height: f32,
        viewport_width: f32,
        viewport_height: f32,
    ) -> Self {
        let mut col_positions = Vec::with_capacity(col_widths.len() + 1);
        let mut x = 0.0_f32;
        for width in &col_widths {
            col_positions.push(x);
            x += width;
        }
        col_positions.push(x);
        Self {
            col_widths,
            col_positions,
            row_count,
            row_height,
            viewport_width,
            viewport_height,
        }
    }

    /// Measure columns and build the layout for a viewport.
    ///
    /// A zero-size viewport short-circuits to the empty layout without
    /// performing any measurement; so does an unavailable measuring
    /// surface.
    pub fn compute(
        schema: &ColumnSchema,
        visible_columns: &[String],
        rows: &[&Row],
        viewport_width: f32,
        viewport_height: f32,
    ) -> Self {
        if viewport_width <= 0.0 || viewport_height <= 0.0 {
            return Self::empty();
        }
        // Probe the shared surface before walking any cells.
        if measured_text_width("", BODY_FONT).is_none() {
            return Self::empty();
        }
        struct Shared;
        impl TextMeasure for Shared {
            fn text_width(&mut self, text: &str, font: &str) -> f32 {
                measured_text_width(text, font).unwrap_or(0.0)
            }
        }
        let widths = measure_columns(schema, visible_columns, rows, MIN_COLUMN_WIDTH, &mut Shared);
        Self::new(widths, rows.len(), ROW_HEIGHT, viewport_width, viewport_height)
    }

    /// Per-column pixel widths.
    pub fn col_widths(&self) -> &[f32] {
        &self.col_widths
    }

    /// Number of visible columns.
    pub fn col_count(&self) -> usize {
        self.col_widths.len()
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Fixed row height in pixels.
    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    /// Viewport size this layout was computed for.
    pub fn viewport_size(&self) -> (f32, f32) {
        (self.viewport_width, self.viewport_height)
    }

    /// Total scrollable content width.
    pub fn total_content_width(&self) -> f32 {
        self.col_positions.last().copied().unwrap_or(0.0)
    }

    /// Total scrollable content height.
    #[allow(clippy::cast_precision_loss)]
    pub fn total_content_height(&self) -> f32 {
        self.row_count as f32 * self.row_height
    }

    /// Maximum scroll offset per axis.
    pub fn scroll_bounds(&self) -> ScrollBounds {
        ScrollBounds {
            x: (self.total_content_width() - self.viewport_width).max(0.0),
            y: (self.total_content_height() - self.viewport_height).max(0.0),
        }
    }

    /// Column index at an x position (binary search over cumulative
    /// positions), clamped to the last column.
    pub fn col_at_x(&self, x: f32) -> Option<usize> {
        if self.col_widths.is_empty() || x < 0.0 {
            return None;
        }
        let idx = match self
            .col_positions
            .binary_search_by(|pos| pos.partial_cmp(&x).unwrap_or(std::cmp::Ordering::Equal))
        {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        Some(idx.min(self.col_widths.len() - 1))
    }

    /// Row index at a y position, clamped to the last row.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn row_at_y(&self, y: f32) -> Option<usize> {
        if self.row_count == 0 || self.row_height <= 0.0 || y < 0.0 {
            return None;
        }
        let idx = (y / self.row_height).floor() as usize;
        Some(idx.min(self.row_count - 1))
    }

    /// Left edge of a column.
    pub fn col_position(&self, col: usize) -> f32 {
        self.col_positions.get(col).copied().unwrap_or(0.0)
    }

    /// The visible row/column window for a scroll offset, or `None`
    /// when there is nothing to show.
    pub fn visible_window(&self, offset_x: f32, offset_y: f32) -> Option<LayoutWindow> {
        let row_start = self.row_at_y(offset_y.max(0.0))?;
        let row_end = self
            .row_at_y(offset_y.max(0.0) + self.viewport_height)
            .unwrap_or(self.row_count.saturating_sub(1));
        let col_start = self.col_at_x(offset_x.max(0.0))?;
        let col_end = self
            .col_at_x(offset_x.max(0.0) + self.viewport_width)
            .unwrap_or(self.col_widths.len().saturating_sub(1));
        Some(LayoutWindow {
            row_start,
            row_end,
            col_start,
            col_end,
        })
    }
}

/// Measure per-column pixel widths for the visible columns.
///
/// Width = max(header title at header font, every stringified cell at
/// body font, `min_col_width`) plus horizontal padding and border
/// allowance.
pub fn measure_columns(
    schema: &ColumnSchema,
    visible_columns: &[String],
    rows: &[&Row],
    min_col_width: f32,
    measurer: &mut dyn TextMeasure,
) -> Vec<f32> {
    visible_columns
        .iter()
        .map(|column| {
            let title = schema.column(column).map_or(column.as_str(), |c| c.title.as_str());
            let mut content = measurer.text_width(title, HEADER_FONT);
            for row in rows {
                let text = row.value(column).display();
                if !text.is_empty() {
                    content = content.max(measurer.text_width(&text, BODY_FONT));
                }
            }
            content.max(min_col_width) + CELL_PADDING_X
        })
        .collect()
}
