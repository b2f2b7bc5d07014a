//! Target-independent engine state.
//!
//! `GridCore` owns the schema, the live and archived rows, the current
//! `FilterState`, and the derived pipeline (compiled filter, layout,
//! synchronizer bounds). Every relevant state change runs the same
//! synchronous recompute; all stages are pure, so recomputing is always
//! safe.

use crate::error::{GridError, Result};
use crate::filter::{compile, describe, CompiledFilter, FilterChip};
use crate::layout::{GridLayout, LayoutWindow};
use crate::sync::{Axis, ScrollOffset, ScrollSurface, ViewportSync};
use crate::types::{
    ColumnSchema, FacetEntry, FacetKind, FilterState, ProjectionOp, QueryOp, QueryRule, Row,
    SortDirection,
};

/// The engine behind a grid view.
pub struct GridCore {
    schema: ColumnSchema,
    rows: Vec<Row>,
    archived: Vec<Row>,
    filter: FilterState,
    compiled: CompiledFilter,
    /// Display order as indices into `rows`.
    display: Vec<usize>,
    layout: GridLayout,
    sync: ViewportSync,
    viewport_width: f32,
    viewport_height: f32,
}

impl Default for GridCore {
    fn default() -> Self {
        Self::new()
    }
}

impl GridCore {
    /// An empty grid with no schema, rows, or viewport yet.
    pub fn new() -> Self {
        let schema = ColumnSchema::default();
        let filter = FilterState::default();
        let compiled = compile(&filter, &schema);
        Self {
            schema,
            rows: Vec::new(),
            archived: Vec::new(),
            filter,
            compiled,
            display: Vec::new(),
            layout: GridLayout::empty(),
            sync: ViewportSync::new(),
            viewport_width: 0.0,
            viewport_height: 0.0,
        }
    }

    // ------------------------------------------------------------------
    // Inputs
    // ------------------------------------------------------------------

    /// Replace the column schema.
    pub fn set_schema(&mut self, schema: ColumnSchema) {
        self.schema = schema;
        self.recompute();
    }

    /// Replace the full row set.
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
        self.archived.clear();
        self.recompute();
    }

    /// Append a newly created row.
    pub fn append_row(&mut self, row: Row) {
        self.rows.push(row);
        self.recompute();
    }

    /// Soft-delete a row by id. The row moves to the archived set so a
    /// later restore can reinsert it; the actual archive network call is
    /// the caller's responsibility. Returns whether the id was live.
    pub fn archive_row(&mut self, row_id: &str) -> bool {
        let Some(position) = self.rows.iter().position(|r| r.id == row_id) else {
            return false;
        };
        let row = self.rows.remove(position);
        self.archived.push(row);
        self.recompute();
        true
    }

    /// Restore an archived row by id. Returns whether the id was
    /// archived.
    pub fn restore_row(&mut self, row_id: &str) -> bool {
        let Some(position) = self.archived.iter().position(|r| r.id == row_id) else {
            return false;
        };
        let row = self.archived.remove(position);
        self.rows.push(row);
        self.recompute();
        true
    }

    /// Resize the viewport (zero means not yet mounted).
    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.viewport_width = width;
        self.viewport_height = height;
        self.recompute();
    }

    // ------------------------------------------------------------------
    // Filter state
    // ------------------------------------------------------------------

    /// Current filter state.
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Replace the filter state wholesale.
    pub fn set_filter(&mut self, filter: FilterState) {
        self.filter = filter;
        self.recompute();
    }

    /// Route a `(facet, column, operator, operand)` tuple from the
    /// filter-builder UI into a pure state derivation.
    ///
    /// # Errors
    /// Returns an error for an unknown facet kind, operator, or
    /// projection/sort direction value.
    pub fn add_filter_entry(
        &mut self,
        facet: &str,
        column: &str,
        operator: &str,
        operand: &str,
    ) -> Result<()> {
        let kind = FacetKind::parse(facet)
            .ok_or_else(|| GridError::Other(format!("unknown facet kind '{facet}'")))?;
        let entry = match kind {
            FacetKind::Projection => FacetEntry::Projection {
                column: column.to_string(),
                op: parse_signed::<ProjectionOp>(operand, "projection op")?,
            },
            FacetKind::Sort => FacetEntry::Sort {
                column: column.to_string(),
                direction: parse_signed::<SortDirection>(operand, "sort direction")?,
            },
            FacetKind::Query => FacetEntry::Query {
                column: column.to_string(),
                rule: QueryRule {
                    op: QueryOp::parse(operator)
                        .ok_or_else(|| GridError::Other(format!("unknown operator '{operator}'")))?,
                    operand: operand.to_string(),
                },
            },
        };
        self.filter = self.filter.with_entry(entry);
        self.recompute();
        Ok(())
    }

    /// Remove one facet entry.
    ///
    /// # Errors
    /// Returns an error for an unknown facet kind.
    pub fn remove_filter_entry(&mut self, facet: &str, column: &str) -> Result<()> {
        let kind = FacetKind::parse(facet)
            .ok_or_else(|| GridError::Other(format!("unknown facet kind '{facet}'")))?;
        self.filter = self.filter.without_entry(kind, column);
        self.recompute();
        Ok(())
    }

    /// Serialize the filter state for round-tripping.
    ///
    /// # Errors
    /// Returns `GridError::Json` on serialization failure.
    pub fn filter_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.filter)?)
    }

    /// Restore a previously serialized filter state.
    ///
    /// # Errors
    /// Returns `GridError::Json` when the JSON is not a filter state.
    pub fn set_filter_json(&mut self, json: &str) -> Result<()> {
        self.filter = serde_json::from_str(json)?;
        self.recompute();
        Ok(())
    }

    /// Human-readable filter chips.
    pub fn chips(&self, expanded: bool) -> Vec<FilterChip> {
        describe(&self.filter, &self.schema, expanded)
    }

    // ------------------------------------------------------------------
    // Outputs for the rendering layer
    // ------------------------------------------------------------------

    /// The column schema.
    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    /// Visible column ids in display order.
    pub fn visible_columns(&self) -> &[String] {
        self.compiled.visible_columns()
    }

    /// Rows in display order (filtered and sorted).
    pub fn display_rows(&self) -> Vec<&Row> {
        self.display
            .iter()
            .filter_map(|&i| self.rows.get(i))
            .collect()
    }

    /// Number of rows in display order.
    pub fn display_row_count(&self) -> usize {
        self.display.len()
    }

    /// Resolve a display index to its row id. Deletion/recovery network
    /// calls are delegated outward; this is the hook they need.
    pub fn row_id_at(&self, display_index: usize) -> Option<&str> {
        self.display
            .get(display_index)
            .and_then(|&i| self.rows.get(i))
            .map(|row| row.id.as_str())
    }

    /// Resolve an inclusive display-index range to row ids.
    pub fn row_ids_in_range(&self, start: usize, end: usize) -> Vec<String> {
        (start..=end)
            .filter_map(|i| self.row_id_at(i))
            .map(ToString::to_string)
            .collect()
    }

    /// The derived layout.
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// The visible row/column window at the current scroll offset.
    pub fn visible_window(&self) -> Option<LayoutWindow> {
        let offset = self.sync.offset();
        self.layout.visible_window(offset.x, offset.y)
    }

    // ------------------------------------------------------------------
    // Scroll coordination
    // ------------------------------------------------------------------

    /// Register a scrollable surface.
    pub fn register_surface(&mut self, name: &str, axis: Axis, surface: Box<dyn ScrollSurface>) {
        self.sync.register(name, axis, surface);
    }

    /// Remove a scrollable surface.
    pub fn unregister_surface(&mut self, name: &str) {
        self.sync.unregister(name);
    }

    /// A surface reported a native scroll.
    pub fn on_scroll(&mut self, origin: &str, x: Option<f32>, y: Option<f32>) {
        self.sync.handle_scroll(origin, x, y);
    }

    /// Top-level wheel input.
    pub fn on_wheel(&mut self, delta_x: f32, delta_y: f32) {
        self.sync.handle_wheel(delta_x, delta_y);
    }

    /// The authoritative scroll offset.
    pub fn scroll_offset(&self) -> ScrollOffset {
        self.sync.offset()
    }

    // ------------------------------------------------------------------

    /// Re-run the derived pipeline: compile, display order, layout,
    /// scroll bounds. Synchronous and idempotent.
    fn recompute(&mut self) {
        self.compiled = compile(&self.filter, &self.schema);
        self.display = self.compiled.apply_indices(&self.rows);
        let rows = &self.rows;
        let display_rows: Vec<&Row> = self
            .display
            .iter()
            .filter_map(|&i| rows.get(i))
            .collect();
        self.layout = GridLayout::compute(
            &self.schema,
            self.compiled.visible_columns(),
            &display_rows,
            self.viewport_width,
            self.viewport_height,
        );
        self.sync.set_bounds(self.layout.scroll_bounds());
    }
}

fn parse_signed<T: TryFrom<i8, Error = String>>(operand: &str, what: &str) -> Result<T> {
    let value: i8 = operand
        .trim()
        .parse()
        .map_err(|_| GridError::Other(format!("{what} must be 1 or -1, got '{operand}'")))?;
    T::try_from(value).map_err(GridError::Other)
}
