//! The viewer: engine core plus the wasm-exported `GridView` facade.
//!
//! `GridCore` is plain Rust and fully testable off-browser. `GridView`
//! wraps it in `Rc<RefCell<_>>`, owns the DOM event listeners, and
//! translates at the `JsValue` boundary. Event closures are retained on
//! the struct so wasm-bindgen keeps them alive for the viewer's whole
//! lifetime.

mod core;

pub use self::core::GridCore;

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::closure::Closure;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;
#[cfg(target_arch = "wasm32")]
use web_sys::{HtmlElement, WheelEvent};

#[cfg(target_arch = "wasm32")]
use crate::error::GridError;
#[cfg(target_arch = "wasm32")]
use crate::payload::{parse_rows, parse_schema, row_from_value};
#[cfg(target_arch = "wasm32")]
use crate::sync::{scroll_position, Axis, ElementSurface};

/// One attached DOM listener, kept alive until the viewer drops.
#[cfg(target_arch = "wasm32")]
struct Listener {
    surface: String,
    element: HtmlElement,
    event: &'static str,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

#[cfg(target_arch = "wasm32")]
impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .element
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

/// The wasm-exported grid viewer.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub struct GridView {
    core: Rc<RefCell<GridCore>>,
    scroll_listeners: Vec<Listener>,
    wheel_closure: Option<Closure<dyn FnMut(WheelEvent)>>,
    wheel_target: Option<HtmlElement>,
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl GridView {
    /// Create an empty viewer. Schema, rows, and surfaces are attached
    /// afterwards.
    #[wasm_bindgen(constructor)]
    pub fn new() -> GridView {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
        GridView {
            core: Rc::new(RefCell::new(GridCore::new())),
            scroll_listeners: Vec::new(),
            wheel_closure: None,
            wheel_target: None,
        }
    }

    /// Load the column schema from its JSON payload.
    #[wasm_bindgen(js_name = "loadSchema")]
    pub fn load_schema(&self, json: &str) -> Result<(), JsValue> {
        let schema = parse_schema(json)?;
        self.core.borrow_mut().set_schema(schema);
        Ok(())
    }

    /// Load the full row set from its JSON payload.
    #[wasm_bindgen(js_name = "loadRows")]
    pub fn load_rows(&self, json: &str) -> Result<(), JsValue> {
        let rows = parse_rows(json)?;
        self.core.borrow_mut().set_rows(rows);
        Ok(())
    }

    /// Append one newly created row (a single row-payload object).
    #[wasm_bindgen(js_name = "appendRow")]
    pub fn append_row(&self, json: &str) -> Result<(), JsValue> {
        let value = serde_json::from_str(json).map_err(GridError::from)?;
        let row = row_from_value(value)?;
        self.core.borrow_mut().append_row(row);
        Ok(())
    }

    /// Soft-delete a row by id; returns whether the id was live.
    #[wasm_bindgen(js_name = "archiveRow")]
    pub fn archive_row(&self, row_id: &str) -> bool {
        self.core.borrow_mut().archive_row(row_id)
    }

    /// Restore an archived row by id; returns whether the id was
    /// archived.
    #[wasm_bindgen(js_name = "restoreRow")]
    pub fn restore_row(&self, row_id: &str) -> bool {
        self.core.borrow_mut().restore_row(row_id)
    }

    /// Resize the viewport in CSS pixels.
    #[wasm_bindgen(js_name = "setViewportSize")]
    pub fn set_viewport_size(&self, width: f32, height: f32) {
        self.core.borrow_mut().set_viewport_size(width, height);
    }

    /// Register a scrollable DOM surface and start listening to its
    /// native scroll events. `axis` is `"x"`, `"y"`, or `"both"`.
    #[wasm_bindgen(js_name = "attachSurface")]
    pub fn attach_surface(
        &mut self,
        name: &str,
        axis: &str,
        element: HtmlElement,
    ) -> Result<(), JsValue> {
        let axis = Axis::parse(axis)
            .ok_or_else(|| GridError::Other(format!("unknown axis '{axis}'")))?;
        self.detach_surface(name);
        self.core.borrow_mut().register_surface(
            name,
            axis,
            Box::new(ElementSurface::from(element.clone())),
        );

        let core = Rc::clone(&self.core);
        let origin = name.to_string();
        let target: web_sys::Element = element.clone().into();
        let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            let (x, y) = scroll_position(&target);
            core.borrow_mut().on_scroll(
                &origin,
                axis.includes_x().then_some(x),
                axis.includes_y().then_some(y),
            );
        }) as Box<dyn FnMut(web_sys::Event)>);
        element
            .add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref())
            .map_err(|_| GridError::Other(format!("failed to attach scroll listener to '{name}'")))?;
        self.scroll_listeners.push(Listener {
            surface: name.to_string(),
            element,
            event: "scroll",
            closure,
        });
        Ok(())
    }

    /// Remove a previously attached surface and its listener.
    #[wasm_bindgen(js_name = "detachSurface")]
    pub fn detach_surface(&mut self, name: &str) {
        self.core.borrow_mut().unregister_surface(name);
        // Listener teardown happens in Drop.
        self.scroll_listeners.retain(|l| l.surface != name);
    }

    /// Route wheel events from `element` (usually the grid root)
    /// through the synchronizer so even non-scrollable surfaces follow.
    #[wasm_bindgen(js_name = "attachWheel")]
    pub fn attach_wheel(&mut self, element: HtmlElement) -> Result<(), JsValue> {
        self.detach_wheel();
        let core = Rc::clone(&self.core);
        #[allow(clippy::cast_possible_truncation)]
        let closure = Closure::wrap(Box::new(move |event: WheelEvent| {
            event.prevent_default();
            core.borrow_mut()
                .on_wheel(event.delta_x() as f32, event.delta_y() as f32);
        }) as Box<dyn FnMut(WheelEvent)>);
        let options = web_sys::AddEventListenerOptions::new();
        options.set_passive(false);
        element
            .add_event_listener_with_callback_and_add_event_listener_options(
                "wheel",
                closure.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(|_| GridError::Other("failed to attach wheel listener".to_string()))?;
        self.wheel_closure = Some(closure);
        self.wheel_target = Some(element);
        Ok(())
    }

    /// Stop listening for wheel events.
    #[wasm_bindgen(js_name = "detachWheel")]
    pub fn detach_wheel(&mut self) {
        if let (Some(target), Some(closure)) = (self.wheel_target.take(), self.wheel_closure.take())
        {
            let _ = target
                .remove_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref());
        }
    }

    /// Current horizontal scroll offset.
    #[wasm_bindgen(js_name = "scrollX")]
    pub fn scroll_x(&self) -> f32 {
        self.core.borrow().scroll_offset().x
    }

    /// Current vertical scroll offset.
    #[wasm_bindgen(js_name = "scrollY")]
    pub fn scroll_y(&self) -> f32 {
        self.core.borrow().scroll_offset().y
    }

    /// Visible column ids in display order.
    #[wasm_bindgen(js_name = "visibleColumns")]
    pub fn visible_columns(&self) -> Result<JsValue, JsValue> {
        let core = self.core.borrow();
        Ok(serde_wasm_bindgen::to_value(core.visible_columns())
            .map_err(|e| GridError::Other(e.to_string()))?)
    }

    /// Computed column pixel widths, matching `visibleColumns` order.
    #[wasm_bindgen(js_name = "columnWidths")]
    pub fn column_widths(&self) -> Result<JsValue, JsValue> {
        let core = self.core.borrow();
        Ok(serde_wasm_bindgen::to_value(core.layout().col_widths())
            .map_err(|e| GridError::Other(e.to_string()))?)
    }

    /// Number of rows after filtering.
    #[wasm_bindgen(js_name = "displayRowCount")]
    pub fn display_row_count(&self) -> usize {
        self.core.borrow().display_row_count()
    }

    /// Map a display index to its row id.
    #[wasm_bindgen(js_name = "rowIdAt")]
    pub fn row_id_at(&self, display_index: usize) -> Option<String> {
        self.core
            .borrow()
            .row_id_at(display_index)
            .map(ToString::to_string)
    }

    /// The visible `[row_start, row_end, col_start, col_end]` window at
    /// the current offset, or `null` before layout exists.
    #[wasm_bindgen(js_name = "visibleWindow")]
    pub fn visible_window(&self) -> Result<JsValue, JsValue> {
        let core = self.core.borrow();
        match core.visible_window() {
            Some(window) => Ok(serde_wasm_bindgen::to_value(&[
                window.row_start,
                window.row_end,
                window.col_start,
                window.col_end,
            ])
            .map_err(|e| GridError::Other(e.to_string()))?),
            None => Ok(JsValue::NULL),
        }
    }

    /// Total content size as `[width, height]` pixels, for sizing the
    /// scrollbar spacer elements.
    #[wasm_bindgen(js_name = "contentSize")]
    pub fn content_size(&self) -> Result<JsValue, JsValue> {
        let core = self.core.borrow();
        let layout = core.layout();
        Ok(
            serde_wasm_bindgen::to_value(&[layout.total_content_width(), layout.total_content_height()])
                .map_err(|e| GridError::Other(e.to_string()))?,
        )
    }

    /// Add or replace one filter entry; see `FacetKind` for the wire
    /// forms of `facet`, `operator`, and `operand`.
    #[wasm_bindgen(js_name = "addFilterEntry")]
    pub fn add_filter_entry(
        &self,
        facet: &str,
        column: &str,
        operator: &str,
        operand: &str,
    ) -> Result<(), JsValue> {
        self.core
            .borrow_mut()
            .add_filter_entry(facet, column, operator, operand)?;
        Ok(())
    }

    /// Remove one filter entry.
    #[wasm_bindgen(js_name = "removeFilterEntry")]
    pub fn remove_filter_entry(&self, facet: &str, column: &str) -> Result<(), JsValue> {
        self.core.borrow_mut().remove_filter_entry(facet, column)?;
        Ok(())
    }

    /// Serialize the filter state for persistence.
    #[wasm_bindgen(js_name = "filterJson")]
    pub fn filter_json(&self) -> Result<String, JsValue> {
        Ok(self.core.borrow().filter_json()?)
    }

    /// Restore a previously serialized filter state.
    #[wasm_bindgen(js_name = "setFilterJson")]
    pub fn set_filter_json(&self, json: &str) -> Result<(), JsValue> {
        self.core.borrow_mut().set_filter_json(json)?;
        Ok(())
    }

    /// Human-readable filter chips as
    /// `[{facet, column?, text}, ...]`.
    pub fn chips(&self, expanded: bool) -> Result<JsValue, JsValue> {
        let chips = self.core.borrow().chips(expanded);
        Ok(serde_wasm_bindgen::to_value(&chips).map_err(|e| GridError::Other(e.to_string()))?)
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for GridView {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl Drop for GridView {
    fn drop(&mut self) {
        self.detach_wheel();
    }
}
