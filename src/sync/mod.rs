//! Viewport synchronizer.
//!
//! Several independently-scrollable surfaces render the same grid: the
//! frozen header row, the frozen row-number rail, the scrollable body,
//! and the synthetic scrollbar tracks. This module owns the single
//! authoritative `ScrollOffset` and pushes it to every registered
//! surface, so the surfaces can never visibly desynchronize.
//!
//! Two conceptual states: Idle and Propagating. The transition back to
//! Idle is synchronous once every sibling has been updated; scroll
//! events that arrive while Propagating are echoes of our own
//! programmatic `scroll_to` calls and are dropped (the feedback-loop
//! guard). The synchronizer is an owned service object, constructed
//! with the viewer and dropped with it; surfaces are injected, never
//! ambient.

#[cfg(target_arch = "wasm32")]
mod dom;

#[cfg(target_arch = "wasm32")]
pub use dom::ElementSurface;
#[cfg(target_arch = "wasm32")]
pub(crate) use dom::scroll_position;

use crate::layout::ScrollBounds;

/// Which axes a surface scrolls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Horizontal only (e.g. the header row).
    X,
    /// Vertical only (e.g. the row-number rail).
    Y,
    /// Both (the body).
    Both,
}

impl Axis {
    /// Whether this axis set includes the horizontal axis.
    pub fn includes_x(self) -> bool {
        matches!(self, Axis::X | Axis::Both)
    }

    /// Whether this axis set includes the vertical axis.
    pub fn includes_y(self) -> bool {
        matches!(self, Axis::Y | Axis::Both)
    }

    /// Parse the axis from its wire form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "x" => Some(Axis::X),
            "y" => Some(Axis::Y),
            "both" => Some(Axis::Both),
            _ => None,
        }
    }
}

/// The shared logical scroll position, clamped to the layout's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollOffset {
    /// Horizontal pixels.
    pub x: f32,
    /// Vertical pixels.
    pub y: f32,
}

/// One scrollable rendering surface.
///
/// `scroll_to` applies a programmatic offset on the given axes and
/// returns `false` when the surface has disappeared (unmounted DOM
/// node); the synchronizer skips dead surfaces without retrying.
pub trait ScrollSurface {
    /// Apply an offset. `None` leaves that axis untouched.
    fn scroll_to(&mut self, x: Option<f32>, y: Option<f32>) -> bool;
}

struct Registered {
    name: String,
    axis: Axis,
    surface: Box<dyn ScrollSurface>,
}

/// Owns the surface registry and the authoritative offset.
#[derive(Default)]
pub struct ViewportSync {
    surfaces: Vec<Registered>,
    offset: ScrollOffset,
    bounds: Option<ScrollBounds>,
    propagating: bool,
}

impl ViewportSync {
    /// Create an empty synchronizer with no bounds yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current logical offset.
    pub fn offset(&self) -> ScrollOffset {
        self.offset
    }

    /// Install the layout's scroll bounds. The offset is re-clamped and,
    /// if it moved, re-propagated to every surface.
    pub fn set_bounds(&mut self, bounds: ScrollBounds) {
        self.bounds = Some(bounds);
        let clamped = self.clamp(self.offset.x, self.offset.y);
        if clamped != self.offset {
            self.offset = clamped;
            self.propagate(None);
        }
    }

    /// Forget the bounds (layout unmounted). Scroll and wheel input
    /// become no-ops until bounds are installed again.
    pub fn clear_bounds(&mut self) {
        self.bounds = None;
    }

    /// Register a surface under a unique name. Re-registering a name
    /// replaces the previous surface. A surface joining mid-scroll is
    /// immediately aligned to the current offset; at the origin there is
    /// nothing to align.
    pub fn register(&mut self, name: &str, axis: Axis, surface: Box<dyn ScrollSurface>) {
        self.unregister(name);
        let mut registered = Registered {
            name: name.to_string(),
            axis,
            surface,
        };
        if self.offset != ScrollOffset::default() {
            let x = axis.includes_x().then_some(self.offset.x);
            let y = axis.includes_y().then_some(self.offset.y);
            let _ = registered.surface.scroll_to(x, y);
        }
        self.surfaces.push(registered);
    }

    /// Remove a surface. Unknown names are a no-op.
    pub fn unregister(&mut self, name: &str) {
        self.surfaces.retain(|s| s.name != name);
    }

    /// Number of registered surfaces.
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// A surface reported a native scroll to a new position.
    ///
    /// Clamps, stores, and pushes each changed axis to every *other*
    /// surface registered for it. No-op before bounds exist, and while
    /// a propagation pass is already in flight.
    pub fn handle_scroll(&mut self, origin: &str, x: Option<f32>, y: Option<f32>) {
        if self.propagating || self.bounds.is_none() {
            return;
        }
        let next = self.clamp(x.unwrap_or(self.offset.x), y.unwrap_or(self.offset.y));
        let moved_x = x.is_some() && (next.x - self.offset.x).abs() > f32::EPSILON;
        let moved_y = y.is_some() && (next.y - self.offset.y).abs() > f32::EPSILON;
        if !moved_x && !moved_y {
            return;
        }
        self.offset = next;
        self.propagate(Some(origin));
    }

    /// Top-level wheel input: tentative offset = current + delta,
    /// clamped exactly at the bounds. Applied to all axis-matching
    /// surfaces in one pass, bypassing native per-surface physics.
    /// No-op before bounds exist.
    pub fn handle_wheel(&mut self, delta_x: f32, delta_y: f32) {
        if self.propagating || self.bounds.is_none() {
            return;
        }
        let next = self.clamp(self.offset.x + delta_x, self.offset.y + delta_y);
        if next == self.offset {
            return;
        }
        self.offset = next;
        self.propagate(None);
    }

    fn clamp(&self, x: f32, y: f32) -> ScrollOffset {
        let bounds = self.bounds.unwrap_or_default();
        ScrollOffset {
            x: x.clamp(0.0, bounds.x.max(0.0)),
            y: y.clamp(0.0, bounds.y.max(0.0)),
        }
    }

    /// Push the current offset to every surface except `skip`. A dead
    /// surface is dropped from the registry, not retried.
    fn propagate(&mut self, skip: Option<&str>) {
        self.propagating = true;
        let offset = self.offset;
        let mut dead: Vec<String> = Vec::new();
        for registered in &mut self.surfaces {
            if skip == Some(registered.name.as_str()) {
                continue;
            }
            let x = registered.axis.includes_x().then_some(offset.x);
            let y = registered.axis.includes_y().then_some(offset.y);
            if !registered.surface.scroll_to(x, y) {
                dead.push(registered.name.clone());
            }
        }
        self.surfaces.retain(|s| !dead.contains(&s.name));
        self.propagating = false;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing, clippy::float_cmp)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Test surface recording the offsets it receives.
    #[derive(Default)]
    struct Recorded {
        x: Option<f32>,
        y: Option<f32>,
        alive: bool,
    }

    struct TestSurface(Rc<RefCell<Recorded>>);

    impl ScrollSurface for TestSurface {
        fn scroll_to(&mut self, x: Option<f32>, y: Option<f32>) -> bool {
            let mut inner = self.0.borrow_mut();
            if !inner.alive {
                return false;
            }
            if x.is_some() {
                inner.x = x;
            }
            if y.is_some() {
                inner.y = y;
            }
            true
        }
    }

    fn surface() -> (Rc<RefCell<Recorded>>, Box<dyn ScrollSurface>) {
        let state = Rc::new(RefCell::new(Recorded {
            alive: true,
            ..Recorded::default()
        }));
        (Rc::clone(&state), Box::new(TestSurface(Rc::clone(&state))))
    }

    fn sync_with_bounds(x: f32, y: f32) -> ViewportSync {
        let mut sync = ViewportSync::new();
        sync.set_bounds(ScrollBounds { x, y });
        sync
    }

    #[test]
    fn wheel_is_noop_without_bounds() {
        let mut sync = ViewportSync::new();
        let (state, surface) = surface();
        sync.register("body", Axis::Both, surface);
        sync.handle_wheel(10.0, 10.0);
        assert_eq!(sync.offset(), ScrollOffset::default());
        assert_eq!(state.borrow().y, None);
    }

    #[test]
    fn wheel_propagates_to_matching_axes_only() {
        let mut sync = sync_with_bounds(500.0, 500.0);
        let (header, hs) = surface();
        let (rail, rs) = surface();
        let (body, bs) = surface();
        sync.register("header", Axis::X, hs);
        sync.register("rail", Axis::Y, rs);
        sync.register("body", Axis::Both, bs);

        sync.handle_wheel(30.0, 70.0);

        assert_eq!(header.borrow().x, Some(30.0));
        assert_eq!(header.borrow().y, None);
        assert_eq!(rail.borrow().y, Some(70.0));
        assert_eq!(rail.borrow().x, None);
        assert_eq!(body.borrow().x, Some(30.0));
        assert_eq!(body.borrow().y, Some(70.0));
    }

    #[test]
    fn wheel_clamps_exactly_at_bounds() {
        let mut sync = sync_with_bounds(100.0, 200.0);
        let (body, bs) = surface();
        sync.register("body", Axis::Both, bs);

        sync.handle_wheel(10_000.0, 10_000.0);
        assert_eq!(sync.offset(), ScrollOffset { x: 100.0, y: 200.0 });
        assert_eq!(body.borrow().x, Some(100.0));
        assert_eq!(body.borrow().y, Some(200.0));

        sync.handle_wheel(-10_000.0, -10_000.0);
        assert_eq!(sync.offset(), ScrollOffset { x: 0.0, y: 0.0 });
    }

    #[test]
    fn scroll_skips_the_origin_surface() {
        let mut sync = sync_with_bounds(500.0, 500.0);
        let (body, bs) = surface();
        let (rail, rs) = surface();
        sync.register("body", Axis::Both, bs);
        sync.register("rail", Axis::Y, rs);

        sync.handle_scroll("body", None, Some(120.0));

        assert_eq!(rail.borrow().y, Some(120.0));
        // The origin already sits at the new position natively.
        assert_eq!(body.borrow().y, None);
    }

    #[test]
    fn dead_surface_is_skipped_and_dropped() {
        let mut sync = sync_with_bounds(500.0, 500.0);
        let (body, bs) = surface();
        let (rail, rs) = surface();
        sync.register("body", Axis::Both, bs);
        sync.register("rail", Axis::Y, rs);

        rail.borrow_mut().alive = false;
        sync.handle_wheel(0.0, 50.0);

        assert_eq!(body.borrow().y, Some(50.0));
        assert_eq!(rail.borrow().y, None);
        assert_eq!(sync.surface_count(), 1);
    }

    #[test]
    fn unregister_mid_stream() {
        let mut sync = sync_with_bounds(500.0, 500.0);
        let (rail, rs) = surface();
        sync.register("rail", Axis::Y, rs);
        sync.unregister("rail");
        sync.handle_wheel(0.0, 50.0);
        assert_eq!(rail.borrow().y, None);
        assert_eq!(sync.surface_count(), 0);
    }

    #[test]
    fn tightened_bounds_reclamp_and_repropagate() {
        let mut sync = sync_with_bounds(500.0, 500.0);
        let (body, bs) = surface();
        sync.register("body", Axis::Both, bs);
        sync.handle_wheel(0.0, 400.0);

        sync.set_bounds(ScrollBounds { x: 500.0, y: 100.0 });
        assert_eq!(sync.offset().y, 100.0);
        assert_eq!(body.borrow().y, Some(100.0));
    }

    #[test]
    fn registering_aligns_new_surface_to_current_offset() {
        let mut sync = sync_with_bounds(500.0, 500.0);
        let (body, bs) = surface();
        sync.register("body", Axis::Both, bs);
        sync.handle_wheel(40.0, 60.0);

        let (late, ls) = surface();
        sync.register("scrollbar-y", Axis::Y, ls);
        assert_eq!(late.borrow().y, Some(60.0));
        assert_eq!(late.borrow().x, None);
        let _ = body;
    }
}
