//! DOM adapter for scroll surfaces (wasm32 only).

use web_sys::Element;

use super::ScrollSurface;

/// A DOM element acting as a scroll surface.
///
/// Liveness is `is_connected`: a surface that has been unmounted
/// reports dead and the synchronizer drops it.
pub struct ElementSurface {
    element: Element,
}

impl ElementSurface {
    /// Wrap a DOM element.
    pub fn new(element: Element) -> Self {
        Self { element }
    }
}

impl ScrollSurface for ElementSurface {
    fn scroll_to(&mut self, x: Option<f32>, y: Option<f32>) -> bool {
        if !self.element.is_connected() {
            return false;
        }
        #[allow(clippy::cast_possible_truncation)]
        {
            if let Some(x) = x {
                self.element.set_scroll_left(x.round() as i32);
            }
            if let Some(y) = y {
                self.element.set_scroll_top(y.round() as i32);
            }
        }
        true
    }
}

/// Read an element's current scroll position as engine offsets.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn scroll_position(element: &Element) -> (f32, f32) {
    (
        element.scroll_left() as f32,
        element.scroll_top() as f32,
    )
}

impl From<web_sys::HtmlElement> for ElementSurface {
    fn from(element: web_sys::HtmlElement) -> Self {
        Self::new(element.into())
    }
}
