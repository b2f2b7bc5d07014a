//! Off-screen text measurement.
//!
//! All width measurement funnels through one process-wide measuring
//! surface: on wasm32 a detached `<canvas>` 2D context, created lazily
//! on first use and never attached to the document (no reflow, no
//! visible DOM mutation). The only state it mutates between calls is
//! the active font, which is swapped only when it changes. Measured
//! widths are memoized in a capped insertion-order cache keyed by
//! (font, text).
//!
//! Native builds and tests use a deterministic heuristic measurer.

use std::collections::{HashMap, VecDeque};

/// Font for header titles.
pub const HEADER_FONT: &str = "600 13px system-ui, sans-serif";

/// Font for body cells.
pub const BODY_FONT: &str = "13px system-ui, sans-serif";

/// Minimum column width in pixels.
pub const MIN_COLUMN_WIDTH: f32 = 150.0;

/// Horizontal cell padding plus border allowance, added on top of the
/// measured content width.
pub const CELL_PADDING_X: f32 = 26.0;

/// Fixed row height in pixels.
pub const ROW_HEIGHT: f32 = 36.0;

/// Cap on memoized (font, text) width entries.
const MEASURE_CACHE_CAP: usize = 4096;

/// A text-measuring surface.
pub trait TextMeasure {
    /// Pixel width of `text` rendered in `font`.
    fn text_width(&mut self, text: &str, font: &str) -> f32;
}

/// Capped memo of measured widths. Insertion-order eviction; lookups do
/// not promote entries.
struct TextWidthCache {
    entries: HashMap<(String, String), f32>,
    order: VecDeque<(String, String)>,
    cap: usize,
}

impl TextWidthCache {
    fn new(cap: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            cap,
        }
    }

    fn get(&self, font: &str, text: &str) -> Option<f32> {
        self.entries
            .get(&(font.to_string(), text.to_string()))
            .copied()
    }

    fn insert(&mut self, font: &str, text: &str, width: f32) {
        let key = (font.to_string(), text.to_string());
        if self.entries.contains_key(&key) {
            return;
        }
        self.entries.insert(key.clone(), width);
        self.order.push_back(key);
        while self.entries.len() > self.cap {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            } else {
                break;
            }
        }
    }
}

/// Deterministic measurer for native builds and tests: width scales
/// with the font's pixel size and a per-character advance estimate.
pub struct HeuristicMeasurer {
    cache: TextWidthCache,
}

impl Default for HeuristicMeasurer {
    fn default() -> Self {
        Self::new()
    }
}

impl HeuristicMeasurer {
    /// Create a heuristic measurer with the standard cache cap.
    pub fn new() -> Self {
        Self {
            cache: TextWidthCache::new(MEASURE_CACHE_CAP),
        }
    }
}

impl TextMeasure for HeuristicMeasurer {
    fn text_width(&mut self, text: &str, font: &str) -> f32 {
        if let Some(width) = self.cache.get(font, text) {
            return width;
        }
        let size = font_px(font);
        let advance: f32 = text
            .chars()
            .map(|c| {
                if c == 'i' || c == 'l' || c == '.' || c == ',' || c == '\'' {
                    0.3
                } else if c.is_uppercase() || c == 'm' || c == 'w' {
                    0.75
                } else {
                    0.55
                }
            })
            .sum();
        let width = advance * size;
        self.cache.insert(font, text, width);
        width
    }
}

/// Pixel size from a CSS font shorthand, defaulting to 13.
fn font_px(font: &str) -> f32 {
    font.split_whitespace()
        .find_map(|part| part.strip_suffix("px").and_then(|n| n.parse::<f32>().ok()))
        .unwrap_or(13.0)
}

#[cfg(target_arch = "wasm32")]
mod canvas {
    use super::{TextMeasure, TextWidthCache, MEASURE_CACHE_CAP};
    use std::cell::RefCell;
    use wasm_bindgen::JsCast;
    use web_sys::CanvasRenderingContext2d;

    /// Canvas-backed measurer over a detached off-screen context.
    pub(super) struct CanvasMeasurer {
        ctx: CanvasRenderingContext2d,
        active_font: String,
        cache: TextWidthCache,
    }

    impl CanvasMeasurer {
        fn create() -> Option<Self> {
            let document = web_sys::window()?.document()?;
            let canvas = document
                .create_element("canvas")
                .ok()?
                .dyn_into::<web_sys::HtmlCanvasElement>()
                .ok()?;
            // Deliberately never appended to the document.
            let ctx = canvas
                .get_context("2d")
                .ok()??
                .dyn_into::<CanvasRenderingContext2d>()
                .ok()?;
            Some(Self {
                ctx,
                active_font: String::new(),
                cache: TextWidthCache::new(MEASURE_CACHE_CAP),
            })
        }
    }

    impl TextMeasure for CanvasMeasurer {
        fn text_width(&mut self, text: &str, font: &str) -> f32 {
            if let Some(width) = self.cache.get(font, text) {
                return width;
            }
            if self.active_font != font {
                self.ctx.set_font(font);
                self.active_font = font.to_string();
            }
            #[allow(clippy::cast_possible_truncation)]
            let width = self
                .ctx
                .measure_text(text)
                .map(|m| m.width() as f32)
                .unwrap_or(0.0);
            self.cache.insert(font, text, width);
            width
        }
    }

    thread_local! {
        // Lazily initialized on first use, never torn down.
        static SHARED: RefCell<Option<CanvasMeasurer>> = const { RefCell::new(None) };
    }

    /// Run `f` against the shared measurer. `None` when no measuring
    /// surface can exist yet (no document) — callers degrade to a
    /// zero-size layout.
    pub(super) fn with_shared<R>(f: impl FnOnce(&mut CanvasMeasurer) -> R) -> Option<R> {
        SHARED.with(|slot| {
            let mut slot = slot.borrow_mut();
            if slot.is_none() {
                *slot = CanvasMeasurer::create();
            }
            slot.as_mut().map(f)
        })
    }
}

/// Measure text on the process-wide surface.
///
/// On wasm32 this is the shared canvas context; `None` means no
/// measuring surface exists yet and the caller should degrade to a
/// zero-size layout. Native builds measure heuristically and always
/// succeed.
pub fn measured_text_width(text: &str, font: &str) -> Option<f32> {
    #[cfg(target_arch = "wasm32")]
    {
        canvas::with_shared(|m| m.text_width(text, font))
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::cell::RefCell;
        thread_local! {
            static SHARED: RefCell<HeuristicMeasurer> = RefCell::new(HeuristicMeasurer::new());
        }
        Some(SHARED.with(|m| m.borrow_mut().text_width(text, font)))
    }
}
