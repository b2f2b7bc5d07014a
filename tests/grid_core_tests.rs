//! End-to-end engine tests: payload loading, filter routing, the derived
//! layout, and scroll coordination through `GridCore`.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{people_rows, people_rows_json, people_schema};
use gridview::layout::{CELL_PADDING_X, MIN_COLUMN_WIDTH};
use gridview::payload::{parse_rows, row_from_value};
use gridview::sync::{Axis, ScrollSurface};
use gridview::GridCore;
use serde_json::json;

struct TestSurface {
    calls: Rc<RefCell<Vec<(Option<f32>, Option<f32>)>>>,
}

impl TestSurface {
    fn new() -> (Self, Rc<RefCell<Vec<(Option<f32>, Option<f32>)>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                calls: Rc::clone(&calls),
            },
            calls,
        )
    }
}

impl ScrollSurface for TestSurface {
    fn scroll_to(&mut self, x: Option<f32>, y: Option<f32>) -> bool {
        self.calls.borrow_mut().push((x, y));
        true
    }
}

fn loaded_core() -> GridCore {
    let mut core = GridCore::new();
    core.set_schema(people_schema());
    core.set_rows(people_rows());
    core.set_viewport_size(400.0, 300.0);
    core
}

fn display_ids(core: &GridCore) -> Vec<String> {
    core.display_rows().iter().map(|r| r.id.clone()).collect()
}

#[test]
fn loads_payloads_and_shows_everything_by_default() {
    let core = loaded_core();
    assert_eq!(core.visible_columns(), ["name", "age", "active", "email"]);
    assert_eq!(core.display_row_count(), 5);
    assert_eq!(display_ids(&core), ["r1", "r2", "r3", "r4", "r5"]);
}

#[test]
fn filter_entries_route_through_the_whole_pipeline() {
    let mut core = loaded_core();
    core.add_filter_entry("sort", "age", "", "-1").unwrap();
    assert_eq!(display_ids(&core), ["r5", "r1", "r2", "r3", "r4"]);

    core.add_filter_entry("query", "age", ">", "30").unwrap();
    assert_eq!(display_ids(&core), ["r5", "r1"]);
    assert_eq!(core.row_id_at(0), Some("r5"));
    assert_eq!(core.row_ids_in_range(0, 1), ["r5", "r1"]);
    assert_eq!(core.row_id_at(2), None);

    core.remove_filter_entry("query", "age").unwrap();
    assert_eq!(core.display_row_count(), 5);
}

#[test]
fn projection_entries_hide_and_reveal_columns() {
    let mut core = loaded_core();
    core.add_filter_entry("projection", "age", "", "-1").unwrap();
    assert_eq!(core.visible_columns(), ["name", "active", "email"]);
    // Layout follows the projection.
    assert_eq!(core.layout().col_count(), 3);

    core.remove_filter_entry("projection", "age").unwrap();
    assert_eq!(core.visible_columns(), ["name", "age", "active", "email"]);
}

#[test]
fn invalid_entries_are_rejected_without_changing_state() {
    let mut core = loaded_core();
    assert!(core.add_filter_entry("nope", "age", "", "1").is_err());
    assert!(core.add_filter_entry("sort", "age", "", "up").is_err());
    assert!(core.add_filter_entry("query", "age", "~", "1").is_err());
    assert!(core.remove_filter_entry("nope", "age").is_err());
    assert!(core.filter().is_empty());
    assert_eq!(core.display_row_count(), 5);
}

#[test]
fn filter_state_round_trips_between_cores() {
    let mut first = loaded_core();
    first.add_filter_entry("sort", "name", "", "1").unwrap();
    first.add_filter_entry("query", "active", "=", "true").unwrap();
    let json = first.filter_json().unwrap();

    let mut second = loaded_core();
    second.set_filter_json(&json).unwrap();
    assert_eq!(display_ids(&second), display_ids(&first));
    assert_eq!(second.filter(), first.filter());
}

#[test]
fn chips_follow_the_filter_state() {
    let mut core = loaded_core();
    core.add_filter_entry("sort", "age", "", "1").unwrap();
    core.add_filter_entry("sort", "name", "", "1").unwrap();
    let expanded = core.chips(true);
    assert_eq!(expanded.len(), 2);
    assert_eq!(expanded[0].text, "Sort 'Age' 1 - 9");
    let collapsed = core.chips(false);
    assert_eq!(collapsed.len(), 1);
    assert_eq!(collapsed[0].text, "Sorted by 2 columns");
}

#[test]
fn archive_hides_a_row_until_restored() {
    let mut core = loaded_core();
    assert!(core.archive_row("r2"));
    assert_eq!(display_ids(&core), ["r1", "r3", "r4", "r5"]);
    // Archiving again is a no-op.
    assert!(!core.archive_row("r2"));

    assert!(core.restore_row("r2"));
    assert_eq!(core.display_row_count(), 5);
    assert!(!core.restore_row("r2"));
}

#[test]
fn restored_rows_obey_the_active_sort() {
    let mut core = loaded_core();
    core.add_filter_entry("sort", "age", "", "1").unwrap();
    core.archive_row("r2");
    core.restore_row("r2");
    // Restores append to the live set, so r2 now ties after r3 but the
    // sort still places both in the age-29 band.
    assert_eq!(display_ids(&core), ["r4", "r3", "r2", "r1", "r5"]);
}

#[test]
fn appended_rows_enter_the_pipeline() {
    let mut core = loaded_core();
    core.add_filter_entry("query", "age", ">", "100").unwrap();
    assert_eq!(core.display_row_count(), 0);

    let row = row_from_value(json!({"_id": "r6", "data_values": {"name": "Zed", "age": 120}}))
        .unwrap();
    core.append_row(row);
    assert_eq!(display_ids(&core), ["r6"]);
}

#[test]
fn wheel_input_clamps_to_the_derived_layout() {
    let mut core = loaded_core();
    // Four floor-width columns overflow the 400px viewport; five rows
    // fit the 300px height with room to spare.
    let content_width = 4.0 * (MIN_COLUMN_WIDTH + CELL_PADDING_X);
    core.on_wheel(10_000.0, 10_000.0);
    assert_eq!(core.scroll_offset().x, content_width - 400.0);
    assert_eq!(core.scroll_offset().y, 0.0);
}

#[test]
fn surfaces_follow_engine_driven_scrolls() {
    let mut core = loaded_core();
    let (header, header_calls) = TestSurface::new();
    core.register_surface("header", Axis::X, Box::new(header));
    header_calls.borrow_mut().clear();

    core.on_wheel(60.0, 0.0);
    assert_eq!(header_calls.borrow().as_slice(), [(Some(60.0), None)]);

    core.unregister_surface("header");
    core.on_wheel(10.0, 0.0);
    assert_eq!(header_calls.borrow().len(), 1);
}

#[test]
fn native_scrolls_update_the_shared_offset() {
    let mut core = loaded_core();
    core.on_scroll("body", Some(80.0), None);
    assert_eq!(core.scroll_offset().x, 80.0);

    let window = core.visible_window().unwrap();
    assert_eq!(window.col_start, 0);
    assert!(window.col_end >= 1);
}

#[test]
fn zero_viewport_produces_no_window_and_no_scrolling() {
    let mut core = GridCore::new();
    core.set_schema(people_schema());
    core.set_rows(people_rows());
    assert!(core.visible_window().is_none());
    assert_eq!(core.layout().col_count(), 0);

    core.on_wheel(500.0, 500.0);
    assert_eq!(core.scroll_offset().x, 0.0);
    assert_eq!(core.scroll_offset().y, 0.0);
}

#[test]
fn replacing_rows_drops_the_archive() {
    let mut core = loaded_core();
    core.archive_row("r1");
    core.set_rows(parse_rows(people_rows_json()).unwrap());
    // The archive belonged to the previous dataset.
    assert!(!core.restore_row("r1"));
    assert_eq!(core.display_row_count(), 5);
}
