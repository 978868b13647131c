//! Row-grouping tests: header resolution, collapse/expand, index remapping.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{make_grid, MockSource};
use serde_json::json;
use rulegrid::{
    CellCoord, CellValue, DataGridView, EditOutcome, GridConfig, GridRect, GroupRowLineInfo,
};

/// Logical stream with inline group headers:
/// `hdr-a, a-0..a-3, hdr-b, b-0..b-5` (12 rows).
fn grouped_rows() -> Vec<serde_json::Value> {
    let mut rows = vec![json!({ "_id": "hdr-a", "name": "CLASS_A", "kind": "group" })];
    for i in 0..4 {
        rows.push(json!({ "_id": format!("a-{i}"), "name": format!("A_{i}"), "value": i }));
    }
    rows.push(json!({ "_id": "hdr-b", "name": "CLASS_B", "kind": "group" }));
    for i in 0..6 {
        rows.push(json!({ "_id": format!("b-{i}"), "name": format!("B_{i}"), "value": 10 + i }));
    }
    rows
}

fn group_info(a_collapsed: bool, b_collapsed: bool) -> Vec<GroupRowLineInfo> {
    vec![
        GroupRowLineInfo {
            index: 0,
            header_text: "CLASS_A".into(),
            element_id: "hdr-a".into(),
            is_collapsed: a_collapsed,
        },
        GroupRowLineInfo {
            index: 5,
            header_text: "CLASS_B".into(),
            element_id: "hdr-b".into(),
            is_collapsed: b_collapsed,
        },
    ]
}

async fn grouped_grid() -> (DataGridView<MockSource>, MockSource) {
    let source = MockSource::with_data(grouped_rows());
    let grid = make_grid(source.clone(), GridConfig::default());
    grid.set_total_row_count(12).await;
    grid.set_group_info(&group_info(false, false)).await;
    grid.set_visible_region(GridRect::new(0, 0, 3, 12)).await;
    (grid, source)
}

// =============================================================================
// HEADER RESOLUTION AND CONTENT
// =============================================================================

#[tokio::test]
async fn test_header_rows_resolve_as_headers() {
    let (grid, _source) = grouped_grid().await;
    assert!(grid.is_group_header_row(0));
    assert!(!grid.is_group_header_row(1));
    assert!(grid.is_group_header_row(5));
    assert_eq!(grid.visual_row_count(), 12);
}

#[tokio::test]
async fn test_group_header_content_provider_is_used() {
    let (grid, _source) = grouped_grid().await;
    grid.set_group_header_cell_content(|_row, _columns, _col, info, group| {
        CellValue::Text(format!("group:{}", info[group].header_text))
    });

    assert_eq!(
        grid.cell_content(CellCoord::new(0, 0)),
        CellValue::Text("group:CLASS_A".into())
    );
    // Member rows keep going through the regular content callback.
    assert_eq!(
        grid.cell_content(CellCoord::new(0, 1)),
        CellValue::Text("a-0".into())
    );
}

// =============================================================================
// COLLAPSE / EXPAND
// =============================================================================

#[tokio::test]
async fn test_collapse_elides_member_rows() {
    let (grid, _source) = grouped_grid().await;

    assert!(grid.toggle_group_at(CellCoord::new(0, 0)));
    assert_eq!(grid.visual_row_count(), 8);

    // Visual row 1 is now the second group's header.
    assert!(grid.is_group_header_row(1));

    // Expanding restores the full sequence.
    assert!(grid.toggle_group_at(CellCoord::new(0, 0)));
    assert_eq!(grid.visual_row_count(), 12);
}

#[tokio::test]
async fn test_toggle_only_on_header_cell_in_column_zero() {
    let (grid, _source) = grouped_grid().await;
    // Header row but not column 0.
    assert!(!grid.toggle_group_at(CellCoord::new(1, 0)));
    // Column 0 but a member row.
    assert!(!grid.toggle_group_at(CellCoord::new(0, 2)));
    assert_eq!(grid.visual_row_count(), 12);
}

#[tokio::test]
async fn test_toggle_is_reflected_in_projected_group_info() {
    let (grid, _source) = grouped_grid().await;
    grid.toggle_group_at(CellCoord::new(0, 0));

    let info = grid.group_info();
    assert!(info[0].is_collapsed);
    assert!(!info[1].is_collapsed);
    assert_eq!(info[0].element_id, "hdr-a");
}

#[tokio::test]
async fn test_group_change_does_not_clear_row_cache() {
    let (grid, source) = grouped_grid().await;
    let loaded = grid.loaded_count();
    let fetches = source.fetch_calls();

    grid.set_group_info(&group_info(true, false)).await;

    assert_eq!(grid.loaded_count(), loaded);
    assert_eq!(source.fetch_calls(), fetches);
}

// =============================================================================
// EDIT REMAPPING UNDER COLLAPSED GROUPS
// =============================================================================

#[tokio::test]
async fn test_edit_remaps_to_logical_index_past_collapsed_group() {
    let (grid, source) = grouped_grid().await;
    let completed: Rc<RefCell<Vec<(u32, u32)>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&completed);
    grid.set_on_cell_edit_completed(move |row, col| sink.borrow_mut().push((row, col)));

    // Collapse CLASS_A: visual 0 = hdr-a, 1 = hdr-b, 2 = b-0 (logical 6).
    grid.toggle_group_at(CellCoord::new(0, 0));

    let outcome = grid
        .edit_cell(CellCoord::new(1, 2), CellValue::Number(99.0))
        .await;
    assert_eq!(outcome, EditOutcome::Applied);
    assert_eq!(source.inner.apply_calls.get(), 1);

    // The replacement row landed at the remapped logical index, not visual 2.
    let edited = grid.row_at(6).unwrap();
    assert_eq!(edited["edited"], json!(true));
    assert_eq!(edited["value"], json!("99"));
    let untouched = grid.row_at(2).unwrap();
    assert_eq!(untouched.get("edited"), None);

    assert_eq!(completed.borrow().as_slice(), &[(6, 1)]);
}

#[tokio::test]
async fn test_group_header_cells_are_not_editable() {
    let (grid, source) = grouped_grid().await;
    let outcome = grid
        .edit_cell(CellCoord::new(1, 0), CellValue::Text("nope".into()))
        .await;
    assert_eq!(outcome, EditOutcome::Ignored);
    assert_eq!(source.inner.apply_calls.get(), 0);
}
