//! Walkthrough of the grid engine: paging, grouping, and a gated edit.
//!
//! Run with: cargo run --example paged_grid

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use serde_json::json;

    use rulegrid::{
        CellCoord, CellEditContext, CellValue, ColumnDescriptor, DataGridView, DataSource,
        FetchContext, GridConfig, GridRect, GroupRowLineInfo, PageResult,
    };

    type Row = serde_json::Value;

    /// Two net classes with three member rows each; group headers arrive
    /// inline in the row stream, exactly as a grouped backend returns them.
    struct GroupedSource;

    impl GroupedSource {
        fn all_rows() -> Vec<Row> {
            vec![
                json!({ "_id": "hdr-power", "kind": "group", "name": "POWER" }),
                json!({ "_id": "net-vcc", "name": "VCC", "clearance": 50 }),
                json!({ "_id": "net-gnd", "name": "GND", "clearance": 50 }),
                json!({ "_id": "net-3v3", "name": "3V3", "clearance": 60 }),
                json!({ "_id": "hdr-signal", "kind": "group", "name": "SIGNAL" }),
                json!({ "_id": "net-clk", "name": "CLK", "clearance": 75 }),
                json!({ "_id": "net-rst", "name": "RST", "clearance": 75 }),
                json!({ "_id": "net-sda", "name": "SDA", "clearance": 80 }),
            ]
        }
    }

    impl DataSource for GroupedSource {
        type Row = Row;

        async fn fetch_first_page(
            &self,
            limit: u32,
            _ctx: &FetchContext,
        ) -> rulegrid::Result<PageResult<Row>> {
            let rows = Self::all_rows();
            let end = (limit as usize).min(rows.len());
            let is_last = end == rows.len();
            let page = rows[..end].to_vec();
            Ok(if is_last {
                PageResult::last(page)
            } else {
                PageResult::rows(page)
            })
        }

        async fn fetch_next_page(
            &self,
            anchor_id: &str,
            _anchor_row: &Row,
            limit: u32,
            _ctx: &FetchContext,
        ) -> rulegrid::Result<PageResult<Row>> {
            let rows = Self::all_rows();
            let start = rows
                .iter()
                .position(|r| r["_id"] == anchor_id)
                .map(|p| p + 1)
                .unwrap_or(rows.len());
            let end = (start + limit as usize).min(rows.len());
            Ok(PageResult::last(rows[start..end].to_vec()))
        }

        async fn apply_cell_edit(
            &self,
            edit: &CellEditContext<Row>,
        ) -> rulegrid::Result<Option<Row>> {
            // Echo the edit back as the replacement row.
            let mut replacement = edit.current.clone();
            replacement["clearance"] = json!(edit.new_value.display_value().parse::<f64>().unwrap_or(0.0));
            Ok(Some(replacement))
        }
    }

    pub async fn run() {
        let grid = DataGridView::new(
            GroupedSource,
            GridConfig {
                page_size: 4,
                edit_confirmation_columns: [1].into(),
                ..GridConfig::default()
            },
        );
        grid.set_columns(vec![
            ColumnDescriptor::new("name", "Net"),
            ColumnDescriptor::new("clearance", "Clearance"),
        ]);
        grid.set_cell_content(|row, _cols, column_index, is_header, _logical| {
            if is_header || column_index == 0 {
                CellValue::Text(row["name"].as_str().unwrap_or_default().to_string())
            } else {
                CellValue::Number(row["clearance"].as_f64().unwrap_or_default())
            }
        });
        grid.set_total_row_count(8).await;
        grid.set_group_info(&[
            GroupRowLineInfo {
                index: 0,
                header_text: "POWER".into(),
                element_id: "hdr-power".into(),
                is_collapsed: false,
            },
            GroupRowLineInfo {
                index: 4,
                header_text: "SIGNAL".into(),
                element_id: "hdr-signal".into(),
                is_collapsed: false,
            },
        ])
        .await;

        grid.set_visible_region(GridRect::new(0, 0, 2, 8)).await;
        println!("loaded rows: {}", grid.loaded_count());
        println!("visual rows: {}", grid.visual_row_count());

        // Collapse POWER: its members leave the visual sequence.
        grid.toggle_group_at(CellCoord::new(0, 0));
        println!("visual rows after collapse: {}", grid.visual_row_count());

        // Edit CLK's clearance. With POWER collapsed, CLK sits at visual row
        // 2 but the engine remaps the edit to its logical index.
        let outcome = grid
            .edit_cell(CellCoord::new(1, 2), CellValue::Number(90.0))
            .await;
        println!("edit outcome: {outcome:?}");
        grid.confirm_pending_edit().await;
        println!(
            "CLK clearance now: {:?}",
            grid.row_at(5).map(|r| r["clearance"].clone())
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("tokio runtime");
    runtime.block_on(demo::run());
}

#[cfg(target_arch = "wasm32")]
fn main() {}
