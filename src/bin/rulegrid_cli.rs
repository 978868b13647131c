//! CLI harness for rulegrid - drives the engine over a synthetic source
//!
//! Usage:
//!   rulegrid_cli [total_rows] [page_size]
//!
//! Simulates a full scroll-through of a synthetic data set and prints cache
//! statistics as JSON. Useful for eyeballing paging behavior without a
//! browser host.

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

#[cfg(not(target_arch = "wasm32"))]
mod harness {
    use std::env;

    use serde_json::json;

    use rulegrid::{
        CellCoord, CellEditContext, CellValue, ColumnDescriptor, DataGridView, DataSource,
        FetchContext, GridConfig, GridRect, PageResult,
    };

    type Row = serde_json::Value;

    /// In-memory table standing in for the REST backend.
    struct SyntheticSource {
        rows: Vec<Row>,
    }

    impl SyntheticSource {
        fn new(count: u32) -> Self {
            let rows = (0..count)
                .map(|i| {
                    json!({
                        "_id": format!("row-{i}"),
                        "net": format!("NET_{i}"),
                        "clearance": 50 + (i % 7) * 5,
                    })
                })
                .collect();
            Self { rows }
        }

        fn page_from(&self, start: usize, limit: u32) -> PageResult<Row> {
            let end = (start + limit as usize).min(self.rows.len());
            let rows = self.rows[start..end].to_vec();
            if end == self.rows.len() {
                PageResult::last(rows)
            } else {
                PageResult::rows(rows)
            }
        }
    }

    impl DataSource for SyntheticSource {
        type Row = Row;

        async fn fetch_first_page(
            &self,
            limit: u32,
            _ctx: &FetchContext,
        ) -> rulegrid::Result<PageResult<Row>> {
            Ok(self.page_from(0, limit))
        }

        async fn fetch_next_page(
            &self,
            anchor_id: &str,
            _anchor_row: &Row,
            limit: u32,
            _ctx: &FetchContext,
        ) -> rulegrid::Result<PageResult<Row>> {
            let position = self
                .rows
                .iter()
                .position(|r| r["_id"] == anchor_id)
                .ok_or_else(|| rulegrid::GridError::Fetch(format!("unknown anchor {anchor_id}")))?;
            Ok(self.page_from(position + 1, limit))
        }

        async fn apply_cell_edit(
            &self,
            _edit: &CellEditContext<Row>,
        ) -> rulegrid::Result<Option<Row>> {
            Ok(None)
        }
    }

    async fn run(total: u32, page_size: u32) {
        let grid = DataGridView::new(
            SyntheticSource::new(total),
            GridConfig {
                page_size,
                ..GridConfig::default()
            },
        );
        grid.set_columns(vec![
            ColumnDescriptor::new("net", "Net"),
            ColumnDescriptor::new("clearance", "Clearance"),
        ]);
        grid.set_cell_content(|row, _columns, column_index, _is_header, _logical| {
            match column_index {
                0 => CellValue::Text(row["net"].as_str().unwrap_or_default().to_string()),
                _ => CellValue::Number(row["clearance"].as_f64().unwrap_or_default()),
            }
        });
        grid.set_total_row_count(total).await;

        // Scroll through the whole data set a viewport at a time.
        let viewport_rows = 40;
        let mut y = 0;
        let mut viewport_events = 0;
        while y < total {
            grid.set_visible_region(GridRect::new(0, y, 2, viewport_rows)).await;
            viewport_events += 1;
            y += viewport_rows;
        }

        let first_cell = grid.cell_content(CellCoord::new(0, 0));
        let stats = json!({
            "totalRows": total,
            "pageSize": page_size,
            "viewportEvents": viewport_events,
            "loadedRows": grid.loaded_count(),
            "firstCell": first_cell.display_value(),
        });
        println!("{}", serde_json::to_string_pretty(&stats).unwrap());
    }

    pub fn main() {
        let args: Vec<String> = env::args().collect();
        let total: u32 = args
            .get(1)
            .and_then(|a| a.parse().ok())
            .unwrap_or(500);
        let page_size: u32 = args
            .get(2)
            .and_then(|a| a.parse().ok())
            .unwrap_or(rulegrid::DEFAULT_PAGE_SIZE);

        if total == 0 || page_size == 0 {
            eprintln!("Usage: rulegrid_cli [total_rows] [page_size]");
            std::process::exit(1);
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("tokio runtime");
        runtime.block_on(run(total, page_size));
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    harness::main();
}

#[cfg(target_arch = "wasm32")]
fn main() {}
