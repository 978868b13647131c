//! Shared test fixtures: a scripted in-memory data source with call
//! counters, and a helper that assembles a grid over it.

#![allow(dead_code)]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::{json, Value};
use tokio::sync::Notify;

use rulegrid::{
    CellEditContext, CellValue, ColumnDescriptor, DataGridView, DataSource, FetchContext,
    GridConfig, GridError, PageResult,
};

/// What `apply_cell_edit` should do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyBehavior {
    /// Return `Ok(None)`: the host declined the edit.
    Decline,
    /// Return a replacement row: the current row with the edited column's
    /// value written under the column id, plus an `"edited": true` marker.
    Echo,
    /// Return `Err(...)`.
    Fail,
}

/// Observable internals shared between the source and the test body.
pub struct MockInner {
    pub rows: RefCell<Vec<Value>>,
    pub first_calls: Cell<usize>,
    pub next_calls: Cell<usize>,
    pub apply_calls: Cell<usize>,
    pub last_anchor: RefCell<Option<String>>,
    pub last_ctx: RefCell<Option<FetchContext>>,
    pub apply_behavior: Cell<ApplyBehavior>,
    pub serve_empty: Cell<bool>,
    pub fail_fetches: Cell<bool>,
    /// Stamp `is_last_page` on every response regardless of position.
    pub force_last: Cell<bool>,
    pub gate: RefCell<Option<Rc<Notify>>>,
}

/// Scripted data source over an in-memory row list.
#[derive(Clone)]
pub struct MockSource {
    pub inner: Rc<MockInner>,
}

/// Rows `row-0 .. row-(count-1)` with a name and a numeric value each.
pub fn data_rows(count: u32) -> Vec<Value> {
    (0..count)
        .map(|i| {
            json!({
                "_id": format!("row-{i}"),
                "name": format!("NET_{i}"),
                "value": i,
            })
        })
        .collect()
}

impl MockSource {
    pub fn with_rows(count: u32) -> Self {
        Self::with_data(data_rows(count))
    }

    pub fn with_data(rows: Vec<Value>) -> Self {
        Self {
            inner: Rc::new(MockInner {
                rows: RefCell::new(rows),
                first_calls: Cell::new(0),
                next_calls: Cell::new(0),
                apply_calls: Cell::new(0),
                last_anchor: RefCell::new(None),
                last_ctx: RefCell::new(None),
                apply_behavior: Cell::new(ApplyBehavior::Echo),
                serve_empty: Cell::new(false),
                fail_fetches: Cell::new(false),
                force_last: Cell::new(false),
                gate: RefCell::new(None),
            }),
        }
    }

    /// Make every fetch wait on the returned gate before responding.
    pub fn pause_fetches(&self) -> Rc<Notify> {
        let gate = Rc::new(Notify::new());
        *self.inner.gate.borrow_mut() = Some(Rc::clone(&gate));
        gate
    }

    pub fn fetch_calls(&self) -> usize {
        self.inner.first_calls.get() + self.inner.next_calls.get()
    }

    async fn wait_if_gated(&self) {
        let gate = self.inner.gate.borrow().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }

    fn page_from(&self, start: usize, limit: u32) -> PageResult<Value> {
        let rows = self.inner.rows.borrow();
        let end = (start + limit as usize).min(rows.len());
        let slice = if start < rows.len() {
            rows[start..end].to_vec()
        } else {
            Vec::new()
        };
        PageResult {
            rows: slice,
            is_last_page: self.inner.force_last.get() || end == rows.len(),
        }
    }
}

impl DataSource for MockSource {
    type Row = Value;

    async fn fetch_first_page(
        &self,
        limit: u32,
        ctx: &FetchContext,
    ) -> rulegrid::Result<PageResult<Value>> {
        self.inner.first_calls.set(self.inner.first_calls.get() + 1);
        *self.inner.last_ctx.borrow_mut() = Some(ctx.clone());
        self.wait_if_gated().await;
        if self.inner.fail_fetches.get() {
            return Err(GridError::Fetch("scripted failure".into()));
        }
        if self.inner.serve_empty.get() {
            return Ok(PageResult::rows(Vec::new()));
        }
        Ok(self.page_from(0, limit))
    }

    async fn fetch_next_page(
        &self,
        anchor_id: &str,
        _anchor_row: &Value,
        limit: u32,
        ctx: &FetchContext,
    ) -> rulegrid::Result<PageResult<Value>> {
        self.inner.next_calls.set(self.inner.next_calls.get() + 1);
        *self.inner.last_anchor.borrow_mut() = Some(anchor_id.to_string());
        *self.inner.last_ctx.borrow_mut() = Some(ctx.clone());
        self.wait_if_gated().await;
        if self.inner.fail_fetches.get() {
            return Err(GridError::Fetch("scripted failure".into()));
        }
        if self.inner.serve_empty.get() {
            return Ok(PageResult::rows(Vec::new()));
        }
        let start = self
            .inner
            .rows
            .borrow()
            .iter()
            .position(|r| r["_id"] == anchor_id)
            .map(|p| p + 1)
            .ok_or_else(|| GridError::Fetch(format!("unknown anchor {anchor_id}")))?;
        Ok(self.page_from(start, limit))
    }

    async fn apply_cell_edit(
        &self,
        edit: &CellEditContext<Value>,
    ) -> rulegrid::Result<Option<Value>> {
        self.inner.apply_calls.set(self.inner.apply_calls.get() + 1);
        match self.inner.apply_behavior.get() {
            ApplyBehavior::Decline => Ok(None),
            ApplyBehavior::Fail => Err(GridError::EditApply("scripted failure".into())),
            ApplyBehavior::Echo => {
                let mut replacement = edit.current.clone();
                replacement[edit.column.id.clone()] = json!(edit.new_value.display_value());
                replacement["edited"] = json!(true);
                Ok(Some(replacement))
            }
        }
    }
}

/// Columns used by every grid in the suite.
pub fn test_columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("_id", "Id"),
        ColumnDescriptor::new("value", "Value"),
        ColumnDescriptor::new("name", "Name"),
    ]
}

/// Grid wired to the mock source with columns and a content callback.
pub fn make_grid(source: MockSource, config: GridConfig) -> DataGridView<MockSource> {
    let grid = DataGridView::new(source, config);
    grid.set_columns(test_columns());
    grid.set_cell_content(|row, _columns, column_index, is_header, _logical| {
        if is_header {
            return CellValue::Text(row["name"].as_str().unwrap_or_default().to_string());
        }
        match column_index {
            0 => CellValue::Text(row["_id"].as_str().unwrap_or_default().to_string()),
            1 => CellValue::Number(row["value"].as_f64().unwrap_or_default()),
            _ => CellValue::Text(row["name"].as_str().unwrap_or_default().to_string()),
        }
    });
    grid
}
