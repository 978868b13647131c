//! JavaScript boundary for the grid (wasm32 only).
//!
//! `RuleGrid` is the wasm-exported handle the browser host keeps. Rows cross
//! the boundary as JSON values; the fetch and edit-apply collaborators are
//! JavaScript functions returning Promises, awaited through
//! `wasm-bindgen-futures`. Async entry points run on `spawn_local` so the UI
//! thread never blocks. The tooltip timer lives here: armed with
//! `setTimeout`, cancelled on every retarget, and cleared on drop so a late
//! callback cannot touch a torn-down grid.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Function, Promise};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{spawn_local, JsFuture};

use crate::error::{GridError, Result};
use crate::grid::edit::CellEditContext;
use crate::grid::GridConfig;
use crate::source::{DataSource, FetchContext, PageResult};
use crate::types::{CellCoord, CellValue, ColumnDescriptor, GridRect, GridSelection};
use crate::view::{DataGridView, EditOutcome};

/// Delay (ms) after the last hover-target change before the tooltip fires.
const TOOLTIP_DELAY_MS: i32 = 500;

type JsonRow = serde_json::Value;

fn to_js<T: serde::Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

fn js_value_error(context: &str, value: &JsValue) -> GridError {
    let detail = value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"));
    GridError::Fetch(format!("{context}: {detail}"))
}

/// Fetch results may arrive as a bare row array or as a tagged
/// `{ rows, isLastPage }` envelope.
#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PageEnvelope {
    rows: Vec<JsonRow>,
    is_last_page: bool,
}

impl Default for PageEnvelope {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            is_last_page: false,
        }
    }
}

fn parse_page_result(value: &JsValue) -> Result<PageResult<JsonRow>> {
    if Array::is_array(value) {
        let rows: Vec<JsonRow> = serde_wasm_bindgen::from_value(value.clone())
            .map_err(|e| GridError::Conversion(e.to_string()))?;
        return Ok(PageResult::rows(rows));
    }
    let envelope: PageEnvelope = serde_wasm_bindgen::from_value(value.clone())
        .map_err(|e| GridError::Conversion(e.to_string()))?;
    Ok(PageResult {
        rows: envelope.rows,
        is_last_page: envelope.is_last_page,
    })
}

/// Edit context as handed to the JavaScript apply function.
#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct EditPayload<'a> {
    current: &'a JsonRow,
    new_value: &'a CellValue,
    column_index: u32,
    column: &'a ColumnDescriptor,
    row_index: u32,
}

/// `DataSource` backed by JavaScript fetcher functions.
pub struct JsDataSource {
    fetch_first: Function,
    fetch_next: Function,
    apply_edit: Option<Function>,
}

impl JsDataSource {
    async fn settle(value: JsValue) -> Result<JsValue> {
        JsFuture::from(Promise::resolve(&value))
            .await
            .map_err(|e| js_value_error("promise rejected", &e))
    }
}

impl DataSource for JsDataSource {
    type Row = JsonRow;

    async fn fetch_first_page(
        &self,
        limit: u32,
        ctx: &FetchContext,
    ) -> Result<PageResult<JsonRow>> {
        let ctx_js = to_js(ctx);
        let value = self
            .fetch_first
            .call2(&JsValue::NULL, &JsValue::from(limit), &ctx_js)
            .map_err(|e| js_value_error("fetchFirstPage threw", &e))?;
        let settled = Self::settle(value).await?;
        parse_page_result(&settled)
    }

    async fn fetch_next_page(
        &self,
        anchor_id: &str,
        anchor_row: &JsonRow,
        limit: u32,
        ctx: &FetchContext,
    ) -> Result<PageResult<JsonRow>> {
        let args = Array::new();
        args.push(&JsValue::from_str(anchor_id));
        args.push(&to_js(anchor_row));
        args.push(&JsValue::from(limit));
        args.push(&to_js(ctx));
        let value = self
            .fetch_next
            .apply(&JsValue::NULL, &args)
            .map_err(|e| js_value_error("fetchSubsequentPage threw", &e))?;
        let settled = Self::settle(value).await?;
        parse_page_result(&settled)
    }

    async fn apply_cell_edit(
        &self,
        edit: &CellEditContext<JsonRow>,
    ) -> Result<Option<JsonRow>> {
        let Some(apply) = &self.apply_edit else {
            return Ok(None);
        };
        let payload = to_js(&EditPayload {
            current: &edit.current,
            new_value: &edit.new_value,
            column_index: edit.column_index,
            column: &edit.column,
            row_index: edit.row_index,
        });
        let value = apply
            .call1(&JsValue::NULL, &payload)
            .map_err(|e| GridError::EditApply(format!("{e:?}")))?;
        let settled = JsFuture::from(Promise::resolve(&value))
            .await
            .map_err(|e| GridError::EditApply(format!("{e:?}")))?;
        if settled.is_undefined() || settled.is_null() {
            return Ok(None);
        }
        let row: JsonRow = serde_wasm_bindgen::from_value(settled)
            .map_err(|e| GridError::Conversion(e.to_string()))?;
        Ok(Some(row))
    }
}

/// Tooltip `setTimeout` bookkeeping.
struct TooltipTimer {
    timer_id: Option<i32>,
    closure: Option<Closure<dyn FnMut()>>,
}

/// Browser-facing grid handle.
#[wasm_bindgen]
pub struct RuleGrid {
    view: DataGridView<JsDataSource>,
    tooltip: Rc<RefCell<TooltipTimer>>,
    on_confirmation_required: Rc<RefCell<Option<Function>>>,
}

#[wasm_bindgen]
impl RuleGrid {
    /// Create a grid over JavaScript fetchers.
    ///
    /// `config` may be `undefined` for defaults, or a
    /// `{ pageSize, multiRowSelection, maxRowSelectionCount,
    /// editConfirmationColumns }` object.
    #[wasm_bindgen(constructor)]
    pub fn new(
        fetch_first_page: Function,
        fetch_subsequent_page: Function,
        apply_cell_edit: Option<Function>,
        config: JsValue,
    ) -> std::result::Result<RuleGrid, JsValue> {
        console_error_panic_hook::set_once();
        let config: GridConfig = if config.is_undefined() || config.is_null() {
            GridConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        let source = JsDataSource {
            fetch_first: fetch_first_page,
            fetch_next: fetch_subsequent_page,
            apply_edit: apply_cell_edit,
        };
        Ok(RuleGrid {
            view: DataGridView::new(source, config),
            tooltip: Rc::new(RefCell::new(TooltipTimer {
                timer_id: None,
                closure: None,
            })),
            on_confirmation_required: Rc::new(RefCell::new(None)),
        })
    }

    // ---- Paging ----

    /// Report the visible rectangle (column/row coordinates).
    pub fn set_visible_region(&self, x: u32, y: u32, width: u32, height: u32) {
        let view = self.view.clone();
        spawn_local(async move {
            view.set_visible_region(GridRect::new(x, y, width, height))
                .await;
        });
    }

    pub fn reload(&self) {
        self.view.reload();
    }

    pub fn set_total_row_count(&self, total: u32) {
        let view = self.view.clone();
        spawn_local(async move {
            view.set_total_row_count(total).await;
        });
    }

    pub fn loaded_count(&self) -> usize {
        self.view.loaded_count()
    }

    pub fn row_at(&self, logical_row: u32) -> JsValue {
        match self.view.row_at(logical_row) {
            Some(row) => to_js(&row),
            None => JsValue::UNDEFINED,
        }
    }

    // ---- Columns / filter / layout ----

    pub fn set_columns(&self, columns: JsValue) -> std::result::Result<(), JsValue> {
        let columns: Vec<ColumnDescriptor> = serde_wasm_bindgen::from_value(columns)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.view.set_columns(columns);
        Ok(())
    }

    pub fn set_filter_text(&self, text: String) {
        self.view.set_filter_text(text);
    }

    pub fn set_right_panel_enabled(&self, enabled: bool) {
        self.view.set_right_panel_enabled(enabled);
    }

    /// Placeholder message when the grid cannot render (no columns), else
    /// `undefined`.
    pub fn placeholder(&self) -> JsValue {
        match self.view.placeholder() {
            Some(p) => JsValue::from_str(p.message()),
            None => JsValue::UNDEFINED,
        }
    }

    // ---- Content ----

    pub fn cell_content(&self, col: u32, row: u32) -> JsValue {
        to_js(&self.view.cell_content(CellCoord::new(col, row)))
    }

    /// Install the cell-content provider:
    /// `(row, columns, columnIndex, isGroupHeader, logicalRow) → CellValue`.
    pub fn set_cell_content_provider(&self, provider: Function) {
        self.view
            .set_cell_content(move |row, columns, column_index, is_header, logical_row| {
                let args = Array::new();
                args.push(&to_js(row));
                args.push(&to_js(&columns.to_vec()));
                args.push(&JsValue::from(column_index));
                args.push(&JsValue::from_bool(is_header));
                args.push(&JsValue::from(logical_row));
                provider
                    .apply(&JsValue::NULL, &args)
                    .ok()
                    .and_then(|v| serde_wasm_bindgen::from_value(v).ok())
                    .unwrap_or(CellValue::Empty)
            });
    }

    /// Install the group-header content provider:
    /// `(headerRow, columns, columnIndex, groupInfo, groupIndex) → CellValue`.
    pub fn set_group_header_content_provider(&self, provider: Function) {
        self.view.set_group_header_cell_content(
            move |row, columns, column_index, group_info, group_index| {
                let args = Array::new();
                args.push(&to_js(row));
                args.push(&to_js(&columns.to_vec()));
                args.push(&JsValue::from(column_index));
                args.push(&to_js(&group_info.to_vec()));
                args.push(&JsValue::from(group_index as u32));
                provider
                    .apply(&JsValue::NULL, &args)
                    .ok()
                    .and_then(|v| serde_wasm_bindgen::from_value(v).ok())
                    .unwrap_or(CellValue::Empty)
            },
        );
    }

    pub fn set_on_cells_damaged(&self, callback: Function) {
        self.view.set_on_cells_damaged(move |cells| {
            let _ = callback.call1(&JsValue::NULL, &to_js(&cells.to_vec()));
        });
    }

    // ---- Grouping ----

    pub fn set_group_info(&self, info: JsValue) -> std::result::Result<(), JsValue> {
        let info: Vec<crate::types::GroupRowLineInfo> = serde_wasm_bindgen::from_value(info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let view = self.view.clone();
        spawn_local(async move {
            view.set_group_info(&info).await;
        });
        Ok(())
    }

    pub fn group_info(&self) -> JsValue {
        to_js(&self.view.group_info())
    }

    pub fn is_group_header_row(&self, row: u32) -> bool {
        self.view.is_group_header_row(row)
    }

    pub fn toggle_group_at(&self, col: u32, row: u32) -> bool {
        self.view.toggle_group_at(CellCoord::new(col, row))
    }

    pub fn visual_row_count(&self) -> u32 {
        self.view.visual_row_count()
    }

    // ---- Selection ----

    pub fn set_selection(&self, columns: Vec<u32>, rows: Vec<u32>) -> bool {
        self.view.set_selection(GridSelection { columns, rows })
    }

    pub fn clear_selection(&self) {
        self.view.clear_selection();
    }

    pub fn selection(&self) -> JsValue {
        to_js(&self.view.selection())
    }

    pub fn set_on_selection_changed(&self, callback: Function) {
        self.view.set_on_selection_changed(move |selection, ids| {
            let _ = callback.call2(&JsValue::NULL, &to_js(selection), &to_js(ids));
        });
    }

    pub fn set_on_selection_cleared(&self, callback: Function) {
        self.view.set_on_selection_cleared(move || {
            let _ = callback.call0(&JsValue::NULL);
        });
    }

    // ---- Editing ----

    /// Submit an edit. `value` is a tagged `{ kind, data }` cell value.
    /// When the edited column is confirmation-gated, the request is routed
    /// to the `onConfirmationRequired` callback instead of being applied.
    pub fn edit_cell(&self, col: u32, row: u32, value: JsValue) -> bool {
        let Ok(value) = serde_wasm_bindgen::from_value::<CellValue>(value) else {
            return false;
        };
        let view = self.view.clone();
        let on_confirm = Rc::clone(&self.on_confirmation_required);
        spawn_local(async move {
            let outcome = view.edit_cell(CellCoord::new(col, row), value).await;
            if let EditOutcome::ConfirmationRequired(request) = outcome {
                let callback = on_confirm.borrow().clone();
                if let Some(callback) = callback {
                    let _ = callback.call1(&JsValue::NULL, &to_js(&request));
                }
            }
        });
        true
    }

    pub fn set_on_confirmation_required(&self, callback: Function) {
        *self.on_confirmation_required.borrow_mut() = Some(callback);
    }

    pub fn confirm_pending_edit(&self) {
        let view = self.view.clone();
        spawn_local(async move {
            view.confirm_pending_edit().await;
        });
    }

    pub fn cancel_pending_edit(&self) {
        self.view.cancel_pending_edit();
    }

    pub fn has_pending_edit(&self) -> bool {
        self.view.has_pending_edit()
    }

    pub fn set_on_cell_edit_completed(&self, callback: Function) {
        self.view.set_on_cell_edit_completed(move |row, col| {
            let _ = callback.call2(&JsValue::NULL, &JsValue::from(row), &JsValue::from(col));
        });
    }

    // ---- Fill handle ----

    /// Install the fill-pattern predicate:
    /// `(sourceRect, destRect, columns, sourceRow) → boolean`.
    pub fn set_fill_pattern(&self, predicate: Function) {
        self.view.set_fill_pattern(Some(Rc::new(
            move |source: &GridRect, dest: &GridRect, columns: &[ColumnDescriptor], row: &JsonRow| {
                let args = Array::new();
                args.push(&to_js(source));
                args.push(&to_js(dest));
                args.push(&to_js(&columns.to_vec()));
                args.push(&to_js(row));
                predicate
                    .apply(&JsValue::NULL, &args)
                    .map(|v| v.is_truthy())
                    .unwrap_or(false)
            },
        )));
    }

    pub fn allow_fill(
        &self,
        source_x: u32,
        source_y: u32,
        source_width: u32,
        source_height: u32,
        dest_x: u32,
        dest_y: u32,
        dest_width: u32,
        dest_height: u32,
    ) -> bool {
        self.view.allow_fill(
            GridRect::new(source_x, source_y, source_width, source_height),
            GridRect::new(dest_x, dest_y, dest_width, dest_height),
        )
    }

    // ---- Tooltip hover ----

    pub fn hover_cell(&self, col: u32, row: u32) {
        let Some(generation) = self.view.hover_cell(Some(CellCoord::new(col, row))) else {
            return;
        };
        Self::arm_tooltip_timer(&self.view, &self.tooltip, generation);
    }

    pub fn clear_hover(&self) {
        self.view.hover_cell(None);
        Self::cancel_tooltip_timer(&self.tooltip);
    }

    pub fn set_on_tooltip(&self, callback: Function) {
        self.view.set_on_tooltip(move |cell, row| {
            let _ = callback.call2(&JsValue::NULL, &to_js(&cell), &to_js(row));
        });
    }
}

impl RuleGrid {
    fn arm_tooltip_timer(
        view: &DataGridView<JsDataSource>,
        tooltip: &Rc<RefCell<TooltipTimer>>,
        generation: u64,
    ) {
        let Some(window) = web_sys::window() else {
            return;
        };
        Self::cancel_tooltip_timer(tooltip);

        let view = view.clone();
        let closure = Closure::wrap(Box::new(move || {
            view.fire_hover(generation);
        }) as Box<dyn FnMut()>);
        let mut t = tooltip.borrow_mut();
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            TOOLTIP_DELAY_MS,
        ) {
            Ok(id) => {
                t.timer_id = Some(id);
                t.closure = Some(closure);
            }
            Err(_) => {
                t.timer_id = None;
                t.closure = None;
            }
        }
    }

    fn cancel_tooltip_timer(tooltip: &Rc<RefCell<TooltipTimer>>) {
        let mut t = tooltip.borrow_mut();
        if let Some(id) = t.timer_id.take() {
            if let Some(window) = web_sys::window() {
                window.clear_timeout_with_handle(id);
            }
        }
        t.closure = None;
    }
}

impl Drop for RuleGrid {
    fn drop(&mut self) {
        Self::cancel_tooltip_timer(&self.tooltip);
    }
}
