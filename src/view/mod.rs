//! The embeddable grid component: `DataGridView`.
//!
//! `DataGridView` wires the engine core (cache, pager, loader, group mapper,
//! selection, edit pipeline, fill gate, hover debounce) to a `DataSource`
//! and the host's callbacks. State lives behind `Rc<RefCell<…>>` so cloned
//! handles and spawned futures share one grid instance; no borrow is held
//! across a suspension point, and no callback other than the pure content
//! and fill predicates runs under a borrow.
//!
//! The struct itself is the imperative handle the host keeps: it is returned
//! once from the constructor and every capability is an ordinary method.

#[cfg(target_arch = "wasm32")]
pub mod js;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::warn;

use crate::grid::edit::{CellEditContext, CellEditPipeline, ConfirmationRequest, EditDisposition};
use crate::grid::fill::{FillPatternFn, FillPatternGate};
use crate::grid::group_map::{ResolvedCell, RowGroupIndexMapper, RowGroups, RowKind};
use crate::grid::hover::HoverDebounce;
use crate::grid::loader::{FetchPlan, PageLoader};
use crate::grid::pager::required_pages;
use crate::grid::row_cache::SparseRowCache;
use crate::grid::selection::{SelectionController, SelectionOutcome};
use crate::grid::GridConfig;
use crate::source::{DataSource, FetchContext};
use crate::types::{
    CellCoord, CellValue, ColumnDescriptor, GridRect, GridRow, GridSelection, GroupRowLineInfo,
};

/// Content callback: `(row, columns, column_index, is_group_header, logical_row)`.
pub type CellContentFn<R> = dyn Fn(&R, &[ColumnDescriptor], u32, bool, u32) -> CellValue;

/// Group-header content callback:
/// `(header_row, columns, column_index, group_info, group_index)`.
pub type GroupHeaderContentFn<R> =
    dyn Fn(&R, &[ColumnDescriptor], u32, &[GroupRowLineInfo], usize) -> CellValue;

/// Host callback slots. All optional; unset slots degrade to no-ops
/// (content queries yield [`CellValue::Empty`]).
struct GridCallbacks<R> {
    cell_content: Option<Rc<CellContentFn<R>>>,
    group_header_cell_content: Option<Rc<GroupHeaderContentFn<R>>>,
    on_cells_damaged: Option<Rc<dyn Fn(&[CellCoord])>>,
    on_selection_changed: Option<Rc<dyn Fn(&GridSelection, &HashMap<String, u32>)>>,
    on_selection_cleared: Option<Rc<dyn Fn()>>,
    on_cell_edit_completed: Option<Rc<dyn Fn(u32, u32)>>,
    on_tooltip: Option<Rc<dyn Fn(CellCoord, &R)>>,
}

impl<R> Default for GridCallbacks<R> {
    fn default() -> Self {
        Self {
            cell_content: None,
            group_header_cell_content: None,
            on_cells_damaged: None,
            on_selection_changed: None,
            on_selection_cleared: None,
            on_cell_edit_completed: None,
            on_tooltip: None,
        }
    }
}

/// Shared mutable grid state (one instance per grid).
struct GridState<R> {
    config: GridConfig,
    columns: Vec<ColumnDescriptor>,
    filter_text: String,
    total_row_count: u32,
    groups: RowGroups,
    viewport: Option<GridRect>,
    cache: SparseRowCache<R>,
    loader: PageLoader,
    selection: SelectionController,
    edit: CellEditPipeline<R>,
    fill: FillPatternGate<R>,
    hover: HoverDebounce,
    right_panel_enabled: bool,
}

/// Outcome of an edit submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Group-header cell, uncached row, or no pending edit: nothing happened.
    Ignored,
    /// The column is confirmation-gated; present this request and call
    /// `confirm_pending_edit` or `cancel_pending_edit`.
    ConfirmationRequired(ConfirmationRequest),
    /// The source returned a replacement row; the cache was updated.
    Applied,
    /// The source declined the edit (or failed); nothing was written.
    Declined,
}

/// Why the grid has nothing to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridPlaceholder {
    /// The host has not configured any columns.
    NoColumns,
}

impl GridPlaceholder {
    /// Text the rendering layer shows in place of the grid.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::NoColumns => "No columns defined",
        }
    }
}

/// The virtualized, server-paginated, grouped, editable grid component.
pub struct DataGridView<S: DataSource> {
    state: Rc<RefCell<GridState<S::Row>>>,
    source: Rc<S>,
    callbacks: Rc<RefCell<GridCallbacks<S::Row>>>,
}

impl<S: DataSource> Clone for DataGridView<S> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
            source: Rc::clone(&self.source),
            callbacks: Rc::clone(&self.callbacks),
        }
    }
}

impl<S: DataSource> DataGridView<S> {
    /// Create a grid over a data source.
    #[must_use]
    pub fn new(source: S, mut config: GridConfig) -> Self {
        config.page_size = config.page_size.max(1);
        let selection = SelectionController::new(
            config.multi_row_selection,
            config.max_row_selection_count,
        );
        let edit = CellEditPipeline::new(config.edit_confirmation_columns.clone());
        let state = GridState {
            config,
            columns: Vec::new(),
            filter_text: String::new(),
            total_row_count: 0,
            groups: RowGroups::new(),
            viewport: None,
            cache: SparseRowCache::new(),
            loader: PageLoader::new(),
            selection,
            edit,
            fill: FillPatternGate::new(),
            hover: HoverDebounce::new(),
            right_panel_enabled: false,
        };
        Self {
            state: Rc::new(RefCell::new(state)),
            source: Rc::new(source),
            callbacks: Rc::new(RefCell::new(GridCallbacks::default())),
        }
    }

    // ---- Callback registration ----

    pub fn set_cell_content(
        &self,
        f: impl Fn(&S::Row, &[ColumnDescriptor], u32, bool, u32) -> CellValue + 'static,
    ) {
        self.callbacks.borrow_mut().cell_content = Some(Rc::new(f));
    }

    pub fn set_group_header_cell_content(
        &self,
        f: impl Fn(&S::Row, &[ColumnDescriptor], u32, &[GroupRowLineInfo], usize) -> CellValue
            + 'static,
    ) {
        self.callbacks.borrow_mut().group_header_cell_content = Some(Rc::new(f));
    }

    pub fn set_on_cells_damaged(&self, f: impl Fn(&[CellCoord]) + 'static) {
        self.callbacks.borrow_mut().on_cells_damaged = Some(Rc::new(f));
    }

    pub fn set_on_selection_changed(
        &self,
        f: impl Fn(&GridSelection, &HashMap<String, u32>) + 'static,
    ) {
        self.callbacks.borrow_mut().on_selection_changed = Some(Rc::new(f));
    }

    pub fn set_on_selection_cleared(&self, f: impl Fn() + 'static) {
        self.callbacks.borrow_mut().on_selection_cleared = Some(Rc::new(f));
    }

    pub fn set_on_cell_edit_completed(&self, f: impl Fn(u32, u32) + 'static) {
        self.callbacks.borrow_mut().on_cell_edit_completed = Some(Rc::new(f));
    }

    pub fn set_on_tooltip(&self, f: impl Fn(CellCoord, &S::Row) + 'static) {
        self.callbacks.borrow_mut().on_tooltip = Some(Rc::new(f));
    }

    /// Install or remove the fill-handle pattern predicate.
    pub fn set_fill_pattern(&self, predicate: Option<FillPatternFn<S::Row>>) {
        self.state.borrow_mut().fill.set_predicate(predicate);
    }

    // ---- Paging ----

    /// The rendering grid reports its visible rectangle.
    ///
    /// A structurally equal report is a no-op; otherwise the pager computes
    /// the required pages (half-page margin each way) and the loader fetches
    /// the ones not yet loaded or in flight, in ascending order. With no
    /// columns configured the grid is in placeholder state and nothing is
    /// fetched.
    pub async fn set_visible_region(&self, region: GridRect) {
        let pages = {
            let mut s = self.state.borrow_mut();
            if s.columns.is_empty() {
                return;
            }
            if s.viewport == Some(region) {
                return;
            }
            s.viewport = Some(region);
            required_pages(&region, s.config.page_size)
        };
        for page in pages {
            self.load_page(page).await;
        }
    }

    /// Re-evaluate the current viewport against the pager.
    ///
    /// Needed whenever the total row count or the grouping changes without
    /// the viewport moving.
    pub async fn refresh_visible_pages(&self) {
        let pages = {
            let s = self.state.borrow();
            if s.columns.is_empty() {
                return;
            }
            let Some(viewport) = s.viewport else {
                return;
            };
            required_pages(&viewport, s.config.page_size)
        };
        for page in pages {
            self.load_page(page).await;
        }
    }

    /// Plan, fetch, and commit one page.
    async fn load_page(&self, page: u32) {
        let planned = {
            let s = &mut *self.state.borrow_mut();
            let GridState {
                loader,
                cache,
                config,
                filter_text,
                groups,
                ..
            } = s;
            loader.plan_fetch(page, config.page_size, cache).map(|plan| {
                let ctx = FetchContext {
                    filter_text: filter_text.clone(),
                    group_info: groups.to_line_info(),
                };
                (plan, ctx)
            })
        };
        let Some((plan, ctx)) = planned else {
            return;
        };

        let outcome = match plan {
            FetchPlan::First { limit } => self.source.fetch_first_page(limit, &ctx).await,
            FetchPlan::Subsequent {
                anchor_id,
                anchor_row,
                limit,
            } => {
                self.source
                    .fetch_next_page(&anchor_id, &anchor_row, limit, &ctx)
                    .await
            }
        };

        let damaged = {
            let s = &mut *self.state.borrow_mut();
            let visible_columns = s.viewport.map_or(0..0, |v| v.columns());
            s.loader
                .commit(page, s.config.page_size, outcome, &mut s.cache, visible_columns)
        };
        self.emit_damage(&damaged);
    }

    fn emit_damage(&self, damaged: &[CellCoord]) {
        if damaged.is_empty() {
            return;
        }
        let callback = self.callbacks.borrow().on_cells_damaged.clone();
        if let Some(callback) = callback {
            callback(damaged);
        }
    }

    // ---- Content queries ----

    /// Resolve a visual cell to its rendered content.
    ///
    /// Rows whose page has not landed yet yield [`CellValue::Empty`]; the
    /// rendering grid shows its loading placeholder and a damage
    /// notification re-queries the cell once the page commits.
    #[must_use]
    pub fn cell_content(&self, cell: CellCoord) -> CellValue {
        let s = self.state.borrow();
        let mapper = RowGroupIndexMapper::new(&s.groups, s.total_row_count);
        let Some(resolved) = mapper.resolve(cell.row) else {
            return CellValue::Empty;
        };
        let Some(row) = s.cache.get(resolved.logical_row) else {
            return CellValue::Empty;
        };
        let callbacks = self.callbacks.borrow();
        if let RowKind::GroupHeader { group } = resolved.kind {
            if let Some(callback) = &callbacks.group_header_cell_content {
                let info = s.groups.to_line_info();
                return callback(row, &s.columns, cell.col, &info, group);
            }
            return match &callbacks.cell_content {
                Some(callback) => callback(row, &s.columns, cell.col, true, resolved.logical_row),
                None => CellValue::Empty,
            };
        }
        match &callbacks.cell_content {
            Some(callback) => callback(row, &s.columns, cell.col, false, resolved.logical_row),
            None => CellValue::Empty,
        }
    }

    /// Whether the visual row is a group-header row.
    #[must_use]
    pub fn is_group_header_row(&self, visual_row: u32) -> bool {
        let s = self.state.borrow();
        RowGroupIndexMapper::new(&s.groups, s.total_row_count)
            .resolve(visual_row)
            .is_some_and(|r| r.is_group_header())
    }

    // ---- Grouping ----

    /// Handle a click: column 0 on a group-header row toggles that group's
    /// collapsed flag. Returns whether a toggle happened.
    pub fn toggle_group_at(&self, cell: CellCoord) -> bool {
        if cell.col != 0 {
            return false;
        }
        let mut s = self.state.borrow_mut();
        let group = {
            let mapper = RowGroupIndexMapper::new(&s.groups, s.total_row_count);
            match mapper.resolve(cell.row).map(|r| r.kind) {
                Some(RowKind::GroupHeader { group }) => group,
                _ => return false,
            }
        };
        s.groups.toggle_collapsed(group).is_some()
    }

    /// Replace the group layout. The row cache is deliberately left intact.
    pub async fn set_group_info(&self, info: &[GroupRowLineInfo]) {
        {
            self.state.borrow_mut().groups = RowGroups::from_line_info(info);
        }
        self.refresh_visible_pages().await;
    }

    /// Current group layout, projected to the host-facing shape.
    #[must_use]
    pub fn group_info(&self) -> Vec<GroupRowLineInfo> {
        self.state.borrow().groups.to_line_info()
    }

    /// Rows the rendering grid should show (headers added, collapsed
    /// members elided).
    #[must_use]
    pub fn visual_row_count(&self) -> u32 {
        let s = self.state.borrow();
        RowGroupIndexMapper::new(&s.groups, s.total_row_count).visual_row_count()
    }

    // ---- Selection ----

    /// Apply a selection. Returns `false` when the row-count policy rejects
    /// it (previous selection kept, no callback).
    pub fn set_selection(&self, selection: GridSelection) -> bool {
        let (outcome, snapshot) = {
            let s = &mut *self.state.borrow_mut();
            let GridState {
                selection: controller,
                groups,
                cache,
                total_row_count,
                ..
            } = s;
            let mapper = RowGroupIndexMapper::new(groups, *total_row_count);
            let outcome = controller.set_selection(selection, |visual_row| {
                mapper
                    .resolve(visual_row)
                    .and_then(|r| cache.get(r.logical_row))
                    .and_then(|row| row.identity().map(str::to_string))
            });
            (outcome, controller.selection().clone())
        };
        match outcome {
            SelectionOutcome::Applied { selected_ids, .. } => {
                let callback = self.callbacks.borrow().on_selection_changed.clone();
                if let Some(callback) = callback {
                    callback(&snapshot, &selected_ids);
                }
                true
            }
            SelectionOutcome::Rejected => false,
        }
    }

    /// Clear the selection and notify the host through the dedicated
    /// cleared callback (distinct from a change to an empty selection).
    pub fn clear_selection(&self) {
        self.state.borrow_mut().selection.clear();
        let callback = self.callbacks.borrow().on_selection_cleared.clone();
        if let Some(callback) = callback {
            callback();
        }
    }

    /// Current selection snapshot.
    #[must_use]
    pub fn selection(&self) -> GridSelection {
        self.state.borrow().selection.selection().clone()
    }

    // ---- Editing ----

    /// Submit an edit for a visual cell.
    ///
    /// Group-header cells and rows not yet cached are ignored. Columns in
    /// the confirmation set park the edit and return
    /// [`EditOutcome::ConfirmationRequired`]; everything else commits
    /// immediately through the source.
    pub async fn edit_cell(&self, cell: CellCoord, new_value: CellValue) -> EditOutcome {
        let disposition = {
            let s = &mut *self.state.borrow_mut();
            let GridState {
                edit,
                groups,
                cache,
                columns,
                total_row_count,
                ..
            } = s;
            let mapper = RowGroupIndexMapper::new(groups, *total_row_count);
            let Some(resolved) = mapper.resolve(cell.row) else {
                return EditOutcome::Ignored;
            };
            // Under grouping the effective index is the group's header offset
            // plus the intra-group offset, not the visual row.
            let effective = match resolved.kind {
                RowKind::GroupMember { group, offset } => mapper
                    .logical_for_member(group, offset)
                    .unwrap_or(resolved.logical_row),
                _ => resolved.logical_row,
            };
            let resolved = ResolvedCell {
                logical_row: effective,
                kind: resolved.kind,
            };
            edit.begin(
                &resolved,
                cache.get(effective),
                columns.get(cell.col as usize),
                cell.col,
                new_value,
            )
        };
        match disposition {
            EditDisposition::Ignored => EditOutcome::Ignored,
            EditDisposition::AwaitConfirmation(request) => {
                EditOutcome::ConfirmationRequired(request)
            }
            EditDisposition::Commit(context) => self.apply_edit(context).await,
        }
    }

    /// User accepted the confirmation dialog: commit the parked edit.
    pub async fn confirm_pending_edit(&self) -> EditOutcome {
        let context = self.state.borrow_mut().edit.confirm();
        match context {
            Some(context) => self.apply_edit(context).await,
            None => EditOutcome::Ignored,
        }
    }

    /// User cancelled the confirmation dialog: discard the parked edit.
    pub fn cancel_pending_edit(&self) {
        self.state.borrow_mut().edit.cancel();
    }

    /// Whether an edit is parked awaiting confirmation.
    #[must_use]
    pub fn has_pending_edit(&self) -> bool {
        self.state.borrow().edit.has_pending()
    }

    async fn apply_edit(&self, context: CellEditContext<S::Row>) -> EditOutcome {
        match self.source.apply_cell_edit(&context).await {
            Ok(Some(replacement)) => {
                self.state
                    .borrow_mut()
                    .cache
                    .insert(context.row_index, replacement);
                let callback = self.callbacks.borrow().on_cell_edit_completed.clone();
                if let Some(callback) = callback {
                    callback(context.row_index, context.column_index);
                }
                EditOutcome::Applied
            }
            Ok(None) => EditOutcome::Declined,
            Err(e) => {
                warn!(row = context.row_index, error = %e, "cell edit apply failed");
                EditOutcome::Declined
            }
        }
    }

    // ---- Fill handle ----

    /// Gate a fill-handle drag. `false` cancels the drag outright.
    #[must_use]
    pub fn allow_fill(&self, source: GridRect, dest: GridRect) -> bool {
        let s = self.state.borrow();
        let mapper = RowGroupIndexMapper::new(&s.groups, s.total_row_count);
        let source_row = mapper
            .resolve(source.y)
            .and_then(|r| s.cache.get(r.logical_row));
        s.fill.evaluate(&source, &dest, &s.columns, source_row)
    }

    // ---- Tooltip hover ----

    /// Report a hover-target change. `Some` returns the debounce generation
    /// the host's timer must pass to [`Self::fire_hover`]; `None` clears the
    /// pending target (and invalidates any armed timer).
    pub fn hover_cell(&self, cell: Option<CellCoord>) -> Option<u64> {
        let mut s = self.state.borrow_mut();
        match cell {
            Some(cell) => Some(s.hover.retarget(cell)),
            None => {
                s.hover.clear();
                None
            }
        }
    }

    /// Timer expiry for a hover generation. Stale generations are no-ops;
    /// a current one resolves the hovered row and raises `on_tooltip`.
    pub fn fire_hover(&self, generation: u64) {
        let hit = {
            let s = &mut *self.state.borrow_mut();
            let GridState {
                hover,
                groups,
                cache,
                total_row_count,
                ..
            } = s;
            hover.fire(generation).and_then(|cell| {
                RowGroupIndexMapper::new(groups, *total_row_count)
                    .resolve(cell.row)
                    .and_then(|r| cache.get(r.logical_row))
                    .map(|row| (cell, row.clone()))
            })
        };
        if let Some((cell, row)) = hit {
            let callback = self.callbacks.borrow().on_tooltip.clone();
            if let Some(callback) = callback {
                callback(cell, &row);
            }
        }
    }

    // ---- Imperative handle ----

    /// The cached row at a logical index, if its page has loaded.
    #[must_use]
    pub fn row_at(&self, logical_row: u32) -> Option<S::Row> {
        self.state.borrow().cache.get(logical_row).cloned()
    }

    /// Number of rows actually cached.
    #[must_use]
    pub fn loaded_count(&self) -> usize {
        self.state.borrow().cache.len()
    }

    /// First cached row matching the predicate (scan order unspecified).
    #[must_use]
    pub fn find_first(&self, predicate: impl FnMut(&S::Row) -> bool) -> Option<S::Row> {
        self.state.borrow().cache.find_first(predicate).cloned()
    }

    /// Full reset: cache, page-load set, end-of-data marker, viewport, and
    /// selection all return to their initial state. Outstanding fetches are
    /// not cancelled; a late response commits into the fresh cache.
    pub fn reload(&self) {
        {
            let mut s = self.state.borrow_mut();
            s.cache.reset();
            s.loader.reset();
            s.viewport = None;
            s.selection.clear();
            s.edit.cancel();
            s.hover.clear();
        }
        let callback = self.callbacks.borrow().on_selection_cleared.clone();
        if let Some(callback) = callback {
            callback();
        }
    }

    /// Update the externally-known total row count and re-evaluate paging,
    /// since a grouping change can alter the total without moving the viewport.
    pub async fn set_total_row_count(&self, total: u32) {
        {
            self.state.borrow_mut().total_row_count = total;
        }
        self.refresh_visible_pages().await;
    }

    /// Total row count as last reported by the host.
    #[must_use]
    pub fn total_row_count(&self) -> u32 {
        self.state.borrow().total_row_count
    }

    /// Replace the column set.
    pub fn set_columns(&self, columns: Vec<ColumnDescriptor>) {
        self.state.borrow_mut().columns = columns;
    }

    /// Update the filter text forwarded to fetch calls. Callers typically
    /// follow with [`Self::reload`] and a fresh viewport report.
    pub fn set_filter_text(&self, text: impl Into<String>) {
        self.state.borrow_mut().filter_text = text.into();
    }

    /// Host-layout hint: whether the right-hand panel is shown.
    pub fn set_right_panel_enabled(&self, enabled: bool) {
        self.state.borrow_mut().right_panel_enabled = enabled;
    }

    #[must_use]
    pub fn right_panel_enabled(&self) -> bool {
        self.state.borrow().right_panel_enabled
    }

    /// Placeholder state, if the grid cannot render data yet.
    #[must_use]
    pub fn placeholder(&self) -> Option<GridPlaceholder> {
        if self.state.borrow().columns.is_empty() {
            Some(GridPlaceholder::NoColumns)
        } else {
            None
        }
    }

    /// Last accepted viewport, if any.
    #[must_use]
    pub fn viewport(&self) -> Option<GridRect> {
        self.state.borrow().viewport
    }
}
