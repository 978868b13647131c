//! The asynchronous data collaborator the grid pages against.
//!
//! The engine performs no I/O itself; a `DataSource` implementation bridges
//! to whatever actually produces rows (REST calls in the browser host, an
//! in-memory table in tests and tools). Identity-based cursor pagination:
//! the first page is fetched by limit alone, every later page by the anchor
//! row immediately preceding its start index.

use crate::grid::edit::CellEditContext;
use crate::types::{GridRow, GroupRowLineInfo};

/// Outcome of a page fetch.
///
/// End-of-data is explicit rather than inferred from an empty response: an
/// empty `rows` with `is_last_page == false` is a transient miss and the page
/// stays eligible for a retry, while `is_last_page == true` stops the loader
/// from planning fetches past this page until the next full reset.
#[derive(Debug, Clone)]
pub struct PageResult<R> {
    /// Rows starting at the requested page's first logical index.
    pub rows: Vec<R>,
    /// Whether the source has no rows past this page.
    pub is_last_page: bool,
}

impl<R> PageResult<R> {
    /// A page with more data expected after it.
    #[must_use]
    pub fn rows(rows: Vec<R>) -> Self {
        Self {
            rows,
            is_last_page: false,
        }
    }

    /// The final page of the data set.
    #[must_use]
    pub fn last(rows: Vec<R>) -> Self {
        Self {
            rows,
            is_last_page: true,
        }
    }
}

/// Query context forwarded verbatim to every fetch call.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchContext {
    /// Current filter text (empty when unfiltered).
    pub filter_text: String,
    /// Snapshot of the current group layout.
    pub group_info: Vec<GroupRowLineInfo>,
}

/// Asynchronous collaborators: page fetch and cell-edit apply.
///
/// All methods run on the UI thread's cooperative scheduler; futures need
/// not be `Send`. A returned `Err` is downgraded by the engine to a logged
/// skip and never crosses the engine's public surface.
#[allow(async_fn_in_trait)]
pub trait DataSource {
    type Row: GridRow;

    /// Fetch the first page (logical rows `0..limit`).
    async fn fetch_first_page(
        &self,
        limit: u32,
        ctx: &FetchContext,
    ) -> crate::error::Result<PageResult<Self::Row>>;

    /// Fetch a subsequent page, cursored off the row immediately before it.
    async fn fetch_next_page(
        &self,
        anchor_id: &str,
        anchor_row: &Self::Row,
        limit: u32,
        ctx: &FetchContext,
    ) -> crate::error::Result<PageResult<Self::Row>>;

    /// Apply a cell edit.
    ///
    /// `Ok(Some(row))` is the full replacement row to commit into the cache;
    /// `Ok(None)` means the host declined the edit (e.g. permission denied,
    /// already messaged by the host) and the engine does nothing further.
    async fn apply_cell_edit(
        &self,
        edit: &CellEditContext<Self::Row>,
    ) -> crate::error::Result<Option<Self::Row>>;
}
