//! rulegrid - virtualized data-grid engine for the web
//!
//! The data/paging/grouping/selection/editing core that a rendering grid
//! embeds:
//! - Sparse row cache with server-side paging (identity-cursor pagination)
//! - Viewport-driven prefetch with a half-page margin each way
//! - Row grouping with collapse/expand and visual↔logical index remapping
//! - Policy-checked multi-row selection with a derived selected-id map
//! - Confirmation-gated cell editing and a fill-handle pattern gate
//!
//! The engine owns no pixels and performs no I/O: a `DataSource` supplies
//! rows, callbacks carry damage/selection/edit notifications back to the
//! rendering host.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { RuleGrid } from 'rulegrid';
//! await init();
//! const grid = new RuleGrid(fetchFirstPage, fetchSubsequentPage, applyCellEdit);
//! grid.set_columns(columns);
//! grid.set_visible_region(0, 0, 8, 40);
//! ```

pub mod error;
pub mod grid;
pub mod source;
pub mod types;
pub mod view;

pub use error::{GridError, Result};
pub use grid::edit::{CellEditContext, ConfirmationRequest};
pub use grid::group_map::{ResolvedCell, RowGroup, RowGroupIndexMapper, RowGroups, RowKind};
pub use grid::{GridConfig, DEFAULT_PAGE_SIZE};
pub use source::{DataSource, FetchContext, PageResult};
pub use types::*;
pub use view::{DataGridView, EditOutcome, GridPlaceholder};

#[cfg(target_arch = "wasm32")]
pub use view::js::RuleGrid;

/// Get the library version
#[must_use]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
