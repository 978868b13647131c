//! The grid engine core: paging, grouping, selection, editing.

pub mod edit;
pub mod fill;
pub mod group_map;
pub mod hover;
pub mod loader;
pub mod pager;
pub mod row_cache;
pub mod selection;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Default rows per fetched page.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Construction-time grid configuration.
///
/// Runtime-variable inputs (columns, filter text, total row count, group
/// info, right-panel flag) are set through the view handle instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    /// Rows per page; must be positive.
    pub page_size: u32,
    /// Whether more than one row may be selected at once.
    pub multi_row_selection: bool,
    /// Upper bound on selected rows when multi-row selection is enabled.
    pub max_row_selection_count: Option<u32>,
    /// Column indices whose edits require a user confirmation before apply.
    pub edit_confirmation_columns: HashSet<u32>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            multi_row_selection: false,
            max_row_selection_count: None,
            edit_confirmation_columns: HashSet::new(),
        }
    }
}
