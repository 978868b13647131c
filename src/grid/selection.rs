//! Row/column selection state and the derived selected-id map.

use std::collections::HashMap;

use tracing::warn;

use crate::types::GridSelection;

/// Result of a selection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Selection stored; id map derived from the cached rows.
    Applied {
        /// Identity → visual row index, for every selected row whose data is
        /// cached and carries an identity. Rows still loading are silently
        /// absent; they stay visually selected but unaddressable by id
        /// until their page lands.
        selected_ids: HashMap<String, u32>,
        /// Count of selected rows that could not be resolved to an identity.
        unresolved_rows: usize,
    },
    /// Selection violated the row-count policy; previous selection kept.
    Rejected,
}

/// Enforces the selection policy and derives the caller-visible id map.
#[derive(Debug)]
pub struct SelectionController {
    selection: GridSelection,
    multi_row: bool,
    max_row_selection_count: Option<u32>,
}

impl SelectionController {
    #[must_use]
    pub fn new(multi_row: bool, max_row_selection_count: Option<u32>) -> Self {
        Self {
            selection: GridSelection::default(),
            multi_row,
            max_row_selection_count,
        }
    }

    #[must_use]
    pub fn selection(&self) -> &GridSelection {
        &self.selection
    }

    /// Apply a new selection, deriving the id map through `identity_of`
    /// (visual row index → identity of its cached row, if any).
    ///
    /// Rejected without touching the previous selection when multi-row
    /// selection is capped and the new selection exceeds the cap, or when
    /// multi-row selection is disabled and more than one row arrives.
    pub fn set_selection(
        &mut self,
        selection: GridSelection,
        identity_of: impl Fn(u32) -> Option<String>,
    ) -> SelectionOutcome {
        let row_count = selection.rows.len();
        if self.multi_row {
            if let Some(max) = self.max_row_selection_count {
                if row_count > max as usize {
                    return SelectionOutcome::Rejected;
                }
            }
        } else if row_count > 1 {
            return SelectionOutcome::Rejected;
        }

        let mut selected_ids = HashMap::with_capacity(row_count);
        let mut unresolved_rows = 0;
        for &visual_row in &selection.rows {
            match identity_of(visual_row) {
                Some(id) => {
                    selected_ids.insert(id, visual_row);
                }
                None => unresolved_rows += 1,
            }
        }
        if selected_ids.is_empty() && !selection.rows.is_empty() {
            warn!(
                rows = row_count,
                "selected rows have no resolvable identity"
            );
        }

        self.selection = selection;
        SelectionOutcome::Applied {
            selected_ids,
            unresolved_rows,
        }
    }

    /// Drop the selection entirely.
    pub fn clear(&mut self) {
        self.selection = GridSelection::default();
    }
}
