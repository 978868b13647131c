use serde::{Deserialize, Serialize};

/// The current row/column selection, in visual coordinates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSelection {
    /// Selected column indices.
    pub columns: Vec<u32>,
    /// Selected row indices.
    pub rows: Vec<u32>,
}

impl GridSelection {
    /// Select a set of rows with no column component.
    #[must_use]
    pub fn rows(rows: Vec<u32>) -> Self {
        Self {
            columns: Vec::new(),
            rows,
        }
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }
}
