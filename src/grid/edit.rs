//! Cell-edit submission: direct commit vs confirmation-gated commit.
//!
//! The pipeline owns only the synchronous half of an edit: resolving the
//! target, deciding whether a confirmation dialog must run, and holding the
//! pending context while it does. The asynchronous apply (and the cache
//! write on success) is driven by the view wrapper so that no state borrow
//! spans a suspension point.

use std::collections::HashSet;

use tracing::debug;

use crate::grid::group_map::ResolvedCell;
use crate::types::{CellValue, ColumnDescriptor};

/// Everything the apply collaborator needs to persist one edit.
#[derive(Debug, Clone)]
pub struct CellEditContext<R> {
    /// The row as currently cached.
    pub current: R,
    /// The submitted value.
    pub new_value: CellValue,
    /// Edited column index.
    pub column_index: u32,
    /// Edited column descriptor.
    pub column: ColumnDescriptor,
    /// Effective logical row index (group-remapped; the cache key).
    pub row_index: u32,
}

/// Human-readable summary presented by the host's confirmation dialog.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationRequest {
    /// 1-based row number for display.
    pub row_number: u32,
    pub column_title: String,
    /// Proposed value, decoded through [`CellValue::display_value`].
    pub proposed_value: String,
}

/// What `begin` decided to do with an edit event.
#[derive(Debug)]
pub(crate) enum EditDisposition<R> {
    /// Group-header cell or row not cached: drop the edit silently.
    Ignored,
    /// Commit immediately (column needs no confirmation).
    Commit(CellEditContext<R>),
    /// Held pending; present this request to the user.
    AwaitConfirmation(ConfirmationRequest),
}

/// State machine: `Idle → (ConfirmationPending →) Committing → Idle`.
#[derive(Debug)]
pub struct CellEditPipeline<R> {
    pending: Option<CellEditContext<R>>,
    confirmation_columns: HashSet<u32>,
}

impl<R: Clone> CellEditPipeline<R> {
    #[must_use]
    pub fn new(confirmation_columns: HashSet<u32>) -> Self {
        Self {
            pending: None,
            confirmation_columns,
        }
    }

    /// Enter the pipeline with a resolved edit target.
    ///
    /// `current` is the cached row at the effective logical index, if any.
    pub(crate) fn begin(
        &mut self,
        resolved: &ResolvedCell,
        current: Option<&R>,
        column: Option<&ColumnDescriptor>,
        column_index: u32,
        new_value: CellValue,
    ) -> EditDisposition<R> {
        if resolved.is_group_header() {
            return EditDisposition::Ignored;
        }
        let Some(row) = current else {
            debug!(
                row = resolved.logical_row,
                "edit target not cached, ignoring edit"
            );
            return EditDisposition::Ignored;
        };
        let column = column.cloned().unwrap_or_else(|| {
            ColumnDescriptor::new(column_index.to_string(), column_index.to_string())
        });

        let context = CellEditContext {
            current: row.clone(),
            new_value,
            column_index,
            column,
            row_index: resolved.logical_row,
        };

        if self.confirmation_columns.contains(&column_index) {
            let request = ConfirmationRequest {
                row_number: context.row_index.saturating_add(1),
                column_title: context.column.title.clone(),
                proposed_value: context.new_value.display_value(),
            };
            self.pending = Some(context);
            EditDisposition::AwaitConfirmation(request)
        } else {
            EditDisposition::Commit(context)
        }
    }

    /// User accepted the confirmation: hand back the held context.
    pub(crate) fn confirm(&mut self) -> Option<CellEditContext<R>> {
        self.pending.take()
    }

    /// User cancelled: discard the held context.
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            debug!("pending cell edit cancelled");
        }
    }

    /// Whether a confirmation is outstanding.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::group_map::RowKind;
    use serde_json::json;

    fn member(logical_row: u32) -> ResolvedCell {
        ResolvedCell {
            logical_row,
            kind: RowKind::Ungrouped,
        }
    }

    fn column() -> ColumnDescriptor {
        ColumnDescriptor::new("clearance", "Clearance")
    }

    #[test]
    fn test_header_cell_is_ignored() {
        let mut pipeline: CellEditPipeline<serde_json::Value> =
            CellEditPipeline::new(HashSet::new());
        let header = ResolvedCell {
            logical_row: 4,
            kind: RowKind::GroupHeader { group: 0 },
        };
        let d = pipeline.begin(
            &header,
            Some(&json!({"_id": "x"})),
            Some(&column()),
            1,
            CellValue::Text("v".into()),
        );
        assert!(matches!(d, EditDisposition::Ignored));
    }

    #[test]
    fn test_uncached_row_is_ignored() {
        let mut pipeline: CellEditPipeline<serde_json::Value> =
            CellEditPipeline::new(HashSet::new());
        let d = pipeline.begin(
            &member(3),
            None,
            Some(&column()),
            1,
            CellValue::Text("v".into()),
        );
        assert!(matches!(d, EditDisposition::Ignored));
    }

    #[test]
    fn test_unlisted_column_commits_directly() {
        let mut pipeline: CellEditPipeline<serde_json::Value> =
            CellEditPipeline::new(HashSet::from([2]));
        let d = pipeline.begin(
            &member(3),
            Some(&json!({"_id": "x"})),
            Some(&column()),
            1,
            CellValue::Number(7.0),
        );
        let committed = matches!(&d, EditDisposition::Commit(ctx) if ctx.row_index == 3);
        assert!(committed, "expected direct commit, got {d:?}");
        assert!(!pipeline.has_pending());
    }

    #[test]
    fn test_listed_column_awaits_confirmation() {
        let mut pipeline: CellEditPipeline<serde_json::Value> =
            CellEditPipeline::new(HashSet::from([1]));
        let d = pipeline.begin(
            &member(3),
            Some(&json!({"_id": "x"})),
            Some(&column()),
            1,
            CellValue::Custom(json!({ "value": "75u" })),
        );
        let expected = ConfirmationRequest {
            row_number: 4,
            column_title: "Clearance".into(),
            proposed_value: "75u".into(),
        };
        assert!(matches!(d, EditDisposition::AwaitConfirmation(req) if req == expected));
        assert!(pipeline.has_pending());

        let ctx = pipeline.confirm();
        assert_eq!(ctx.map(|c| c.row_index), Some(3));
        assert!(!pipeline.has_pending());
    }

    #[test]
    fn test_cancel_discards_pending_edit() {
        let mut pipeline: CellEditPipeline<serde_json::Value> =
            CellEditPipeline::new(HashSet::from([1]));
        pipeline.begin(
            &member(3),
            Some(&json!({"_id": "x"})),
            Some(&column()),
            1,
            CellValue::Text("v".into()),
        );
        pipeline.cancel();
        assert!(!pipeline.has_pending());
        assert!(pipeline.confirm().is_none());
    }
}
