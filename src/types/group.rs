use serde::{Deserialize, Serialize};

/// Host-facing description of one group-header row in the logical sequence.
///
/// `index` is the 0-based logical position of the header row; the engine's
/// internal representation stores `header_index = index + 1` because the
/// rendering grid reserves index 0 semantics for "no group boundary before
/// the first row". This shape is a pure projection of the engine's internal
/// group list; mutating it has no effect until pushed back through
/// `set_group_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRowLineInfo {
    /// 0-based logical position of the group-header row.
    pub index: u32,
    /// Text rendered in the header row.
    pub header_text: String,
    /// Identifier of the domain element this group represents.
    pub element_id: String,
    /// Whether the group's member rows are currently hidden.
    pub is_collapsed: bool,
}
