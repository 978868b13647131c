//! Visual ↔ logical row index mapping under row grouping.
//!
//! Group-header rows arrive inline in the fetched row stream: a group's
//! header occupies logical slot `header_index - 1` and its member rows run
//! from `header_index` up to the slot before the next header (or the end of
//! the data set). Collapsing a group elides its member rows from the visual
//! sequence while leaving them addressable in logical space; the header row
//! always renders.
//!
//! The group list kept here is the single source of truth. The host-facing
//! `GroupRowLineInfo` shape is derived by projection, so a collapse toggle is
//! one write, not two.

use crate::types::GroupRowLineInfo;

/// One group in the engine's internal representation.
///
/// `header_index` is 1-based: the host's 0-based logical header position
/// plus one, because the rendering grid reserves index 0 semantics for "no
/// group boundary before the first row". Member rows of the group start at
/// logical index `header_index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowGroup {
    pub header_index: u32,
    pub is_collapsed: bool,
    pub element_id: String,
    pub header_text: String,
}

/// Ordered group list; empty means grouping is inactive.
#[derive(Debug, Clone, Default)]
pub struct RowGroups {
    groups: Vec<RowGroup>,
}

impl RowGroups {
    #[must_use]
    pub fn new() -> Self {
        Self { groups: Vec::new() }
    }

    /// Build from the host-supplied line-info list.
    #[must_use]
    pub fn from_line_info(infos: &[GroupRowLineInfo]) -> Self {
        let groups = infos
            .iter()
            .map(|info| RowGroup {
                header_index: info.index.saturating_add(1),
                is_collapsed: info.is_collapsed,
                element_id: info.element_id.clone(),
                header_text: info.header_text.clone(),
            })
            .collect();
        Self { groups }
    }

    /// Project back into the host-facing shape.
    #[must_use]
    pub fn to_line_info(&self) -> Vec<GroupRowLineInfo> {
        self.groups
            .iter()
            .map(|g| GroupRowLineInfo {
                index: g.header_index.saturating_sub(1),
                header_text: g.header_text.clone(),
                element_id: g.element_id.clone(),
                is_collapsed: g.is_collapsed,
            })
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn get(&self, group: usize) -> Option<&RowGroup> {
        self.groups.get(group)
    }

    /// Flip one group's collapsed flag. Returns the new state.
    pub fn toggle_collapsed(&mut self, group: usize) -> Option<bool> {
        let g = self.groups.get_mut(group)?;
        g.is_collapsed = !g.is_collapsed;
        Some(g.is_collapsed)
    }
}

/// How a visual row maps into the logical sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// Data row outside any group (grouping inactive, or before the first header).
    Ungrouped,
    /// A group's header row; click target for collapse toggling.
    GroupHeader { group: usize },
    /// Data row inside a group, `offset` rows past the header.
    GroupMember { group: usize, offset: u32 },
}

/// A visual row resolved to logical space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedCell {
    /// Logical row index: the cache key.
    pub logical_row: u32,
    pub kind: RowKind,
}

impl ResolvedCell {
    #[must_use]
    pub fn is_group_header(&self) -> bool {
        matches!(self.kind, RowKind::GroupHeader { .. })
    }
}

/// Translates visual row indices (collapsed groups removed) to logical ones.
pub struct RowGroupIndexMapper<'a> {
    groups: &'a RowGroups,
    total_rows: u32,
}

impl<'a> RowGroupIndexMapper<'a> {
    #[must_use]
    pub fn new(groups: &'a RowGroups, total_rows: u32) -> Self {
        Self { groups, total_rows }
    }

    /// Resolve a visual row. Identity mapping when grouping is inactive.
    #[must_use]
    pub fn resolve(&self, visual_row: u32) -> Option<ResolvedCell> {
        if self.groups.is_empty() {
            return Some(ResolvedCell {
                logical_row: visual_row,
                kind: RowKind::Ungrouped,
            });
        }

        // Ungrouped leading rows before the first header.
        let leading = self
            .groups
            .get(0)
            .map_or(0, |g| g.header_index.saturating_sub(1));
        if visual_row < leading {
            return Some(ResolvedCell {
                logical_row: visual_row,
                kind: RowKind::Ungrouped,
            });
        }

        let mut remaining = visual_row - leading;
        for (gi, g) in self.groups.groups.iter().enumerate() {
            if remaining == 0 {
                return Some(ResolvedCell {
                    logical_row: g.header_index.saturating_sub(1),
                    kind: RowKind::GroupHeader { group: gi },
                });
            }
            remaining -= 1;
            if !g.is_collapsed {
                let members = self.member_count(gi);
                if remaining < members {
                    return Some(ResolvedCell {
                        logical_row: g.header_index.saturating_add(remaining),
                        kind: RowKind::GroupMember {
                            group: gi,
                            offset: remaining,
                        },
                    });
                }
                remaining -= members;
            }
        }
        None
    }

    /// Effective logical index for an edit at group path `(group, offset)`:
    /// the group's header offset plus the intra-group offset. This must be
    /// used instead of the visual row index; otherwise edits land on the
    /// wrong row whenever any earlier group is collapsed.
    #[must_use]
    pub fn logical_for_member(&self, group: usize, offset: u32) -> Option<u32> {
        let g = self.groups.get(group)?;
        Some(g.header_index.saturating_add(offset))
    }

    /// Number of rows the rendering grid should show.
    #[must_use]
    pub fn visual_row_count(&self) -> u32 {
        if self.groups.is_empty() {
            return self.total_rows;
        }
        let leading = self
            .groups
            .get(0)
            .map_or(0, |g| g.header_index.saturating_sub(1));
        let mut count = leading;
        for (gi, g) in self.groups.groups.iter().enumerate() {
            count = count.saturating_add(1);
            if !g.is_collapsed {
                count = count.saturating_add(self.member_count(gi));
            }
        }
        count
    }

    /// Member rows in a group: up to the next header, or to the end of data.
    fn member_count(&self, group: usize) -> u32 {
        let Some(g) = self.groups.get(group) else {
            return 0;
        };
        match self.groups.get(group + 1) {
            Some(next) => next
                .header_index
                .saturating_sub(1)
                .saturating_sub(g.header_index),
            None => self.total_rows.saturating_sub(g.header_index),
        }
    }
}
