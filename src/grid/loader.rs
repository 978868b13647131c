//! Page-fetch orchestration: dedup, cursor chaining, commit, damage.
//!
//! The loader is split into two synchronous phases around the host's
//! asynchronous fetch so that every cache mutation happens on the UI thread
//! between suspension points: `plan_fetch` decides whether and how to fetch,
//! `commit` writes the outcome. A full reset deliberately leaves in-flight
//! markers alone: there is no cancellation, and a late-arriving response
//! simply commits into whatever cache exists by then.

use std::collections::HashSet;
use std::ops::Range;

use tracing::{debug, warn};

use crate::error::Result;
use crate::grid::row_cache::SparseRowCache;
use crate::source::PageResult;
use crate::types::{CellCoord, GridRow};

/// How a page should be fetched, or `Skip` reasons folded into `None`.
#[derive(Debug, Clone)]
pub enum FetchPlan<R> {
    /// Page 0: fetched by limit alone.
    First { limit: u32 },
    /// Any later page: cursored off the row just before its start index.
    Subsequent {
        anchor_id: String,
        anchor_row: R,
        limit: u32,
    },
}

/// Tracks in-flight and exhausted pages; owns no row data.
#[derive(Debug, Default)]
pub struct PageLoader {
    in_flight: HashSet<u32>,
    last_page: Option<u32>,
}

impl PageLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether `page` needs a fetch and, if so, how.
    ///
    /// Returns `None` when the page is already loaded or being fetched, lies
    /// past the known end of data, or (for cursor pages) when its anchor
    /// row is not cached yet. The anchor-missing case is a silent skip: a
    /// later viewport event retries once the predecessor page has landed,
    /// which keeps identity-based pagination causally ordered.
    pub fn plan_fetch<R: GridRow>(
        &mut self,
        page: u32,
        page_size: u32,
        cache: &SparseRowCache<R>,
    ) -> Option<FetchPlan<R>> {
        if cache.is_page_loaded(page) || self.in_flight.contains(&page) {
            return None;
        }
        if self.last_page.is_some_and(|last| page > last) {
            return None;
        }
        let start = page.checked_mul(page_size)?;

        let plan = if start == 0 {
            FetchPlan::First { limit: page_size }
        } else {
            let Some(anchor) = cache.get(start - 1) else {
                debug!(page, "anchor row not cached yet, deferring page");
                return None;
            };
            let Some(id) = anchor.identity() else {
                debug!(page, "anchor row has no identity, deferring page");
                return None;
            };
            FetchPlan::Subsequent {
                anchor_id: id.to_string(),
                anchor_row: anchor.clone(),
                limit: page_size,
            }
        };
        self.in_flight.insert(page);
        Some(plan)
    }

    /// Commit a fetch outcome and report the damaged cells.
    ///
    /// A non-empty result marks the page loaded and writes its rows; the
    /// damage list covers the full visible column range for each written row,
    /// because content varies by column. An empty result leaves the page
    /// unloaded so a later trigger may retry it. A fetch error is downgraded
    /// to a logged skip.
    pub fn commit<R>(
        &mut self,
        page: u32,
        page_size: u32,
        outcome: Result<PageResult<R>>,
        cache: &mut SparseRowCache<R>,
        visible_columns: Range<u32>,
    ) -> Vec<CellCoord> {
        self.in_flight.remove(&page);

        let result = match outcome {
            Ok(result) => result,
            Err(e) => {
                warn!(page, error = %e, "page fetch failed");
                return Vec::new();
            }
        };
        if result.is_last_page {
            self.last_page = Some(self.last_page.map_or(page, |last| last.min(page)));
        }
        if result.rows.is_empty() {
            return Vec::new();
        }

        cache.mark_page_loaded(page);
        let start = page.saturating_mul(page_size);
        let mut damaged = Vec::with_capacity(result.rows.len() * visible_columns.len());
        let mut index = start;
        for row in result.rows {
            cache.insert(index, row);
            for col in visible_columns.clone() {
                damaged.push(CellCoord::new(col, index));
            }
            index = index.saturating_add(1);
        }
        damaged
    }

    /// Whether a fetch for `page` is outstanding.
    #[must_use]
    pub fn is_in_flight(&self, page: u32) -> bool {
        self.in_flight.contains(&page)
    }

    /// Known end-of-data page, if the source has reported one.
    #[must_use]
    pub fn last_page(&self) -> Option<u32> {
        self.last_page
    }

    /// Forget the end-of-data marker.
    ///
    /// In-flight markers are kept: outstanding fetches are not cancelled and
    /// will clear themselves on commit.
    pub fn reset(&mut self) {
        self.last_page = None;
    }
}
