//! Sparse cache of fetched rows, keyed by logical row index.
//!
//! Pages load out of order as the viewport scrolls, so the cache is sparse
//! overall but dense within any loaded page. A page, once loaded, is never
//! evicted; the only way back to empty is a full reset.

use std::collections::{HashMap, HashSet};

/// Sparse logical-index → row map plus the parallel set of loaded pages.
#[derive(Debug)]
pub struct SparseRowCache<R> {
    rows: HashMap<u32, R>,
    loaded_pages: HashSet<u32>,
}

impl<R> Default for SparseRowCache<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> SparseRowCache<R> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: HashMap::new(),
            loaded_pages: HashSet::new(),
        }
    }

    /// Store a row at a logical index. Idempotent overwrite.
    pub fn insert(&mut self, index: u32, row: R) {
        self.rows.insert(index, row);
    }

    /// Look up the row at a logical index.
    #[must_use]
    pub fn get(&self, index: u32) -> Option<&R> {
        self.rows.get(&index)
    }

    /// Number of rows actually present (the "actual data count").
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no rows are cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First cached row matching the predicate.
    ///
    /// Scans present values only; iteration order is unspecified, so callers
    /// must not rely on which row wins when several match.
    #[must_use]
    pub fn find_first(&self, mut predicate: impl FnMut(&R) -> bool) -> Option<&R> {
        self.rows.values().find(|row| predicate(row))
    }

    /// Record that a page's rows have been written.
    pub fn mark_page_loaded(&mut self, page: u32) {
        self.loaded_pages.insert(page);
    }

    /// Whether a page has been loaded since the last reset.
    #[must_use]
    pub fn is_page_loaded(&self, page: u32) -> bool {
        self.loaded_pages.contains(&page)
    }

    /// Number of loaded pages.
    #[must_use]
    pub fn loaded_page_count(&self) -> usize {
        self.loaded_pages.len()
    }

    /// Drop all rows and all page-load records.
    pub fn reset(&mut self) {
        self.rows.clear();
        self.loaded_pages.clear();
    }
}
