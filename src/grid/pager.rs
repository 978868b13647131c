//! Viewport → page-set computation.
//!
//! Pure function of the visible rectangle and the page size. Over-fetches by
//! half a page above and below the viewport so that fast scrolling does not
//! visibly outrun loaded data. Duplicate-fetch suppression is the loader's
//! job; re-running this for an unchanged viewport is free.

use crate::types::GridRect;

/// Pages that must be loaded for a viewport, in ascending order.
///
/// Covers `viewport.y - page_size/2` through
/// `viewport.y + viewport.height + page_size/2`, inclusive. Re-evaluate
/// whenever the viewport, the page size, or the total row count changes,
/// since a grouping change can alter the total without moving the viewport.
#[must_use]
pub fn required_pages(viewport: &GridRect, page_size: u32) -> std::ops::RangeInclusive<u32> {
    let page_size = page_size.max(1);
    let margin = page_size / 2;
    let first = viewport.y.saturating_sub(margin) / page_size;
    let last = viewport
        .y
        .saturating_add(viewport.height)
        .saturating_add(margin)
        / page_size;
    first..=last
}
