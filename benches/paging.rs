//! Benchmarks for the grid engine's hot paths.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::cast_possible_truncation
)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;

use rulegrid::grid::loader::PageLoader;
use rulegrid::grid::pager::required_pages;
use rulegrid::grid::row_cache::SparseRowCache;
use rulegrid::{GridRect, GroupRowLineInfo, PageResult, RowGroupIndexMapper, RowGroups};

/// Benchmark the viewport → page-set computation across a scroll sweep.
fn bench_required_pages(c: &mut Criterion) {
    c.bench_function("required_pages_scroll_sweep", |b| {
        b.iter(|| {
            let mut total = 0u32;
            for y in (0..100_000).step_by(37) {
                let pages = required_pages(&GridRect::new(0, y, 12, 45), black_box(50));
                total = total.wrapping_add(*pages.end());
            }
            total
        })
    });
}

/// Benchmark visual → logical resolution over a heavily grouped data set.
fn bench_group_resolution(c: &mut Criterion) {
    let info: Vec<GroupRowLineInfo> = (0..1_000)
        .map(|g| GroupRowLineInfo {
            index: g * 20,
            header_text: format!("Group {g}"),
            element_id: format!("el-{g}"),
            is_collapsed: g % 3 == 0,
        })
        .collect();
    let groups = RowGroups::from_line_info(&info);
    let mapper = RowGroupIndexMapper::new(&groups, 20_000);
    let visual_rows = mapper.visual_row_count();

    c.bench_function("group_resolve_full_scan", |b| {
        b.iter(|| {
            let mut headers = 0u32;
            for row in 0..visual_rows {
                if mapper
                    .resolve(black_box(row))
                    .is_some_and(|r| r.is_group_header())
                {
                    headers += 1;
                }
            }
            headers
        })
    });
}

/// Benchmark committing pages of JSON rows into the sparse cache.
fn bench_page_commit(c: &mut Criterion) {
    let page_size = 50u32;
    let rows: Vec<serde_json::Value> = (0..page_size)
        .map(|i| json!({ "_id": format!("row-{i}"), "clearance": i }))
        .collect();

    c.bench_function("page_commit_50_rows", |b| {
        b.iter(|| {
            let mut loader = PageLoader::new();
            let mut cache: SparseRowCache<serde_json::Value> = SparseRowCache::new();
            loader.commit(
                0,
                page_size,
                Ok(PageResult::rows(black_box(rows.clone()))),
                &mut cache,
                0..12,
            );
            cache.len()
        })
    });
}

criterion_group!(
    benches,
    bench_required_pages,
    bench_group_resolution,
    bench_page_commit
);
criterion_main!(benches);
