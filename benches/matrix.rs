//! Benchmarks for matrix construction, hit testing and selection.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::cast_precision_loss)]

use std::rc::Rc;

use cellgrid::layout::Viewport;
use cellgrid::state::selection;
use cellgrid::{Cell, CellMatrixBuilder, CellMatrixProps, Column, GridProps, Row, State};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn props(rows: usize, columns: usize) -> CellMatrixProps {
    let cols = (0..columns).map(|c| Column::new(format!("c{c}"))).collect();
    let rows = (0..rows)
        .map(|r| {
            let cells = (0..columns)
                .map(|c| {
                    if r % 50 == 1 && c % 7 == 1 {
                        Cell::text(format!("{r}:{c}")).with_span(2, 2)
                    } else {
                        Cell::text(format!("{r}:{c}"))
                    }
                })
                .collect();
            Row::new(format!("r{r}"), cells)
        })
        .collect();
    CellMatrixProps::new(cols, rows).with_sticky(1, 1, 0, 0)
}

/// Full build with spans and sticky panes
fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for &(rows, columns) in &[(100, 10), (1_000, 20), (10_000, 20)] {
        let p = props(rows, columns);
        group.throughput(Throughput::Elements((rows * columns) as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{rows}x{columns}")),
            &p,
            |b, p| b.iter(|| CellMatrixBuilder::new(black_box(p)).build()),
        );
    }
    group.finish();
}

/// Client point to location across the whole content
fn bench_hit_test(c: &mut Criterion) {
    let matrix = CellMatrixBuilder::new(&props(10_000, 20)).build();
    let mut viewport = Viewport::new(1200.0, 800.0);
    viewport.set_scroll(1_000.0, 100_000.0, &matrix);

    c.bench_function("location_from_client", |b| {
        b.iter(|| {
            for i in 0..100 {
                let x = f64::from(i) * 12.0;
                let y = f64::from(i) * 8.0;
                black_box(viewport.location_from_client(&matrix, x, y));
            }
        })
    });
}

/// Selecting many rows, then re-deriving after a rebuild
fn bench_row_selection(c: &mut Criterion) {
    let state = State::default()
        .derive_from_props(Rc::new(GridProps::new(props(5_000, 10))))
        .expect("props apply");
    let rows = state.cell_matrix.rows.clone();
    let first = rows.get(10).expect("row 10");
    let last = rows.get(4_000).expect("row 4000");

    c.bench_function("select_multiple_rows_4k", |b| {
        b.iter(|| selection::select_multiple_rows(black_box(state.clone()), first, last, false))
    });

    let selected = selection::select_multiple_rows(state, first, last, false);
    c.bench_function("rederive_from_ids_4k", |b| {
        b.iter(|| selection::rederive_from_ids(black_box(selected.clone())))
    });
}

criterion_group!(benches, bench_build, bench_hit_test, bench_row_selection);
criterion_main!(benches);
