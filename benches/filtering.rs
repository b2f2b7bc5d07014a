//! Benchmarks for filter compilation and row selection.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::cast_precision_loss)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gridview::filter::compile;
use gridview::payload::row_from_value;
use gridview::{
    Column, ColumnSchema, ColumnType, FacetEntry, FilterState, QueryOp, QueryRule, Row,
    SortDirection,
};
use serde_json::json;

fn schema() -> ColumnSchema {
    ColumnSchema::new(vec![
        Column {
            id: "name".to_string(),
            title: "Name".to_string(),
            column_type: ColumnType::String,
            required: true,
        },
        Column {
            id: "score".to_string(),
            title: "Score".to_string(),
            column_type: ColumnType::Number,
            required: false,
        },
        Column {
            id: "active".to_string(),
            title: "Active".to_string(),
            column_type: ColumnType::Boolean,
            required: false,
        },
    ])
}

fn rows(count: usize) -> Vec<Row> {
    (0..count)
        .map(|i| {
            row_from_value(json!({
                "_id": format!("row-{i}"),
                "data_values": {
                    "name": format!("item {}", i % 977),
                    "score": (i % 1000) as f64 / 3.0,
                    "active": i % 3 == 0,
                }
            }))
            .expect("valid row payload")
        })
        .collect()
}

fn query_and_sort_state() -> FilterState {
    FilterState::default()
        .with_entry(FacetEntry::Query {
            column: "score".to_string(),
            rule: QueryRule {
                op: QueryOp::Gt,
                operand: "100".to_string(),
            },
        })
        .with_entry(FacetEntry::Sort {
            column: "score".to_string(),
            direction: SortDirection::Descending,
        })
        .with_entry(FacetEntry::Sort {
            column: "name".to_string(),
            direction: SortDirection::Ascending,
        })
}

/// Benchmark compiling a filter state against the schema
fn bench_compile(c: &mut Criterion) {
    let schema = schema();
    let state = query_and_sort_state();

    c.bench_function("compile_filter", |b| {
        b.iter(|| compile(black_box(&state), black_box(&schema)))
    });
}

/// Benchmark the full select-and-sort pass at several row counts
fn bench_apply(c: &mut Criterion) {
    let schema = schema();
    let compiled = compile(&query_and_sort_state(), &schema);

    let mut group = c.benchmark_group("apply_filter");
    for count in [1_000usize, 10_000, 50_000] {
        let data = rows(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &data, |b, data| {
            b.iter(|| compiled.apply(black_box(data)))
        });
    }
    group.finish();
}

/// Benchmark a sort-only pass (no rows excluded)
fn bench_sort_only(c: &mut Criterion) {
    let schema = schema();
    let state = FilterState::default().with_entry(FacetEntry::Sort {
        column: "name".to_string(),
        direction: SortDirection::Ascending,
    });
    let compiled = compile(&state, &schema);
    let data = rows(10_000);

    c.bench_function("sort_10k_by_string", |b| {
        b.iter(|| compiled.apply(black_box(&data)))
    });
}

criterion_group!(benches, bench_compile, bench_apply, bench_sort_only);
criterion_main!(benches);
