//! Benchmarks for the aggregation pipeline.
//!
//! Every brush reruns all aggregations over the filtered view, so these
//! measure a full recompute at several dataset sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use loanscope_core::config::default_charts;
use loanscope_core::{
    build_flow_graph, category_rollup, kpi_summary, normalize, quantile_stats, rate_curve,
    ChartKind, FilterMessage, FilterState, Record, State,
};
use loanscope_test::fixture::sample_rows;

const SIZES: [usize; 3] = [1_000, 10_000, 50_000];

fn dataset(n: usize) -> Vec<Record> {
    normalize(&sample_rows(n)).expect("sample rows are objects")
}

// =============================================================================
// Normalization
// =============================================================================

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    for size in SIZES {
        let raw = sample_rows(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &raw, |b, raw| {
            b.iter(|| normalize(black_box(raw)));
        });
    }

    group.finish();
}

// =============================================================================
// Filter
// =============================================================================

fn bench_filter_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_view");

    for size in SIZES {
        let records = dataset(size);
        let mut filter = FilterState::default();
        filter
            .update(FilterMessage::apply("edad", [25.0, 45.0]))
            .expect("known field");

        group.bench_with_input(BenchmarkId::from_parameter(size), &records, |b, records| {
            b.iter(|| filter.view(black_box(records)).len());
        });
    }

    group.finish();
}

// =============================================================================
// Full recompute
// =============================================================================

fn bench_recompute(c: &mut Criterion) {
    let mut group = c.benchmark_group("recompute_all_charts");
    let charts = default_charts();

    for size in SIZES {
        let records = dataset(size);
        let filter = FilterState::default();

        group.bench_with_input(BenchmarkId::from_parameter(size), &records, |b, records| {
            b.iter(|| {
                let view = filter.view(black_box(records));
                let mut produced = 0usize;
                for chart in &charts {
                    produced += match &chart.kind {
                        ChartKind::Kpi => kpi_summary(&view).total,
                        ChartKind::Rollup(spec) => category_rollup(&view, spec).len(),
                        ChartKind::Quantiles(spec) => quantile_stats(&view, spec).len(),
                        ChartKind::RateCurve(spec) => rate_curve(&view, spec).len(),
                        ChartKind::Flow(spec) => build_flow_graph(&view, &spec.stages).links.len(),
                        ChartKind::Histogram(_) | ChartKind::Table(_) => 0,
                    };
                }
                produced
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_filter_view, bench_recompute);
criterion_main!(benches);
