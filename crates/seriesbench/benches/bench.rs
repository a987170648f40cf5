use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use seriesbench::{BenchConfig, IdentitySet, MemoryStore, PipelineRunner, PointStream, start_of_day};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Builder;

const SERIES: usize = 100;
const POINTS_PER_SERIES: usize = 1_000;
const TOTAL_POINTS: u64 = (SERIES * POINTS_PER_SERIES) as u64;

/// Raw generation speed of the producer, without a queue.
fn bench_point_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("stream");
    group.throughput(Throughput::Elements(TOTAL_POINTS));

    let ids = IdentitySet::generate(SERIES);
    let anchor = start_of_day(chrono::Utc::now());
    group.bench_function(format!("elems/{TOTAL_POINTS}"), |b| {
        b.iter(|| {
            for point in PointStream::new(&ids, POINTS_PER_SERIES, anchor, 123) {
                black_box(point);
            }
        });
    });

    group.finish();
}

/// End-to-end pipeline throughput against the in-memory store.
fn bench_pipeline(c: &mut Criterion) {
    let rt = Builder::new_multi_thread().enable_all().build().unwrap();
    let mut group = c.benchmark_group("pipeline/memory");

    for writers in [1, 2, 4, 8, 16, 32, 64] {
        group.throughput(Throughput::Elements(TOTAL_POINTS));
        group.bench_function(format!("elems/{TOTAL_POINTS}/writers/{writers}"), |b| {
            b.iter_custom(|iters| {
                let mut total = Duration::ZERO;
                for _ in 0..iters {
                    let store = Arc::new(MemoryStore::new());
                    let config = BenchConfig::new(SERIES, writers)
                        .with_points_per_series(POINTS_PER_SERIES)
                        .with_progress_interval(u64::MAX);
                    let runner = PipelineRunner::new(store, config);

                    let start = Instant::now();
                    let metrics = rt.block_on(runner.run()).unwrap();
                    total += start.elapsed();
                    black_box(metrics);
                }
                total
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_point_stream, bench_pipeline);
criterion_main!(benches);
