use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use idgen::{IdWorker, TimeSource, WorkerConfig};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::{Duration, Instant},
};

struct FixedMockTime {
    millis: i64,
}

impl TimeSource for FixedMockTime {
    fn current_millis(&self) -> i64 {
        self.millis
    }

    fn sleep(&self, _: Duration) {}
}

// Number of IDs generated per benchmark iteration (per-thread for
// multi-threaded).
const TOTAL_IDS: usize = 4096;

/// Hot path: the clock never moves, so every ID stays within one
/// millisecond and the sequence never wraps.
fn bench_fixed_clock(c: &mut Criterion) {
    let mut group = c.benchmark_group("fixed_clock");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();
            for _ in 0..iters {
                let time = FixedMockTime {
                    millis: 1_700_000_000_000,
                };
                let worker = IdWorker::from_components(WorkerConfig::default(), 0, 0, time)
                    .expect("valid config");
                for _ in 0..TOTAL_IDS {
                    black_box(worker.next_id().expect("fixed clock never fails"));
                }
            }
            start.elapsed()
        });
    });

    group.finish();
}

/// Realistic wall clock on a single thread, including spins on sequence
/// exhaustion.
fn bench_system_clock(c: &mut Criterion) {
    let mut group = c.benchmark_group("system_clock");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    let worker = IdWorker::with_config(WorkerConfig::default()).expect("valid config");
    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter(|| {
            for _ in 0..TOTAL_IDS {
                black_box(worker.next_id().expect("system clock is sane"));
            }
        });
    });

    group.finish();
}

/// All threads contend on one worker's lock.
fn bench_contended(c: &mut Criterion) {
    let threads = num_cpus::get().max(2);
    let mut group = c.benchmark_group(format!("contended/threads/{threads}"));
    group.throughput(Throughput::Elements((TOTAL_IDS * threads) as u64));

    let worker = IdWorker::with_config(WorkerConfig::default()).expect("valid config");
    group.bench_function(format!("elems/{}", TOTAL_IDS * threads), |b| {
        b.iter_custom(|iters| {
            let barrier = Arc::new(Barrier::new(threads + 1));
            let start = scope(|s| {
                for _ in 0..threads {
                    let barrier = Arc::clone(&barrier);
                    let worker = &worker;
                    s.spawn(move || {
                        barrier.wait();
                        for _ in 0..iters {
                            for _ in 0..TOTAL_IDS {
                                black_box(worker.next_id().expect("system clock is sane"));
                            }
                        }
                    });
                }
                barrier.wait();
                Instant::now()
            });
            start.elapsed()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_fixed_clock, bench_system_clock, bench_contended);
criterion_main!(benches);
