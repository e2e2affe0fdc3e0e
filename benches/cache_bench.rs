//! Benchmarks for the expiring cache.
//!
//! Run with: cargo bench

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};
use expiring_cache::{Cache, Expiration};
use std::time::Duration;

fn populated(n: usize, ttl: Expiration) -> Cache<String> {
    let cache = Cache::default();
    for i in 0..n {
        cache.set(format!("key_{}", i), format!("value_{}", i), ttl);
    }
    cache
}

/// Benchmark single-threaded get/set operations.
fn bench_single_threaded(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_threaded");
    let cache = populated(10_000, Expiration::Never);

    group.bench_function("get_existing", |b| {
        let mut i = 0;
        b.iter(|| {
            let key = format!("key_{}", i % 10_000);
            black_box(cache.get(&key));
            i += 1;
        });
    });

    group.bench_function("get_missing", |b| {
        let mut i = 0;
        b.iter(|| {
            let key = format!("missing_{}", i);
            black_box(cache.get(&key));
            i += 1;
        });
    });

    group.bench_function("set_new", |b| {
        let cache = Cache::default();
        let mut i = 0;
        b.iter(|| {
            cache.set(format!("new_key_{}", i), "value".to_string(), Expiration::Never);
            i += 1;
        });
    });

    group.bench_function("set_with_ttl", |b| {
        let mut i = 0;
        b.iter(|| {
            let key = format!("key_{}", i % 10_000);
            cache.set(key, "updated_value".to_string(), Duration::from_secs(300));
            i += 1;
        });
    });

    group.finish();
}

/// Benchmark concurrent operations.
fn bench_concurrent(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent");

    for num_threads in [2usize, 4, 8].iter() {
        let cache = populated(10_000, Expiration::Never);

        group.throughput(Throughput::Elements(1000));
        group.bench_with_input(
            BenchmarkId::new("mixed_with_sweeps", num_threads),
            num_threads,
            |b, &num_threads| {
                b.iter(|| {
                    let handles: Vec<_> = (0..num_threads)
                        .map(|t| {
                            let cache = cache.clone();
                            std::thread::spawn(move || {
                                for i in 0..1000 {
                                    let key = format!("key_{}", (t * 1000 + i) % 10_000);
                                    match i % 100 {
                                        0 => {
                                            black_box(cache.delete_expired());
                                        }
                                        n if n % 5 == 0 => {
                                            let ttl = Duration::from_millis(1 + n as u64);
                                            cache.set(key, "value".to_string(), ttl);
                                        }
                                        _ => {
                                            black_box(cache.get(&key));
                                        }
                                    }
                                }
                            })
                        })
                        .collect();

                    for handle in handles {
                        handle.join().unwrap();
                    }
                });
            },
        );
    }

    group.finish();
}

/// Benchmark sweeps over tables of different sizes.
fn bench_delete_expired(c: &mut Criterion) {
    let mut group = c.benchmark_group("delete_expired");

    for size in [1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::new("all_live", size), size, |b, &size| {
            let cache = populated(size, Duration::from_secs(3600).into());
            b.iter(|| black_box(cache.delete_expired()));
        });

        group.bench_with_input(BenchmarkId::new("all_expired", size), size, |b, &size| {
            b.iter_batched(
                || {
                    let cache = populated(size, Duration::from_nanos(1).into());
                    std::thread::sleep(Duration::from_millis(1));
                    cache
                },
                |cache| black_box(cache.delete_expired()),
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

/// Benchmark snapshot encoding.
fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot");
    let cache = populated(10_000, Expiration::Never);

    group.bench_function("save", |b| {
        b.iter(|| {
            let mut buf = Vec::new();
            cache.save(&mut buf).unwrap();
            black_box(buf);
        });
    });

    let mut snapshot = Vec::new();
    cache.save(&mut snapshot).unwrap();

    group.bench_function("load_into_empty", |b| {
        b.iter_batched(
            Cache::<String>::default,
            |target| black_box(target.load(snapshot.as_slice()).unwrap()),
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_single_threaded,
    bench_concurrent,
    bench_delete_expired,
    bench_snapshot,
);
criterion_main!(benches);
