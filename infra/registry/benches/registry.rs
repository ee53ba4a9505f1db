use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use herald_registry::{EventRegistry, Listener};
use std::hint::black_box;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

struct Tick(u64);

fn bench_broadcast(c: &mut Criterion) {
    let mut group = c.benchmark_group("broadcast");

    for fan_out in [1usize, 16, 256] {
        let registry = EventRegistry::new();
        let sink = Arc::new(AtomicU64::new(0));
        for _ in 0..fan_out {
            let sink = Arc::clone(&sink);
            registry.on(move |tick: &Tick| {
                sink.fetch_add(tick.0, Ordering::Relaxed);
            });
        }

        group.throughput(Throughput::Elements(fan_out as u64));
        group.bench_with_input(BenchmarkId::new("typed", fan_out), &registry, |b, r| {
            b.iter(|| r.broadcast(black_box(&Tick(1))).unwrap());
        });
    }

    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let registry = EventRegistry::new();
    let listener = Listener::new(|tick: &Tick| {
        black_box(tick.0);
    });

    c.bench_function("add_remove", |b| {
        b.iter(|| {
            registry.add_listener(black_box(&listener));
            registry.remove_listener(black_box(&listener));
        });
    });
}

criterion_group!(benches, bench_broadcast, bench_churn);
criterion_main!(benches);
