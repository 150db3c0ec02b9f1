use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use lrulib::config::CacheConfig;
use lrulib::simulator::Simulator;
use lrulib::util::synthetic_trace;

/// Benchmarks the engine across the associativity range: direct-mapped pays
/// nothing for victim selection, fully associative pays a whole-set scan
pub fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Simulation");
    let trace = synthetic_trace(100_000);

    let configs = [
        ("direct", CacheConfig::new(8, 1, 4)),
        ("2way", CacheConfig::new(7, 2, 4)),
        ("8way", CacheConfig::new(5, 8, 4)),
        ("full", CacheConfig::new(0, 256, 4)),
    ];

    for (name, config) in configs {
        group.bench_with_input(BenchmarkId::new("Config: ", name), &config, |bench, conf| {
            bench.iter(|| {
                Simulator::new(conf).unwrap().simulate(&trace);
            });
        });
    }
}

criterion_group!(
    name = benches;
    config = Criterion::default().significance_level(0.1).sample_size(10);
    targets = criterion_benchmark
);
criterion_main!(benches);
