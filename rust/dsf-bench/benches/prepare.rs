use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dsf_bench::synthetic_domain;
use dsf_features::Strategy;

fn bench_prepare(c: &mut Criterion) {
    let mut g = c.benchmark_group("dsf_features_prepare");
    for &n in &[50usize, 500usize] {
        let domain = synthetic_domain(n, n / 10, n / 10, n / 2);
        for strategy in Strategy::ALL {
            g.bench_with_input(BenchmarkId::new(strategy.name(), n), &domain, |b, d| {
                b.iter(|| black_box(strategy.prepare(black_box(d))))
            });
        }
    }
    g.finish();
}

criterion_group!(benches, bench_prepare);
criterion_main!(benches);
