use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dsf_bench::{gen_states, synthetic_domain};
use dsf_core::OutputKind;
use dsf_features::{Strategy, TrackerFeaturizer};

fn bench_encode(c: &mut Criterion) {
    let domain = synthetic_domain(200, 20, 30, 100);
    let states = gen_states(&domain, 1024, 12);

    let mut g = c.benchmark_group("dsf_features_encode");
    for strategy in Strategy::ALL {
        let encoder = strategy.prepare(&domain);
        for output in [OutputKind::Dense, OutputKind::Sparse] {
            g.bench_with_input(
                BenchmarkId::new(format!("{strategy}/{output}"), states.len()),
                &states,
                |b, s| {
                    b.iter(|| {
                        for state in s.iter() {
                            black_box(encoder.encode(Some(black_box(state)), output));
                        }
                    })
                },
            );
        }
    }
    g.finish();
}

fn bench_batch(c: &mut Criterion) {
    let domain = synthetic_domain(200, 20, 30, 100);
    let dialogues: Vec<_> = (0..64).map(|_| gen_states(&domain, 32, 12)).collect();

    let mut g = c.benchmark_group("dsf_features_tracker");
    for strategy in Strategy::ALL {
        let f = TrackerFeaturizer::new(strategy.prepare(&domain), OutputKind::Sparse, None);
        g.bench_with_input(
            BenchmarkId::new(strategy.name(), dialogues.len()),
            &dialogues,
            |b, d| b.iter(|| black_box(f.featurize_batch(black_box(d)))),
        );
    }
    g.finish();
}

criterion_group!(benches, bench_encode, bench_batch);
criterion_main!(benches);
