//! Criterion benchmarks for the differential growth engine.
//! Focus: point budgets in {50, 100, 200} from a coarse seed square.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use heliocurve::growth::{GrowthCfg, GrowthEngine, RepellerField};
use heliocurve::Vec3;

fn seed_square() -> Vec<Vec3> {
    vec![
        Vec3::new(250.0, 250.0, 0.0),
        Vec3::new(750.0, 250.0, 0.0),
        Vec3::new(750.0, 750.0, 0.0),
        Vec3::new(250.0, 750.0, 0.0),
    ]
}

fn bench_growth(c: &mut Criterion) {
    let mut group = c.benchmark_group("growth");
    for &max_points in &[50usize, 100, 200] {
        group.bench_with_input(BenchmarkId::new("run", max_points), &max_points, |b, &mp| {
            let cfg = GrowthCfg {
                max_points: mp,
                max_iters: 200,
                ..GrowthCfg::default()
            };
            let field = RepellerField::new(vec![Vec3::new(500.0, 500.0, 0.0)], vec![1.0]);
            b.iter_batched(
                || GrowthEngine::new(cfg, field.clone(), seed_square()),
                |mut engine| {
                    engine.run();
                    engine.points().len()
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_growth);
criterion_main!(benches);
