//! Criterion benchmarks for the shadow rasterizer.
//! Focus: curtain sizes in {50, 100, 200} vertices against a 5-sample day.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use heliocurve::shadow::ShadowRaster;
use heliocurve::solar::{sun_vectors, Date, SampleWindow, Site};
use heliocurve::Vec3;

fn ring_curtain(n: usize) -> (Vec<Vec3>, Vec<Vec3>) {
    let vertical: Vec<Vec3> = (0..n)
        .map(|i| {
            let t = i as f64 / n as f64 * std::f64::consts::TAU;
            Vec3::new(500.0 + 300.0 * t.cos(), 0.0, 150.0 + 100.0 * t.sin())
        })
        .collect();
    let extruded = vertical
        .iter()
        .enumerate()
        .map(|(i, p)| Vec3::new(p.x, -40.0 - (i % 7) as f64 * 5.0, p.z))
        .collect();
    (vertical, extruded)
}

fn bench_shadow(c: &mut Criterion) {
    let suns = sun_vectors(
        Site::default(),
        SampleWindow::new(Date::new(2025, 6, 21)),
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(0.0, 1.0, 0.0),
    );
    let mut group = c.benchmark_group("shadow");
    for &n in &[50usize, 100, 200] {
        group.bench_with_input(BenchmarkId::new("run_with_sun_vectors", n), &n, |b, &n| {
            b.iter_batched(
                || {
                    let (vertical, extruded) = ring_curtain(n);
                    ShadowRaster::new(vertical, extruded, 1000.0, 1000.0, 50.0, true)
                        .expect("aligned curves")
                },
                |mut raster| {
                    raster.run_with_sun_vectors(&suns);
                    raster.total_hours()
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_shadow);
criterion_main!(benches);
