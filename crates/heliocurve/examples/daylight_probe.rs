//! Timing probe for one full candidate evaluation.
//!
//! Purpose
//! - Give a reproducible, code-backed data point for "how long does one
//!   genome take?": grow the curve, lift the curtain, rasterize both
//!   seasons, and print wall-clock splits. The optimizer repeats this
//!   pipeline tens of thousands of times, so the splits here bound a run.
//!
//! Why this shape
//! - Default configuration throughout (200-point budget, 50-unit grid
//!   cells), one central repeller to exercise the density path.

use std::time::Instant;

use heliocurve::fitness::{DaylightEvaluator, EvalCfg, GENOME_LEN, REPELLER_GENES};
use heliocurve::shadow::ShadowRaster;
use heliocurve::Vec3;

fn main() {
    let start = vec![
        Vec3::new(250.0, 250.0, 0.0),
        Vec3::new(750.0, 250.0, 0.0),
        Vec3::new(750.0, 750.0, 0.0),
        Vec3::new(250.0, 750.0, 0.0),
    ];
    let repellers = vec![Vec3::new(500.0, 500.0, 0.0)];
    let evaluator = DaylightEvaluator::new(EvalCfg::default(), start, repellers);

    let mut genes = vec![1.0; GENOME_LEN];
    for (i, g) in genes.iter_mut().enumerate().skip(REPELLER_GENES) {
        *g = 20.0 + (i % 5) as f64 * 15.0;
    }

    let grow_start = Instant::now();
    let (vertical, extruded) = evaluator.build_geometry(&genes);
    let grow_ms = grow_start.elapsed().as_secs_f64() * 1e3;

    let cfg = evaluator.cfg();
    let raster_start = Instant::now();
    let mut totals = [0u64; 2];
    for (slot, suns) in [evaluator.summer_suns(), evaluator.winter_suns()]
        .into_iter()
        .enumerate()
    {
        let mut raster = ShadowRaster::new(
            vertical.clone(),
            extruded.clone(),
            cfg.room_w,
            cfg.room_h,
            cfg.cell_size,
            cfg.growth.closed,
        )
        .expect("aligned curves");
        raster.run_with_sun_vectors(suns);
        totals[slot] = raster.total_hours();
    }
    let raster_ms = raster_start.elapsed().as_secs_f64() * 1e3;

    println!("points={}", vertical.len());
    println!(
        "summer_hours={} winter_hours={} (samples {}/{})",
        totals[0],
        totals[1],
        evaluator.summer_suns().len(),
        evaluator.winter_suns().len()
    );
    println!("grow_time_ms={grow_ms:.3}");
    println!("raster_time_ms={raster_ms:.3}");
}
