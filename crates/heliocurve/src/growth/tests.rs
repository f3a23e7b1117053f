use super::*;
use crate::Vec3;

fn p(x: f64, y: f64) -> Vec3 {
    Vec3::new(x, y, 0.0)
}

#[test]
fn collinear_triple_relaxes_symmetrically() {
    let cfg = GrowthCfg {
        max_points: 50,
        max_iters: 1,
        closed: false,
        ..GrowthCfg::default()
    };
    let start = vec![p(0.0, 0.0), p(10.0, 0.0), p(20.0, 0.0)];
    let mut engine = GrowthEngine::new(cfg, RepellerField::empty(), start);
    engine.run();
    let pts = engine.points();

    // Longest edge is 20 < base_dist - 1: no insertions.
    assert_eq!(pts.len(), 3);
    // All pairs sit within the interaction radius, so the ends spread out.
    assert!(pts[0].x < 0.0);
    assert!(pts[2].x > 20.0);
    // Middle point feels balanced pulls and stays put.
    assert!((pts[1].x - 10.0).abs() < 1e-9);
    // Symmetric motion preserves the centroid along x.
    let centroid = (pts[0].x + pts[1].x + pts[2].x) / 3.0;
    assert!((centroid - 10.0).abs() < 1e-6);
    let left = pts[0] - p(0.0, 0.0);
    let right = pts[2] - p(20.0, 0.0);
    assert!((left + right).norm() < 1e-9);
}

#[test]
fn long_edge_gains_a_midpoint() {
    let cfg = GrowthCfg {
        max_points: 10,
        max_iters: 1,
        closed: false,
        ..GrowthCfg::default()
    };
    let start = vec![p(0.0, 0.0), p(300.0, 0.0)];
    let mut engine = GrowthEngine::new(cfg, RepellerField::empty(), start);
    engine.run();
    let pts = engine.points();

    // 300 > 0.5 * 75 * 2 - 1, and the two endpoints are too far apart to
    // interact, so the iteration is a pure insertion.
    assert_eq!(pts.len(), 3);
    assert!((pts[1] - p(150.0, 0.0)).norm() < 1e-9);
}

#[test]
fn zero_iterations_returns_input_unchanged() {
    let cfg = GrowthCfg {
        max_iters: 0,
        ..GrowthCfg::default()
    };
    let start = vec![p(1.0, 2.0), p(3.0, 4.0), p(5.0, 6.0)];
    let mut engine = GrowthEngine::new(cfg, RepellerField::empty(), start.clone());
    engine.run();
    assert_eq!(engine.points(), &start[..]);
}

#[test]
fn point_budget_is_never_exceeded() {
    let cfg = GrowthCfg {
        max_points: 12,
        max_iters: 40,
        ..GrowthCfg::default()
    };
    let start = vec![p(0.0, 0.0), p(400.0, 0.0), p(400.0, 400.0), p(0.0, 400.0)];
    let mut engine = GrowthEngine::new(cfg, RepellerField::empty(), start);
    for _ in 0..cfg.max_iters {
        engine.step();
        assert!(engine.points().len() <= cfg.max_points);
    }
    assert_eq!(engine.points().len(), cfg.max_points);
}

#[test]
fn no_consecutive_duplicates_after_growth() {
    let cfg = GrowthCfg {
        max_points: 60,
        max_iters: 30,
        ..GrowthCfg::default()
    };
    let start = vec![
        p(100.0, 100.0),
        p(500.0, 120.0),
        p(700.0, 500.0),
        p(400.0, 800.0),
        p(120.0, 500.0),
    ];
    let mut engine = GrowthEngine::new(cfg, RepellerField::empty(), start);
    engine.run();
    let pts = engine.points();
    for i in 0..pts.len() {
        let j = (i + 1) % pts.len();
        assert!((pts[i] - pts[j]).norm() > 0.0, "duplicate at {i}");
    }
}

#[test]
fn neighbors_across_the_tile_seam_repel() {
    let cfg = GrowthCfg {
        max_points: 50,
        max_iters: 1,
        closed: false,
        ..GrowthCfg::default()
    };
    // 10 apart through the wrap, 990 apart in the plane.
    let start = vec![p(5.0, 500.0), p(995.0, 500.0)];
    let mut engine = GrowthEngine::new(cfg, RepellerField::empty(), start);
    engine.step();
    let pts = engine.points();
    let last = pts[pts.len() - 1];
    assert!(pts[0].x > 5.0, "left point should be pushed off the seam");
    assert!(last.x < 995.0, "right point should be pushed off the seam");
    let left = pts[0].x - 5.0;
    let right = 995.0 - last.x;
    assert!((left - right).abs() < 1e-9);
}

#[test]
fn density_is_one_without_repellers() {
    let cfg = GrowthCfg::default();
    let field = RepellerField::empty();
    assert_eq!(field.density_at(&cfg, p(12.0, 34.0)), 1.0);
}

#[test]
fn density_follows_the_clamped_factor_ramp() {
    let cfg = GrowthCfg::default();
    let field = RepellerField::new(
        vec![p(0.0, 0.0), p(5000.0, 0.0), p(0.0, 5000.0)],
        vec![1.0],
    );
    // Halfway into the effect radius of the first repeller, factor 1:
    // 1 + 0.5 * 1 * (1 - 150/300) = 1.25. The far repellers contribute
    // nothing, and the short factor list clamps to its last entry.
    let d = field.density_at(&cfg, p(150.0, 0.0));
    assert!((d - 1.25).abs() < 1e-12);
    // At the repeller itself the ramp tops out at max_factor.
    let top = field.density_at(&cfg, p(0.0, 0.0));
    assert!((top - cfg.max_factor).abs() < 1e-12);
    // Outside the effect radius density falls back to 1.
    assert_eq!(field.density_at(&cfg, p(301.0, 0.0)), 1.0);
}

#[test]
fn repellers_slow_insertion_growth() {
    // A strong repeller raises the local target spacing, so the same curve
    // accumulates fewer vertices over the same number of iterations.
    let cfg = GrowthCfg {
        max_points: 300,
        max_iters: 6,
        ..GrowthCfg::default()
    };
    let start = vec![
        p(350.0, 350.0),
        p(650.0, 350.0),
        p(650.0, 650.0),
        p(350.0, 650.0),
    ];
    let mut without = GrowthEngine::new(cfg, RepellerField::empty(), start.clone());
    without.run();

    let field = RepellerField::new(vec![Vec3::new(500.0, 500.0, 0.0)], vec![5.0]);
    let mut with = GrowthEngine::new(cfg, field, start);
    with.run();

    assert!(without.points().len() > 4);
    assert!(with.points().len() > 4);
    assert!(
        with.points().len() < without.points().len(),
        "{} !< {}",
        with.points().len(),
        without.points().len()
    );
}
