use crate::kdtree::KdTree2;
use crate::{Vec2, Vec3};

use super::density::RepellerField;

/// Growth parameters.
///
/// `max_factor` doubles as the neighbor-search inflation: the query radius
/// `base_dist * max_factor` covers the largest local target distance the
/// density modulation can produce.
#[derive(Clone, Copy, Debug)]
pub struct GrowthCfg {
    pub max_points: usize,
    pub max_iters: usize,
    pub base_dist: f64,
    pub max_factor: f64,
    pub max_effect_dist: f64,
    pub tile_w: f64,
    pub tile_h: f64,
    pub closed: bool,
}

impl Default for GrowthCfg {
    fn default() -> Self {
        Self {
            max_points: 200,
            max_iters: 200,
            base_dist: 75.0,
            max_factor: 1.5,
            max_effect_dist: 300.0,
            tile_w: 1000.0,
            tile_h: 1000.0,
            closed: true,
        }
    }
}

/// Same-point rejection threshold for the pair force.
const MIN_PAIR_DIST: f64 = 1e-3;

/// Iterative curve grower. Owns the point sequence while iterating; hand the
/// result to downstream consumers as a slice or via [`into_points`](Self::into_points).
pub struct GrowthEngine {
    cfg: GrowthCfg,
    field: RepellerField,
    points: Vec<Vec3>,
    // Scratch reused across iterations.
    cloud: Vec<Vec3>,
    keys: Vec<Vec2>,
    hits: Vec<usize>,
}

impl GrowthEngine {
    pub fn new(cfg: GrowthCfg, field: RepellerField, start: Vec<Vec3>) -> Self {
        Self {
            cfg,
            field,
            points: start,
            cloud: Vec::new(),
            keys: Vec::new(),
            hits: Vec::new(),
        }
    }

    #[inline]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    #[inline]
    pub fn into_points(self) -> Vec<Vec3> {
        self.points
    }

    /// Run up to `max_iters` iterations, stopping early once saturated.
    pub fn run(&mut self) -> &[Vec3] {
        for _ in 0..self.cfg.max_iters {
            if !self.step() {
                break;
            }
        }
        &self.points
    }

    /// One repulsion-then-insertion iteration.
    ///
    /// Returns `false` without touching the curve when the point budget is
    /// already met (or the curve is empty).
    pub fn step(&mut self) -> bool {
        let n = self.points.len();
        if n == 0 || n >= self.cfg.max_points {
            return false;
        }

        self.build_mirrored_cloud();
        let tree = match KdTree2::from_keys(&self.keys) {
            Some(t) => t,
            None => return false,
        };

        // Densities at pre-move positions; the force pass reads both endpoints
        // of every interacting pair from this snapshot.
        let densities: Vec<f64> = self
            .points
            .iter()
            .map(|p| self.field.density_at(&self.cfg, *p))
            .collect();

        let radius = self.cfg.base_dist * self.cfg.max_factor;
        let mut total_move = vec![Vec3::zeros(); n];
        let mut collisions = vec![0u32; n];

        for i in 0..n {
            let q = Vec2::new(self.points[i].x, self.points[i].y);
            tree.radial_search_into(q, radius, &mut self.hits);
            for &jm in &self.hits {
                let j = jm % n;
                if j == i {
                    continue;
                }
                let delta = self.points[i] - self.cloud[jm];
                let d = delta.norm();
                if d < MIN_PAIR_DIST {
                    continue;
                }
                let local_dist = 0.5 * self.cfg.base_dist * (densities[i] + densities[j]);
                if d > local_dist {
                    continue;
                }
                let push = (0.5 * (local_dist - d)).min(0.5 * self.cfg.base_dist);
                let mv = delta * (push / d);
                // Every unordered pair is visited twice, once per query side;
                // the accumulation stays equal-and-opposite under averaging.
                total_move[i] += mv;
                total_move[j] -= mv;
                collisions[i] += 1;
                collisions[j] += 1;
            }
        }

        for i in 0..n {
            if collisions[i] > 0 {
                self.points[i] += total_move[i] / collisions[i] as f64;
            }
        }

        self.insertion_pass(n);
        true
    }

    /// Nine affine copies, copy-major: mirror copy `c` of vertex `i` lands at
    /// index `c*n + i`, so the back-reference is `j % n`.
    fn build_mirrored_cloud(&mut self) {
        self.cloud.clear();
        self.keys.clear();
        self.cloud.reserve(9 * self.points.len());
        self.keys.reserve(9 * self.points.len());
        for dy in -1i32..=1 {
            for dx in -1i32..=1 {
                let off = Vec3::new(
                    dx as f64 * self.cfg.tile_w,
                    dy as f64 * self.cfg.tile_h,
                    0.0,
                );
                for p in &self.points {
                    let q = p + off;
                    self.keys.push(Vec2::new(q.x, q.y));
                    self.cloud.push(q);
                }
            }
        }
    }

    /// Split every over-long edge at its midpoint, applying insertions in
    /// descending target-index order so pending indices stay valid, and
    /// stopping at the point budget.
    fn insertion_pass(&mut self, n: usize) {
        let densities: Vec<f64> = self
            .points
            .iter()
            .map(|p| self.field.density_at(&self.cfg, *p))
            .collect();
        let edge_count = if self.cfg.closed { n } else { n.saturating_sub(1) };
        let mut due: Vec<usize> = Vec::new();
        for a in 0..edge_count {
            let b = (a + 1) % n;
            let threshold = 0.5 * self.cfg.base_dist * (densities[a] + densities[b]) - 1.0;
            if (self.points[a] - self.points[b]).norm() > threshold {
                due.push(a);
            }
        }
        for &a in due.iter().rev() {
            if self.points.len() >= self.cfg.max_points {
                break;
            }
            let b = (a + 1) % n;
            let mid = (self.points[a] + self.points[b]) * 0.5;
            self.points.insert(a + 1, mid);
        }
    }
}
