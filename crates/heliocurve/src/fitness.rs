//! Genome-to-objectives wiring for the daylight search.
//!
//! Gene layout is fixed: four repeller strength factors followed by 400
//! per-vertex extrusion offsets. Offsets beyond the grown point count are
//! inactive by policy; the optimizer sees a constant tail, never a
//! re-randomized one.

use crate::growth::{GrowthCfg, GrowthEngine, RepellerField};
use crate::shadow::ShadowRaster;
use crate::solar::{sun_vectors, Date, SampleWindow, Site};
use crate::Vec3;

pub const REPELLER_GENES: usize = 4;
pub const OFFSET_GENES: usize = 400;
pub const GENOME_LEN: usize = REPELLER_GENES + OFFSET_GENES;

/// Bounds for the repeller-factor genes.
pub const FACTOR_RANGE: (f64, f64) = (0.01, 5.0);
/// Bounds for the extrusion-offset genes.
pub const OFFSET_RANGE: (f64, f64) = (0.0, 100.0);

/// Everything one evaluation needs besides the genome. Passed explicitly so
/// evaluators stay self-contained and thread-shareable; there is no global
/// configuration.
#[derive(Clone, Copy, Debug)]
pub struct EvalCfg {
    pub growth: GrowthCfg,
    pub room_w: f64,
    pub room_h: f64,
    pub cell_size: f64,
    pub site: Site,
    pub summer: SampleWindow,
    pub winter: SampleWindow,
    pub up: Vec3,
    pub north: Vec3,
}

impl Default for EvalCfg {
    fn default() -> Self {
        Self {
            growth: GrowthCfg::default(),
            room_w: 1000.0,
            room_h: 1000.0,
            cell_size: 50.0,
            site: Site::default(),
            summer: SampleWindow::new(Date::new(2025, 6, 21)),
            winter: SampleWindow::new(Date::new(2025, 12, 21)),
            up: Vec3::new(0.0, 0.0, 1.0),
            north: Vec3::new(0.0, 1.0, 0.0),
        }
    }
}

/// Maps genomes to `(summer_hours, -winter_hours)`, both minimized.
///
/// The starting curve, repeller positions, and both seasonal sun-vector sets
/// are fixed at construction and shared read-only across worker threads.
pub struct DaylightEvaluator {
    cfg: EvalCfg,
    start: Vec<Vec3>,
    repellers: Vec<Vec3>,
    summer_suns: Vec<Vec3>,
    winter_suns: Vec<Vec3>,
}

impl DaylightEvaluator {
    pub fn new(cfg: EvalCfg, start: Vec<Vec3>, repellers: Vec<Vec3>) -> Self {
        let summer_suns = sun_vectors(cfg.site, cfg.summer, cfg.up, cfg.north);
        let winter_suns = sun_vectors(cfg.site, cfg.winter, cfg.up, cfg.north);
        Self {
            cfg,
            start,
            repellers,
            summer_suns,
            winter_suns,
        }
    }

    #[inline]
    pub fn cfg(&self) -> &EvalCfg {
        &self.cfg
    }

    #[inline]
    pub fn summer_suns(&self) -> &[Vec3] {
        &self.summer_suns
    }

    #[inline]
    pub fn winter_suns(&self) -> &[Vec3] {
        &self.winter_suns
    }

    /// Per-gene bounds matching the fixed genome layout.
    pub fn gene_bounds(&self) -> (Vec<f64>, Vec<f64>) {
        let mut lower = vec![FACTOR_RANGE.0; REPELLER_GENES];
        let mut upper = vec![FACTOR_RANGE.1; REPELLER_GENES];
        lower.extend(std::iter::repeat(OFFSET_RANGE.0).take(OFFSET_GENES));
        upper.extend(std::iter::repeat(OFFSET_RANGE.1).take(OFFSET_GENES));
        (lower, upper)
    }

    /// Grow the planar curve for `genes` and lift it into the curtain pair:
    /// planar (x, y, 0) stands up as vertical (x, 0, y), then the offset
    /// genes pull the first `min(n, 400)` vertices toward -y.
    pub fn build_geometry(&self, genes: &[f64]) -> (Vec<Vec3>, Vec<Vec3>) {
        let split = REPELLER_GENES.min(genes.len());
        let factors = genes[..split].to_vec();
        let offsets = &genes[split..];

        let field = RepellerField::new(self.repellers.clone(), factors);
        let mut engine = GrowthEngine::new(self.cfg.growth, field, self.start.clone());
        engine.run();
        let planar = engine.into_points();

        let vertical: Vec<Vec3> = planar.iter().map(|p| Vec3::new(p.x, 0.0, p.y)).collect();
        let mut extruded = vertical.clone();
        for (p, off) in extruded.iter_mut().zip(offsets.iter()) {
            p.y -= off;
        }
        (vertical, extruded)
    }

    /// Evaluate one candidate. Always returns a legal two-component vector;
    /// degenerate geometry maps to a penalty, never an error.
    pub fn objectives(&self, genes: &[f64]) -> Vec<f64> {
        let (vertical, extruded) = self.build_geometry(genes);
        let summer = self.season_hours(&vertical, &extruded, &self.summer_suns);
        let winter = self.season_hours(&vertical, &extruded, &self.winter_suns);
        match (summer, winter) {
            (Some(s), Some(w)) => vec![s, -w],
            _ => vec![f64::INFINITY, f64::INFINITY],
        }
    }

    fn season_hours(&self, vertical: &[Vec3], extruded: &[Vec3], suns: &[Vec3]) -> Option<f64> {
        let mut raster = ShadowRaster::new(
            vertical.to_vec(),
            extruded.to_vec(),
            self.cfg.room_w,
            self.cfg.room_h,
            self.cfg.cell_size,
            self.cfg.growth.closed,
        )
        .ok()?;
        raster.run_with_sun_vectors(suns);
        Some(raster.total_hours() as f64)
    }
}
