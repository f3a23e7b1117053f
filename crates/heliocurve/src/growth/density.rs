use crate::Vec3;

use super::engine::GrowthCfg;

/// Repeller positions paired with per-repeller strength factors.
///
/// Invariants:
/// - `factors` may be shorter than `repellers`; lookups clamp to the last
///   entry. An empty factor list means strength 1 for every repeller.
#[derive(Clone, Debug, Default)]
pub struct RepellerField {
    pub repellers: Vec<Vec3>,
    pub factors: Vec<f64>,
}

impl RepellerField {
    pub fn new(repellers: Vec<Vec3>, factors: Vec<f64>) -> Self {
        Self { repellers, factors }
    }

    /// No repellers: density is identically 1.
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    fn factor(&self, repeller_idx: usize) -> f64 {
        match self.factors.len() {
            0 => 1.0,
            k => self.factors[repeller_idx.min(k - 1)],
        }
    }

    /// Local density multiplier at `p`, always >= 1.
    ///
    /// Each repeller within `max_effect_dist` (3D distance) contributes
    /// `1 + (max_factor - 1) * factor * (1 - d / max_effect_dist)`; the
    /// strongest contribution wins.
    pub fn density_at(&self, cfg: &GrowthCfg, p: Vec3) -> f64 {
        let mut best = 1.0f64;
        for (i, r) in self.repellers.iter().enumerate() {
            let d = (p - r).norm();
            if d <= cfg.max_effect_dist {
                let contribution =
                    1.0 + (cfg.max_factor - 1.0) * self.factor(i) * (1.0 - d / cfg.max_effect_dist);
                best = best.max(contribution);
            }
        }
        best
    }
}
