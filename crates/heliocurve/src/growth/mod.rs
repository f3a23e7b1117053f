//! Differential growth of a closed planar curve on a tileable domain.
//!
//! Purpose
//! - Grow an ordered, logically closed control-point sequence under
//!   short-range repulsion, with repeller-driven density modulation and
//!   midpoint insertion keeping edges near a local target length.
//!
//! Why this design
//! - The domain is a torus of period (tile_w, tile_h). Instead of a
//!   torus-aware index, nine affine copies of the curve are built and searched
//!   in one flat KD tree per iteration: 9x memory for a much simpler query
//!   path that stays O(log N) per vertex.
//! - The tree and the mirrored cloud are rebuilt every iteration; positions
//!   change everywhere, and incremental maintenance buys nothing at the
//!   point counts involved (a few hundred).
//!
//! Code cross-refs: `kdtree::KdTree2`, `density::RepellerField`,
//! `fitness::DaylightEvaluator` (runs one engine per candidate).

mod density;
mod engine;

pub use density::RepellerField;
pub use engine::{GrowthCfg, GrowthEngine};

#[cfg(test)]
mod tests;
