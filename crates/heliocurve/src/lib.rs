//! Core algorithms for daylight-driven curve growth.
//!
//! The pipeline: a closed planar curve grown under short-range repulsion on a
//! tileable domain (`growth`, backed by `kdtree`), lifted to a vertical
//! curtain and rasterized into per-cell sun hours (`shadow`, fed by `solar`),
//! searched by a two-objective evolutionary driver (`nsga`) through the
//! genome wiring in `fitness`. `io` holds the CSV surfaces.

pub mod fitness;
pub mod growth;
pub mod io;
pub mod kdtree;
pub mod nsga;
pub mod shadow;
pub mod solar;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Planar key type used by the spatial index.
pub type Vec2 = nalgebra::Vector2<f64>;
/// Geometry point type used across the pipeline.
pub type Vec3 = nalgebra::Vector3<f64>;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::fitness::{DaylightEvaluator, EvalCfg, GENOME_LEN, OFFSET_GENES, REPELLER_GENES};
    pub use crate::growth::{GrowthCfg, GrowthEngine, RepellerField};
    pub use crate::io::{read_factors, read_points, write_curve, write_light_grid};
    pub use crate::kdtree::KdTree2;
    pub use crate::nsga::{Individual, Nsga2, NsgaCfg};
    pub use crate::shadow::{LightGrid, ShadowRaster};
    pub use crate::solar::{
        direction_to_sun, solar_position, sun_vectors, sunrise_sunset, Date, SampleWindow, Site,
        SolarPosition,
    };
    pub use crate::{Vec2, Vec3};
}
