//! Direct-sun shadow rasterizer over a floor grid.
//!
//! Purpose
//! - Convert an extruded curtain strip plus a set of sun vectors into
//!   per-cell counts of un-shadowed instants ("light hours") on the room
//!   floor at z = 0.
//!
//! Model
//! - Binary shadowing only: a cell is either occluded by at least one
//!   projected quad for a sample or it is lit. No radiosity, no
//!   transmittance.
//! - Each curtain segment is a quad between the vertical and extruded
//!   curves; quads are projected along the light direction and stamped into
//!   a per-sample boolean grid via an AABB clip and a same-side test.
//!
//! Code cross-refs: `solar::sun_vectors` (produces the input vector sets),
//! `fitness::DaylightEvaluator` (runs one rasterizer per season).

use std::fmt;

use crate::{Vec2, Vec3};

/// Sun directions closer to the horizon than this (by floor-normal
/// component) are treated as no-sample.
const GRAZING_EPS: f64 = 1e-8;

/// Errors surfaced at rasterizer construction.
#[derive(Debug)]
pub enum RasterError {
    CurveLengthMismatch { vertical: usize, extruded: usize },
    InvalidCellSize { cell_size: f64 },
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RasterError::CurveLengthMismatch { vertical, extruded } => write!(
                f,
                "curve lengths differ: vertical has {vertical} points, extruded has {extruded}"
            ),
            RasterError::InvalidCellSize { cell_size } => {
                write!(f, "grid cell size must be positive, got {cell_size}")
            }
        }
    }
}

impl std::error::Error for RasterError {}

/// Floor grid: world-space cell centers plus accumulated light hours.
///
/// Invariants:
/// - `hours[col, row] <= number of accumulated samples` for every cell.
#[derive(Clone, Debug)]
pub struct LightGrid {
    cols: usize,
    rows: usize,
    cell_size: f64,
    centers: Vec<Vec3>,
    hours: Vec<u32>,
}

impl LightGrid {
    fn new(room_w: f64, room_h: f64, cell_size: f64) -> Self {
        let cols = (room_w / cell_size).ceil().max(1.0) as usize;
        let rows = (room_h / cell_size).ceil().max(1.0) as usize;
        let mut centers = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                centers.push(Vec3::new(
                    (col as f64 + 0.5) * cell_size,
                    (row as f64 + 0.5) * cell_size,
                    0.0,
                ));
            }
        }
        Self {
            cols,
            rows,
            cell_size,
            centers,
            hours: vec![0; cols * rows],
        }
    }

    #[inline]
    fn idx(&self, col: usize, row: usize) -> usize {
        row * self.cols + col
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    #[inline]
    pub fn center(&self, col: usize, row: usize) -> Vec3 {
        self.centers[self.idx(col, row)]
    }

    #[inline]
    pub fn hours(&self, col: usize, row: usize) -> u32 {
        self.hours[self.idx(col, row)]
    }

    /// Sum of light hours over all cells.
    pub fn total_hours(&self) -> u64 {
        self.hours.iter().map(|&h| h as u64).sum()
    }

    /// Mean light hours per cell.
    pub fn average_hours(&self) -> f64 {
        self.total_hours() as f64 / self.hours.len() as f64
    }
}

/// Projects the curtain quad strip onto the floor, one sun sample at a time.
pub struct ShadowRaster {
    vertical: Vec<Vec3>,
    extruded: Vec<Vec3>,
    closed: bool,
    grid: LightGrid,
    // Per-sample scratch.
    shadow: Vec<bool>,
}

impl ShadowRaster {
    /// The two curves must be index-aligned: quad `i` spans
    /// `(vertical[i], vertical[i+1], extruded[i+1], extruded[i])`.
    pub fn new(
        vertical: Vec<Vec3>,
        extruded: Vec<Vec3>,
        room_w: f64,
        room_h: f64,
        cell_size: f64,
        closed: bool,
    ) -> Result<Self, RasterError> {
        if vertical.len() != extruded.len() {
            return Err(RasterError::CurveLengthMismatch {
                vertical: vertical.len(),
                extruded: extruded.len(),
            });
        }
        if !(cell_size > 0.0) || !cell_size.is_finite() {
            return Err(RasterError::InvalidCellSize { cell_size });
        }
        let grid = LightGrid::new(room_w, room_h, cell_size);
        let shadow = vec![false; grid.cols * grid.rows];
        Ok(Self {
            vertical,
            extruded,
            closed,
            grid,
            shadow,
        })
    }

    #[inline]
    pub fn grid(&self) -> &LightGrid {
        &self.grid
    }

    #[inline]
    pub fn total_hours(&self) -> u64 {
        self.grid.total_hours()
    }

    #[inline]
    pub fn average_hours(&self) -> f64 {
        self.grid.average_hours()
    }

    /// Accumulate one light-hour per cell for every sample that leaves the
    /// cell un-shadowed. No-op on empty input; callable repeatedly, counts
    /// add up across calls.
    pub fn run_with_sun_vectors(&mut self, suns: &[Vec3]) {
        for v_to_sun in suns {
            let norm = v_to_sun.norm();
            if norm < GRAZING_EPS {
                continue;
            }
            // Light travels opposite the scene-to-sun vector.
            let d = -(v_to_sun / norm);
            if d.z.abs() < GRAZING_EPS {
                continue;
            }
            self.shadow.fill(false);
            self.stamp_all_segments(d);
            for (idx, occluded) in self.shadow.iter().enumerate() {
                if !occluded {
                    self.grid.hours[idx] += 1;
                }
            }
        }
    }

    fn stamp_all_segments(&mut self, d: Vec3) {
        let n = self.vertical.len();
        if n < 2 {
            return;
        }
        let segments = if self.closed { n } else { n - 1 };
        for s in 0..segments {
            let i = s;
            let j = (s + 1) % n;
            let quad = [
                project_to_floor(self.vertical[i], d),
                project_to_floor(self.vertical[j], d),
                project_to_floor(self.extruded[j], d),
                project_to_floor(self.extruded[i], d),
            ];
            stamp_quad(&quad, &self.grid, &mut self.shadow);
        }
    }
}

/// Slide `p` along the light direction until z = 0 (exactly).
#[inline]
fn project_to_floor(p: Vec3, d: Vec3) -> Vec2 {
    let t = p.z / d.z;
    Vec2::new(p.x - t * d.x, p.y - t * d.y)
}

/// Mark every grid cell whose center lies inside the projected quad.
fn stamp_quad(quad: &[Vec2; 4], grid: &LightGrid, shadow: &mut [bool]) {
    let (mut min_x, mut max_x) = (quad[0].x, quad[0].x);
    let (mut min_y, mut max_y) = (quad[0].y, quad[0].y);
    for q in &quad[1..] {
        min_x = min_x.min(q.x);
        max_x = max_x.max(q.x);
        min_y = min_y.min(q.y);
        max_y = max_y.max(q.y);
    }
    let g = grid.cell_size;
    let col_lo = ((min_x / g).floor() as i64).max(0);
    let col_hi = ((max_x / g).floor() as i64).min(grid.cols as i64 - 1);
    let row_lo = ((min_y / g).floor() as i64).max(0);
    let row_hi = ((max_y / g).floor() as i64).min(grid.rows as i64 - 1);
    for row in row_lo..=row_hi {
        for col in col_lo..=col_hi {
            let idx = row as usize * grid.cols + col as usize;
            if shadow[idx] {
                continue;
            }
            let c = Vec2::new((col as f64 + 0.5) * g, (row as f64 + 0.5) * g);
            if covers(quad, c) {
                shadow[idx] = true;
            }
        }
    }
}

/// Same-side test: all four signed edge crosses share a sign (zeros count
/// toward both sides, so degenerate quads stay harmless).
#[inline]
fn covers(quad: &[Vec2; 4], c: Vec2) -> bool {
    let mut non_neg = true;
    let mut non_pos = true;
    for k in 0..4 {
        let a = quad[k];
        let b = quad[(k + 1) % 4];
        let cross = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
        if cross < 0.0 {
            non_neg = false;
        }
        if cross > 0.0 {
            non_pos = false;
        }
    }
    non_neg || non_pos
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_curtain() -> (Vec<Vec3>, Vec<Vec3>) {
        // A 600-wide, 200-tall curtain standing at y = 400, extruded 100
        // toward the sun-facing side.
        let vertical = vec![
            Vec3::new(200.0, 400.0, 0.0),
            Vec3::new(800.0, 400.0, 0.0),
            Vec3::new(800.0, 400.0, 200.0),
            Vec3::new(200.0, 400.0, 200.0),
        ];
        let extruded = vertical
            .iter()
            .map(|p| Vec3::new(p.x, p.y - 100.0, p.z))
            .collect();
        (vertical, extruded)
    }

    #[test]
    fn construction_rejects_mismatched_curves() {
        let (vertical, _) = square_curtain();
        let err = ShadowRaster::new(vertical, vec![Vec3::zeros()], 1000.0, 1000.0, 100.0, true);
        assert!(matches!(
            err,
            Err(RasterError::CurveLengthMismatch { vertical: 4, extruded: 1 })
        ));
    }

    #[test]
    fn construction_rejects_bad_cell_size() {
        let err = ShadowRaster::new(Vec::new(), Vec::new(), 1000.0, 1000.0, 0.0, true);
        assert!(matches!(err, Err(RasterError::InvalidCellSize { .. })));
    }

    #[test]
    fn empty_sun_set_is_a_noop() {
        let (vertical, extruded) = square_curtain();
        let mut raster =
            ShadowRaster::new(vertical, extruded, 1000.0, 1000.0, 100.0, true).unwrap();
        raster.run_with_sun_vectors(&[]);
        assert_eq!(raster.total_hours(), 0);
    }

    #[test]
    fn grazing_sun_adds_no_sample() {
        let (vertical, extruded) = square_curtain();
        let mut raster =
            ShadowRaster::new(vertical, extruded, 1000.0, 1000.0, 100.0, true).unwrap();
        raster.run_with_sun_vectors(&[Vec3::new(0.0, 1.0, 1e-12)]);
        assert_eq!(raster.total_hours(), 0);
    }

    #[test]
    fn square_curtain_shadows_the_far_side() {
        let (vertical, extruded) = square_curtain();
        let mut raster =
            ShadowRaster::new(vertical, extruded, 1000.0, 1000.0, 100.0, true).unwrap();
        let sun = Vec3::new(0.0, 1.0, 1.0) / 2.0f64.sqrt();
        raster.run_with_sun_vectors(&[sun]);
        let grid = raster.grid();

        // The strip is a ribbon: the floor-level quad shades y in [300, 400],
        // the top quad lands at y in [100, 200], both over x in [200, 800].
        for col in 2..8 {
            assert_eq!(grid.hours(col, 3), 0, "floor band, col {col}");
            assert_eq!(grid.hours(col, 1), 0, "top band, col {col}");
        }
        // Between and outside the bands every cell keeps its single hour.
        for col in 0..10 {
            assert_eq!(grid.hours(col, 5), 1);
            assert_eq!(grid.hours(col, 9), 1);
        }
        assert_eq!(grid.hours(0, 3), 1);
        assert_eq!(grid.hours(9, 1), 1);
        assert_eq!(grid.total_hours(), 100 - 12);
    }

    #[test]
    fn counts_accumulate_and_stay_bounded() {
        let (vertical, extruded) = square_curtain();
        let mut raster =
            ShadowRaster::new(vertical, extruded, 1000.0, 1000.0, 100.0, true).unwrap();
        let sun = Vec3::new(0.2, 0.4, 0.9).normalize();
        let suns = [sun, sun, sun];
        raster.run_with_sun_vectors(&suns);
        let grid = raster.grid();
        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                assert!(grid.hours(col, row) <= suns.len() as u32);
            }
        }
        let first = raster.total_hours();
        raster.run_with_sun_vectors(&suns);
        assert_eq!(raster.total_hours(), 2 * first);
    }

    #[test]
    fn grid_reports_centers_and_average() {
        let grid = LightGrid::new(1000.0, 500.0, 100.0);
        assert_eq!(grid.cols(), 10);
        assert_eq!(grid.rows(), 5);
        let c = grid.center(2, 4);
        assert_eq!((c.x, c.y, c.z), (250.0, 450.0, 0.0));

        let (vertical, extruded) = square_curtain();
        let mut raster =
            ShadowRaster::new(vertical, extruded, 1000.0, 1000.0, 100.0, true).unwrap();
        raster.run_with_sun_vectors(&[Vec3::new(0.0, 1.0, 1.0) / 2.0f64.sqrt()]);
        let expected = raster.total_hours() as f64 / 100.0;
        assert!((raster.average_hours() - expected).abs() < 1e-12);
    }
}
