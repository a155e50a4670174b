//! Hexagonal discretization on the equirectangular plane.
//!
//! Pointy-top hexagons in axial coordinates over `x = lon mod 360`,
//! `y = lat`. The hex size halves per resolution level, starting from ten
//! degrees at resolution 0, so the characteristic cell length runs from
//! roughly 1100 km down to some tens of meters at the finest level.
//!
//! The tiling does not wrap at the longitude seam: a trajectory crossing
//! lon 0/360 sees distinct cells on either side. Centroids of cells whose
//! center falls inside the frame round-trip exactly.

use serde::{Deserialize, Serialize};

use super::{finest_resolution_above, typical_step_meters, MAX_RESOLUTION};
use crate::error::{DriftClustError, Result};
use crate::geo_utils::METERS_PER_DEGREE;
use crate::sequence::SeriesEntry;
use crate::{Cell, TrajectoryTable};

/// Hex size in degrees at resolution 0 (circumradius of the hexagon).
pub const BASE_SIZE_DEGREES: f64 = 10.0;

const SQRT3: f64 = 1.732_050_807_568_877_2;

/// A single hexagonal cell in axial coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HexCell {
    pub q: i32,
    pub r: i32,
}

/// Hexagonal discretization backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HexScheme;

impl HexScheme {
    pub fn new() -> Self {
        Self
    }

    /// Hex size in degrees at the given resolution. Resolutions beyond
    /// `MAX_RESOLUTION` are treated as `MAX_RESOLUTION`.
    pub fn size_degrees(&self, resolution: u8) -> f64 {
        BASE_SIZE_DEGREES / f64::from(1u32 << u32::from(resolution.min(MAX_RESOLUTION)))
    }

    /// Characteristic cell length in meters at the given resolution.
    pub fn cell_length_meters(&self, resolution: u8) -> f64 {
        METERS_PER_DEGREE * self.size_degrees(resolution)
    }

    /// Finest resolution whose cell length still exceeds the table's typical
    /// step length (quantile over all valid steps, 0.5 for the median).
    pub fn estimate_max_resolution(&self, table: &TrajectoryTable, quantile: f64) -> Result<u8> {
        let typical = typical_step_meters(table, quantile)?;
        Ok(finest_resolution_above(
            |resolution| self.cell_length_meters(resolution),
            typical,
        ))
    }

    /// Map a point to its hex cell at the given resolution.
    pub fn to_cell(&self, latitude: f64, longitude: f64, resolution: u8) -> HexCell {
        let size = self.size_degrees(resolution);
        let x = longitude.rem_euclid(360.0);
        let y = latitude;
        let q = (SQRT3 / 3.0 * x - y / 3.0) / size;
        let r = (2.0 / 3.0 * y) / size;
        axial_round(q, r)
    }

    /// Map every observation in the table to a per-point cell series.
    pub fn to_cells(&self, table: &TrajectoryTable, resolution: u8) -> Vec<SeriesEntry<Cell>> {
        table
            .rows()
            .iter()
            .map(|obs| SeriesEntry {
                trajectory: obs.trajectory,
                observation: obs.observation,
                value: Cell::Hex(self.to_cell(obs.latitude, obs.longitude, resolution)),
            })
            .collect()
    }

    /// Geometric center `(latitude, longitude)` of a cell.
    pub fn cell_to_centroid(&self, cell: HexCell, resolution: u8) -> (f64, f64) {
        let size = self.size_degrees(resolution);
        let x = size * (SQRT3 * f64::from(cell.q) + SQRT3 / 2.0 * f64::from(cell.r));
        let y = size * 1.5 * f64::from(cell.r);
        (y, x)
    }

    /// Ancestor cell at a coarser resolution, found by re-binning the cell
    /// center. Coarsening to the same resolution is the identity.
    pub fn coarsen(&self, cell: HexCell, resolution: u8, target_resolution: u8) -> Result<HexCell> {
        if target_resolution > resolution {
            return Err(DriftClustError::InvalidParameter {
                name: "target_resolution",
                message: "must be at most the source resolution",
            });
        }
        let (latitude, longitude) = self.cell_to_centroid(cell, resolution);
        Ok(self.to_cell(latitude, longitude, target_resolution))
    }
}

/// Round fractional axial coordinates to the containing hex.
fn axial_round(q: f64, r: f64) -> HexCell {
    let s = -q - r;
    let mut rounded_q = q.round();
    let mut rounded_r = r.round();
    let rounded_s = s.round();

    let dq = (rounded_q - q).abs();
    let dr = (rounded_r - r).abs();
    let ds = (rounded_s - s).abs();

    // the axis with the largest rounding error is recomputed from the others
    if dq > dr && dq > ds {
        rounded_q = -rounded_r - rounded_s;
    } else if dr > ds {
        rounded_r = -rounded_q - rounded_s;
    }

    HexCell {
        q: rounded_q as i32,
        r: rounded_r as i32,
    }
}

/// Hex-grid distance between two cells.
pub fn hex_distance(a: HexCell, b: HexCell) -> u32 {
    let dq = a.q - b.q;
    let dr = a.r - b.r;
    ((dq.abs() + dr.abs() + (dq + dr).abs()) / 2) as u32
}

/// Contiguous line of hex cells from `a` to `b`, endpoints included.
///
/// Linear interpolation in axial space with one sample per unit of hex
/// distance, each sample rounded to its containing cell. Coincident
/// endpoints produce a single cell.
pub fn hex_line(a: HexCell, b: HexCell) -> Vec<HexCell> {
    let steps = hex_distance(a, b);
    if steps == 0 {
        return vec![a];
    }
    (0..=steps)
        .map(|i| {
            let t = f64::from(i) / f64::from(steps);
            let q = f64::from(a.q) + t * f64::from(b.q - a.q);
            let r = f64::from(a.r) + t * f64::from(b.r - a.r);
            axial_round(q, r)
        })
        .collect()
}
