//! Regular longitude/latitude grid discretization.
//!
//! Bin ranges are configured at resolution 0; every finer resolution doubles
//! both bin counts, so coarsening is an exact ancestor mapping on bin
//! indices. Longitude is reduced modulo 360 into the configured range before
//! binning, and values landing exactly on the rightmost edge clamp into the
//! last bin instead of being dropped.

use serde::{Deserialize, Serialize};

use super::{finest_resolution_above, typical_step_meters, MAX_RESOLUTION};
use crate::error::{DriftClustError, Result};
use crate::geo_utils::METERS_PER_DEGREE;
use crate::sequence::SeriesEntry;
use crate::{Cell, TrajectoryTable};

/// A single grid cell: longitude bin and latitude bin at some resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    pub lon_bin: u32,
    pub lat_bin: u32,
}

/// Grid layout at resolution 0.
///
/// `lon_bins` and `lat_bins` count bins, not edges; the defaults give one
/// degree per bin in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub lon_start: f64,
    pub lon_end: f64,
    pub lon_bins: u32,
    pub lat_start: f64,
    pub lat_end: f64,
    pub lat_bins: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            lon_start: 0.0,
            lon_end: 360.0,
            lon_bins: 360,
            lat_start: -90.0,
            lat_end: 90.0,
            lat_bins: 180,
        }
    }
}

/// Grid discretization backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GridScheme {
    pub config: GridConfig,
}

impl GridScheme {
    /// Create a grid scheme with explicit bin ranges.
    pub fn new(config: GridConfig) -> Self {
        Self { config }
    }

    /// Bin counts at the given resolution. Resolutions beyond
    /// `MAX_RESOLUTION` are treated as `MAX_RESOLUTION`.
    fn bins_at(&self, resolution: u8) -> (u32, u32) {
        let shift = u32::from(resolution.min(MAX_RESOLUTION));
        (self.config.lon_bins << shift, self.config.lat_bins << shift)
    }

    /// Characteristic cell length in meters at the given resolution, taken
    /// from the latitude bin height.
    pub fn cell_length_meters(&self, resolution: u8) -> f64 {
        let (_, lat_bins) = self.bins_at(resolution);
        METERS_PER_DEGREE * (self.config.lat_end - self.config.lat_start) / f64::from(lat_bins)
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

    /// Map a point to its grid cell at the given resolution.
    pub fn to_cell(&self, latitude: f64, longitude: f64, resolution: u8) -> GridCell {
        let (lon_bins, lat_bins) = self.bins_at(resolution);
        let lon_width = (self.config.lon_end - self.config.lon_start) / f64::from(lon_bins);
        let lat_width = (self.config.lat_end - self.config.lat_start) / f64::from(lat_bins);
        GridCell {
            lon_bin: bin_index(longitude.rem_euclid(360.0), self.config.lon_start, lon_width, lon_bins),
            lat_bin: bin_index(latitude, self.config.lat_start, lat_width, lat_bins),
        }
    }

    /// Map every observation in the table to a per-point cell series.
    pub fn to_cells(&self, table: &TrajectoryTable, resolution: u8) -> Vec<SeriesEntry<Cell>> {
        table
            .rows()
            .iter()
            .map(|obs| SeriesEntry {
                trajectory: obs.trajectory,
                observation: obs.observation,
                value: Cell::Grid(self.to_cell(obs.latitude, obs.longitude, resolution)),
            })
            .collect()
    }

    /// Geometric center `(latitude, longitude)` of a cell.
    ///
    /// Original coordinates are not recoverable, but re-discretizing the
    /// centroid yields the same cell again.
    pub fn cell_to_centroid(&self, cell: GridCell, resolution: u8) -> (f64, f64) {
        let (lon_bins, lat_bins) = self.bins_at(resolution);
        let lon_width = (self.config.lon_end - self.config.lon_start) / f64::from(lon_bins);
        let lat_width = (self.config.lat_end - self.config.lat_start) / f64::from(lat_bins);
        (
            self.config.lat_start + (f64::from(cell.lat_bin) + 0.5) * lat_width,
            self.config.lon_start + (f64::from(cell.lon_bin) + 0.5) * lon_width,
        )
    }

    /// Ancestor cell at a coarser resolution.
    ///
    /// Bin widths double exactly per level, so the ancestor is a right shift
    /// of both bin indices. Coarsening to the same resolution is the
    /// identity, which makes repeated coarsening to resolution 0 idempotent.
    pub fn coarsen(&self, cell: GridCell, resolution: u8, target_resolution: u8) -> Result<GridCell> {
        if target_resolution > resolution {
            return Err(DriftClustError::InvalidParameter {
                name: "target_resolution",
                message: "must be at most the source resolution",
            });
        }
        let shift = u32::from(resolution - target_resolution);
        Ok(GridCell {
            lon_bin: cell.lon_bin >> shift,
            lat_bin: cell.lat_bin >> shift,
        })
    }
}

/// Floor-divide a value into its bin, clamping into `[0, bins)`.
///
/// A value exactly on the rightmost edge belongs to the last bin.
fn bin_index(value: f64, start: f64, width: f64, bins: u32) -> u32 {
    let index = ((value - start) / width).floor();
    if index < 0.0 {
        0
    } else if index >= f64::from(bins) {
        bins - 1
    } else {
        index as u32
    }
}

/// Discrete straight line between two grid cells, endpoints included.
///
/// Takes `max(|Δx|+1, |Δy|+1)` evenly spaced rounded points, so consecutive
/// points never jump more than one bin along the dominant axis. Coincident
/// endpoints produce a single point.
pub fn grid_line(a: GridCell, b: GridCell) -> Vec<GridCell> {
    let dx = i64::from(b.lon_bin) - i64::from(a.lon_bin);
    let dy = i64::from(b.lat_bin) - i64::from(a.lat_bin);
    let steps = (dx.abs() + 1).max(dy.abs() + 1);
    if steps == 1 {
        return vec![a];
    }
    (0..steps)
        .map(|i| {
            let t = i as f64 / (steps - 1) as f64;
            GridCell {
                lon_bin: (f64::from(a.lon_bin) + t * dx as f64).round() as u32,
                lat_bin: (f64::from(a.lat_bin) + t * dy as f64).round() as u32,
            }
        })
        .collect()
}
