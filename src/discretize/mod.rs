//! Trajectory discretization: spatial binning and resolution estimation.
//!
//! Two cell backends are available:
//! - `grid` - regular longitude/latitude bins with configurable ranges
//! - `hex` - pointy-top hexagonal tiling of the equirectangular plane
//!
//! Both expose the same operations: point-to-cell mapping, cell centroids,
//! coarsening to an ancestor resolution, and estimation of the finest
//! resolution a dataset's typical step length can support. Resolution 0 is
//! the coarsest level; each level up halves the characteristic cell length.

pub mod grid;
pub mod hex;

pub use grid::{GridCell, GridConfig, GridScheme};
pub use hex::{HexCell, HexScheme};

use crate::error::{DriftClustError, OptionExt, Result};
use crate::geo_utils;
use crate::TrajectoryTable;

/// Finest supported resolution level.
pub const MAX_RESOLUTION: u8 = 15;

/// Typical step length of the table in meters, as a quantile over all valid
/// per-trajectory steps.
///
/// Fails with `InsufficientData` when no trajectory contributes a valid step
/// (for example when every trajectory has at most one observation).
pub fn typical_step_meters(table: &TrajectoryTable, quantile: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&quantile) {
        return Err(DriftClustError::InvalidParameter {
            name: "quantile",
            message: "must lie in [0, 1]",
        });
    }
    let steps = geo_utils::step_lengths_meters(table);
    geo_utils::quantile(&steps, quantile).ok_or_insufficient_data(
        "no valid step lengths in trajectory table",
        steps.len(),
        1,
    )
}

/// Finest resolution whose characteristic cell length still exceeds the
/// threshold. Falls back to 0 when even the coarsest level is too fine.
///
/// Cell lengths shrink monotonically with resolution, so this is the last
/// level that does not over-resolve a step of the given size.
pub(crate) fn finest_resolution_above(
    cell_length_meters: impl Fn(u8) -> f64,
    threshold_meters: f64,
) -> u8 {
    (0..=MAX_RESOLUTION)
        .rev()
        .find(|&resolution| cell_length_meters(resolution) > threshold_meters)
        .unwrap_or(0)
}
