//! Shared test fixtures: synthetic drift-trajectory generation with known
//! family structure, providing ground truth for clustering tests.
#![allow(dead_code)]

use driftclust::{Observation, TrajectoryId, TrajectoryTable};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// One family of near-identical drift trajectories.
pub struct DriftFamily {
    /// Start position of the family's shared path.
    pub start_lat: f64,
    pub start_lon: f64,
    /// Per-observation drift in degrees.
    pub lat_step: f64,
    pub lon_step: f64,
    /// How many trajectories follow this path.
    pub members: usize,
    /// Observations per trajectory.
    pub observations: usize,
}

/// Generate a trajectory table from drift families.
///
/// Each member gets a constant random offset of at most `jitter_degrees` in
/// both axes, so members of one family stay in the same cells as long as the
/// jitter is small against the cell size. Trajectory ids are assigned
/// 0, 1, 2, ... in family order.
pub fn drift_table(families: &[DriftFamily], jitter_degrees: f64, seed: u64) -> TrajectoryTable {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows = Vec::new();
    let mut next_id: TrajectoryId = 0;

    for family in families {
        for _ in 0..family.members {
            let offset_lat = rng.gen_range(-jitter_degrees..=jitter_degrees);
            let offset_lon = rng.gen_range(-jitter_degrees..=jitter_degrees);
            for observation in 0..family.observations {
                rows.push(Observation::new(
                    next_id,
                    observation as u32,
                    family.start_lat + family.lat_step * observation as f64 + offset_lat,
                    family.start_lon + family.lon_step * observation as f64 + offset_lon,
                ));
            }
            next_id += 1;
        }
    }

    TrajectoryTable::from_rows(rows)
}

/// A single family centered on bin centers of the default one-degree grid.
pub fn centered_family(start: f64, members: usize, observations: usize) -> DriftFamily {
    DriftFamily {
        start_lat: start + 0.5,
        start_lon: start + 0.5,
        lat_step: 1.0,
        lon_step: 1.0,
        members,
        observations,
    }
}
