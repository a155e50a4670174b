//! Geographic utilities: step-length estimation and quantiles.
//!
//! Step lengths use the equirectangular approximation rather than a full
//! great-circle formula. The result feeds a resolution estimate, where a few
//! percent of error is irrelevant next to the factor-of-two spacing between
//! resolution levels.

use crate::{Observation, TrajectoryTable};

/// Meters per degree of latitude (approximately constant).
pub const METERS_PER_DEGREE: f64 = 111_000.0;

/// Equirectangular step length in meters between two observations.
///
/// `distance ≈ 111km * sqrt(Δlat² + (Δlon * cos(lat))²)`, with the cosine
/// evaluated at the destination point's latitude.
pub fn step_length_meters(from: &Observation, to: &Observation) -> f64 {
    let dlat = to.latitude - from.latitude;
    let dlon = to.longitude - from.longitude;
    let scaled_dlon = dlon * to.latitude.to_radians().cos();
    METERS_PER_DEGREE * (dlat * dlat + scaled_dlon * scaled_dlon).sqrt()
}

/// All valid step lengths along each trajectory in the table.
///
/// Steps are taken between consecutive observations within one trajectory;
/// zero-length and non-finite steps are discarded. Trajectories with fewer
/// than two observations have no defined step and contribute nothing.
pub fn step_lengths_meters(table: &TrajectoryTable) -> Vec<f64> {
    let mut steps = Vec::new();
    for (_, observations) in table.trajectories() {
        for pair in observations.windows(2) {
            let step = step_length_meters(&pair[0], &pair[1]);
            if step > 0.0 && step.is_finite() {
                steps.push(step);
            }
        }
    }
    steps
}

/// Linear-interpolated quantile of an unsorted sample.
///
/// Returns `None` for an empty sample or a quantile outside `[0, 1]`.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let position = (sorted.len() - 1) as f64 * q;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}
