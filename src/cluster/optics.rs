//! Ordering-based density clustering (OPTICS, Ankerst et al. 1999).
//!
//! Computes the density-reachability ordering with an unbounded neighborhood
//! search, then extracts DBSCAN-equivalent labels at the supplied radius by
//! walking the ordering. The ordering itself needs no radius; the radius
//! only enters at label extraction.

use std::cmp::Ordering;

use super::{validate_density_params, NOISE};
use crate::error::Result;

/// Run OPTICS over `n_points` indices and extract labels at radius `eps`.
///
/// `distance` must be symmetric with `distance(p, p) == 0`. Labels are
/// 0-based cluster ids in ordering-discovery order, with [`NOISE`] for
/// unclustered points.
pub fn optics<D>(n_points: usize, eps: f64, min_samples: usize, distance: D) -> Result<Vec<i32>>
where
    D: Fn(usize, usize) -> Result<f64> + Sync,
{
    validate_density_params(eps, min_samples)?;

    let mut core = Vec::with_capacity(n_points);
    for point in 0..n_points {
        core.push(core_distance(n_points, min_samples, &distance, point)?);
    }

    let mut reachability = vec![f64::INFINITY; n_points];
    let mut processed = vec![false; n_points];
    let mut order = Vec::with_capacity(n_points);

    for start in 0..n_points {
        if processed[start] {
            continue;
        }
        processed[start] = true;
        order.push(start);
        if core[start].is_finite() {
            update_reachability(n_points, &distance, start, core[start], &processed, &mut reachability)?;
        }

        // drain everything density-reachable from the current region,
        // always taking the unprocessed point with smallest reachability
        while let Some(next) = nearest_unprocessed(&reachability, &processed) {
            processed[next] = true;
            order.push(next);
            if core[next].is_finite() {
                update_reachability(n_points, &distance, next, core[next], &processed, &mut reachability)?;
            }
        }
    }

    Ok(extract_at(eps, &order, &reachability, &core))
}

/// Distance to the `min_samples`-th nearest point, the point itself
/// included. Infinite when the table is smaller than `min_samples`.
fn core_distance<D>(
    n_points: usize,
    min_samples: usize,
    distance: &D,
    point: usize,
) -> Result<f64>
where
    D: Fn(usize, usize) -> Result<f64> + Sync,
{
    if n_points < min_samples {
        return Ok(f64::INFINITY);
    }
    let mut distances = Vec::with_capacity(n_points);
    for other in 0..n_points {
        distances.push(distance(point, other)?);
    }
    distances.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    Ok(distances[min_samples - 1])
}

/// Lower the reachability of every unprocessed point against a freshly
/// processed core point.
fn update_reachability<D>(
    n_points: usize,
    distance: &D,
    point: usize,
    core_dist: f64,
    processed: &[bool],
    reachability: &mut [f64],
) -> Result<()>
where
    D: Fn(usize, usize) -> Result<f64> + Sync,
{
    for other in 0..n_points {
        if processed[other] {
            continue;
        }
        let reach = core_dist.max(distance(point, other)?);
        if reach < reachability[other] {
            reachability[other] = reach;
        }
    }
    Ok(())
}

/// Unprocessed point with the smallest finite reachability, if any.
fn nearest_unprocessed(reachability: &[f64], processed: &[bool]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (point, &reach) in reachability.iter().enumerate() {
        if processed[point] || !reach.is_finite() {
            continue;
        }
        if best.map_or(true, |current| reach < reachability[current]) {
            best = Some(point);
        }
    }
    best
}

/// DBSCAN-equivalent label extraction over the cluster ordering.
fn extract_at(eps: f64, order: &[usize], reachability: &[f64], core: &[f64]) -> Vec<i32> {
    let mut labels = vec![NOISE; order.len()];
    let mut cluster_id: i32 = -1;
    for &point in order {
        if reachability[point] > eps {
            if core[point] <= eps {
                cluster_id += 1;
                labels[point] = cluster_id;
            }
            // otherwise not density-reachable at eps: stays noise
        } else if cluster_id >= 0 {
            labels[point] = cluster_id;
        }
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_metric(values: &[f64]) -> impl Fn(usize, usize) -> Result<f64> + Sync + '_ {
        |i, j| Ok((values[i] - values[j]).abs())
    }

    #[test]
    fn test_two_separated_clusters() {
        let values = [0.0, 0.1, 0.2, 10.0, 10.1, 10.2];
        let labels = optics(values.len(), 0.3, 2, line_metric(&values)).unwrap();

        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[1], labels[2]);
        assert_eq!(labels[3], labels[4]);
        assert_eq!(labels[4], labels[5]);
        assert_ne!(labels[0], labels[3]);
        assert!(labels.iter().all(|&label| label >= 0));
    }

    #[test]
    fn test_outlier_is_noise() {
        let values = [0.0, 0.1, 0.2, 50.0];
        let labels = optics(values.len(), 0.3, 2, line_metric(&values)).unwrap();

        assert_eq!(labels[3], NOISE);
        assert!(labels[..3].iter().all(|&label| label >= 0));
    }

    #[test]
    fn test_matches_fixed_radius_on_separated_data() {
        let values = [0.0, 0.15, 0.3, 7.0, 7.1, 7.2, 20.0];
        let from_ordering = optics(values.len(), 0.4, 2, line_metric(&values)).unwrap();
        let fixed = super::super::dbscan(values.len(), 0.4, 2, line_metric(&values)).unwrap();

        // same partition, labels compared up to renaming via noise flags and
        // pairwise co-membership
        for i in 0..values.len() {
            for j in 0..values.len() {
                assert_eq!(
                    from_ordering[i] == from_ordering[j] && from_ordering[i] >= 0,
                    fixed[i] == fixed[j] && fixed[i] >= 0,
                    "points {i} and {j} disagree on co-membership"
                );
            }
        }
    }

    #[test]
    fn test_invalid_params() {
        let values = [0.0, 1.0];
        assert!(optics(2, 0.0, 2, line_metric(&values)).is_err());
        assert!(optics(2, 0.5, 0, line_metric(&values)).is_err());
    }
}
