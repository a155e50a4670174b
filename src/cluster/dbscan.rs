//! Fixed-radius density clustering (DBSCAN, Ester et al. 1996).
//!
//! Operates over an implicit distance matrix: the caller supplies the point
//! count and a pairwise distance function over indices, and distances are
//! evaluated on demand rather than materialized. Expansion is iterative to
//! keep deep clusters off the call stack, and a point first marked noise can
//! still be promoted to a border point later.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::{validate_density_params, NOISE};
use crate::error::Result;

const UNCLASSIFIED: i32 = -2;

/// Run DBSCAN over `n_points` indices.
///
/// `distance` must be symmetric with `distance(p, p) == 0`; it is evaluated
/// on demand for every candidate pair. Labels are 0-based cluster ids in
/// discovery order, with [`NOISE`] for unclustered points.
pub fn dbscan<D>(n_points: usize, eps: f64, min_samples: usize, distance: D) -> Result<Vec<i32>>
where
    D: Fn(usize, usize) -> Result<f64> + Sync,
{
    validate_density_params(eps, min_samples)?;

    let mut labels = vec![UNCLASSIFIED; n_points];
    let mut visited = vec![false; n_points];
    let mut cluster_id: i32 = 0;

    for point in 0..n_points {
        if visited[point] {
            continue;
        }
        visited[point] = true;

        let neighbors = region_query(n_points, eps, &distance, point)?;

        // min_samples counts the point itself
        if neighbors.len() + 1 < min_samples {
            labels[point] = NOISE;
            continue;
        }

        expand_cluster(
            n_points,
            eps,
            min_samples,
            &distance,
            point,
            &neighbors,
            &mut labels,
            &mut visited,
            cluster_id,
        )?;
        cluster_id += 1;
    }

    Ok(labels)
}

/// All indices other than `point` within `eps` of it.
#[cfg(feature = "parallel")]
fn region_query<D>(n_points: usize, eps: f64, distance: &D, point: usize) -> Result<Vec<usize>>
where
    D: Fn(usize, usize) -> Result<f64> + Sync,
{
    let hits: Vec<Option<usize>> = (0..n_points)
        .into_par_iter()
        .map(|other| {
            if other == point {
                return Ok(None);
            }
            Ok((distance(point, other)? <= eps).then_some(other))
        })
        .collect::<Result<_>>()?;
    Ok(hits.into_iter().flatten().collect())
}

#[cfg(not(feature = "parallel"))]
fn region_query<D>(n_points: usize, eps: f64, distance: &D, point: usize) -> Result<Vec<usize>>
where
    D: Fn(usize, usize) -> Result<f64> + Sync,
{
    let mut hits = Vec::new();
    for other in 0..n_points {
        if other != point && distance(point, other)? <= eps {
            hits.push(other);
        }
    }
    Ok(hits)
}

/// Grow a cluster outward from a core point.
#[allow(clippy::too_many_arguments)]
fn expand_cluster<D>(
    n_points: usize,
    eps: f64,
    min_samples: usize,
    distance: &D,
    point: usize,
    neighbors: &[usize],
    labels: &mut [i32],
    visited: &mut [bool],
    cluster_id: i32,
) -> Result<()>
where
    D: Fn(usize, usize) -> Result<f64> + Sync,
{
    labels[point] = cluster_id;

    let mut to_process: Vec<usize> = neighbors.to_vec();

    while let Some(neighbor) = to_process.pop() {
        // assign before the visited check so earlier noise points can still
        // become border points of this cluster
        if labels[neighbor] == UNCLASSIFIED || labels[neighbor] == NOISE {
            labels[neighbor] = cluster_id;
        }

        if visited[neighbor] {
            continue;
        }
        visited[neighbor] = true;

        let neighbor_neighbors = region_query(n_points, eps, distance, neighbor)?;
        if neighbor_neighbors.len() + 1 >= min_samples {
            for candidate in neighbor_neighbors {
                if !visited[candidate] {
                    to_process.push(candidate);
                }
            }
        }
    }

    Ok(())
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
        let labels = dbscan(values.len(), 0.3, 2, line_metric(&values)).unwrap();

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
        let labels = dbscan(values.len(), 0.3, 2, line_metric(&values)).unwrap();

        assert_eq!(labels[3], NOISE);
        assert!(labels[..3].iter().all(|&label| label >= 0));
    }

    #[test]
    fn test_chain_connects() {
        let values: Vec<f64> = (0..10).map(|i| f64::from(i) * 0.2).collect();
        let labels = dbscan(values.len(), 0.25, 2, line_metric(&values)).unwrap();

        assert!(labels.iter().all(|&label| label == labels[0]));
    }

    #[test]
    fn test_invalid_params() {
        let values = [0.0, 1.0];
        assert!(dbscan(2, 0.0, 2, line_metric(&values)).is_err());
        assert!(dbscan(2, -1.0, 2, line_metric(&values)).is_err());
        assert!(dbscan(2, 0.5, 0, line_metric(&values)).is_err());
    }

    #[test]
    fn test_empty_input() {
        let values: [f64; 0] = [];
        let labels = dbscan(0, 0.5, 2, line_metric(&values)).unwrap();
        assert!(labels.is_empty());
    }
}
