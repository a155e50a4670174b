//! Density-based clustering over trajectory sequence collections.
//!
//! The driver wires a [`SequenceCollection`] to the index-based clustering
//! primitives through the [`IndexedMetric`] adapter, then maps the labels
//! back onto trajectory identities. Two algorithm variants are available:
//! fixed-radius (DBSCAN) and ordering-based (OPTICS).

pub mod dbscan;
pub mod metric;
pub mod optics;

pub use dbscan::dbscan;
pub use metric::IndexedMetric;
pub use optics::optics;

use std::collections::BTreeMap;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{DriftClustError, Result};
use crate::metrics::SequenceMetric;
use crate::sequence::SequenceCollection;
use crate::{Cell, TrajectoryId};

/// Label assigned to noise/unclustered trajectories.
pub const NOISE: i32 = -1;

/// Density-clustering algorithm variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClusterAlgorithm {
    /// DBSCAN with a fixed neighborhood radius.
    #[default]
    FixedRadius,
    /// OPTICS ordering with labels extracted at the configured radius.
    Ordering,
}

/// Configuration for a clustering run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Neighborhood radius. With `normalize` set, 1.0 means a complete
    /// sequence replacement, so useful values sit well below 1.
    pub eps: f64,
    /// Minimum neighborhood size (the point itself included) for a dense
    /// region.
    pub min_samples: usize,
    /// Base metric evaluated between sequences.
    pub metric: SequenceMetric,
    /// Divide raw metric values by the longer sequence length.
    pub normalize: bool,
    /// Algorithm variant.
    pub algorithm: ClusterAlgorithm,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            eps: 0.8,
            min_samples: 5,
            metric: SequenceMetric::EditDistance,
            normalize: true,
            algorithm: ClusterAlgorithm::FixedRadius,
        }
    }
}

/// Cluster labels keyed by trajectory id. Immutable once produced; iteration
/// order matches the collection the run was made over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterAssignment {
    labels: BTreeMap<TrajectoryId, i32>,
}

impl ClusterAssignment {
    /// Label for a trajectory, if it took part in the run.
    pub fn label(&self, trajectory: TrajectoryId) -> Option<i32> {
        self.labels.get(&trajectory).copied()
    }

    /// Whether a trajectory ended up unclustered.
    pub fn is_noise(&self, trajectory: TrajectoryId) -> bool {
        self.label(trajectory) == Some(NOISE)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TrajectoryId, i32)> + '_ {
        self.labels.iter().map(|(&trajectory, &label)| (trajectory, label))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of distinct clusters (noise excluded).
    pub fn cluster_count(&self) -> usize {
        let mut seen: Vec<i32> = self.labels.values().copied().filter(|&l| l >= 0).collect();
        seen.sort_unstable();
        seen.dedup();
        seen.len()
    }

    /// Number of trajectories labeled as noise.
    pub fn noise_count(&self) -> usize {
        self.labels.values().filter(|&&l| l == NOISE).count()
    }
}

/// Cluster a sequence collection by pairwise sequence similarity.
///
/// Builds the indexed metric adapter over the collection, runs the selected
/// density-clustering variant over positions `0..len`, and relabels results
/// onto trajectory ids. Fails with `InsufficientData` when the collection
/// holds fewer than two sequences.
pub fn cluster_sequences(
    collection: &SequenceCollection,
    config: &ClusterConfig,
) -> Result<ClusterAssignment> {
    let ids: Vec<TrajectoryId> = collection.iter().map(|(trajectory, _)| trajectory).collect();
    let table: Vec<Vec<Cell>> = collection
        .iter()
        .map(|(_, sequence)| sequence.to_vec())
        .collect();

    if table.len() < 2 {
        return Err(DriftClustError::InsufficientData {
            context: "clustering needs at least two sequences".to_string(),
            value_count: table.len(),
            minimum_required: 2,
        });
    }

    info!(
        "clustering {} sequences ({:?}/{:?}, eps={}, min_samples={}, normalize={})",
        table.len(),
        config.algorithm,
        config.metric,
        config.eps,
        config.min_samples,
        config.normalize
    );

    let indexed = IndexedMetric::new(&table, config.metric, config.normalize);
    let pairwise = |i: usize, j: usize| indexed.distance(i, j);

    let labels = match config.algorithm {
        ClusterAlgorithm::FixedRadius => {
            dbscan(table.len(), config.eps, config.min_samples, pairwise)?
        }
        ClusterAlgorithm::Ordering => {
            optics(table.len(), config.eps, config.min_samples, pairwise)?
        }
    };

    let assignment = ClusterAssignment {
        labels: ids.into_iter().zip(labels).collect(),
    };
    debug!(
        "found {} clusters, {} noise trajectories",
        assignment.cluster_count(),
        assignment.noise_count()
    );
    Ok(assignment)
}

/// Shared parameter validation for the density-clustering variants.
pub(crate) fn validate_density_params(eps: f64, min_samples: usize) -> Result<()> {
    if eps <= 0.0 || eps.is_nan() {
        return Err(DriftClustError::InvalidParameter {
            name: "eps",
            message: "must be positive",
        });
    }
    if min_samples == 0 {
        return Err(DriftClustError::InvalidParameter {
            name: "min_samples",
            message: "must be at least 1",
        });
    }
    Ok(())
}
