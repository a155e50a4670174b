//! # driftclust
//!
//! Drift-trajectory discretization and sequence-similarity clustering.
//!
//! This library provides:
//! - Grid and hexagonal discretization of lat/lon trajectories
//! - Resolution estimation from a dataset's typical step length
//! - Sequence normalization (run collapsing, gap filling, series grouping)
//! - Exact LCS and Levenshtein metrics over discrete sequences
//! - An indexed metric adapter for index-based clustering routines
//! - Density-based clustering (fixed-radius and ordering variants)
//!
//! ## Features
//!
//! - **`parallel`** - Enable parallel neighborhood scans with rayon
//!
//! ## Quick Start
//!
//! ```rust
//! use driftclust::{
//!     cluster_sequences, ClusterConfig, GridScheme, Observation, SequenceCollection,
//!     TrajectoryTable,
//! };
//!
//! // Two trajectory families drifting through different regions
//! let mut rows = Vec::new();
//! for trajectory in 0..4u64 {
//!     let base = if trajectory < 2 { 10.0 } else { 60.0 };
//!     for observation in 0..5u32 {
//!         rows.push(Observation::new(
//!             trajectory,
//!             observation,
//!             base + observation as f64,
//!             base + observation as f64,
//!         ));
//!     }
//! }
//! let table = TrajectoryTable::from_rows(rows);
//!
//! let scheme = GridScheme::default();
//! let sequences = SequenceCollection::from_series(&scheme.to_cells(&table, 0))?
//!     .collapse_repeats()?
//!     .fill_gaps()?;
//!
//! let config = ClusterConfig {
//!     eps: 0.5,
//!     min_samples: 2,
//!     ..ClusterConfig::default()
//! };
//! let assignment = cluster_sequences(&sequences, &config)?;
//! assert_eq!(assignment.label(0), assignment.label(1));
//! assert_ne!(assignment.label(0), assignment.label(2));
//! # Ok::<(), driftclust::DriftClustError>(())
//! ```

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{DriftClustError, OptionExt, Result};

// Geographic utilities (step lengths, quantiles)
pub mod geo_utils;

// Spatial discretization backends
pub mod discretize;
pub use discretize::{
    typical_step_meters, GridCell, GridConfig, GridScheme, HexCell, HexScheme, MAX_RESOLUTION,
};

// Sequence normalization and collections
pub mod sequence;
pub use sequence::{
    collapse_repeats, fill_gaps, group_by_trajectory, ungroup, SequenceCollection, SeriesEntry,
};

// Sequence-similarity metrics
pub mod metrics;
pub use metrics::{edit_distance, lcs_length, SequenceMetric};

// Density-based clustering
pub mod cluster;
pub use cluster::{
    cluster_sequences, ClusterAlgorithm, ClusterAssignment, ClusterConfig, IndexedMetric, NOISE,
};

// ============================================================================
// Core Types
// ============================================================================

/// Identifier of one drift trajectory.
pub type TrajectoryId = u64;

/// A single observation of a trajectory: position, order, optional time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub trajectory: TrajectoryId,
    pub observation: u32,
    pub latitude: f64,
    pub longitude: f64,
    /// Unix timestamp in seconds (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
}

impl Observation {
    /// Create an observation without a timestamp.
    pub fn new(trajectory: TrajectoryId, observation: u32, latitude: f64, longitude: f64) -> Self {
        Self {
            trajectory,
            observation,
            latitude,
            longitude,
            time: None,
        }
    }

    /// Create an observation with a timestamp.
    pub fn with_time(
        trajectory: TrajectoryId,
        observation: u32,
        latitude: f64,
        longitude: f64,
        time: i64,
    ) -> Self {
        Self {
            trajectory,
            observation,
            latitude,
            longitude,
            time: Some(time),
        }
    }

    /// Check that the coordinates are finite and latitude is on the sphere.
    /// Longitude is unconstrained; binning reduces it modulo 360.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
    }
}

/// A table of trajectory observations, kept sorted by
/// `(trajectory, observation)`.
///
/// The sort order is the invariant every downstream pass relies on: steps
/// are taken between consecutive rows of one trajectory, and discretized
/// series inherit the row order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryTable {
    rows: Vec<Observation>,
}

impl TrajectoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from unordered rows.
    pub fn from_rows(mut rows: Vec<Observation>) -> Self {
        rows.sort_by_key(|row| (row.trajectory, row.observation));
        Self { rows }
    }

    /// Insert a row at its sorted position.
    pub fn push(&mut self, row: Observation) {
        let position = self.rows.partition_point(|existing| {
            (existing.trajectory, existing.observation) <= (row.trajectory, row.observation)
        });
        self.rows.insert(position, row);
    }

    pub fn rows(&self) -> &[Observation] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate trajectories as `(id, observations)` slices, in id order.
    pub fn trajectories(&self) -> Trajectories<'_> {
        Trajectories { rows: &self.rows }
    }

    /// Number of distinct trajectories.
    pub fn trajectory_count(&self) -> usize {
        self.trajectories().count()
    }
}

/// Iterator over the per-trajectory row slices of a [`TrajectoryTable`].
#[derive(Debug, Clone)]
pub struct Trajectories<'a> {
    rows: &'a [Observation],
}

impl<'a> Iterator for Trajectories<'a> {
    type Item = (TrajectoryId, &'a [Observation]);

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.rows.first()?;
        let id = first.trajectory;
        let end = self
            .rows
            .iter()
            .position(|row| row.trajectory != id)
            .unwrap_or(self.rows.len());
        let (head, tail) = self.rows.split_at(end);
        self.rows = tail;
        Some((id, head))
    }
}

/// A discrete spatial cell from either discretization backend.
///
/// A sequence collection holds cells of one backend only; the variant is
/// fixed at discretization time and checked at collection boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Cell {
    Grid(GridCell),
    Hex(HexCell),
}
