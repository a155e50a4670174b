//! Indexed metric adapter.
//!
//! Density-clustering routines work over a flat index space and pass opaque
//! integer positions; the adapter dereferences those positions into a
//! sequence lookup table and evaluates the base metric on the sequences they
//! denote. This is the bridge that lets sequence edit distance serve as a
//! clustering metric without materializing any pairwise cache.

use crate::error::{DriftClustError, Result};
use crate::metrics::SequenceMetric;

/// Pairwise metric over positions in a sequence lookup table.
///
/// Holds an immutable borrow of the table plus the base metric and
/// normalization flag, and nothing else: evaluation is a pure function of
/// `(i, j, table)`, so concurrent calls are safe (`Sync` falls out of the
/// shared borrow).
#[derive(Debug, Clone, Copy)]
pub struct IndexedMetric<'a, T> {
    sequences: &'a [Vec<T>],
    metric: SequenceMetric,
    normalize: bool,
}

impl<'a, T: PartialEq> IndexedMetric<'a, T> {
    /// Wrap a sequence table with a base metric.
    ///
    /// With `normalize` set, raw values are divided by the longer sequence
    /// length; two empty sequences have normalized distance 0.
    pub fn new(sequences: &'a [Vec<T>], metric: SequenceMetric, normalize: bool) -> Self {
        Self {
            sequences,
            metric,
            normalize,
        }
    }

    /// Number of sequences in the lookup table.
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    fn lookup(&self, index: usize) -> Result<&'a [T]> {
        self.sequences
            .get(index)
            .map(Vec::as_slice)
            .ok_or(DriftClustError::IndexOutOfRange {
                index,
                table_len: self.sequences.len(),
            })
    }

    /// Metric value between the sequences at positions `i` and `j`.
    pub fn distance(&self, i: usize, j: usize) -> Result<f64> {
        let a = self.lookup(i)?;
        let b = self.lookup(j)?;
        let raw = self.metric.evaluate(a, b) as f64;
        if !self.normalize {
            return Ok(raw);
        }
        let longest = a.len().max(b.len());
        if longest == 0 {
            // both empty: nothing to edit
            return Ok(0.0);
        }
        Ok(raw / longest as f64)
    }
}
