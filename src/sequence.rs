//! Sequence normalization.
//!
//! Converts between flat per-observation series and per-trajectory
//! sequences, collapses runs of repeated cells, and fills spatial gaps so a
//! sequence never jumps more than one cell step at a time. Every transform
//! produces a new sequence; nothing is mutated in place.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::discretize::{grid, hex};
use crate::error::{DriftClustError, Result};
use crate::{Cell, TrajectoryId};

/// One row of a flat `(trajectory, observation)`-indexed series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesEntry<T> {
    pub trajectory: TrajectoryId,
    pub observation: u32,
    pub value: T,
}

/// Iterator adapter that drops consecutive duplicate elements, keeping the
/// first occurrence of each run.
///
/// Single forward pass with one element of lookahead; clone it to restart.
#[derive(Debug, Clone)]
pub struct CollapseRepeats<I: Iterator> {
    inner: I,
    next_item: Option<I::Item>,
}

/// Collapse runs of repeated elements into their first occurrence.
///
/// The first element seeds the comparison and is always yielded, so an empty
/// input fails with `EmptySequence`.
pub fn collapse_repeats<I>(sequence: I) -> Result<CollapseRepeats<I::IntoIter>>
where
    I: IntoIterator,
    I::Item: PartialEq,
{
    let mut inner = sequence.into_iter();
    let first = inner.next().ok_or_else(|| DriftClustError::EmptySequence {
        context: "collapse_repeats needs at least one element".to_string(),
    })?;
    Ok(CollapseRepeats {
        inner,
        next_item: Some(first),
    })
}

impl<I> Iterator for CollapseRepeats<I>
where
    I: Iterator,
    I::Item: PartialEq,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        let current = self.next_item.take()?;
        for candidate in self.inner.by_ref() {
            if candidate != current {
                self.next_item = Some(candidate);
                break;
            }
        }
        Some(current)
    }
}

/// Fill spatial gaps between consecutive cells with an interpolated path.
///
/// For every consecutive pair, the discrete line from the first cell up to
/// but excluding the second is emitted; the final input cell is always
/// appended. The result contains no jumps larger than one cell step. Mixing
/// grid and hex cells in one sequence fails with `IncomparableSymbols`.
pub fn fill_gaps(cells: &[Cell]) -> Result<Vec<Cell>> {
    let (first, rest) = cells
        .split_first()
        .ok_or_else(|| DriftClustError::EmptySequence {
            context: "fill_gaps needs at least one element".to_string(),
        })?;

    let mut filled = Vec::with_capacity(cells.len());
    let mut last = *first;
    for &next in rest {
        match (last, next) {
            (Cell::Grid(a), Cell::Grid(b)) => {
                let line = grid::grid_line(a, b);
                filled.extend(line[..line.len() - 1].iter().copied().map(Cell::Grid));
            }
            (Cell::Hex(a), Cell::Hex(b)) => {
                let line = hex::hex_line(a, b);
                filled.extend(line[..line.len() - 1].iter().copied().map(Cell::Hex));
            }
            _ => {
                return Err(DriftClustError::IncomparableSymbols {
                    context: "fill_gaps over a sequence mixing grid and hex cells".to_string(),
                })
            }
        }
        last = next;
    }
    filled.push(last);
    Ok(filled)
}

/// Group a flat series into one ordered sequence per trajectory.
///
/// Values are ordered by observation id ascending within each trajectory.
pub fn group_by_trajectory<T: Clone>(series: &[SeriesEntry<T>]) -> BTreeMap<TrajectoryId, Vec<T>> {
    group_by(series, |entry| entry.trajectory)
}

/// Group a flat series by an explicit key instead of the trajectory id.
pub fn group_by<T: Clone, K: Ord>(
    series: &[SeriesEntry<T>],
    key: impl Fn(&SeriesEntry<T>) -> K,
) -> BTreeMap<K, Vec<T>> {
    let mut grouped: BTreeMap<K, Vec<(u32, T)>> = BTreeMap::new();
    for entry in series {
        grouped
            .entry(key(entry))
            .or_default()
            .push((entry.observation, entry.value.clone()));
    }
    grouped
        .into_iter()
        .map(|(group_key, mut values)| {
            values.sort_by_key(|(observation, _)| *observation);
            (
                group_key,
                values.into_iter().map(|(_, value)| value).collect(),
            )
        })
        .collect()
}

/// Inverse of [`group_by_trajectory`]: flatten sequences back into a series,
/// assigning observation indices `0..k-1` per trajectory in sequence order.
///
/// `group_by_trajectory(ungroup(m)) == m` for any mapping with non-empty
/// sequences.
pub fn ungroup<T: Clone>(sequences: &BTreeMap<TrajectoryId, Vec<T>>) -> Vec<SeriesEntry<T>> {
    sequences
        .iter()
        .flat_map(|(&trajectory, sequence)| {
            sequence.iter().enumerate().map(move |(index, value)| SeriesEntry {
                trajectory,
                observation: index as u32,
                value: value.clone(),
            })
        })
        .collect()
}

/// Per-trajectory discrete sequences: the universe a clustering run operates
/// over.
///
/// Construction fixes a single cell backend for the whole collection, so
/// every later pairwise comparison is between comparable symbols. Iteration
/// order is trajectory id ascending and is what the cluster driver preserves
/// in its output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SequenceCollection {
    sequences: BTreeMap<TrajectoryId, Vec<Cell>>,
}

impl SequenceCollection {
    /// Build a collection, rejecting mixed grid/hex sequences.
    pub fn from_sequences(sequences: BTreeMap<TrajectoryId, Vec<Cell>>) -> Result<Self> {
        let mut kinds = sequences
            .values()
            .flatten()
            .map(|cell| matches!(cell, Cell::Grid(_)));
        if let Some(first) = kinds.next() {
            if kinds.any(|kind| kind != first) {
                return Err(DriftClustError::IncomparableSymbols {
                    context: "sequence collection mixes grid and hex cells".to_string(),
                });
            }
        }
        Ok(Self { sequences })
    }

    /// Build a collection directly from a flat per-point cell series.
    pub fn from_series(series: &[SeriesEntry<Cell>]) -> Result<Self> {
        Self::from_sequences(group_by_trajectory(series))
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn get(&self, trajectory: TrajectoryId) -> Option<&[Cell]> {
        self.sequences.get(&trajectory).map(Vec::as_slice)
    }

    /// Iterate sequences in trajectory id order.
    pub fn iter(&self) -> impl Iterator<Item = (TrajectoryId, &[Cell])> {
        self.sequences
            .iter()
            .map(|(&trajectory, sequence)| (trajectory, sequence.as_slice()))
    }

    /// Collapse runs of repeated cells in every sequence.
    pub fn collapse_repeats(&self) -> Result<Self> {
        let mut collapsed = BTreeMap::new();
        for (&trajectory, sequence) in &self.sequences {
            if sequence.is_empty() {
                return Err(DriftClustError::EmptySequence {
                    context: format!("trajectory {trajectory} has an empty sequence"),
                });
            }
            let sequence: Vec<Cell> = collapse_repeats(sequence.iter().copied())?.collect();
            collapsed.insert(trajectory, sequence);
        }
        Ok(Self {
            sequences: collapsed,
        })
    }

    /// Fill spatial gaps in every sequence.
    pub fn fill_gaps(&self) -> Result<Self> {
        let mut filled = BTreeMap::new();
        for (&trajectory, sequence) in &self.sequences {
            filled.insert(trajectory, fill_gaps(sequence)?);
        }
        Ok(Self { sequences: filled })
    }

    /// Flatten the collection back into a per-point series.
    pub fn to_series(&self) -> Vec<SeriesEntry<Cell>> {
        ungroup(&self.sequences)
    }

    pub fn sequences(&self) -> &BTreeMap<TrajectoryId, Vec<Cell>> {
        &self.sequences
    }
}
