//! Exact sequence-similarity metrics.
//!
//! Longest-common-subsequence length and Levenshtein edit distance over
//! arbitrary comparable symbols. Each metric has two execution paths: the
//! full-table textbook recurrence kept as the reference, and a rolling
//! two-row variant used on the hot path. The two are behaviorally identical;
//! rolling only drops the memory from O(m*n) to O(n).

use serde::{Deserialize, Serialize};

/// Length of the longest common subsequence of `x` and `y`.
///
/// Full-table dynamic program: `C[i][j] = C[i-1][j-1] + 1` on a symbol
/// match, otherwise `max(C[i][j-1], C[i-1][j])`. Zero when either input is
/// empty.
pub fn lcs_length<T: PartialEq>(x: &[T], y: &[T]) -> usize {
    let m = x.len();
    let n = y.len();
    let mut table = vec![vec![0usize; n + 1]; m + 1];
    for i in 1..=m {
        for j in 1..=n {
            table[i][j] = if x[i - 1] == y[j - 1] {
                table[i - 1][j - 1] + 1
            } else {
                table[i][j - 1].max(table[i - 1][j])
            };
        }
    }
    table[m][n]
}

/// [`lcs_length`] computed with two rolling rows.
pub fn lcs_length_rolling<T: PartialEq>(x: &[T], y: &[T]) -> usize {
    let n = y.len();
    let mut previous = vec![0usize; n + 1];
    let mut current = vec![0usize; n + 1];
    for symbol in x {
        for j in 1..=n {
            current[j] = if *symbol == y[j - 1] {
                previous[j - 1] + 1
            } else {
                current[j - 1].max(previous[j])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[n]
}

/// Levenshtein edit distance between `x` and `y`.
///
/// Full-table Wagner-Fischer: `d[i][0] = i`, `d[0][j] = j`, and
/// `d[i][j] = min(d[i-1][j] + 1, d[i][j-1] + 1, d[i-1][j-1] + cost)` with
/// cost 0 on a match and 1 otherwise. Symmetric in its arguments.
pub fn edit_distance<T: PartialEq>(x: &[T], y: &[T]) -> usize {
    let m = x.len();
    let n = y.len();
    let mut table = vec![vec![0usize; n + 1]; m + 1];
    for (i, row) in table.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=n {
        table[0][j] = j;
    }
    for i in 1..=m {
        for j in 1..=n {
            let cost = usize::from(x[i - 1] != y[j - 1]);
            table[i][j] = (table[i - 1][j] + 1)
                .min(table[i][j - 1] + 1)
                .min(table[i - 1][j - 1] + cost);
        }
    }
    table[m][n]
}

/// [`edit_distance`] computed with two rolling rows.
pub fn edit_distance_rolling<T: PartialEq>(x: &[T], y: &[T]) -> usize {
    let n = y.len();
    let mut previous: Vec<usize> = (0..=n).collect();
    let mut current = vec![0usize; n + 1];
    for (i, symbol) in x.iter().enumerate() {
        current[0] = i + 1;
        for j in 1..=n {
            let cost = usize::from(*symbol != y[j - 1]);
            current[j] = (previous[j] + 1)
                .min(current[j - 1] + 1)
                .min(previous[j - 1] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[n]
}

/// Which base metric a clustering run evaluates between sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SequenceMetric {
    /// Longest-common-subsequence length. A similarity, not a distance;
    /// useful through the adapter when callers want overlap counts.
    Lcs,
    /// Levenshtein edit distance.
    #[default]
    EditDistance,
}

impl SequenceMetric {
    /// Evaluate the metric between two sequences via the rolling path.
    pub fn evaluate<T: PartialEq>(&self, x: &[T], y: &[T]) -> usize {
        match self {
            SequenceMetric::Lcs => lcs_length_rolling(x, y),
            SequenceMetric::EditDistance => edit_distance_rolling(x, y),
        }
    }
}
