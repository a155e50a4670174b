//! Unified error handling for driftclust.
//!
//! All failures are local and deterministic: the core fails fast and never
//! retries or silently coerces bad input.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DriftClustError>;

/// Errors produced by the discretization, normalization and clustering core.
#[derive(Debug, Error)]
pub enum DriftClustError {
    /// Not enough data to carry out an estimate or a clustering run.
    #[error("insufficient data: {context} ({value_count} values, need at least {minimum_required})")]
    InsufficientData {
        context: String,
        value_count: usize,
        minimum_required: usize,
    },

    /// A normalization step was handed a zero-length sequence.
    #[error("empty sequence: {context}")]
    EmptySequence { context: String },

    /// Sequence elements cannot be compared for equality.
    #[error("incomparable symbols: {context}")]
    IncomparableSymbols { context: String },

    /// An index-based metric was handed a position outside its lookup table.
    #[error("sequence index {index} out of range for lookup table of length {table_len}")]
    IndexOutOfRange { index: usize, table_len: usize },

    /// A configuration value outside its valid domain.
    #[error("invalid parameter `{name}`: {message}")]
    InvalidParameter {
        name: &'static str,
        message: &'static str,
    },
}

/// Extension helpers for converting `Option` into crate errors.
pub trait OptionExt<T> {
    /// Convert `None` into an `InsufficientData` error.
    fn ok_or_insufficient_data(
        self,
        context: &str,
        value_count: usize,
        minimum_required: usize,
    ) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_insufficient_data(
        self,
        context: &str,
        value_count: usize,
        minimum_required: usize,
    ) -> Result<T> {
        self.ok_or_else(|| DriftClustError::InsufficientData {
            context: context.to_string(),
            value_count,
            minimum_required,
        })
    }
}
