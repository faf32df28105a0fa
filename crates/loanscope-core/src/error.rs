//! Error types for loanscope-core.
//!
//! Aggregations never fail: empty views and empty groups produce empty or
//! zero-valued results. Only the input shape and filter arguments can be
//! rejected.

use thiserror::Error;

/// The raw dataset could not be interpreted as a sequence of rows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// Top-level value is not an array.
    #[error("dataset is not a sequence of rows (found {found})")]
    NotASequence {
        /// JSON type that was found instead
        found: &'static str,
    },

    /// An element of the sequence is not an object.
    #[error("row {index} is not an object (found {found})")]
    NotARow {
        /// Position of the offending element
        index: usize,
        /// JSON type that was found instead
        found: &'static str,
    },
}

/// A filter request was rejected. The filter state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// Field name does not match any known field.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// Range bounds are NaN or infinite.
    #[error("invalid range for {field}: [{lo}, {hi}]")]
    InvalidRange {
        /// Field being filtered
        field: String,
        /// Lower bound as given
        lo: String,
        /// Upper bound as given
        hi: String,
    },
}
