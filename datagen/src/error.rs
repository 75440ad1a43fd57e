//! Errors for data generation.

use colgen_core::CoreError;
use thiserror::Error;

/// Errors raised while generating tables or planning predicates.
#[derive(Debug, Error, PartialEq)]
pub enum DataGenError {
    /// Zipf parameters outside `s > 0`, `N >= 1`.
    #[error("Invalid Zipfian parameters: skew {skew}, domain {domain}")]
    InvalidZipf { skew: f64, domain: usize },

    /// Selectivity outside `[0, 1]`.
    #[error("Selectivity must lie in [0, 1], got {0}")]
    InvalidSelectivity(f64),

    /// A uniform draw was requested over an empty interval.
    #[error("Empty value range [{low}, {high}) for column '{column}'")]
    EmptyRange { column: String, low: i64, high: i64 },

    /// A transform referenced a column the builder does not hold.
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    /// A row mask does not cover the table.
    #[error("Mask covers {actual} rows, table has {expected}")]
    MaskLength { expected: usize, actual: usize },

    /// Table assembly failed.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for data generation.
pub type DataGenResult<T> = Result<T, DataGenError>;
