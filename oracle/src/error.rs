//! Errors for oracle evaluation.

use colgen_core::CoreError;
use thiserror::Error;

/// Errors that can occur while evaluating or parsing a script.
///
/// Empty results are not errors: they evaluate to empty row sets and
/// normalized aggregates.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OracleError {
    /// A handle was used before it was bound.
    #[error("Unknown handle: {0}")]
    UnknownHandle(String),

    /// A handle is bound to the wrong kind of result.
    #[error("Handle '{handle}' holds {actual}, expected {expected}")]
    WrongBinding {
        handle: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// Paired inputs have different lengths.
    #[error("Length mismatch in {context}: {left} vs {right}")]
    LengthMismatch {
        context: &'static str,
        left: usize,
        right: usize,
    },

    /// A row id is outside the column.
    #[error("Row {row} out of range for column of {len} rows")]
    RowOutOfRange { row: usize, len: usize },

    /// A print mixed scalars with sequences.
    #[error("Cannot print scalars and sequences together: print({0})")]
    MixedPrint(String),

    /// A script line could not be parsed.
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Table or column lookup failed.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl OracleError {
    pub fn wrong_binding(
        handle: impl Into<String>,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        Self::WrongBinding {
            handle: handle.into(),
            expected,
            actual,
        }
    }

    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Result type for oracle operations.
pub type OracleResult<T> = Result<T, OracleError>;
