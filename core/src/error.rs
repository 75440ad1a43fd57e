//! Common error types for colgen.

use thiserror::Error;

/// Errors raised while building or addressing tables.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Column name already present in the table.
    #[error("Duplicate column '{column}' in table {table}")]
    DuplicateColumn { table: String, column: String },

    /// Column not present in the table.
    #[error("Column not found: {column} in table {table}")]
    ColumnNotFound { table: String, column: String },

    /// Table not present in the catalog.
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// Column length disagrees with the table's row count.
    #[error("Length mismatch for column '{column}': expected {expected} rows, got {actual}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// A `db.table.col` reference could not be parsed.
    #[error("Invalid column reference: '{0}'")]
    InvalidColumnRef(String),

    /// Unrecognised keyword (join kind, index kind, clustering).
    #[error("Unknown {what}: '{value}'")]
    UnknownKeyword { what: &'static str, value: String },
}

impl CoreError {
    pub fn duplicate_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::DuplicateColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    pub fn column_not_found(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            table: table.into(),
            column: column.into(),
        }
    }

    pub fn unknown_keyword(what: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownKeyword {
            what,
            value: value.into(),
        }
    }
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
