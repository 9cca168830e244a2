use thiserror::Error;

use crate::types::ColumnKind;

/// Core error type shared across samplescope crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The table violates its structural invariants.
    #[error("invalid table: {0}")]
    InvalidTable(String),
    /// A column name was not found in the table.
    #[error("unknown column: {0}")]
    UnknownColumn(String),
    /// A column was accessed as the wrong kind.
    #[error("column '{column}' is {found}, expected {expected}")]
    KindMismatch {
        column: String,
        expected: ColumnKind,
        found: ColumnKind,
    },
    /// A row index does not exist in the table.
    #[error("row {row} out of bounds for table with {rows} row(s)")]
    RowOutOfBounds { row: usize, rows: usize },
}

/// Convenience alias for results returned by samplescope crates.
pub type Result<T> = std::result::Result<T, Error>;
