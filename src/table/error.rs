//! Error types for table operations

use thiserror::Error;

/// Errors raised by table construction and column operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// A column name or index could not be resolved
    #[error("Couldn't find a column named {name} (columns are: {available:?})")]
    ColumnNotFound {
        name: String,
        available: Vec<String>,
    },

    /// A derived column would shadow an existing one
    #[error("{0} already exists. Use apply() to transform existing columns.")]
    ColumnExists(String),

    /// A row's width does not match the table's column count
    #[error("Row has {found} values but the table has {expected} columns")]
    RowWidthMismatch { expected: usize, found: usize },

    /// A row index beyond the table's length
    #[error("Row index {index} out of range ({rows} rows)")]
    RowOutOfBounds { index: usize, rows: usize },
}
