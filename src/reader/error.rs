//! Error types for chunked reading

use thiserror::Error;

use crate::table::TableError;

/// Errors raised while streaming a delimited file into table fragments
#[derive(Error, Debug)]
pub enum ReadError {
    /// Underlying stream error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A rename target is absent from the header
    #[error("Can't find {name} in list of columns (columns are: {columns:?})")]
    ColumnNotFound { name: String, columns: Vec<String> },

    /// A data line's field count does not match the header's column count
    #[error("Line {line}: row has {found} fields but the header has {expected} columns")]
    RowWidthMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// Table construction error
    #[error(transparent)]
    Table(#[from] TableError),
}
