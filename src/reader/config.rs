//! Configuration for the chunked reader

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::dialect::Dialect;

/// Default number of rows per emitted fragment
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;

/// Configuration for [`ChunkedReader`](super::ChunkedReader)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReaderConfig {
    /// Name given to every emitted table fragment
    pub table_name: String,

    /// Field separator
    pub delimiter: char,

    /// Line number of the header row; `None` means no header and column
    /// names `col0..colN` are synthesized from the first line's width
    pub header: Option<usize>,

    /// Number of leading lines that are not data. Defaults to the header
    /// line + 1, or 0 when there is no header.
    pub skip_lines: Option<usize>,

    /// Renames applied after duplicate resolution, keyed by the original
    /// header name
    pub column_rename: HashMap<String, String>,

    /// Explicit column types, bypassing inference
    pub column_types: Option<Vec<String>>,

    /// Input token that denotes a missing value; replaced with the null
    /// marker during reading
    pub null_sentinel: Option<String>,

    /// Maximum rows per emitted fragment; `None` reads the whole stream
    /// into a single fragment
    pub chunk_size: Option<usize>,

    /// Dialect used for type inference and type names
    pub dialect: Dialect,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            table_name: "table".to_string(),
            delimiter: '\t',
            header: Some(0),
            skip_lines: None,
            column_rename: HashMap::new(),
            column_types: None,
            null_sentinel: None,
            chunk_size: Some(DEFAULT_CHUNK_SIZE),
            dialect: Dialect::default(),
        }
    }
}

impl ReaderConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> ReaderConfigBuilder {
        ReaderConfigBuilder::default()
    }

    /// Number of leading lines (header included) that precede data
    pub fn effective_skip_lines(&self) -> usize {
        match self.skip_lines {
            Some(n) => n,
            None => self.header.map_or(0, |h| h + 1),
        }
    }
}

/// Builder for [`ReaderConfig`]
#[derive(Debug, Default)]
pub struct ReaderConfigBuilder {
    config: ReaderConfig,
}

impl ReaderConfigBuilder {
    /// Set the fragment table name
    pub fn table_name(mut self, name: impl Into<String>) -> Self {
        self.config.table_name = name.into();
        self
    }

    /// Set the field separator
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.config.delimiter = delimiter;
        self
    }

    /// Set the header line number
    pub fn header(mut self, line: usize) -> Self {
        self.config.header = Some(line);
        self
    }

    /// Declare the stream headerless; column names are synthesized
    pub fn no_header(mut self) -> Self {
        self.config.header = None;
        self
    }

    /// Set the number of leading lines to skip before data
    pub fn skip_lines(mut self, lines: usize) -> Self {
        self.config.skip_lines = Some(lines);
        self
    }

    /// Rename a header column (by its original name)
    pub fn rename(mut self, original: impl Into<String>, new: impl Into<String>) -> Self {
        self.config.column_rename.insert(original.into(), new.into());
        self
    }

    /// Supply explicit column types, bypassing inference
    pub fn column_types(mut self, types: Vec<String>) -> Self {
        self.config.column_types = Some(types);
        self
    }

    /// Set the token treated as a missing value
    pub fn null_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.config.null_sentinel = Some(sentinel.into());
        self
    }

    /// Set the maximum rows per fragment
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = Some(size);
        self
    }

    /// Read the whole stream into a single fragment
    pub fn single_fragment(mut self) -> Self {
        self.config.chunk_size = None;
        self
    }

    /// Set the target dialect
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.config.dialect = dialect;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ReaderConfig {
        self.config
    }
}
