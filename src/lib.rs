//! sqlstage - Schema-inferring staging tables for SQL bulk loading
//!
//! Provides the building blocks for streaming delimited text into SQL tables:
//! - In-memory staging tables with names, types and an optional primary key
//! - Chunked, bounded-memory reading of delimited files
//! - Column type inference over observed values
//! - SQL dialect registry (SQLite, Postgres) with type conversion between
//!   dialects

pub mod dialect;
pub mod reader;
pub mod table;
pub mod value;

// Re-export commonly used types
pub use dialect::{Dialect, UnknownDialect, convert_type, convert_types};
pub use reader::{ChunkedReader, ReadError, ReaderConfig, ReaderConfigBuilder};
pub use table::{ColumnRef, Table, TableError, sanitize_identifier};
pub use value::Value;
