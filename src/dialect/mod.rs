//! SQL dialect registry
//!
//! A dialect bundles a scalar-type vocabulary with the type-guessing and
//! type-compatibility rules for one target engine. The set is closed: two
//! built-ins, SQLite-flavored and Postgres-flavored, differing only in
//! numeric type names.

mod convert;
mod guess;

pub use convert::{convert_type, convert_types};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value::Value;

/// Target SQL engine selecting type names and inference rules
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// SQLite vocabulary: INTEGER / REAL / TEXT
    #[default]
    Sqlite,
    /// Postgres vocabulary: BIGINT / DOUBLE PRECISION / TEXT
    Postgres,
}

/// Error for an unrecognized dialect name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown dialect: {0} (expected 'sqlite' or 'postgres')")]
pub struct UnknownDialect(pub String);

impl Dialect {
    /// The dialect's lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Sqlite => "sqlite",
            Dialect::Postgres => "postgres",
        }
    }

    /// SQL type used for integer columns
    pub fn integer_type(&self) -> &'static str {
        match self {
            Dialect::Sqlite => "INTEGER",
            Dialect::Postgres => "BIGINT",
        }
    }

    /// SQL type used for floating-point columns
    pub fn float_type(&self) -> &'static str {
        match self {
            Dialect::Sqlite => "REAL",
            Dialect::Postgres => "DOUBLE PRECISION",
        }
    }

    /// SQL type used for text columns
    pub fn text_type(&self) -> &'static str {
        match self {
            Dialect::Sqlite => "TEXT",
            Dialect::Postgres => "TEXT",
        }
    }

    /// Guess the SQL type of a single value under this dialect's rules
    pub fn guess(&self, value: &Value) -> &'static str {
        guess::guess_type(*self, value)
    }

    /// Whether a value of type `observed` can be stored losslessly in a
    /// column of type `column`
    pub fn compatible(&self, observed: &str, column: &str) -> bool {
        guess::compatible(*self, observed, column)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(Dialect::Sqlite),
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            other => Err(UnknownDialect(other.to_string())),
        }
    }
}
