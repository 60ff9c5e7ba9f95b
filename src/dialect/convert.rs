//! Cross-dialect type-name conversion

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::Dialect;

/// Case-insensitive lookup from SQLite type names to Postgres ones
static SQLITE_TO_POSTGRES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("integer", "BIGINT"),
        ("real", "DOUBLE PRECISION"),
        ("text", "TEXT"),
    ])
});

/// Case-insensitive lookup from Postgres type names to SQLite ones
static POSTGRES_TO_SQLITE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("bigint", "INTEGER"),
        ("double precision", "REAL"),
        ("text", "TEXT"),
    ])
});

/// Convert one SQL type name between dialect vocabularies.
///
/// The lookup is case-insensitive and returns the destination dialect's
/// canonical name; unrecognized type names pass through unchanged.
pub fn convert_type(name: &str, from: Dialect, to: Dialect) -> String {
    if from == to {
        return name.to_string();
    }

    let table = match (from, to) {
        (Dialect::Sqlite, Dialect::Postgres) => &SQLITE_TO_POSTGRES,
        (Dialect::Postgres, Dialect::Sqlite) => &POSTGRES_TO_SQLITE,
        _ => unreachable!("from == to handled above"),
    };

    match table.get(name.to_lowercase().as_str()) {
        Some(converted) => (*converted).to_string(),
        None => name.to_string(),
    }
}

/// Convert a list of SQL type names between dialect vocabularies
pub fn convert_types<S: AsRef<str>>(names: &[S], from: Dialect, to: Dialect) -> Vec<String> {
    names
        .iter()
        .map(|name| convert_type(name.as_ref(), from, to))
        .collect()
}
