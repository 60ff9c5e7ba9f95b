//! Per-value type guessing and the compatibility tables

use super::Dialect;
use crate::value::Value;

/// Guess the SQL type for a single value.
///
/// Null maps to the integer type: the option with the least effect on the
/// final column type, so an all-null column does not force TEXT.
pub(super) fn guess_type(dialect: Dialect, value: &Value) -> &'static str {
    match value {
        Value::Null => dialect.integer_type(),
        Value::Integer(_) => dialect.integer_type(),
        Value::Float(_) => dialect.float_type(),
        Value::Text(s) => guess_text(dialect, s),
    }
}

fn guess_text(dialect: Dialect, raw: &str) -> &'static str {
    let s = raw.trim();

    if is_numeric(s) {
        return dialect.integer_type();
    }

    // A float like "-3.14" is not all-numeric, but after removing one '.'
    // and one '-' it is. Only the first occurrence of each is removed, so a
    // second '.' or '-' (or a leading '+') stays and forces TEXT.
    let stripped = s.replacen('.', "", 1).replacen('-', "", 1);
    if is_numeric(&stripped) {
        return dialect.float_type();
    }

    dialect.text_type()
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(char::is_numeric)
}

/// Decide whether a value of type `observed` fits a column of type `column`.
///
/// Equal types always fit, and the integer type fits everywhere. Otherwise
/// each dialect carries a fixed table of column types that CANNOT hold a
/// given value type; the answer is the negation of membership.
pub(super) fn compatible(dialect: Dialect, observed: &str, column: &str) -> bool {
    let column = column
        .strip_suffix(crate::table::PRIMARY_KEY_MARKER)
        .unwrap_or(column);

    if observed == column || observed == dialect.integer_type() {
        return true;
    }

    let cannot_hold: &[&str] = if observed == dialect.float_type() {
        match dialect {
            Dialect::Sqlite => &["INTEGER"],
            Dialect::Postgres => &["BIGINT"],
        }
    } else if observed == dialect.text_type() {
        match dialect {
            Dialect::Sqlite => &["INTEGER", "REAL"],
            Dialect::Postgres => &["BIGINT", "DOUBLE PRECISION"],
        }
    } else {
        // Types outside the inferred vocabulary only fit an identical column
        return false;
    };

    !cannot_hold.contains(&column)
}
