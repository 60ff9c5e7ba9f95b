//! Typed in-memory table model
//!
//! A [`Table`] is an ordered, mutable collection of fixed-width rows plus
//! column metadata (names, SQL type strings, an optional primary-key column).
//! It is the unit handed to a bulk-load collaborator: one table per fragment,
//! discarded after loading. Rows only enter through a width-checked path so
//! the `names == types == row width` invariant cannot be bypassed.

mod error;

pub use error::TableError;

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::warn;

use crate::dialect::Dialect;
use crate::value::Value;

/// Suffix appended to the primary-key column's type string
pub const PRIMARY_KEY_MARKER: &str = " PRIMARY KEY";

/// Default number of rows sampled by [`Table::guess_column_types`]
pub const DEFAULT_SAMPLE_SIZE: usize = 2000;

/// A column specifier: positional index or case-insensitive name
#[derive(Debug, Clone, Copy)]
pub enum ColumnRef<'a> {
    /// Column at this position
    Index(usize),
    /// Column with this name (matched case-insensitively)
    Name(&'a str),
}

impl From<usize> for ColumnRef<'static> {
    fn from(i: usize) -> Self {
        ColumnRef::Index(i)
    }
}

impl<'a> From<&'a str> for ColumnRef<'a> {
    fn from(name: &'a str) -> Self {
        ColumnRef::Name(name)
    }
}

impl<'a> From<&'a String> for ColumnRef<'a> {
    fn from(name: &'a String) -> Self {
        ColumnRef::Name(name.as_str())
    }
}

/// Two-dimensional data structure representing one fragment of a CSV or SQL
/// table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    name: String,
    column_names: Vec<String>,
    column_types: Vec<String>,
    primary_key: Option<usize>,
    dialect: Dialect,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create an empty table; every column starts as the dialect's text type
    pub fn new(name: impl Into<String>, column_names: Vec<String>, dialect: Dialect) -> Self {
        let column_types = column_names
            .iter()
            .map(|_| dialect.text_type().to_string())
            .collect();
        Self {
            name: name.into(),
            column_names,
            column_types,
            primary_key: None,
            dialect,
            rows: Vec::new(),
        }
    }

    /// Create an empty table with explicit column types.
    ///
    /// A type list shorter than the column list is padded with the text
    /// type; a longer one gains placeholder `col` column names. Both emit a
    /// warning rather than failing.
    pub fn with_types(
        name: impl Into<String>,
        mut column_names: Vec<String>,
        mut column_types: Vec<String>,
        dialect: Dialect,
    ) -> Self {
        if column_types.len() != column_names.len() {
            warn!(
                columns = column_names.len(),
                types = column_types.len(),
                "table has a different number of columns and column types; \
                 the shorter list will be filled with placeholder values"
            );
            while column_types.len() < column_names.len() {
                column_types.push(dialect.text_type().to_string());
            }
            while column_names.len() < column_types.len() {
                column_names.push("col".to_string());
            }
        }
        Self {
            name: name.into(),
            column_names,
            column_types,
            primary_key: None,
            dialect,
            rows: Vec::new(),
        }
    }

    /// Table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of columns
    pub fn n_cols(&self) -> usize {
        self.column_names.len()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table holds no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names, in order
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Column SQL type strings, in order (primary-key column carries the
    /// `PRIMARY KEY` suffix)
    pub fn column_types(&self) -> &[String] {
        &self.column_types
    }

    /// Index of the primary-key column, if one is set
    pub fn primary_key(&self) -> Option<usize> {
        self.primary_key
    }

    /// The dialect this table infers types under
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Row data, in insertion order
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Consume the table, yielding its rows (for the load collaborator)
    pub fn into_rows(self) -> Vec<Vec<Value>> {
        self.rows
    }

    /// Append a row. Fails if the row's width does not match the column
    /// count; this is the only way rows enter a table.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<(), TableError> {
        if row.len() != self.column_names.len() {
            return Err(TableError::RowWidthMismatch {
                expected: self.column_names.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Resolve a column specifier to an index
    pub fn column_index<'a>(&self, col: impl Into<ColumnRef<'a>>) -> Result<usize, TableError> {
        match col.into() {
            ColumnRef::Index(i) if i < self.column_names.len() => Ok(i),
            ColumnRef::Index(i) => Err(TableError::ColumnNotFound {
                name: i.to_string(),
                available: self.column_names.clone(),
            }),
            ColumnRef::Name(name) => {
                let needle = name.to_lowercase();
                self.column_names
                    .iter()
                    .position(|n| n.to_lowercase() == needle)
                    .ok_or_else(|| TableError::ColumnNotFound {
                        name: name.to_string(),
                        available: self.column_names.clone(),
                    })
            }
        }
    }

    /// Guess column types from up to `sample_size` rows.
    ///
    /// Per-column promotion lattice: TEXT wins over FLOAT wins over INTEGER,
    /// so the widest observed class decides. Pure: the caller assigns the
    /// result back via [`Table::set_column_types`] if desired.
    pub fn guess_column_types(&self, sample_size: usize) -> Vec<String> {
        let n_cols = self.column_names.len();
        let text_t = self.dialect.text_type();
        let float_t = self.dialect.float_type();

        let sample = self.rows.len().min(sample_size);
        let mut seen_text = vec![false; n_cols];
        let mut seen_float = vec![false; n_cols];
        let mut active: Vec<usize> = (0..n_cols).collect();

        for (i, row) in self.rows[..sample].iter().enumerate() {
            // Columns saturated at TEXT are dropped from the scan at coarse
            // intervals, not per row
            if i % 100 == 0 {
                active.retain(|&j| !seen_text[j]);
            }
            for &j in &active {
                let guessed = self.dialect.guess(&row[j]);
                if guessed == text_t {
                    seen_text[j] = true;
                } else if guessed == float_t {
                    seen_float[j] = true;
                }
            }
        }

        (0..n_cols)
            .map(|j| {
                if seen_text[j] {
                    text_t.to_string()
                } else if seen_float[j] {
                    float_t.to_string()
                } else {
                    self.dialect.integer_type().to_string()
                }
            })
            .collect()
    }

    /// Indices of rows holding at least one value whose guessed type is
    /// incompatible with the column type (current types, or `column_types`
    /// when supplied). Short-circuits per row on the first conflict.
    pub fn find_nonconforming_rows(&self, column_types: Option<&[String]>) -> Vec<usize> {
        let types = column_types.unwrap_or(&self.column_types);
        let mut rejects = Vec::new();

        for (i, row) in self.rows.iter().enumerate() {
            for (value, column_type) in row.iter().zip(types.iter()) {
                if !self
                    .dialect
                    .compatible(self.dialect.guess(value), column_type)
                {
                    rejects.push(i);
                    break;
                }
            }
        }

        rejects
    }

    /// Replace the column types wholesale.
    ///
    /// A list of the wrong length is padded with the text type or truncated,
    /// with a warning. The primary-key marker is re-applied if a primary key
    /// is set.
    pub fn set_column_types(&mut self, mut types: Vec<String>) {
        let n = self.column_names.len();
        if types.len() != n {
            warn!(
                expected = n,
                got = types.len(),
                "column type list length mismatch; padding with the text type or truncating"
            );
            types.resize(n, self.dialect.text_type().to_string());
        }
        self.column_types = types;
        if let Some(pk) = self.primary_key
            && !self.column_types[pk].ends_with(PRIMARY_KEY_MARKER)
        {
            self.column_types[pk].push_str(PRIMARY_KEY_MARKER);
        }
    }

    /// Assign or clear the primary-key column.
    ///
    /// Strips the `PRIMARY KEY` suffix from the previous primary-key
    /// column's type string and appends it to the new one, leaving every
    /// other type string untouched. Loading fails downstream if the chosen
    /// column contains nulls; this method does not scan row data.
    pub fn set_primary_key(&mut self, index: Option<usize>) -> Result<(), TableError> {
        if let Some(i) = index
            && i >= self.column_names.len()
        {
            return Err(TableError::ColumnNotFound {
                name: i.to_string(),
                available: self.column_names.clone(),
            });
        }

        if let Some(old) = self.primary_key
            && let Some(stripped) = self.column_types[old].strip_suffix(PRIMARY_KEY_MARKER)
        {
            self.column_types[old] = stripped.to_string();
        }

        self.primary_key = index;

        if let Some(new) = index {
            self.column_types[new].push_str(PRIMARY_KEY_MARKER);
        }
        Ok(())
    }

    /// Delete a column, keeping metadata, rows and the primary-key index
    /// consistent
    pub fn delete_column<'a>(&mut self, col: impl Into<ColumnRef<'a>>) -> Result<(), TableError> {
        let i = self.column_index(col)?;
        self.column_names.remove(i);
        self.column_types.remove(i);
        for row in &mut self.rows {
            row.remove(i);
        }
        self.primary_key = match self.primary_key {
            Some(pk) if pk == i => None,
            Some(pk) if pk > i => Some(pk - 1),
            other => other,
        };
        Ok(())
    }

    /// Rename a column in place
    pub fn rename_column<'a>(
        &mut self,
        col: impl Into<ColumnRef<'a>>,
        new_name: &str,
    ) -> Result<(), TableError> {
        let i = self.column_index(col)?;
        self.column_names[i] = new_name.to_string();
        Ok(())
    }

    /// Apply a function to every entry in a column
    pub fn apply<'a, F>(&mut self, col: impl Into<ColumnRef<'a>>, mut f: F) -> Result<(), TableError>
    where
        F: FnMut(&Value) -> Value,
    {
        let i = self.column_index(col)?;
        for row in &mut self.rows {
            let value = f(&row[i]);
            row[i] = value;
        }
        Ok(())
    }

    /// Like [`Table::apply`], but the function also receives the row index
    pub fn apply_indexed<'a, F>(
        &mut self,
        col: impl Into<ColumnRef<'a>>,
        mut f: F,
    ) -> Result<(), TableError>
    where
        F: FnMut(&Value, usize) -> Value,
    {
        let i = self.column_index(col)?;
        for (row_index, row) in self.rows.iter_mut().enumerate() {
            let value = f(&row[i], row_index);
            row[i] = value;
        }
        Ok(())
    }

    /// Append a new column computed from the values of other columns.
    ///
    /// The new column's type is the dialect's text type. Fails if a column
    /// with that name already exists.
    pub fn append_derived_column<'a, F>(
        &mut self,
        name: &str,
        sources: &[ColumnRef<'a>],
        mut f: F,
    ) -> Result<(), TableError>
    where
        F: FnMut(&[&Value]) -> Value,
    {
        if self
            .column_names
            .iter()
            .any(|n| n.eq_ignore_ascii_case(name))
        {
            return Err(TableError::ColumnExists(name.to_string()));
        }

        let indices: Vec<usize> = sources
            .iter()
            .map(|&c| self.column_index(c))
            .collect::<Result<_, _>>()?;

        self.column_names.push(name.to_string());
        self.column_types.push(self.dialect.text_type().to_string());

        for row in &mut self.rows {
            let value = {
                let args: Vec<&Value> = indices.iter().map(|&i| &row[i]).collect();
                f(&args)
            };
            row.push(value);
        }
        Ok(())
    }

    /// Return a new table with columns in the given order (can also take a
    /// subset). The source table is never mutated. Runs in O(width x rows).
    pub fn reorder<'a>(&self, columns: &[ColumnRef<'a>]) -> Result<Table, TableError> {
        let indices: Vec<usize> = columns
            .iter()
            .map(|&c| self.column_index(c))
            .collect::<Result<_, _>>()?;

        let primary_key = self
            .primary_key
            .and_then(|pk| indices.iter().position(|&i| i == pk));

        let mut out = Table {
            name: self.name.clone(),
            column_names: indices
                .iter()
                .map(|&i| self.column_names[i].clone())
                .collect(),
            column_types: indices
                .iter()
                .map(|&i| self.column_types[i].clone())
                .collect(),
            primary_key,
            dialect: self.dialect,
            rows: Vec::with_capacity(self.rows.len()),
        };

        for row in &self.rows {
            out.rows
                .push(indices.iter().map(|&i| row[i].clone()).collect());
        }
        Ok(out)
    }

    /// All values of one column, in row order
    pub fn column_values<'a>(
        &self,
        col: impl Into<ColumnRef<'a>>,
    ) -> Result<Vec<Value>, TableError> {
        let i = self.column_index(col)?;
        Ok(self.rows.iter().map(|row| row[i].clone()).collect())
    }

    /// Apply an aggregate function to a column's values
    pub fn aggregate<'a, T, F>(
        &self,
        col: impl Into<ColumnRef<'a>>,
        f: F,
    ) -> Result<T, TableError>
    where
        F: FnOnce(Vec<Value>) -> T,
    {
        Ok(f(self.column_values(col)?))
    }

    /// Replace the column names with the rendered values of row `index`,
    /// then remove that row
    pub fn promote_row_to_header(&mut self, index: usize) -> Result<(), TableError> {
        if index >= self.rows.len() {
            return Err(TableError::RowOutOfBounds {
                index,
                rows: self.rows.len(),
            });
        }
        self.column_names = self.rows[index].iter().map(|v| v.to_string()).collect();
        self.rows.remove(index);
        Ok(())
    }

    /// Remove every row whose values are all empty (null or blank text;
    /// numeric zero is kept). Deletion walks indices in reverse so removal
    /// never invalidates a pending index.
    pub fn remove_empty_rows(&mut self) {
        let mut i = self.rows.len();
        while i > 0 {
            i -= 1;
            if self.rows[i].iter().all(Value::is_empty) {
                self.rows.remove(i);
            }
        }
    }

    /// Sanitize every column name with [`sanitize_identifier`]
    pub fn sanitize_column_names(&mut self) {
        for name in &mut self.column_names {
            *name = sanitize_identifier(name);
        }
    }
}

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Fix characters that SQL identifiers cannot carry: `.`, `,`, `-` and `;`
/// become `_`, whitespace is removed, and a leading digit gains a `_` prefix.
pub fn sanitize_identifier(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if matches!(c, '.' | ',' | '-' | ';') { '_' } else { c })
        .collect();
    let mut out = WHITESPACE.replace_all(&replaced, "").into_owned();
    if name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

impl fmt::Display for Table {
    /// Short summary: column names, types, and the first few rows
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn cell(s: &str) -> String {
            let trimmed: String = if s.chars().count() > 15 {
                format!("{}...", s.chars().take(12).collect::<String>())
            } else {
                s.to_string()
            };
            format!("| {trimmed:^15} ")
        }

        for name in self.column_names.iter().take(8) {
            f.write_str(&cell(name))?;
        }
        writeln!(f)?;
        for col_type in self.column_types.iter().take(8) {
            f.write_str(&cell(col_type))?;
        }
        writeln!(f)?;
        writeln!(f, "{}", "-".repeat(18 * self.column_names.len().min(8)))?;

        for row in self.rows.iter().take(5) {
            for value in row.iter().take(8) {
                f.write_str(&cell(&value.to_string()))?;
            }
            writeln!(f)?;
        }
        if self.rows.len() > 5 {
            writeln!(f, "... ({} rows)", self.rows.len())?;
        }
        Ok(())
    }
}
