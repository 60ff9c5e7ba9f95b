//! Chunked, lazy delimited-text reader
//!
//! [`ChunkedReader`] consumes a line stream and emits a finite sequence of
//! [`Table`] fragments, each capped at a configured row count, so peak memory
//! is bounded by one chunk regardless of file size. The reader resolves the
//! header once (de-duplicating and renaming column names), substitutes the
//! null sentinel element-wise, and infers column types exactly once: the
//! first fragment's inferred types bind every later fragment.
//!
//! A reader is a single-owner, one-pass pull iterator; to re-read a file,
//! open a new reader. The file handle taken by [`ChunkedReader::from_path`]
//! is released when the reader is dropped, on every exit path.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sqlstage::reader::{ChunkedReader, ReaderConfig};
//!
//! let config = ReaderConfig::builder()
//!     .table_name("cities")
//!     .delimiter(',')
//!     .chunk_size(10_000)
//!     .build();
//!
//! for fragment in ChunkedReader::from_path("cities.csv", config)? {
//!     let table = fragment?;
//!     // hand the fragment to a bulk loader, then drop it
//! }
//! ```

mod config;
mod error;

pub use config::{DEFAULT_CHUNK_SIZE, ReaderConfig, ReaderConfigBuilder};
pub use error::ReadError;

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use tracing::debug;

use crate::table::{DEFAULT_SAMPLE_SIZE, Table};
use crate::value::Value;

/// Stateful, resumable reader producing successive table fragments
pub struct ChunkedReader<R: BufRead> {
    config: ReaderConfig,
    lines: Lines<R>,
    line_number: usize,
    column_names: Option<Vec<String>>,
    raw_header: Option<Vec<String>>,
    skipped_lines: Vec<String>,
    /// Types fixed for the whole stream: explicit configuration, or the
    /// first fragment's inference result
    bound_types: Option<Vec<String>>,
    fragment: Option<Table>,
    finished: bool,
}

impl ChunkedReader<BufReader<File>> {
    /// Open a file and read it with the given configuration
    pub fn from_path(path: impl AsRef<Path>, config: ReaderConfig) -> Result<Self, ReadError> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file), config))
    }
}

impl<R: BufRead> ChunkedReader<R> {
    /// Wrap any buffered reader
    pub fn new(reader: R, config: ReaderConfig) -> Self {
        let bound_types = config.column_types.clone();
        Self {
            config,
            lines: reader.lines(),
            line_number: 0,
            column_names: None,
            raw_header: None,
            skipped_lines: Vec::new(),
            bound_types,
            fragment: None,
            finished: false,
        }
    }

    /// The raw header fields, available once the header line has been read
    pub fn raw_header(&self) -> Option<&[String]> {
        self.raw_header.as_deref()
    }

    /// Raw lines skipped before the first data row (header excluded)
    pub fn skipped_lines(&self) -> &[String] {
        &self.skipped_lines
    }

    /// The resolved column names, once the header has been read
    pub fn column_names(&self) -> Option<&[String]> {
        self.column_names.as_deref()
    }

    fn split_fields(&self, line: &str) -> Vec<String> {
        line.split(self.config.delimiter).map(str::to_string).collect()
    }

    /// De-duplicate the raw header, then apply the rename map (keyed by the
    /// original, pre-dedup names)
    fn resolve_header(&self, fields: &[String]) -> Result<Vec<String>, ReadError> {
        let mut names = resolve_duplicates(fields);

        let mut renames: Vec<(&String, &String)> = self.config.column_rename.iter().collect();
        renames.sort();
        for (original, new_name) in renames {
            match fields.iter().position(|f| f == original) {
                Some(i) => names[i] = new_name.clone(),
                None => {
                    return Err(ReadError::ColumnNotFound {
                        name: original.clone(),
                        columns: fields.to_vec(),
                    });
                }
            }
        }
        Ok(names)
    }

    fn new_fragment(&self) -> Table {
        let names = self.column_names.clone().unwrap_or_default();
        let mut table = Table::new(&self.config.table_name, names, self.config.dialect);
        if let Some(types) = &self.bound_types {
            table.set_column_types(types.clone());
        }
        table
    }

    /// Fix the fragment's column types before handing it out. The first
    /// fragment's inference binds every subsequent one.
    fn finalize(&mut self, mut fragment: Table) -> Table {
        if self.bound_types.is_none() {
            let inferred = fragment.guess_column_types(DEFAULT_SAMPLE_SIZE);
            fragment.set_column_types(inferred.clone());
            self.bound_types = Some(inferred);
        }
        fragment
    }
}

impl<R: BufRead> Iterator for ChunkedReader<R> {
    type Item = Result<Table, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(Err(e.into()));
                }
                None => {
                    // End of stream: emit the partial fragment, if any
                    self.finished = true;
                    return match self.fragment.take() {
                        Some(fragment) if !fragment.is_empty() => {
                            let fragment = self.finalize(fragment);
                            debug!(rows = fragment.len(), "emitting final fragment");
                            Some(Ok(fragment))
                        }
                        _ => None,
                    };
                }
            };

            let line_number = self.line_number;
            self.line_number += 1;

            let mut line = line;
            if line.ends_with('\r') {
                line.pop();
            }

            // Resolve column names first
            if self.column_names.is_none() {
                match self.config.header {
                    Some(h) if h == line_number => {
                        let fields = self.split_fields(&line);
                        match self.resolve_header(&fields) {
                            Ok(names) => {
                                self.raw_header = Some(fields);
                                self.column_names = Some(names);
                            }
                            Err(e) => {
                                self.finished = true;
                                return Some(Err(e));
                            }
                        }
                        continue;
                    }
                    Some(_) => {
                        // Not yet at the header line
                        self.skipped_lines.push(line);
                        continue;
                    }
                    None => {
                        let width = self.split_fields(&line).len();
                        self.column_names =
                            Some((0..width).map(|i| format!("col{i}")).collect());
                        // Headerless streams have no skip region by default,
                        // so this line falls through as data
                    }
                }
            }

            if line_number < self.config.effective_skip_lines() {
                self.skipped_lines.push(line);
                continue;
            }

            // Data line: split, substitute the null sentinel, width-check
            let fields = self.split_fields(&line);
            let expected = self.column_names.as_ref().map_or(0, Vec::len);
            if fields.len() != expected {
                self.finished = true;
                return Some(Err(ReadError::RowWidthMismatch {
                    line: line_number,
                    expected,
                    found: fields.len(),
                }));
            }

            let row: Vec<Value> = fields
                .into_iter()
                .map(|field| match &self.config.null_sentinel {
                    Some(sentinel) if &field == sentinel => Value::Null,
                    _ => Value::Text(field),
                })
                .collect();

            if self.fragment.is_none() {
                self.fragment = Some(self.new_fragment());
            }

            let mut full = None;
            if let Some(fragment) = self.fragment.as_mut() {
                if let Err(e) = fragment.push_row(row) {
                    self.finished = true;
                    return Some(Err(e.into()));
                }
                if self
                    .config
                    .chunk_size
                    .is_some_and(|chunk| fragment.len() >= chunk)
                {
                    full = self.fragment.take();
                }
            }

            if let Some(fragment) = full {
                let fragment = self.finalize(fragment);
                debug!(
                    rows = fragment.len(),
                    line = line_number,
                    "emitting table fragment"
                );
                return Some(Ok(fragment));
            }
        }
    }
}

/// Make duplicated header names unique by suffixing `_2`, `_3`, ...
/// deterministically. A synthesized name never collides with a name that
/// appears verbatim later in the header.
fn resolve_duplicates(fields: &[String]) -> Vec<String> {
    let mut taken: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(fields.len());

    for field in fields {
        if !taken.contains_key(field) {
            taken.insert(field.clone(), 1);
            out.push(field.clone());
            continue;
        }

        let mut n = taken[field] + 1;
        let mut candidate = format!("{field}_{n}");
        while taken.contains_key(&candidate) || fields.contains(&candidate) {
            n += 1;
            candidate = format!("{field}_{n}");
        }
        taken.insert(field.clone(), n);
        taken.insert(candidate.clone(), 1);
        out.push(candidate);
    }
    out
}
