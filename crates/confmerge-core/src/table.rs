/*
 * table.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Tabular data loading.
//!
//! The data file is CSV. Its first row is a header whose cells are
//! placeholders; each following row holds one device's values, positionally
//! aligned to the header. Whole-file problems (unreadable file, malformed
//! header) are fatal. Problems with a single row are isolated to that row:
//! it is skipped, reported as a [`SkippedRow`], and loading continues.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::error::{MergeError, MergeResult};
use crate::key::UniqueKey;
use crate::placeholder::{Placeholder, PlaceholderSet};

/// Options controlling how a data file is read.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Reject header placeholders containing whitespace.
    pub strict: bool,
}

/// One device's values, keyed by placeholder in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    values: IndexMap<Placeholder, String>,
}

impl Record {
    pub fn get(&self, placeholder: &Placeholder) -> Option<&str> {
        self.values.get(placeholder).map(String::as_str)
    }

    /// Iterate `(placeholder, value)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&Placeholder, &str)> {
        self.values.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(Placeholder, String)> for Record {
    fn from_iter<I: IntoIterator<Item = (Placeholder, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Records keyed by their unique key value, in file order.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    records: IndexMap<String, Record>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record under `key`. Returns `false` and leaves the set unchanged
    /// if the key is already taken.
    pub fn insert(&mut self, key: impl Into<String>, record: Record) -> bool {
        match self.records.entry(key.into()) {
            indexmap::map::Entry::Occupied(_) => false,
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(record);
                true
            }
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Record> {
        self.records.get(key)
    }

    /// Iterate `(key value, record)` pairs in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Record)> {
        self.records.iter().map(|(k, r)| (k.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Why a data row was left out of the record set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The unique key cell is empty.
    EmptyKey,
    /// Another row already used this unique key value.
    DuplicateKey,
    /// The unique key value cannot be used as a file name.
    UnsafeKey,
    /// The row does not have one cell per header column.
    LengthMismatch { expected: usize, found: usize },
    /// The tabular reader could not decode the row.
    Malformed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::EmptyKey => write!(f, "the unique key cell is empty"),
            SkipReason::DuplicateKey => write!(f, "the unique key value is a duplicate"),
            SkipReason::UnsafeKey => {
                write!(f, "the unique key value cannot be used as a file name")
            }
            SkipReason::LengthMismatch { expected, found } => write!(
                f,
                "the row has {found} cells but the header has {expected}"
            ),
            SkipReason::Malformed(message) => write!(f, "the row could not be read: {message}"),
        }
    }
}

/// A data row that was skipped, with enough context to report it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line number in the data file.
    pub line: u64,
    /// The unique key cell, when the row had one.
    pub key: Option<String>,
    pub reason: SkipReason,
}

impl fmt::Display for SkippedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) if !key.is_empty() => {
                write!(f, "line {} ('{}'): {}", self.line, key, self.reason)
            }
            _ => write!(f, "line {}: {}", self.line, self.reason),
        }
    }
}

/// Result of loading keyed records: the accepted records and the rows skipped.
#[derive(Debug, Default)]
pub struct KeyedRecords {
    pub records: RecordSet,
    pub skipped: Vec<SkippedRow>,
}

#[derive(Debug)]
struct DataRow {
    line: u64,
    cells: Result<Vec<String>, csv::Error>,
}

/// A parsed data file: a validated header plus raw rows.
#[derive(Debug)]
pub struct DataTable {
    path: PathBuf,
    header: Vec<Placeholder>,
    rows: Vec<DataRow>,
}

impl DataTable {
    /// Read and validate a data file.
    pub fn load(path: &Path, options: &LoadOptions) -> MergeResult<Self> {
        let file = File::open(path).map_err(|e| MergeError::io(path, e))?;
        Self::from_reader(file, path, options)
    }

    /// Read and validate CSV data from any reader. `path` names it in diagnostics.
    pub fn from_reader<R: Read>(reader: R, path: &Path, options: &LoadOptions) -> MergeResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut rows_iter = reader.records();

        let header_record = match rows_iter.next() {
            None => {
                return Err(MergeError::EmptyHeader {
                    path: path.to_path_buf(),
                });
            }
            Some(Err(source)) => {
                return Err(MergeError::Csv {
                    path: path.to_path_buf(),
                    source,
                });
            }
            Some(Ok(record)) => record,
        };
        let header = parse_header(&header_record, path, options)?;

        let mut rows = Vec::new();
        for (index, result) in rows_iter.enumerate() {
            // Header is line 1; used only when the reader reports no position.
            let fallback_line = index as u64 + 2;
            match result {
                Ok(record) => rows.push(DataRow {
                    line: record.position().map_or(fallback_line, |p| p.line()),
                    cells: Ok(record.iter().map(str::to_string).collect()),
                }),
                Err(source) if source.is_io_error() => {
                    return Err(MergeError::Csv {
                        path: path.to_path_buf(),
                        source,
                    });
                }
                Err(source) => rows.push(DataRow {
                    line: source.position().map_or(fallback_line, |p| p.line()),
                    cells: Err(source),
                }),
            }
        }

        tracing::debug!(
            path = %path.display(),
            columns = header.len(),
            rows = rows.len(),
            "Loaded data file"
        );

        Ok(Self {
            path: path.to_path_buf(),
            header,
            rows,
        })
    }

    /// Header placeholders in column order.
    pub fn header(&self) -> &[Placeholder] {
        &self.header
    }

    /// Number of data rows after the header, including defective ones.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The placeholder set implied by the header row.
    pub fn placeholders(&self) -> PlaceholderSet {
        self.header.iter().cloned().collect()
    }

    /// Build one record per row, keyed by the unique key column.
    ///
    /// Rows with an empty, unsafe or duplicate key, and rows whose width does
    /// not match the header, are skipped with a warning. A skipped row never
    /// affects records accepted before or after it.
    pub fn keyed_records(self, key: &UniqueKey) -> MergeResult<KeyedRecords> {
        let key_column = self
            .header
            .iter()
            .position(|p| p == key.placeholder())
            .ok_or_else(|| MergeError::MissingUniqueKey {
                key: key.placeholder().clone(),
                path: self.path.clone(),
                explicit: key.is_explicit(),
            })?;

        let mut loaded = KeyedRecords::default();
        for row in self.rows {
            let cells = match row.cells {
                Ok(cells) => cells,
                Err(err) => {
                    loaded.skip(&self.path, row.line, None, SkipReason::Malformed(err.to_string()));
                    continue;
                }
            };
            let key_value = cells.get(key_column).cloned();

            if cells.len() != self.header.len() {
                let reason = SkipReason::LengthMismatch {
                    expected: self.header.len(),
                    found: cells.len(),
                };
                loaded.skip(&self.path, row.line, key_value, reason);
                continue;
            }

            // Width matches the header, so the key column is present.
            let key_value = key_value.unwrap_or_default();
            let reason = if key_value.is_empty() {
                Some(SkipReason::EmptyKey)
            } else if !is_safe_file_stem(&key_value) {
                Some(SkipReason::UnsafeKey)
            } else if loaded.records.contains_key(&key_value) {
                Some(SkipReason::DuplicateKey)
            } else {
                None
            };
            if let Some(reason) = reason {
                loaded.skip(&self.path, row.line, Some(key_value), reason);
                continue;
            }

            let record = self.header.iter().cloned().zip(cells).collect();
            loaded.records.insert(key_value, record);
        }
        Ok(loaded)
    }

    /// Build the single record used in single mode from the first data row.
    ///
    /// Rows after the first are ignored. A first row whose width differs from
    /// the header is an error, since zipping it would drop or invent values.
    pub fn single_record(self) -> MergeResult<Record> {
        let ignored = self.rows.len().saturating_sub(1);
        let row = self.rows.into_iter().next().ok_or_else(|| MergeError::NoDataRow {
            path: self.path.clone(),
        })?;
        let cells = row.cells.map_err(|source| MergeError::Csv {
            path: self.path.clone(),
            source,
        })?;
        if cells.len() != self.header.len() {
            return Err(MergeError::RowLengthMismatch {
                path: self.path,
                line: row.line,
                expected: self.header.len(),
                found: cells.len(),
            });
        }
        if ignored > 0 {
            tracing::debug!(ignored, "Single mode uses the first data row only");
        }
        Ok(self.header.into_iter().zip(cells).collect())
    }
}

impl KeyedRecords {
    fn skip(&mut self, path: &Path, line: u64, key: Option<String>, reason: SkipReason) {
        let skipped = SkippedRow { line, key, reason };
        tracing::warn!("Skipping row in {}: {}", path.display(), skipped);
        self.skipped.push(skipped);
    }
}

fn parse_header(
    record: &csv::StringRecord,
    path: &Path,
    options: &LoadOptions,
) -> MergeResult<Vec<Placeholder>> {
    let mut header: Vec<Placeholder> = Vec::with_capacity(record.len());
    for (index, cell) in record.iter().enumerate() {
        let parsed = if options.strict {
            Placeholder::parse_strict(cell)
        } else {
            Placeholder::parse(cell)
        };
        let placeholder = parsed.map_err(|_| MergeError::InvalidHeaderCell {
            path: path.to_path_buf(),
            column: index + 1,
            cell: cell.to_string(),
        })?;
        if header.contains(&placeholder) {
            return Err(MergeError::DuplicateHeaderCell {
                path: path.to_path_buf(),
                column: index + 1,
                cell: cell.to_string(),
            });
        }
        header.push(placeholder);
    }
    Ok(header)
}

fn is_safe_file_stem(value: &str) -> bool {
    value != "." && value != ".." && !value.contains(['/', '\\', '\0'])
}
