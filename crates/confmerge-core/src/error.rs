/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for scanning, loading, reconciling and rendering.
//!
//! Only fatal conditions are errors. Row-level defects in a data file are
//! reported as [`SkippedRow`](crate::table::SkippedRow) values instead, so a
//! single bad row never aborts a batch.

use std::path::PathBuf;

use thiserror::Error;

use crate::placeholder::Placeholder;

/// Exit status used for I/O failures that carry no OS error code.
const IO_EXIT_CODE: u8 = 5;

/// Exit status used for every other fatal category.
const FAILURE_EXIT_CODE: u8 = 1;

/// Broad failure category, used to pick a process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// A file could not be read or written.
    Io,
    /// The data header or unique key is malformed or missing.
    Schema,
    /// Template and data placeholders differ.
    Mismatch,
    /// The operator supplied unusable input.
    Operator,
}

/// Errors that abort a merge or header-generation run.
#[derive(Debug, Error)]
pub enum MergeError {
    /// Reading or writing a file failed.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The tabular reader/writer failed on a whole-file level.
    #[error("{}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The data file has no header row at all.
    #[error("{}: the data file has no header row", path.display())]
    EmptyHeader { path: PathBuf },

    /// A header cell is not a well-formed placeholder.
    #[error(
        "{}: invalid header row, column {column} ('{cell}') is not a placeholder of the form <NAME>",
        path.display()
    )]
    InvalidHeaderCell {
        path: PathBuf,
        column: usize,
        cell: String,
    },

    /// The same placeholder heads more than one column.
    #[error(
        "{}: invalid header row, column {column} repeats {cell}",
        path.display()
    )]
    DuplicateHeaderCell {
        path: PathBuf,
        column: usize,
        cell: String,
    },

    /// The unique key name given by the operator cannot be used.
    #[error("invalid unique key name '{name}': {reason}")]
    InvalidKeyName { name: String, reason: String },

    /// The unique key placeholder is missing from a template or data header.
    #[error("{}: the unique key {key} was not found{}", path.display(), if *explicit { " (check the --key value)" } else { "" })]
    MissingUniqueKey {
        key: Placeholder,
        path: PathBuf,
        explicit: bool,
    },

    /// Template and data header placeholder sets differ.
    #[error("{}", format_mismatch(template_path, template_only, data_path, data_only))]
    SetMismatch {
        template_path: PathBuf,
        template_only: Vec<Placeholder>,
        data_path: PathBuf,
        data_only: Vec<Placeholder>,
    },

    /// Single mode needs one data row and the file has none.
    #[error("{}: no data row found after the header", path.display())]
    NoDataRow { path: PathBuf },

    /// Single mode cannot zip a row whose width differs from the header.
    #[error(
        "{}: line {line} has {found} cells but the header has {expected}",
        path.display()
    )]
    RowLengthMismatch {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    /// A confirmation prompt could not be answered.
    #[error("{message}")]
    Prompt { message: String },
}

impl MergeError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MergeError::Io {
            path: path.into(),
            source,
        }
    }

    /// The failure category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            MergeError::Io { .. } => ErrorCategory::Io,
            MergeError::Csv { source, .. } if source.is_io_error() => ErrorCategory::Io,
            MergeError::Csv { .. }
            | MergeError::EmptyHeader { .. }
            | MergeError::InvalidHeaderCell { .. }
            | MergeError::DuplicateHeaderCell { .. }
            | MergeError::MissingUniqueKey { .. }
            | MergeError::NoDataRow { .. }
            | MergeError::RowLengthMismatch { .. } => ErrorCategory::Schema,
            MergeError::SetMismatch { .. } => ErrorCategory::Mismatch,
            MergeError::InvalidKeyName { .. } | MergeError::Prompt { .. } => {
                ErrorCategory::Operator
            }
        }
    }

    /// Process exit status for this error.
    ///
    /// I/O failures propagate the OS error code when there is one that fits in
    /// an exit status; everything else exits with 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            MergeError::Io { source, .. } => os_exit_code(source),
            MergeError::Csv { source, .. } => match source.kind() {
                csv::ErrorKind::Io(err) => os_exit_code(err),
                _ => FAILURE_EXIT_CODE,
            },
            _ => FAILURE_EXIT_CODE,
        }
    }
}

fn os_exit_code(err: &std::io::Error) -> u8 {
    err.raw_os_error()
        .and_then(|code| u8::try_from(code).ok())
        .filter(|code| *code != 0)
        .unwrap_or(IO_EXIT_CODE)
}

fn format_mismatch(
    template_path: &std::path::Path,
    template_only: &[Placeholder],
    data_path: &std::path::Path,
    data_only: &[Placeholder],
) -> String {
    let mut parts = Vec::new();
    if !template_only.is_empty() {
        parts.push(format!(
            "{} only exists in {}",
            join_placeholders(template_only),
            template_path.display()
        ));
    }
    if !data_only.is_empty() {
        parts.push(format!(
            "{} only exists in {}",
            join_placeholders(data_only),
            data_path.display()
        ));
    }
    format!(
        "template and data placeholders differ: {}",
        parts.join("; ")
    )
}

fn join_placeholders(placeholders: &[Placeholder]) -> String {
    placeholders
        .iter()
        .map(Placeholder::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for merge operations.
pub type MergeResult<T> = Result<T, MergeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_exit_code_uses_os_error() {
        let err = MergeError::io("a.txt", std::io::Error::from_raw_os_error(2));
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.category(), ErrorCategory::Io);
    }

    #[test]
    fn test_io_exit_code_without_os_error() {
        let err = MergeError::io(
            "a.txt",
            std::io::Error::new(std::io::ErrorKind::InvalidData, "bad utf-8"),
        );
        assert_eq!(err.exit_code(), IO_EXIT_CODE);
    }

    #[test]
    fn test_mismatch_message_names_both_files() {
        let err = MergeError::SetMismatch {
            template_path: PathBuf::from("router.txt"),
            template_only: vec![Placeholder::parse("<B>").unwrap()],
            data_path: PathBuf::from("vars.csv"),
            data_only: vec![Placeholder::parse("<C>").unwrap()],
        };
        let message = err.to_string();
        assert!(message.contains("<B> only exists in router.txt"));
        assert!(message.contains("<C> only exists in vars.csv"));
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.category(), ErrorCategory::Mismatch);
    }

    #[test]
    fn test_missing_key_hint_only_when_explicit() {
        let key = Placeholder::parse("<NAME>").unwrap();
        let implicit = MergeError::MissingUniqueKey {
            key: key.clone(),
            path: PathBuf::from("t.txt"),
            explicit: false,
        };
        let explicit = MergeError::MissingUniqueKey {
            key,
            path: PathBuf::from("t.txt"),
            explicit: true,
        };
        assert!(!implicit.to_string().contains("--key"));
        assert!(explicit.to_string().contains("--key"));
    }
}
