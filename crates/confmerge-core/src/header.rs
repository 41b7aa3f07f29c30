/*
 * header.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Data-file header generation.
//!
//! Produces a CSV whose header row lists a template's placeholders with the
//! unique key in column one and the rest sorted by their literal text, ready
//! for an operator to fill in one row per device.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::confirm::Confirm;
use crate::error::{MergeError, MergeResult};
use crate::key::UniqueKey;
use crate::placeholder::{Placeholder, PlaceholderSet};

/// What a header generation run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderOutcome {
    /// The file was written.
    Written {
        path: PathBuf,
        columns: usize,
        stub_rows: usize,
    },
    /// The destination existed and the operator chose not to overwrite it.
    Declined,
}

/// Order a placeholder set for use as a header row.
///
/// The unique key comes first and the remaining placeholders follow in
/// literal text order. Fails if the key is not in the set.
pub fn header_row(
    placeholders: &PlaceholderSet,
    key: &UniqueKey,
    template_path: &Path,
) -> MergeResult<Vec<Placeholder>> {
    if !placeholders.contains(key.placeholder()) {
        return Err(MergeError::MissingUniqueKey {
            key: key.placeholder().clone(),
            path: template_path.to_path_buf(),
            explicit: key.is_explicit(),
        });
    }
    let mut row = Vec::with_capacity(placeholders.len());
    row.push(key.placeholder().clone());
    // PlaceholderSet iterates in text order already.
    row.extend(
        placeholders
            .iter()
            .filter(|p| *p != key.placeholder())
            .cloned(),
    );
    Ok(row)
}

/// Key value written into stub row `n` (1-based).
pub fn stub_key_value(n: usize) -> String {
    format!("Host{n}-Router")
}

/// Write a header row plus `stub_rows` stub rows as CSV.
///
/// Each stub row carries a placeholder device name under the key column and
/// empty cells everywhere else.
pub fn write_header<W: Write>(row: &[Placeholder], stub_rows: usize, out: W) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(row.iter().map(Placeholder::as_str))?;
    for n in 1..=stub_rows {
        let key_value = stub_key_value(n);
        let cells = std::iter::once(key_value.as_str())
            .chain(std::iter::repeat_n("", row.len().saturating_sub(1)));
        writer.write_record(cells)?;
    }
    writer.flush()?;
    Ok(())
}

/// Generate a header file for a template's placeholders.
///
/// If `destination` already exists, `confirm` is asked before it is
/// overwritten; declining leaves the file untouched. The key is checked
/// before any prompt so a doomed run never asks.
pub fn generate_header(
    placeholders: &PlaceholderSet,
    key: &UniqueKey,
    template_path: &Path,
    destination: &Path,
    stub_rows: usize,
    confirm: &mut dyn Confirm,
) -> MergeResult<HeaderOutcome> {
    let row = header_row(placeholders, key, template_path)?;
    write_header_file(&row, destination, stub_rows, confirm)
}

/// Write an already ordered header row to `destination`, asking before an
/// existing file is overwritten.
pub fn write_header_file(
    row: &[Placeholder],
    destination: &Path,
    stub_rows: usize,
    confirm: &mut dyn Confirm,
) -> MergeResult<HeaderOutcome> {
    let exists = destination
        .try_exists()
        .map_err(|e| MergeError::io(destination, e))?;
    if exists {
        let prompt = format!(
            "The file {} already exists.  Overwrite? (y/n)",
            destination.display()
        );
        if !confirm.confirm(&prompt)? {
            tracing::debug!("Overwrite of {} declined", destination.display());
            return Ok(HeaderOutcome::Declined);
        }
    }

    let file =
        std::fs::File::create(destination).map_err(|e| MergeError::io(destination, e))?;
    write_header(row, stub_rows, file).map_err(|source| MergeError::Csv {
        path: destination.to_path_buf(),
        source,
    })?;

    tracing::debug!(
        columns = row.len(),
        stub_rows,
        "Wrote header to {}",
        destination.display()
    );
    Ok(HeaderOutcome::Written {
        path: destination.to_path_buf(),
        columns: row.len(),
        stub_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::{AssumeNo, ScriptedConfirm};
    use crate::scanner::scan_str;
    use pretty_assertions::assert_eq;

    fn names(row: &[Placeholder]) -> Vec<&str> {
        row.iter().map(Placeholder::as_str).collect()
    }

    #[test]
    fn test_key_first_then_alphabetical() {
        let set = scan_str("<ZONE> <HOSTNAME> <ACL> <IP>");
        let row = header_row(&set, &UniqueKey::default(), Path::new("t.txt")).unwrap();
        assert_eq!(names(&row), vec!["<HOSTNAME>", "<ACL>", "<IP>", "<ZONE>"]);
    }

    #[test]
    fn test_missing_key_is_error() {
        let set = scan_str("<IP> <MASK>");
        let err = header_row(&set, &UniqueKey::default(), Path::new("t.txt")).unwrap_err();
        assert!(matches!(err, MergeError::MissingUniqueKey { .. }));
    }

    #[test]
    fn test_custom_key_goes_first() {
        let set = scan_str("<HOSTNAME> <SWITCH>");
        let key = UniqueKey::from_name("SWITCH").unwrap();
        let row = header_row(&set, &key, Path::new("t.txt")).unwrap();
        assert_eq!(names(&row), vec!["<SWITCH>", "<HOSTNAME>"]);
    }

    #[test]
    fn test_write_header_with_stub_rows() {
        let row = vec![
            Placeholder::parse("<HOSTNAME>").unwrap(),
            Placeholder::parse("<IP>").unwrap(),
            Placeholder::parse("<MASK>").unwrap(),
        ];
        let mut out = Vec::new();
        write_header(&row, 2, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "<HOSTNAME>,<IP>,<MASK>\nHost1-Router,,\nHost2-Router,,\n"
        );
    }

    #[test]
    fn test_existing_file_declined_is_untouched() {
        let dir = tempfile::TempDir::new().unwrap();
        let dest = dir.path().join("vars.csv");
        std::fs::write(&dest, "keep me\n").unwrap();

        let set = scan_str("<HOSTNAME>");
        let outcome = generate_header(
            &set,
            &UniqueKey::default(),
            Path::new("t.txt"),
            &dest,
            0,
            &mut AssumeNo,
        )
        .unwrap();
        assert_eq!(outcome, HeaderOutcome::Declined);
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "keep me\n");
    }

    #[test]
    fn test_existing_file_overwritten_when_confirmed() {
        let dir = tempfile::TempDir::new().unwrap();
        let dest = dir.path().join("vars.csv");
        std::fs::write(&dest, "old\n").unwrap();

        let mut confirm = ScriptedConfirm::new([true]);
        let set = scan_str("<HOSTNAME> <IP>");
        generate_header(
            &set,
            &UniqueKey::default(),
            Path::new("t.txt"),
            &dest,
            0,
            &mut confirm,
        )
        .unwrap();
        assert_eq!(confirm.prompts().len(), 1);
        assert!(confirm.prompts()[0].contains("already exists"));
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "<HOSTNAME>,<IP>\n");
    }

    #[test]
    fn test_new_file_needs_no_confirmation() {
        let dir = tempfile::TempDir::new().unwrap();
        let dest = dir.path().join("vars.csv");
        // An empty script fails on any prompt.
        let mut confirm = ScriptedConfirm::new(Vec::new());
        let outcome = generate_header(
            &scan_str("<HOSTNAME>"),
            &UniqueKey::default(),
            Path::new("t.txt"),
            &dest,
            0,
            &mut confirm,
        )
        .unwrap();
        assert!(matches!(outcome, HeaderOutcome::Written { columns: 1, .. }));
    }
}
