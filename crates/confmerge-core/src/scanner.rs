/*
 * scanner.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Placeholder discovery.
//!
//! Any run of characters between a `<` and the next `>` on the same line is
//! a placeholder. Several placeholders may share one line.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::ops::Range;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{MergeError, MergeResult};
use crate::placeholder::{CLOSE, OPEN, Placeholder, PlaceholderSet};

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>\n]*>").expect("placeholder pattern is valid"));

/// Every placeholder occurrence in `line`, left to right, duplicates included.
pub fn find_in_line(line: &str) -> impl Iterator<Item = Placeholder> + '_ {
    find_spans(line).map(|(_, placeholder)| placeholder)
}

/// Like [`find_in_line`], with the byte range each occurrence covers.
///
/// Occurrences never overlap.
pub fn find_spans(line: &str) -> impl Iterator<Item = (Range<usize>, Placeholder)> + '_ {
    PLACEHOLDER_RE.find_iter(line).map(|m| {
        let token = m.as_str();
        (
            m.range(),
            Placeholder::wrap(&token[OPEN.len_utf8()..token.len() - CLOSE.len_utf8()]),
        )
    })
}

/// Collect the distinct placeholders in a string.
pub fn scan_str(text: &str) -> PlaceholderSet {
    text.lines().flat_map(find_in_line).collect()
}

/// Collect the distinct placeholders in a line-oriented reader.
///
/// `source` names the reader in error messages.
pub fn scan_reader<R: BufRead>(reader: R, source: &Path) -> MergeResult<PlaceholderSet> {
    let mut found = PlaceholderSet::new();
    for line in reader.lines() {
        let line = line.map_err(|e| MergeError::io(source, e))?;
        for placeholder in find_in_line(&line) {
            found.insert(placeholder);
        }
    }
    Ok(found)
}

/// Collect the distinct placeholders in a file.
///
/// A missing or unreadable file is an error naming the path, never an empty set.
pub fn scan_file(path: &Path) -> MergeResult<PlaceholderSet> {
    let file = File::open(path).map_err(|e| MergeError::io(path, e))?;
    let found = scan_reader(BufReader::new(file), path)?;
    tracing::debug!(path = %path.display(), count = found.len(), "Scanned placeholders");
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(set: &PlaceholderSet) -> Vec<&str> {
        set.iter().map(Placeholder::as_str).collect()
    }

    #[test]
    fn test_multiple_placeholders_per_line() {
        let set = scan_str("ip address <INSIDE_IP> <INSIDE_MASK>\n");
        assert_eq!(names(&set), vec!["<INSIDE_IP>", "<INSIDE_MASK>"]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let set = scan_str("hostname <HOSTNAME>\n! <HOSTNAME> <HOSTNAME>\nbanner <HOSTNAME>\n");
        assert_eq!(names(&set), vec!["<HOSTNAME>"]);
    }

    #[test]
    fn test_match_stops_at_first_close() {
        let set = scan_str("a <X>> b <<Y>");
        assert_eq!(names(&set), vec!["<<Y>", "<X>"]);
    }

    #[test]
    fn test_placeholder_with_spaces_is_found() {
        let set = scan_str("description <SITE NAME>");
        assert_eq!(names(&set), vec!["<SITE NAME>"]);
    }

    #[test]
    fn test_unterminated_does_not_span_lines() {
        let set = scan_str("interface <IF\nname>\n");
        assert!(set.is_empty());
    }

    #[test]
    fn test_spans_cover_tokens() {
        let line = "ip <IP> <MASK>";
        let spans: Vec<_> = find_spans(line)
            .map(|(range, p)| (&line[range], p.as_str().to_string()))
            .collect();
        assert_eq!(
            spans,
            vec![
                ("<IP>", "<IP>".to_string()),
                ("<MASK>", "<MASK>".to_string())
            ]
        );
    }

    #[test]
    fn test_case_sensitive() {
        let set = scan_str("<ip> <IP>");
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_scan_missing_file_is_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("nope.txt");
        let err = scan_file(&missing).unwrap_err();
        match err {
            MergeError::Io { path, source } => {
                assert_eq!(path, missing);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected I/O error, got {other:?}"),
        }
    }
}
