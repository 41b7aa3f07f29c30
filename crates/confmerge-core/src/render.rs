/*
 * render.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template rendering.
//!
//! Each record is rendered against the template line by line. For every
//! placeholder in the record that occurs on a line:
//!
//! - a non-empty value replaces every occurrence of the placeholder;
//! - an empty value deletes the **whole line** from the output.
//!
//! Occurrences are the same `<...>` tokens the scanner reports, compared
//! literally with the record's placeholders. Substitution does not cascade:
//! a value containing placeholder text is copied through verbatim.
//!
//! The deletion rule wins over substitution: if any matched placeholder on a
//! line has an empty value, nothing derived from that line is written, even
//! when other placeholders on it had values.
//!
//! Renders share nothing but the read-only [`Template`], so the output for a
//! record never depends on which records were rendered before it.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{MergeError, MergeResult};
use crate::placeholder::Placeholder;
use crate::scanner;
use crate::table::{Record, RecordSet};
use crate::template::Template;

/// Suffix added to the template's base name in single mode.
pub const MERGED_SUFFIX: &str = "-merged";

/// Default directory for rendered files.
pub const DEFAULT_OUTPUT_DIR: &str = "configs";

/// Default extension for files named after a unique key value.
pub const DEFAULT_EXTENSION: &str = "txt";

/// Where and how rendered files are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Directory receiving every output file; created on demand.
    pub output_dir: PathBuf,
    /// Extension for keyed outputs, without the leading dot. Empty means none.
    pub extension: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

/// The fate of one template line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedLine {
    /// Written with all substitutions applied.
    Kept(String),
    /// Deleted because `by` matched and its value is empty.
    Suppressed { by: Placeholder },
}

/// Render a single line against a record.
///
/// Placeholders are located once in the original line and replaced in a
/// single left-to-right pass, so a value that contains placeholder text is
/// written as-is and never substituted again. The result does not depend on
/// the order of the record's columns. Placeholders the record does not hold
/// are left untouched.
pub fn render_line(line: &str, record: &Record) -> RenderedLine {
    let mut rendered = String::with_capacity(line.len());
    let mut copied_up_to = 0;
    for (span, placeholder) in scanner::find_spans(line) {
        let Some(value) = record.get(&placeholder) else {
            continue;
        };
        if value.is_empty() {
            return RenderedLine::Suppressed { by: placeholder };
        }
        rendered.push_str(&line[copied_up_to..span.start]);
        rendered.push_str(value);
        copied_up_to = span.end;
    }
    rendered.push_str(&line[copied_up_to..]);
    RenderedLine::Kept(rendered)
}

/// Line counts for one rendered output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub lines_written: usize,
    pub lines_suppressed: usize,
}

/// Render `template` for `record` into any writer.
pub fn render_record<W: Write>(
    template: &Template,
    record: &Record,
    out: &mut W,
) -> io::Result<RenderStats> {
    let mut stats = RenderStats::default();
    for (index, line) in template.lines().iter().enumerate() {
        let line_number = index + 1;
        match render_line(line, record) {
            RenderedLine::Kept(text) => {
                if text != *line {
                    tracing::trace!(line = line_number, "Substituted: {}", text.trim_end());
                }
                out.write_all(text.as_bytes())?;
                stats.lines_written += 1;
            }
            RenderedLine::Suppressed { by } => {
                tracing::trace!(
                    line = line_number,
                    "Empty value for {by}, removed line '{}'",
                    line.trim_end()
                );
                stats.lines_suppressed += 1;
            }
        }
    }
    Ok(stats)
}

/// Files written by a render run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderSummary {
    pub written: Vec<PathBuf>,
}

impl RenderSummary {
    /// Number of files successfully written.
    pub fn count(&self) -> usize {
        self.written.len()
    }
}

/// File name used in single mode: the template's base name plus
/// [`MERGED_SUFFIX`], keeping the template's own extension.
///
/// `router.cfg` becomes `router-merged.cfg`; `router` becomes `router-merged`.
pub fn single_output_name(template_path: &Path) -> String {
    let stem = template_path.file_stem().map_or_else(
        || "template".to_string(),
        |s| s.to_string_lossy().into_owned(),
    );
    match template_path.extension() {
        Some(ext) => format!("{stem}{MERGED_SUFFIX}.{}", ext.to_string_lossy()),
        None => format!("{stem}{MERGED_SUFFIX}"),
    }
}

/// Writes rendered records to an output directory.
#[derive(Debug)]
pub struct Renderer<'a> {
    template: &'a Template,
    options: &'a RenderOptions,
}

impl<'a> Renderer<'a> {
    pub fn new(template: &'a Template, options: &'a RenderOptions) -> Self {
        Self { template, options }
    }

    /// Output path for a record with the given unique key value.
    pub fn keyed_output_path(&self, key_value: &str) -> PathBuf {
        let file_name = if self.options.extension.is_empty() {
            key_value.to_string()
        } else {
            format!("{key_value}.{}", self.options.extension)
        };
        self.options.output_dir.join(file_name)
    }

    /// Output path used in single mode.
    pub fn single_output_path(&self) -> PathBuf {
        self.options
            .output_dir
            .join(single_output_name(self.template.path()))
    }

    /// Render one file per record, named after its unique key value.
    ///
    /// Existing files with the same name are overwritten.
    pub fn render_all(&self, records: &RecordSet) -> MergeResult<RenderSummary> {
        self.ensure_output_dir()?;
        let mut summary = RenderSummary::default();
        for (key_value, record) in records.iter() {
            let path = self.keyed_output_path(key_value);
            self.write_one(&path, record)?;
            summary.written.push(path);
        }
        Ok(summary)
    }

    /// Render the single-mode output.
    pub fn render_single(&self, record: &Record) -> MergeResult<RenderSummary> {
        self.ensure_output_dir()?;
        let path = self.single_output_path();
        self.write_one(&path, record)?;
        Ok(RenderSummary {
            written: vec![path],
        })
    }

    fn ensure_output_dir(&self) -> MergeResult<()> {
        // create_dir_all treats an existing directory as success.
        std::fs::create_dir_all(&self.options.output_dir)
            .map_err(|e| MergeError::io(&self.options.output_dir, e))
    }

    fn write_one(&self, path: &Path, record: &Record) -> MergeResult<()> {
        tracing::debug!("Starting write of file {}", path.display());
        let file = File::create(path).map_err(|e| MergeError::io(path, e))?;
        let mut out = BufWriter::new(file);
        let stats = render_record(self.template, record, &mut out)
            .and_then(|stats| out.flush().map(|()| stats))
            .map_err(|e| MergeError::io(path, e))?;
        tracing::debug!(
            written = stats.lines_written,
            suppressed = stats.lines_suppressed,
            "Completed {}",
            path.display()
        );
        Ok(())
    }
}
