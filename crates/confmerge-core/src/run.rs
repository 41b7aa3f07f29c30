/*
 * run.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! End-to-end operations: render configs from a data file, or generate a
//! data-file header from a template.
//!
//! Every whole-file check (template readable, header valid, placeholder sets
//! reconciled, key present) runs before the first output file is created, so
//! a doomed run leaves no partial output behind.

use std::path::Path;

use crate::confirm::Confirm;
use crate::error::MergeResult;
use crate::header::{self, HeaderOutcome};
use crate::key::UniqueKey;
use crate::reconcile::{reconcile, reconcile_single};
use crate::render::{RenderOptions, RenderSummary, Renderer};
use crate::scanner;
use crate::table::{DataTable, LoadOptions, SkippedRow};
use crate::template::Template;

/// How records are formed and named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeMode {
    /// One output per data row, named by the row's unique key value.
    Keyed(UniqueKey),
    /// Exactly one output from the first data row, named after the template.
    Single,
}

impl Default for MergeMode {
    fn default() -> Self {
        MergeMode::Keyed(UniqueKey::default())
    }
}

/// Options for [`merge`].
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    pub mode: MergeMode,
    pub load: LoadOptions,
    pub render: RenderOptions,
}

/// Result of a successful [`merge`].
#[derive(Debug, Clone, Default)]
pub struct MergeReport {
    pub summary: RenderSummary,
    /// Data rows left out, each already logged as a warning.
    pub skipped: Vec<SkippedRow>,
}

/// Render configuration files from a template and a data file.
pub fn merge(
    template_path: &Path,
    data_path: &Path,
    options: &MergeOptions,
) -> MergeResult<MergeReport> {
    let template = Template::load(template_path)?;
    let table = DataTable::load(data_path, &options.load)?;

    let template_set = template.placeholders();
    let data_set = table.placeholders();
    let renderer = Renderer::new(&template, &options.render);
    match &options.mode {
        MergeMode::Keyed(key) => {
            reconcile(&template_set, template_path, &data_set, data_path, key)?;
            let loaded = table.keyed_records(key)?;
            let summary = renderer.render_all(&loaded.records)?;
            Ok(MergeReport {
                summary,
                skipped: loaded.skipped,
            })
        }
        MergeMode::Single => {
            reconcile_single(&template_set, template_path, &data_set, data_path)?;
            let record = table.single_record()?;
            let summary = renderer.render_single(&record)?;
            Ok(MergeReport {
                summary,
                skipped: Vec::new(),
            })
        }
    }
}

/// Options for [`create_header`].
#[derive(Debug, Clone, Default)]
pub struct HeaderOptions {
    pub key: UniqueKey,
    /// Stub device rows to append after the header.
    pub stub_rows: usize,
    /// List the discovered placeholders and ask before writing anything.
    pub review: bool,
}

/// Generate a data-file header from a template's placeholders.
///
/// The unique key is checked before the review prompt, so a run that cannot
/// succeed never asks the operator anything.
pub fn create_header(
    template_path: &Path,
    destination: &Path,
    options: &HeaderOptions,
    confirm: &mut dyn Confirm,
) -> MergeResult<HeaderOutcome> {
    let placeholders = scanner::scan_file(template_path)?;
    let row = header::header_row(&placeholders, &options.key, template_path)?;

    if options.review {
        let mut listing = format!(
            "The following placeholders were found in {}:",
            template_path.display()
        );
        for placeholder in &placeholders {
            listing.push_str("\n  ");
            listing.push_str(placeholder.as_str());
        }
        confirm.inform(&listing)?;
        if !confirm.confirm("Do you want to continue? (y/n)")? {
            return Ok(HeaderOutcome::Declined);
        }
    }

    header::write_header_file(&row, destination, options.stub_rows, confirm)
}
