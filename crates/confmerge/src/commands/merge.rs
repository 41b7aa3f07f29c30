/*
 * merge.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Render command implementation
 */

//! Render configuration files from a template and a CSV data file.

use std::path::PathBuf;

use anyhow::Result;
use tracing::{info, warn};

use confmerge_core::{LoadOptions, MergeMode, MergeOptions, RenderOptions, UniqueKey, merge};

use super::Outcome;

/// Arguments for the render command
#[derive(Debug)]
pub struct MergeArgs {
    /// Template file
    pub template: PathBuf,
    /// CSV data file
    pub data: PathBuf,
    /// Render one merged output instead of one per row
    pub single: bool,
    /// Operator-supplied unique key name
    pub key: Option<String>,
    /// Output directory
    pub output_dir: PathBuf,
    /// Output extension for keyed files
    pub extension: String,
    /// Reject whitespace inside header placeholders
    pub strict: bool,
}

impl MergeArgs {
    /// Build core options. Validates the key name before any file is touched.
    fn to_options(&self) -> Result<MergeOptions> {
        let mode = if self.single {
            MergeMode::Single
        } else {
            let key = match &self.key {
                Some(name) => UniqueKey::from_name(name)?,
                None => UniqueKey::default(),
            };
            MergeMode::Keyed(key)
        };
        Ok(MergeOptions {
            mode,
            load: LoadOptions {
                strict: self.strict,
            },
            render: RenderOptions {
                output_dir: self.output_dir.clone(),
                extension: self.extension.trim_start_matches('.').to_string(),
            },
        })
    }
}

/// Execute the render command
pub fn execute(args: MergeArgs) -> Result<Outcome> {
    let options = args.to_options()?;

    info!(
        "Merging {} with {}",
        args.template.display(),
        args.data.display()
    );
    let report = merge(&args.template, &args.data, &options)?;

    if !report.skipped.is_empty() {
        warn!(
            "{} row(s) in {} were skipped",
            report.skipped.len(),
            args.data.display()
        );
    }
    println!(
        "Successfully exported {} configuration files.",
        report.summary.count()
    );
    Ok(Outcome::Completed)
}
