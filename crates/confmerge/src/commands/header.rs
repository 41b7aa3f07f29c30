/*
 * header.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Header generation command implementation
 */

//! Generate a CSV header from a template's placeholders.

use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use confmerge_core::{
    AssumeYes, Confirm, HeaderOptions, HeaderOutcome, UniqueKey, create_header,
};

use super::Outcome;
use crate::prompt::TerminalConfirm;

/// Arguments for the header command
#[derive(Debug)]
pub struct HeaderArgs {
    /// Template file
    pub template: PathBuf,
    /// CSV file to create
    pub destination: PathBuf,
    /// Operator-supplied unique key name
    pub key: Option<String>,
    /// Stub device rows to append
    pub stub_rows: usize,
    /// Review the placeholders before writing
    pub review: bool,
    /// Skip confirmation prompts
    pub assume_yes: bool,
}

/// Execute the header command
pub fn execute(args: HeaderArgs) -> Result<Outcome> {
    let key = match &args.key {
        Some(name) => UniqueKey::from_name(name)?,
        None => UniqueKey::default(),
    };
    let options = HeaderOptions {
        key,
        stub_rows: args.stub_rows,
        review: args.review,
    };

    let mut confirm: Box<dyn Confirm> = if args.assume_yes {
        Box::new(AssumeYes)
    } else {
        Box::new(TerminalConfirm::stdio())
    };

    match create_header(&args.template, &args.destination, &options, confirm.as_mut())? {
        HeaderOutcome::Written {
            path, stub_rows, ..
        } => {
            if stub_rows > 0 {
                info!("{stub_rows} stub row(s) added");
            }
            println!("File {} was successfully created.", path.display());
            Ok(Outcome::Completed)
        }
        HeaderOutcome::Declined => {
            info!("Exiting without changes.");
            Ok(Outcome::Declined)
        }
    }
}
