/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Placeholder discovery and template merge engine.
//!
//! One configuration template plus one CSV of per-device values yields one
//! configuration file per device:
//!
//! - Placeholders are `<NAME>` tokens, matched literally and case-sensitively.
//! - The CSV header names the placeholders; each row is one device.
//! - The template and the header must use exactly the same placeholders.
//! - A unique key column (default `<HOSTNAME>`) names each output file.
//! - An empty cell removes every template line that uses its placeholder.
//!
//! # Example
//!
//! ```ignore
//! use confmerge_core::{MergeOptions, merge};
//!
//! let report = merge(
//!     Path::new("router.txt"),
//!     Path::new("routers.csv"),
//!     &MergeOptions::default(),
//! )?;
//! println!("Successfully exported {} configuration files.", report.summary.count());
//! ```

pub mod confirm;
pub mod error;
pub mod header;
pub mod key;
pub mod placeholder;
pub mod reconcile;
pub mod render;
pub mod run;
pub mod scanner;
pub mod table;
pub mod template;

// Re-export main types at crate root
pub use confirm::{AssumeNo, AssumeYes, Confirm, ScriptedConfirm};
pub use error::{ErrorCategory, MergeError, MergeResult};
pub use header::{HeaderOutcome, generate_header, header_row, write_header_file};
pub use key::{DEFAULT_KEY_NAME, UniqueKey};
pub use placeholder::{Placeholder, PlaceholderDefect, PlaceholderSet};
pub use reconcile::{SetDiff, reconcile, reconcile_single};
pub use render::{RenderOptions, RenderSummary, RenderedLine, Renderer, render_line, render_record};
pub use run::{HeaderOptions, MergeMode, MergeOptions, MergeReport, create_header, merge};
pub use scanner::{scan_file, scan_str};
pub use table::{DataTable, KeyedRecords, LoadOptions, Record, RecordSet, SkipReason, SkippedRow};
pub use template::Template;
