/*
 * template.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Configuration templates held in memory.

use std::path::{Path, PathBuf};

use crate::error::{MergeError, MergeResult};
use crate::placeholder::PlaceholderSet;
use crate::scanner;

/// A template loaded once and shared read-only by every render.
///
/// Lines keep their original terminators, so a line with no placeholders
/// is reproduced byte-for-byte.
#[derive(Debug, Clone)]
pub struct Template {
    path: PathBuf,
    lines: Vec<String>,
}

impl Template {
    /// Load a template file.
    pub fn load(path: &Path) -> MergeResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| MergeError::io(path, e))?;
        Ok(Self::from_text(path, &text))
    }

    /// Build a template from text. `path` is used for naming outputs and in
    /// diagnostics; nothing is read from it.
    pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Self {
        Self {
            path: path.into(),
            lines: text.split_inclusive('\n').map(str::to_string).collect(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lines including their terminators.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The distinct placeholders used anywhere in the template.
    pub fn placeholders(&self) -> PlaceholderSet {
        self.lines
            .iter()
            .flat_map(|line| scanner::find_in_line(line))
            .collect()
    }
}
