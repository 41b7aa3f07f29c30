/*
 * reconcile.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template/data placeholder reconciliation.
//!
//! A keyed run may only start when the template and the data header name
//! exactly the same placeholders. A single-mode run only needs every data
//! column to name a template placeholder.

use std::path::Path;

use crate::error::{MergeError, MergeResult};
use crate::key::UniqueKey;
use crate::placeholder::{Placeholder, PlaceholderSet};

/// The two one-sided differences between a template and a data header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetDiff {
    pub template_only: Vec<Placeholder>,
    pub data_only: Vec<Placeholder>,
}

impl SetDiff {
    pub fn is_empty(&self) -> bool {
        self.template_only.is_empty() && self.data_only.is_empty()
    }
}

/// Compute both one-sided differences.
pub fn diff(template: &PlaceholderSet, data: &PlaceholderSet) -> SetDiff {
    SetDiff {
        template_only: template.difference(data),
        data_only: data.difference(template),
    }
}

/// Check that template and data placeholders match for a keyed run.
///
/// The key must also be present in both sets. Equality already implies that
/// when it is present in one, but an operator supplied key that appears in
/// neither would otherwise slip through.
pub fn reconcile(
    template: &PlaceholderSet,
    template_path: &Path,
    data: &PlaceholderSet,
    data_path: &Path,
    key: &UniqueKey,
) -> MergeResult<()> {
    tracing::debug!(
        "Comparing placeholders from {} and {}",
        template_path.display(),
        data_path.display()
    );

    let diff = diff(template, data);
    if !diff.is_empty() {
        return Err(mismatch(template_path, data_path, diff));
    }

    for (set, path) in [(template, template_path), (data, data_path)] {
        if !set.contains(key.placeholder()) {
            return Err(MergeError::MissingUniqueKey {
                key: key.placeholder().clone(),
                path: path.to_path_buf(),
                explicit: key.is_explicit(),
            });
        }
    }

    tracing::debug!(count = template.len(), "Placeholder sets match");
    Ok(())
}

/// Check data placeholders against the template for a single-mode run.
///
/// Every data column must name a template placeholder. Template placeholders
/// without a column are allowed and are left in the output as written.
pub fn reconcile_single(
    template: &PlaceholderSet,
    template_path: &Path,
    data: &PlaceholderSet,
    data_path: &Path,
) -> MergeResult<()> {
    let diff = SetDiff {
        template_only: Vec::new(),
        ..diff(template, data)
    };
    if !diff.is_empty() {
        return Err(mismatch(template_path, data_path, diff));
    }

    let unfilled = template.len() - data.len();
    if unfilled > 0 {
        tracing::debug!(unfilled, "Template placeholders without a data column are kept");
    }
    Ok(())
}

fn mismatch(template_path: &Path, data_path: &Path, diff: SetDiff) -> MergeError {
    MergeError::SetMismatch {
        template_path: template_path.to_path_buf(),
        template_only: diff.template_only,
        data_path: data_path.to_path_buf(),
        data_only: diff.data_only,
    }
}
