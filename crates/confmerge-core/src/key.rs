/*
 * key.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The unique key placeholder that names each rendered file.

use crate::error::{MergeError, MergeResult};
use crate::placeholder::{CLOSE, OPEN, Placeholder};

/// Key name used when the operator does not pick one.
pub const DEFAULT_KEY_NAME: &str = "HOSTNAME";

/// The placeholder whose value identifies a record and names its output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueKey {
    placeholder: Placeholder,
    explicit: bool,
}

impl UniqueKey {
    /// Build a key from an operator-supplied bare name such as `SWITCHNAME`.
    ///
    /// The name is wrapped in `<` `>` before use, so it must not contain
    /// either delimiter itself.
    pub fn from_name(name: &str) -> MergeResult<Self> {
        let reason = if name.is_empty() {
            Some("the name is empty")
        } else if name.contains(OPEN) || name.contains(CLOSE) {
            Some("the name must not contain '<' or '>'")
        } else if name.chars().any(char::is_whitespace) {
            Some("the name must not contain whitespace")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(MergeError::InvalidKeyName {
                name: name.to_string(),
                reason: reason.to_string(),
            });
        }
        Ok(Self {
            placeholder: Placeholder::wrap(name),
            explicit: true,
        })
    }

    /// The placeholder form of the key, e.g. `<HOSTNAME>`.
    pub fn placeholder(&self) -> &Placeholder {
        &self.placeholder
    }

    /// Whether the operator chose this key rather than accepting the default.
    pub fn is_explicit(&self) -> bool {
        self.explicit
    }
}

impl Default for UniqueKey {
    fn default() -> Self {
        Self {
            placeholder: Placeholder::wrap(DEFAULT_KEY_NAME),
            explicit: false,
        }
    }
}
