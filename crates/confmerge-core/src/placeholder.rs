/*
 * placeholder.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Placeholder tokens and placeholder sets.
//!
//! A placeholder is a literal token delimited by `<` and `>`, such as
//! `<HOSTNAME>`. Placeholders compare byte-for-byte, so `<Ip>` and `<IP>`
//! are different placeholders.

use std::collections::BTreeSet;
use std::fmt;

/// Opening delimiter of a placeholder.
pub const OPEN: char = '<';

/// Closing delimiter of a placeholder.
pub const CLOSE: char = '>';

/// A single `<NAME>` token, stored with its delimiters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Placeholder(String);

/// Reasons a piece of text is not a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderDefect {
    /// Text does not start with `<` and end with `>`.
    Undelimited,
    /// A delimiter appears between the outer pair.
    NestedDelimiter,
    /// Whitespace appears between the delimiters.
    Whitespace,
}

impl Placeholder {
    /// Parse a complete placeholder token, delimiters included.
    ///
    /// The token must start with `<`, end with `>` and contain no further
    /// `>` in between, which is exactly what the scanner produces. Internal
    /// whitespace is accepted here; see [`Placeholder::parse_strict`].
    pub fn parse(text: &str) -> Result<Self, PlaceholderDefect> {
        let inner = text
            .strip_prefix(OPEN)
            .and_then(|rest| rest.strip_suffix(CLOSE))
            .ok_or(PlaceholderDefect::Undelimited)?;
        if inner.contains(CLOSE) {
            return Err(PlaceholderDefect::NestedDelimiter);
        }
        Ok(Placeholder(text.to_string()))
    }

    /// Parse a placeholder and additionally reject internal whitespace.
    pub fn parse_strict(text: &str) -> Result<Self, PlaceholderDefect> {
        let placeholder = Self::parse(text)?;
        if placeholder.name().chars().any(char::is_whitespace) {
            return Err(PlaceholderDefect::Whitespace);
        }
        Ok(placeholder)
    }

    /// Wrap a bare name in delimiters without validation.
    ///
    /// Callers must have checked that `name` contains no delimiter.
    pub(crate) fn wrap(name: &str) -> Self {
        Placeholder(format!("{OPEN}{name}{CLOSE}"))
    }

    /// The full token text, delimiters included.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The text between the delimiters.
    pub fn name(&self) -> &str {
        &self.0[OPEN.len_utf8()..self.0.len() - CLOSE.len_utf8()]
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Placeholder {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The distinct placeholders found in one text source.
///
/// Backed by a sorted set so iteration is deterministic (ordered by the
/// literal token text), even though only membership is meaningful.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderSet {
    items: BTreeSet<Placeholder>,
}

impl PlaceholderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a placeholder. Returns `false` if it was already present.
    pub fn insert(&mut self, placeholder: Placeholder) -> bool {
        self.items.insert(placeholder)
    }

    pub fn contains(&self, placeholder: &Placeholder) -> bool {
        self.items.contains(placeholder)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate in literal text order.
    pub fn iter(&self) -> impl Iterator<Item = &Placeholder> {
        self.items.iter()
    }

    /// Placeholders in `self` that are not in `other`, in text order.
    pub fn difference(&self, other: &PlaceholderSet) -> Vec<Placeholder> {
        self.items.difference(&other.items).cloned().collect()
    }
}

impl FromIterator<Placeholder> for PlaceholderSet {
    fn from_iter<I: IntoIterator<Item = Placeholder>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for PlaceholderSet {
    type Item = Placeholder;
    type IntoIter = std::collections::btree_set::IntoIter<Placeholder>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a PlaceholderSet {
    type Item = &'a Placeholder;
    type IntoIter = std::collections::btree_set::Iter<'a, Placeholder>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
