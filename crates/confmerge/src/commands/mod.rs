//! Command implementations for the confmerge CLI
//!
//! Each command module turns parsed arguments into core options and
//! delegates to confmerge-core for the actual work.

pub mod header;
pub mod merge;

/// How a command finished, when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The requested files were written.
    Completed,
    /// The operator declined a confirmation; nothing was changed.
    Declined,
}
