/*
 * confirm.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Yes/no confirmation capability.
//!
//! Operations that may destroy a file ask a [`Confirm`] implementation
//! instead of reading the terminal directly, so they can run unattended and
//! in tests.

use std::collections::VecDeque;

use crate::error::{MergeError, MergeResult};

/// Answers yes/no questions put to the operator.
pub trait Confirm {
    /// Ask `prompt`. `Ok(false)` means the operator declined.
    fn confirm(&mut self, prompt: &str) -> MergeResult<bool>;

    /// Show context the operator needs before the next question.
    ///
    /// Implementations that talk to a person must show `message` wherever the
    /// question itself appears.
    fn inform(&mut self, message: &str) -> MergeResult<()> {
        tracing::info!("{message}");
        Ok(())
    }
}

/// Answers every question with yes.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, prompt: &str) -> MergeResult<bool> {
        tracing::debug!("{prompt} yes (assumed)");
        Ok(true)
    }
}

/// Answers every question with no.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeNo;

impl Confirm for AssumeNo {
    fn confirm(&mut self, _prompt: &str) -> MergeResult<bool> {
        Ok(false)
    }
}

/// Replays a fixed list of answers and records everything it was shown.
///
/// Running out of answers is an error, which catches unexpected prompts.
#[derive(Debug, Clone, Default)]
pub struct ScriptedConfirm {
    answers: VecDeque<bool>,
    prompts: Vec<String>,
    messages: Vec<String>,
}

impl ScriptedConfirm {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Prompts shown so far, in order.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Messages passed to [`Confirm::inform`] so far, in order.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&mut self, prompt: &str) -> MergeResult<bool> {
        self.prompts.push(prompt.to_string());
        self.answers.pop_front().ok_or_else(|| MergeError::Prompt {
            message: format!("no scripted answer for prompt: {prompt}"),
        })
    }

    fn inform(&mut self, message: &str) -> MergeResult<()> {
        self.messages.push(message.to_string());
        Ok(())
    }
}
