/*
 * prompt.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Terminal yes/no prompts.

use std::io::{self, BufRead, StdinLock, Stderr, Write};

use confmerge_core::{Confirm, MergeError, MergeResult};

/// Unrecognised answers tolerated before giving up.
const MAX_UNRECOGNIZED: usize = 5;

/// Asks questions on a text stream and reads y/yes/n/no answers.
///
/// Answers are case-insensitive. Anything else re-asks the question, up to
/// [`MAX_UNRECOGNIZED`] times.
pub struct TerminalConfirm<R, W> {
    input: R,
    output: W,
}

impl TerminalConfirm<StdinLock<'static>, Stderr> {
    /// Prompt on stderr and read answers from stdin.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalConfirm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, prompt: &str) -> io::Result<Option<bool>> {
        for _ in 0..=MAX_UNRECOGNIZED {
            write!(self.output, "{prompt} ")?;
            self.output.flush()?;

            let mut answer = String::new();
            if self.input.read_line(&mut answer)? == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "input closed before an answer was given",
                ));
            }
            match answer.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" => return Ok(Some(true)),
                "n" | "no" => return Ok(Some(false)),
                _ => writeln!(self.output, "I did not understand that response.")?,
            }
        }
        Ok(None)
    }
}

impl<R: BufRead, W: Write> Confirm for TerminalConfirm<R, W> {
    fn confirm(&mut self, prompt: &str) -> MergeResult<bool> {
        match self.ask(prompt) {
            Ok(Some(answer)) => Ok(answer),
            Ok(None) => Err(MergeError::Prompt {
                message: "too many unrecognised answers".to_string(),
            }),
            Err(e) => Err(MergeError::Prompt {
                message: format!("could not read an answer: {e}"),
            }),
        }
    }

    fn inform(&mut self, message: &str) -> MergeResult<()> {
        writeln!(self.output, "{message}").map_err(|e| MergeError::Prompt {
            message: format!("could not show the prompt: {e}"),
        })
    }
}
