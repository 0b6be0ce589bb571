//! Operator prompts
//!
//! The two interactive branch points (continue without a detected device,
//! reboot after install) go through the [`Prompter`] trait so the workflow is
//! testable without a terminal. Non-interactive runs answer every question
//! with its default, which is "no" for both prompts: fail safe, never
//! silently proceed.

use inquire::Confirm;

use crate::error::Result;

/// Injected yes/no input provider
pub trait Prompter {
    /// Ask a yes/no question; `default` is the answer used when the operator
    /// just presses Enter (or when no operator is available at all).
    fn confirm(&mut self, message: &str, default: bool) -> Result<bool>;
}

/// Interactive prompter backed by inquire
pub struct ConsolePrompter;

impl Prompter for ConsolePrompter {
    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        match Confirm::new(message).with_default(default).prompt() {
            Ok(answer) => Ok(answer),
            // Esc means "take the default", only Ctrl-C aborts the run
            Err(inquire::InquireError::OperationCanceled) => Ok(default),
            Err(e) => Err(e.into()),
        }
    }
}

/// Prompter for unattended runs: always answers the default
pub struct NonInteractivePrompter;

impl Prompter for NonInteractivePrompter {
    fn confirm(&mut self, _message: &str, default: bool) -> Result<bool> {
        Ok(default)
    }
}

/// Scripted prompter replaying fixed answers, for tests
#[cfg(test)]
pub struct ScriptedPrompter {
    answers: std::collections::VecDeque<bool>,
}

#[cfg(test)]
impl ScriptedPrompter {
    pub fn new(answers: &[bool]) -> Self {
        ScriptedPrompter {
            answers: answers.iter().copied().collect(),
        }
    }
}

#[cfg(test)]
impl Prompter for ScriptedPrompter {
    fn confirm(&mut self, _message: &str, default: bool) -> Result<bool> {
        Ok(self.answers.pop_front().unwrap_or(default))
    }
}
