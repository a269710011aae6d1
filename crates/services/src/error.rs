//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{BankError, ReportError};

use crate::sessions::SessionPhase;

/// Errors emitted by `QuestionTimer`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TimerError {
    #[error("timer for question {question} is already running")]
    AlreadyRunning { question: usize },
}

/// Errors emitted by the session controller and runner.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session already started")]
    AlreadyStarted,
    #[error("cannot {action} while the session is {phase}")]
    InvalidTransition {
        action: &'static str,
        phase: SessionPhase,
    },
    #[error("question {question} has no option {option} (it has {options})")]
    InvalidOption {
        question: usize,
        option: usize,
        options: usize,
    },
    #[error("event channel closed before the session completed")]
    Aborted,
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error(transparent)]
    Timer(#[from] TimerError),
}

impl SessionError {
    /// True for API misuse that a dispatcher should report and then tolerate,
    /// such as a late or duplicate click.
    #[must_use]
    pub fn is_misuse(&self) -> bool {
        matches!(
            self,
            SessionError::AlreadyStarted
                | SessionError::InvalidTransition { .. }
                | SessionError::InvalidOption { .. }
        )
    }
}
