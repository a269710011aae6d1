use std::fmt;

use crate::scheduler::TaskGuard;
use crate::timer::QuestionTimer;

/// Externally visible phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    NotStarted,
    /// Question `i` is displayed and its countdown is running.
    Active(usize),
    /// Question `i` was answered or timed out; correctness is on display.
    TransitionDelay(usize),
    Complete,
    /// Torn down before completion.
    Cancelled,
}

impl SessionPhase {
    /// Question the phase refers to, if any.
    #[must_use]
    pub fn question(self) -> Option<usize> {
        match self {
            SessionPhase::Active(i) | SessionPhase::TransitionDelay(i) => Some(i),
            SessionPhase::NotStarted | SessionPhase::Complete | SessionPhase::Cancelled => None,
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionPhase::Complete | SessionPhase::Cancelled)
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::NotStarted => write!(f, "not started"),
            SessionPhase::Active(i) => write!(f, "active on question {i}"),
            SessionPhase::TransitionDelay(i) => write!(f, "showing the answer to question {i}"),
            SessionPhase::Complete => write!(f, "complete"),
            SessionPhase::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Answer lifecycle of the active question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionState {
    index: usize,
    answered: bool,
}

impl QuestionState {
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self {
            index,
            answered: false,
        }
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Set the answered flag. Returns false if it was already set.
    pub fn mark_answered(&mut self) -> bool {
        !std::mem::replace(&mut self.answered, true)
    }
}

/// Internal stage, holding the resources that belong to each phase. Leaving a
/// stage drops its timer or delay guard, which cancels the scheduled task.
#[derive(Debug)]
pub(super) enum Stage {
    NotStarted,
    Active {
        question: QuestionState,
        timer: QuestionTimer,
    },
    TransitionDelay {
        question: usize,
        delay: TaskGuard,
    },
    Complete,
    Cancelled,
}

impl Stage {
    pub(super) fn phase(&self) -> SessionPhase {
        match self {
            Stage::NotStarted => SessionPhase::NotStarted,
            Stage::Active { question, .. } => SessionPhase::Active(question.index()),
            Stage::TransitionDelay { question, .. } => SessionPhase::TransitionDelay(*question),
            Stage::Complete => SessionPhase::Complete,
            Stage::Cancelled => SessionPhase::Cancelled,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
