use thiserror::Error;

use crate::model::bank::QuestionBank;
use crate::model::outcome::QuestionOutcome;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReportError {
    #[error("expected {expected} outcomes, got {actual}")]
    Incomplete { expected: usize, actual: usize },

    #[error("outcome at position {position} belongs to question {question}")]
    OutOfOrder { position: usize, question: usize },
}

/// Per-question line of the final report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    /// 1-based question number for display.
    pub number: usize,
    pub prompt: String,
    pub correct_option: String,
    pub selected_option: Option<String>,
    pub is_correct: bool,
    pub seconds_remaining: u32,
}

impl QuestionRecord {
    /// The selected option text, or "no answer" for a timeout.
    #[must_use]
    pub fn selected_label(&self) -> &str {
        self.selected_option.as_deref().unwrap_or("no answer")
    }
}

/// Final score summary for a completed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizReport {
    score: usize,
    total: usize,
    records: Vec<QuestionRecord>,
}

impl QuizReport {
    /// Aggregate the full, ordered outcome list against the bank.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Incomplete` if there is not exactly one outcome per
    /// question, and `ReportError::OutOfOrder` if outcome `k` is not for question `k`.
    pub fn from_outcomes(
        bank: &QuestionBank,
        outcomes: &[QuestionOutcome],
    ) -> Result<Self, ReportError> {
        if outcomes.len() != bank.count() {
            return Err(ReportError::Incomplete {
                expected: bank.count(),
                actual: outcomes.len(),
            });
        }

        let records = bank
            .iter()
            .zip(outcomes)
            .enumerate()
            .map(|(position, (question, outcome))| {
                if outcome.question_index() != position {
                    return Err(ReportError::OutOfOrder {
                        position,
                        question: outcome.question_index(),
                    });
                }
                Ok(QuestionRecord {
                    number: position + 1,
                    prompt: question.prompt().to_owned(),
                    correct_option: question.correct_option().to_owned(),
                    selected_option: outcome
                        .selected_index()
                        .and_then(|i| question.option(i))
                        .map(str::to_owned),
                    is_correct: outcome.is_correct(),
                    seconds_remaining: outcome.seconds_remaining(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let score = records.iter().filter(|r| r.is_correct).count();

        Ok(Self {
            score,
            total: bank.count(),
            records,
        })
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn records(&self) -> &[QuestionRecord] {
        &self.records
    }

    /// Number of questions left unanswered when their timer ran out.
    #[must_use]
    pub fn timeouts(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.selected_option.is_none())
            .count()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
