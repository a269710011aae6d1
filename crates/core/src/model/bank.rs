use thiserror::Error;

use crate::model::question::{Question, QuestionError, QuestionSpec};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BankError {
    #[error("question bank cannot be empty")]
    Empty,

    #[error("question index {index} is out of range (bank has {count} questions)")]
    OutOfRange { index: usize, count: usize },

    #[error("question at position {position} carries index {index}")]
    OrdinalMismatch { position: usize, index: usize },

    #[error("question {index} is invalid: {source}")]
    Question {
        index: usize,
        #[source]
        source: QuestionError,
    },
}

//
// ─── QUESTION BANK ─────────────────────────────────────────────────────────────
//

/// Ordered, read-only list of questions for one quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Creates a bank from already-validated questions.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Empty` when no questions are given and
    /// `BankError::OrdinalMismatch` when a question's index differs from its position.
    pub fn new(questions: Vec<Question>) -> Result<Self, BankError> {
        if questions.is_empty() {
            return Err(BankError::Empty);
        }
        if let Some((position, q)) = questions
            .iter()
            .enumerate()
            .find(|(position, q)| q.index() != *position)
        {
            return Err(BankError::OrdinalMismatch {
                position,
                index: q.index(),
            });
        }

        Ok(Self { questions })
    }

    /// Builds a bank from question specs, assigning ordinals by position.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Question` for the first invalid spec, or `BankError::Empty`.
    pub fn from_specs(specs: Vec<QuestionSpec>) -> Result<Self, BankError> {
        let questions = specs
            .into_iter()
            .enumerate()
            .map(|(index, spec)| {
                spec.validate(index)
                    .map_err(|source| BankError::Question { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(questions)
    }

    /// Fetch the question at `index`.
    ///
    /// # Errors
    ///
    /// Returns `BankError::OutOfRange` if `index >= count()`.
    pub fn get(&self, index: usize) -> Result<&Question, BankError> {
        self.questions.get(index).ok_or(BankError::OutOfRange {
            index,
            count: self.questions.len(),
        })
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.questions.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
