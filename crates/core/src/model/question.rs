use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("a question needs at least 2 options, got {0}")]
    TooFewOptions(usize),

    #[error("option {0} cannot be empty")]
    EmptyOption(usize),

    #[error("correct option {correct} is out of range for {options} options")]
    CorrectOutOfRange { correct: usize, options: usize },
}

//
// ─── QUESTION SPEC ─────────────────────────────────────────────────────────────
//

/// Unvalidated question as it appears in a question bank file.
///
/// The ordinal is not part of the spec; it is assigned from the position in
/// the bank when the spec is validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSpec {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_index: usize,
}

impl QuestionSpec {
    /// Validate this spec into a `Question` with the given ordinal.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the prompt or options are blank, fewer than
    /// two options are given, or `correct_index` does not point at an option.
    pub fn validate(self, index: usize) -> Result<Question, QuestionError> {
        Question::new(index, self.prompt, self.options, self.correct_index)
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    index: usize,
    prompt: String,
    options: Vec<String>,
    correct_index: usize,
}

impl Question {
    /// Creates a validated question.
    ///
    /// Prompt and option texts are trimmed.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if any invariant of a question is violated.
    pub fn new(
        index: usize,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_index: usize,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into().trim().to_owned();
        if prompt.is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }

        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions(options.len()));
        }

        let options = options
            .into_iter()
            .enumerate()
            .map(|(i, option)| {
                let option = option.trim().to_owned();
                if option.is_empty() {
                    Err(QuestionError::EmptyOption(i))
                } else {
                    Ok(option)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        if correct_index >= options.len() {
            return Err(QuestionError::CorrectOutOfRange {
                correct: correct_index,
                options: options.len(),
            });
        }

        Ok(Self {
            index,
            prompt,
            options,
            correct_index,
        })
    }

    // Accessors
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    /// Text of the correct option.
    #[must_use]
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }

    /// Text of the option at `index`, if it exists.
    #[must_use]
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    /// True when `selected` names the correct option. A missing selection is never correct.
    #[must_use]
    pub fn is_correct(&self, selected: Option<usize>) -> bool {
        selected == Some(self.correct_index)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn options(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn question_trims_and_exposes_fields() {
        let q = Question::new(0, "  What is Kivy used for? ", options(&["Mobile", " All "]), 1)
            .unwrap();

        assert_eq!(q.prompt(), "What is Kivy used for?");
        assert_eq!(q.options(), &["Mobile".to_owned(), "All".to_owned()]);
        assert_eq!(q.correct_option(), "All");
        assert_eq!(q.option(5), None);
    }

    #[test]
    fn question_rejects_blank_prompt() {
        let err = Question::new(0, "  ", options(&["a", "b"]), 0).unwrap_err();
        assert_eq!(err, QuestionError::EmptyPrompt);
    }

    #[test]
    fn question_needs_two_options() {
        let err = Question::new(0, "Q", options(&["only"]), 0).unwrap_err();
        assert_eq!(err, QuestionError::TooFewOptions(1));
    }

    #[test]
    fn question_rejects_blank_option() {
        let err = Question::new(0, "Q", options(&["a", " "]), 0).unwrap_err();
        assert_eq!(err, QuestionError::EmptyOption(1));
    }

    #[test]
    fn correct_index_must_point_at_an_option() {
        let err = Question::new(0, "Q", options(&["a", "b"]), 2).unwrap_err();
        assert_eq!(
            err,
            QuestionError::CorrectOutOfRange {
                correct: 2,
                options: 2
            }
        );
    }

    #[test]
    fn missing_selection_is_never_correct() {
        let q = Question::new(0, "Q", options(&["a", "b"]), 0).unwrap();
        assert!(q.is_correct(Some(0)));
        assert!(!q.is_correct(Some(1)));
        assert!(!q.is_correct(None));
    }

    #[test]
    fn spec_deserializes_from_json() {
        let spec: QuestionSpec = serde_json::from_str(
            r#"{"prompt":"Q","options":["a","b","c"],"correct_index":2}"#,
        )
        .unwrap();
        let q = spec.validate(3).unwrap();
        assert_eq!(q.index(), 3);
        assert_eq!(q.correct_option(), "c");
    }
}
