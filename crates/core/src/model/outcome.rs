use crate::model::question::Question;

/// Recorded result for one question: the selected option (or none on timeout)
/// and whether it was correct.
///
/// Outcomes are created once, when the question is answered or times out, and
/// never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionOutcome {
    question_index: usize,
    selected_index: Option<usize>,
    is_correct: bool,
    seconds_remaining: u32,
}

impl QuestionOutcome {
    /// Record an answer for `question`. Correctness is derived from the question.
    #[must_use]
    pub fn record(question: &Question, selected_index: Option<usize>, seconds_remaining: u32) -> Self {
        Self {
            question_index: question.index(),
            selected_index,
            is_correct: question.is_correct(selected_index),
            seconds_remaining,
        }
    }

    /// Record a timeout for `question`.
    #[must_use]
    pub fn timed_out(question: &Question) -> Self {
        Self::record(question, None, 0)
    }

    #[must_use]
    pub fn question_index(&self) -> usize {
        self.question_index
    }

    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.selected_index.is_none()
    }

    /// Seconds left on the countdown when this outcome was recorded.
    #[must_use]
    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn question() -> Question {
        Question::new(2, "Q", vec!["a".into(), "b".into(), "c".into()], 1).unwrap()
    }

    #[test]
    fn correctness_is_derived_from_question() {
        let q = question();
        let right = QuestionOutcome::record(&q, Some(1), 7);
        let wrong = QuestionOutcome::record(&q, Some(0), 3);

        assert_eq!(right.question_index(), 2);
        assert!(right.is_correct());
        assert_eq!(right.seconds_remaining(), 7);
        assert!(!wrong.is_correct());
        assert!(!wrong.is_timeout());
    }

    #[test]
    fn timeout_has_no_selection_and_is_wrong() {
        let outcome = QuestionOutcome::timed_out(&question());
        assert_eq!(outcome.selected_index(), None);
        assert!(outcome.is_timeout());
        assert!(!outcome.is_correct());
        assert_eq!(outcome.seconds_remaining(), 0);
    }
}
