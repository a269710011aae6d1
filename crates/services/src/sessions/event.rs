/// Input to the session controller.
///
/// Every event except `Start` names the question it belongs to, so events that
/// arrive after the session has moved on can be recognized and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The user asked to begin the quiz.
    Start,
    /// The user picked `option` while `question` was displayed.
    OptionSelected { question: usize, option: usize },
    /// One second passed on the countdown of `question`.
    Tick { question: usize },
    /// The post-answer pause after `question` is over.
    TransitionElapsed { question: usize },
}
