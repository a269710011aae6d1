use quiz_core::model::QuizReport;

/// Presentation side of a quiz session.
///
/// The session controller calls into the view; the view never mutates session
/// or timer state. User input goes back through `SessionEvent::Start` and
/// `SessionEvent::OptionSelected`.
pub trait ViewPort {
    /// Display question `index` (0-based) of `total` with its options unselected.
    fn show_question(&mut self, index: usize, total: usize, prompt: &str, options: &[String]);

    /// Display the countdown. `low_time` asks for the urgent style.
    fn update_timer(&mut self, seconds_remaining: u32, low_time: bool);

    /// Mark the correct option and, when it differs, the selected one.
    fn highlight_answer(&mut self, correct_index: usize, selected_index: Option<usize>);

    /// Display the final report.
    fn show_results(&mut self, report: &QuizReport);
}
