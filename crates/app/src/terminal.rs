//! Line-oriented terminal front end: renders the session on stdout and turns
//! typed answers into session events.

use std::io::{self, BufRead};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use crossterm::style::Stylize;
use quiz_core::model::{QuizReport, QuizSettings};
use services::{SessionEvent, SessionHandle, ViewPort};
use tracing::{debug, warn};

/// Question currently accepting answers, shared between the view and the
/// input task.
#[derive(Debug, Clone, Default)]
pub struct AnswerWindow {
    current: Arc<Mutex<Option<(usize, usize)>>>,
}

impl AnswerWindow {
    fn open(&self, question: usize, options: usize) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Some((question, options));
    }

    fn close(&self) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn get(&self) -> Option<(usize, usize)> {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// `ViewPort` that prints to stdout.
#[derive(Debug)]
pub struct TerminalView {
    window: AnswerWindow,
    options: Vec<String>,
}

impl TerminalView {
    #[must_use]
    pub fn new(window: AnswerWindow) -> Self {
        Self {
            window,
            options: Vec::new(),
        }
    }

    /// Title screen shown before the session starts.
    pub fn show_intro(total: usize, settings: &QuizSettings) {
        println!("English Quiz");
        let about = format!(
            "This quiz contains {total} multiple-choice questions.\nYou have {} seconds for each question.",
            settings.countdown_secs()
        );
        println!("{}", about.yellow());
        println!("Press Enter to start.");
    }
}

impl ViewPort for TerminalView {
    fn show_question(&mut self, index: usize, total: usize, prompt: &str, options: &[String]) {
        self.options = options.to_vec();
        println!();
        println!("Question {} of {total}", index + 1);
        println!("{prompt}");
        for (i, option) in options.iter().enumerate() {
            println!("  {}) {option}", option_label(i));
        }
        self.window.open(index, options.len());
    }

    fn update_timer(&mut self, seconds_remaining: u32, low_time: bool) {
        println!("{}", countdown_line(seconds_remaining, low_time));
    }

    fn highlight_answer(&mut self, correct_index: usize, selected_index: Option<usize>) {
        self.window.close();
        println!();
        let correct = self.options.get(correct_index).map_or("", String::as_str);
        let correct = format!("Correct: {}) {correct}", option_label(correct_index));
        match selected_index {
            Some(selected) if selected == correct_index => {}
            Some(selected) => {
                let chosen = self.options.get(selected).map_or("", String::as_str);
                let chosen = format!("Your answer: {}) {chosen}", option_label(selected));
                println!("{}", chosen.red());
            }
            None => println!("{}", "Time is up.".red()),
        }
        println!("{}", correct.green());
    }

    fn show_results(&mut self, report: &QuizReport) {
        println!();
        println!("Quiz Results");
        let score = format!("Your score: {}/{}", report.score(), report.total());
        println!("{}", score.yellow());
        for record in report.records() {
            println!();
            println!("Q{}: {}", record.number, record.prompt);
            println!("{}", format!("  Correct: {}", record.correct_option).green());
            match &record.selected_option {
                Some(selected) => {
                    let answer = format!("  Your answer: {selected}");
                    let answer = if record.is_correct { answer.green() } else { answer.red() };
                    println!("{answer}");
                }
                None => println!("{}", "  You didn't answer this question".red()),
            }
        }
    }
}

/// One countdown line. Printed whole so it never overwrites typed input.
fn countdown_line(seconds_remaining: u32, low_time: bool) -> String {
    let text = format!("Time left: {seconds_remaining:>2} seconds");
    let text = if low_time { text.red() } else { text.yellow() };
    text.to_string()
}

/// Label shown next to option `index`: a, b, c, ...
fn option_label(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .and_then(|i| b'a'.checked_add(i))
        .map_or('?', char::from)
}

/// Parse a typed answer: a letter (`a`, `B`) or a 1-based number.
#[must_use]
pub fn parse_answer(line: &str, options: usize) -> Option<usize> {
    let line = line.trim();
    let index = if let Ok(n) = line.parse::<usize>() {
        n.checked_sub(1)?
    } else {
        let mut chars = line.chars();
        let c = chars.next()?.to_ascii_lowercase();
        if chars.next().is_some() || !c.is_ascii_lowercase() {
            return None;
        }
        usize::from(c as u8 - b'a')
    };
    (index < options).then_some(index)
}

/// Start the thread that reads answers from stdin.
///
/// Blocking stdin reads cannot be cancelled, so the thread is detached and
/// ends with the process.
pub fn spawn_input(handle: SessionHandle, window: AnswerWindow) -> io::Result<()> {
    thread::Builder::new()
        .name("quiz-input".into())
        .spawn(move || {
            let stdin = io::stdin();
            if let Err(err) = forward_lines(stdin.lock(), &window, |event| handle.send(event)) {
                warn!(error = %err, "reading answers failed");
            }
            debug!("input closed");
        })?;
    Ok(())
}

/// Turn typed lines into session events: the first line starts the session,
/// later lines answer whichever question is open. Stops at end of input or
/// once `send` reports the session is gone.
fn forward_lines(
    input: impl BufRead,
    window: &AnswerWindow,
    mut send: impl FnMut(SessionEvent) -> bool,
) -> io::Result<()> {
    let mut lines = input.lines();

    match lines.next() {
        Some(line) => {
            line?;
        }
        None => return Ok(()),
    }
    if !send(SessionEvent::Start) {
        return Ok(());
    }

    for line in lines {
        let line = line?;
        let Some((question, options)) = window.get() else {
            debug!(input = %line, "input outside an open question ignored");
            continue;
        };
        match parse_answer(&line, options) {
            Some(option) => {
                if !send(SessionEvent::OptionSelected { question, option }) {
                    break;
                }
            }
            None => println!("Type a letter between a and {}", option_label(options - 1)),
        }
    }
    Ok(())
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
