//! Deterministic stand-ins for the scheduler and the view, for driving a
//! session controller by hand.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use quiz_core::model::QuizReport;

use crate::scheduler::{Scheduler, TaskGuard};
use crate::sessions::SessionEvent;
use crate::view::ViewPort;

//
// ─── MANUAL SCHEDULER ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Every(Duration),
    After(Duration),
}

/// A task registered with the `ManualScheduler`.
#[derive(Debug, Clone)]
pub struct ScheduledTask {
    pub kind: TaskKind,
    pub event: SessionEvent,
    cancelled: Arc<AtomicBool>,
}

impl ScheduledTask {
    #[must_use]
    pub fn is_live(&self) -> bool {
        !self.cancelled.load(Ordering::SeqCst)
    }
}

/// Scheduler that only records tasks. Tests read the live tasks and feed their
/// events to the controller themselves.
///
/// Clones share the same task list.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    tasks: Arc<Mutex<Vec<ScheduledTask>>>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, kind: TaskKind, event: SessionEvent) -> TaskGuard {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ScheduledTask {
                kind,
                event,
                cancelled,
            });
        TaskGuard::new(move || flag.store(true, Ordering::SeqCst))
    }

    /// All tasks ever scheduled, in order.
    #[must_use]
    pub fn tasks(&self) -> Vec<ScheduledTask> {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of tasks that have not been cancelled or fired.
    #[must_use]
    pub fn live_tasks(&self) -> usize {
        self.tasks().iter().filter(|t| t.is_live()).count()
    }

    /// Event of the live periodic task, if any.
    #[must_use]
    pub fn ticker(&self) -> Option<SessionEvent> {
        self.tasks()
            .into_iter()
            .find(|t| t.is_live() && matches!(t.kind, TaskKind::Every(_)))
            .map(|t| t.event)
    }

    /// Fire the oldest live one-shot task: mark it done and return its event.
    pub fn fire_delay(&self) -> Option<SessionEvent> {
        let tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        let task = tasks
            .iter()
            .find(|t| t.is_live() && matches!(t.kind, TaskKind::After(_)))?;
        task.cancelled.store(true, Ordering::SeqCst);
        Some(task.event)
    }
}

impl Scheduler for ManualScheduler {
    fn every(&mut self, period: Duration, event: SessionEvent) -> TaskGuard {
        self.push(TaskKind::Every(period), event)
    }

    fn after(&mut self, delay: Duration, event: SessionEvent) -> TaskGuard {
        self.push(TaskKind::After(delay), event)
    }
}

//
// ─── RECORDING VIEW ────────────────────────────────────────────────────────────
//

/// One call made on a `ViewPort`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCall {
    ShowQuestion {
        index: usize,
        total: usize,
        prompt: String,
        options: Vec<String>,
    },
    UpdateTimer {
        seconds_remaining: u32,
        low_time: bool,
    },
    HighlightAnswer {
        correct_index: usize,
        selected_index: Option<usize>,
    },
    ShowResults(QuizReport),
}

/// View that remembers every call it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    pub calls: Vec<ViewCall>,
}

impl RecordingView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes of the questions shown so far, in order.
    #[must_use]
    pub fn shown_questions(&self) -> Vec<usize> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ViewCall::ShowQuestion { index, .. } => Some(*index),
                _ => None,
            })
            .collect()
    }

    /// Timer values displayed so far.
    #[must_use]
    pub fn timer_values(&self) -> Vec<(u32, bool)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ViewCall::UpdateTimer {
                    seconds_remaining,
                    low_time,
                } => Some((*seconds_remaining, *low_time)),
                _ => None,
            })
            .collect()
    }

    /// Every report shown, normally at most one.
    #[must_use]
    pub fn reports(&self) -> Vec<&QuizReport> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ViewCall::ShowResults(report) => Some(report),
                _ => None,
            })
            .collect()
    }
}

impl ViewPort for RecordingView {
    fn show_question(&mut self, index: usize, total: usize, prompt: &str, options: &[String]) {
        self.calls.push(ViewCall::ShowQuestion {
            index,
            total,
            prompt: prompt.to_owned(),
            options: options.to_vec(),
        });
    }

    fn update_timer(&mut self, seconds_remaining: u32, low_time: bool) {
        self.calls.push(ViewCall::UpdateTimer {
            seconds_remaining,
            low_time,
        });
    }

    fn highlight_answer(&mut self, correct_index: usize, selected_index: Option<usize>) {
        self.calls.push(ViewCall::HighlightAnswer {
            correct_index,
            selected_index,
        });
    }

    fn show_results(&mut self, report: &QuizReport) {
        self.calls.push(ViewCall::ShowResults(report.clone()));
    }
}
