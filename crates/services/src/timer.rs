use std::time::Duration;

use tracing::trace;

use crate::error::TimerError;
use crate::scheduler::{Scheduler, TaskGuard};
use crate::sessions::SessionEvent;

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Snapshot of a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerState {
    pub seconds_remaining: u32,
    pub running: bool,
}

/// Value emitted on every tick of a running countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTick {
    pub question: usize,
    pub seconds_remaining: u32,
    /// Remaining time is at or below the low-time threshold.
    pub low_time: bool,
    /// The countdown reached zero on this tick. Reported exactly once.
    pub expired: bool,
}

/// One-second countdown for a single question.
///
/// A timer is built per question and started once. Ticks are delivered by the
/// scheduler as `SessionEvent::Tick` and fed back through [`QuestionTimer::on_tick`].
#[derive(Debug)]
pub struct QuestionTimer {
    question: usize,
    low_time_threshold: u32,
    seconds_remaining: u32,
    running: bool,
    ticks: Option<TaskGuard>,
}

impl QuestionTimer {
    #[must_use]
    pub fn new(question: usize, low_time_threshold: u32) -> Self {
        Self {
            question,
            low_time_threshold,
            seconds_remaining: 0,
            running: false,
            ticks: None,
        }
    }

    /// Start counting down from `duration_secs`.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::AlreadyRunning` if this timer is already counting down.
    pub fn start<S>(&mut self, duration_secs: u32, scheduler: &mut S) -> Result<(), TimerError>
    where
        S: Scheduler + ?Sized,
    {
        if self.running {
            return Err(TimerError::AlreadyRunning {
                question: self.question,
            });
        }

        self.seconds_remaining = duration_secs;
        self.running = true;
        self.ticks = Some(scheduler.every(
            TICK_PERIOD,
            SessionEvent::Tick {
                question: self.question,
            },
        ));
        Ok(())
    }

    /// Stop ticking. Safe to call on a stopped timer.
    pub fn cancel(&mut self) {
        if self.running {
            trace!(question = self.question, remaining = self.seconds_remaining, "timer cancelled");
        }
        self.running = false;
        if let Some(mut ticks) = self.ticks.take() {
            ticks.cancel();
        }
    }

    /// Advance the countdown by one second.
    ///
    /// Returns `None` when the timer is not running, so late ticks are harmless.
    /// On reaching zero the timer stops itself and reports `expired`.
    pub fn on_tick(&mut self) -> Option<TimerTick> {
        if !self.running {
            return None;
        }

        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        let expired = self.seconds_remaining == 0;
        if expired {
            self.cancel();
        }

        Some(TimerTick {
            question: self.question,
            seconds_remaining: self.seconds_remaining,
            low_time: self.is_low_time(),
            expired,
        })
    }

    #[must_use]
    pub fn question(&self) -> usize {
        self.question
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn is_low_time(&self) -> bool {
        self.seconds_remaining <= self.low_time_threshold
    }

    #[must_use]
    pub fn state(&self) -> TimerState {
        TimerState {
            seconds_remaining: self.seconds_remaining,
            running: self.running,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
