//! Time source for session events.
//!
//! The controller never sleeps. It asks a `Scheduler` to deliver a
//! `SessionEvent` later (once or repeatedly) and keeps the returned
//! `TaskGuard` for as long as the event is wanted.

use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc::{UnboundedSender, WeakUnboundedSender};
use tokio::time::{Instant, MissedTickBehavior};

use crate::sessions::SessionEvent;

//
// ─── TASK GUARD ────────────────────────────────────────────────────────────────
//

/// Handle to a scheduled task. Cancelling is idempotent and dropping the guard
/// cancels the task.
pub struct TaskGuard {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl TaskGuard {
    #[must_use]
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Stop the task. Further calls do nothing.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_none()
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for TaskGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskGuard")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

//
// ─── SCHEDULER ─────────────────────────────────────────────────────────────────
//

/// Delivers session events after a delay or on a fixed period.
pub trait Scheduler {
    /// Deliver `event` every `period`, starting one `period` from now.
    fn every(&mut self, period: Duration, event: SessionEvent) -> TaskGuard;

    /// Deliver `event` once, `delay` from now.
    fn after(&mut self, delay: Duration, event: SessionEvent) -> TaskGuard;
}

/// Scheduler backed by tokio timers, feeding the session event channel.
///
/// Only a weak sender is kept, so scheduled tasks never keep the channel open
/// on their own. Must be used from within a tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    events: WeakUnboundedSender<SessionEvent>,
}

impl TokioScheduler {
    #[must_use]
    pub fn new(events: &UnboundedSender<SessionEvent>) -> Self {
        Self {
            events: events.downgrade(),
        }
    }
}

impl Scheduler for TokioScheduler {
    fn every(&mut self, period: Duration, event: SessionEvent) -> TaskGuard {
        let events = self.events.clone();
        let task = tokio::spawn(async move {
            let mut ticks = tokio::time::interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                let Some(tx) = events.upgrade() else { break };
                if tx.send(event).is_err() {
                    break;
                }
            }
        });
        TaskGuard::new(move || task.abort())
    }

    fn after(&mut self, delay: Duration, event: SessionEvent) -> TaskGuard {
        let events = self.events.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(tx) = events.upgrade() {
                let _ = tx.send(event);
            }
        });
        TaskGuard::new(move || task.abort())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
