use quiz_core::model::{QuestionBank, QuizReport, QuizSettings};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use crate::error::SessionError;
use crate::scheduler::TokioScheduler;
use crate::view::ViewPort;

use super::controller::SessionController;
use super::event::SessionEvent;

/// Sending side of a session's event channel. Cheap to clone; hand one to
/// whatever collects user input.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    events: UnboundedSender<SessionEvent>,
}

impl SessionHandle {
    /// Ask the session to begin. Returns false if the runner is gone.
    pub fn start(&self) -> bool {
        self.send(SessionEvent::Start)
    }

    /// Report that the user picked `option` on `question`. Returns false if the runner is gone.
    pub fn select(&self, question: usize, option: usize) -> bool {
        self.send(SessionEvent::OptionSelected { question, option })
    }

    pub fn send(&self, event: SessionEvent) -> bool {
        self.events.send(event).is_ok()
    }
}

/// Receiving side of a session's event channel.
#[derive(Debug)]
pub struct SessionEvents {
    events: UnboundedReceiver<SessionEvent>,
}

/// Create the event channel shared by the view, the timers and the runner.
#[must_use]
pub fn session_channel() -> (SessionHandle, SessionEvents) {
    let (tx, rx) = mpsc::unbounded_channel();
    (SessionHandle { events: tx }, SessionEvents { events: rx })
}

/// Single dispatcher for a session: receives user input, ticks and delay
/// expiries from one channel and feeds them to the controller in order.
#[derive(Debug)]
pub struct SessionRunner<V> {
    controller: SessionController<V, TokioScheduler>,
    events: SessionEvents,
}

impl<V: ViewPort> SessionRunner<V> {
    /// Timers scheduled by this runner send through `handle`'s channel, but do
    /// not keep it open.
    #[must_use]
    pub fn new(
        bank: QuestionBank,
        settings: QuizSettings,
        view: V,
        handle: &SessionHandle,
        events: SessionEvents,
    ) -> Self {
        let scheduler = TokioScheduler::new(&handle.events);
        Self {
            controller: SessionController::new(bank, settings, view, scheduler),
            events,
        }
    }

    #[must_use]
    pub fn controller(&self) -> &SessionController<V, TokioScheduler> {
        &self.controller
    }

    #[must_use]
    pub fn view(&self) -> &V {
        self.controller.view()
    }

    /// Cancel whatever is scheduled and stop accepting events.
    pub fn shutdown(&mut self) {
        self.controller.shutdown();
    }

    /// Process events until the session completes.
    ///
    /// Late clicks, duplicate starts and invalid options are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Aborted` if every `SessionHandle` is dropped
    /// first, or any non-misuse error from the controller. The controller is
    /// shut down in both cases.
    pub async fn run(&mut self) -> Result<QuizReport, SessionError> {
        while let Some(event) = self.events.events.recv().await {
            match self.controller.handle(event) {
                Ok(()) => {}
                Err(err) if err.is_misuse() => {
                    warn!(error = %err, ?event, "session event rejected");
                }
                Err(err) => {
                    self.controller.shutdown();
                    return Err(err);
                }
            }

            if let Some(report) = self.controller.report() {
                return Ok(report.clone());
            }
        }

        debug!("session channel closed");
        self.controller.shutdown();
        Err(SessionError::Aborted)
    }
}
