mod controller;
mod event;
mod progress;
mod runner;
mod state;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use controller::SessionController;
pub use event::SessionEvent;
pub use progress::SessionProgress;
pub use runner::{SessionEvents, SessionHandle, SessionRunner, session_channel};
pub use state::{QuestionState, SessionPhase};
