#![forbid(unsafe_code)]

pub mod error;
pub mod scheduler;
pub mod sessions;
pub mod testing;
pub mod timer;
pub mod view;

pub use error::{SessionError, TimerError};
pub use scheduler::{Scheduler, TaskGuard, TokioScheduler};
pub use sessions::{
    SessionController, SessionEvent, SessionEvents, SessionHandle, SessionPhase,
    SessionProgress, SessionRunner, session_channel,
};
pub use timer::{QuestionTimer, TimerState, TimerTick};
pub use view::ViewPort;
