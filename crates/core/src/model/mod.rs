mod bank;
mod outcome;
mod question;
mod report;
mod settings;

pub use bank::{BankError, QuestionBank};
pub use outcome::QuestionOutcome;
pub use question::{Question, QuestionError, QuestionSpec};
pub use report::{QuestionRecord, QuizReport, ReportError};
pub use settings::{QuizSettings, SettingsError};
