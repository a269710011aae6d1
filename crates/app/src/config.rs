use std::path::Path;

use anyhow::Context;
use quiz_core::model::{QuestionBank, QuestionSpec, QuizSettings};

/// Six-question bank used when no `--questions` file is given.
const BUILTIN_QUESTIONS: &str = include_str!("questions.json");

/// Load the question bank from `path`, or the built-in bank when `None`.
///
/// # Errors
///
/// Fails if the file cannot be read, is not a JSON array of questions, or any
/// question is invalid.
pub fn load_bank(path: Option<&Path>) -> anyhow::Result<QuestionBank> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read question bank {}", path.display()))?;
            parse_bank(&raw)
                .with_context(|| format!("invalid question bank {}", path.display()))
        }
        None => parse_bank(BUILTIN_QUESTIONS).context("invalid built-in question bank"),
    }
}

/// Parse a JSON array of `{ prompt, options, correct_index }` records.
///
/// # Errors
///
/// Fails on malformed JSON or an invalid question.
pub fn parse_bank(raw: &str) -> anyhow::Result<QuestionBank> {
    let specs: Vec<QuestionSpec> = serde_json::from_str(raw)?;
    Ok(QuestionBank::from_specs(specs)?)
}

/// Apply command-line overrides to the default timing.
///
/// # Errors
///
/// Fails if an override is zero.
pub fn settings(countdown: Option<u32>, delay: Option<u32>) -> anyhow::Result<QuizSettings> {
    let mut settings = QuizSettings::default();
    if let Some(secs) = countdown {
        settings = settings.with_countdown(secs).context("invalid --countdown")?;
    }
    if let Some(secs) = delay {
        settings = settings.with_transition_delay(secs).context("invalid --delay")?;
    }
    Ok(settings)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_bank_has_six_questions() {
        let bank = load_bank(None).unwrap();
        assert_eq!(bank.count(), 6);

        let correct: Vec<_> = bank.iter().map(|q| q.correct_index()).collect();
        assert_eq!(correct, [2, 3, 2, 1, 1, 2]);
        assert!(bank.iter().all(|q| q.option_count() == 4));
        assert_eq!(bank.get(0).unwrap().correct_option(), "A type of shoe");
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(parse_bank("{not json").is_err());
        assert!(parse_bank("[]").is_err());
    }

    #[test]
    fn invalid_question_is_an_error() {
        let raw = r#"[{"prompt":"Q","options":["a","b"],"correct_index":5}]"#;
        let err = parse_bank(raw).unwrap_err();
        assert!(err.to_string().contains("question 0"));
    }

    #[test]
    fn missing_file_mentions_path() {
        let err = load_bank(Some(Path::new("/definitely/missing.json"))).unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/missing.json"));
    }

    #[test]
    fn overrides_apply_to_defaults() {
        let s = settings(Some(20), Some(1)).unwrap();
        assert_eq!(s.countdown_secs(), 20);
        assert_eq!(s.transition_delay_secs(), 1);
        assert_eq!(s.low_time_threshold_secs(), 5);

        assert_eq!(settings(None, None).unwrap(), QuizSettings::default());
        assert!(settings(Some(0), None).is_err());
    }
}
