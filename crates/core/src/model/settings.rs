use std::time::Duration;

use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("countdown must be > 0 seconds")]
    InvalidCountdown,

    #[error("transition delay must be > 0 seconds")]
    InvalidTransitionDelay,

    #[error("low time threshold ({threshold}s) must not exceed the countdown ({countdown}s)")]
    InvalidLowTimeThreshold { threshold: u32, countdown: u32 },
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Timing knobs for a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizSettings {
    countdown_secs: u32,
    transition_delay_secs: u32,
    low_time_threshold_secs: u32,
}

impl Default for QuizSettings {
    /// 10 seconds per question, 2 seconds of correctness display, and the
    /// low-time signal from 5 seconds left.
    fn default() -> Self {
        Self {
            countdown_secs: 10,
            transition_delay_secs: 2,
            low_time_threshold_secs: 5,
        }
    }
}

impl QuizSettings {
    /// Creates custom settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if a duration is zero or the low-time threshold
    /// is larger than the countdown.
    pub fn new(
        countdown_secs: u32,
        transition_delay_secs: u32,
        low_time_threshold_secs: u32,
    ) -> Result<Self, SettingsError> {
        if countdown_secs == 0 {
            return Err(SettingsError::InvalidCountdown);
        }
        if transition_delay_secs == 0 {
            return Err(SettingsError::InvalidTransitionDelay);
        }
        if low_time_threshold_secs > countdown_secs {
            return Err(SettingsError::InvalidLowTimeThreshold {
                threshold: low_time_threshold_secs,
                countdown: countdown_secs,
            });
        }

        Ok(Self {
            countdown_secs,
            transition_delay_secs,
            low_time_threshold_secs,
        })
    }

    /// Returns a copy with a different countdown, clamping the low-time
    /// threshold so it never exceeds the countdown.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidCountdown` for a zero countdown.
    pub fn with_countdown(self, countdown_secs: u32) -> Result<Self, SettingsError> {
        Self::new(
            countdown_secs,
            self.transition_delay_secs,
            self.low_time_threshold_secs.min(countdown_secs),
        )
    }

    /// Returns a copy with a different transition delay.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidTransitionDelay` for a zero delay.
    pub fn with_transition_delay(self, transition_delay_secs: u32) -> Result<Self, SettingsError> {
        Self::new(
            self.countdown_secs,
            transition_delay_secs,
            self.low_time_threshold_secs,
        )
    }

    // Accessors
    #[must_use]
    pub fn countdown_secs(&self) -> u32 {
        self.countdown_secs
    }

    #[must_use]
    pub fn transition_delay_secs(&self) -> u32 {
        self.transition_delay_secs
    }

    #[must_use]
    pub fn low_time_threshold_secs(&self) -> u32 {
        self.low_time_threshold_secs
    }

    #[must_use]
    pub fn transition_delay(&self) -> Duration {
        Duration::from_secs(u64::from(self.transition_delay_secs))
    }

    /// True when `seconds_remaining` is at or below the low-time threshold.
    #[must_use]
    pub fn is_low_time(&self, seconds_remaining: u32) -> bool {
        seconds_remaining <= self.low_time_threshold_secs
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
