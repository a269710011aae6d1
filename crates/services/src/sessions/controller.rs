use std::fmt;

use quiz_core::model::{QuestionBank, QuestionOutcome, QuizReport, QuizSettings};
use tracing::{debug, info, trace};

use crate::error::SessionError;
use crate::scheduler::Scheduler;
use crate::timer::{QuestionTimer, TimerState};

use super::event::SessionEvent;
use super::progress::SessionProgress;
use super::state::{QuestionState, SessionPhase, Stage};

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// State machine for one run through a question bank.
///
/// The controller owns the active question's timer and the ordered outcome
/// list. It is driven entirely by [`SessionEvent`]s (or the equivalent method
/// calls) and never blocks; time passes through the `Scheduler`.
pub struct SessionController<V, S> {
    bank: QuestionBank,
    settings: QuizSettings,
    view: V,
    scheduler: S,
    stage: Stage,
    outcomes: Vec<QuestionOutcome>,
    report: Option<QuizReport>,
}

impl<V, S> SessionController<V, S>
where
    V: crate::view::ViewPort,
    S: Scheduler,
{
    #[must_use]
    pub fn new(bank: QuestionBank, settings: QuizSettings, view: V, scheduler: S) -> Self {
        Self {
            bank,
            settings,
            view,
            scheduler,
            stage: Stage::NotStarted,
            outcomes: Vec::new(),
            report: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.stage.phase()
    }

    #[must_use]
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Outcomes recorded so far, in question order.
    #[must_use]
    pub fn outcomes(&self) -> &[QuestionOutcome] {
        &self.outcomes
    }

    /// The final report, once the session is complete.
    #[must_use]
    pub fn report(&self) -> Option<&QuizReport> {
        self.report.as_ref()
    }

    /// Countdown of the active question.
    #[must_use]
    pub fn timer_state(&self) -> Option<TimerState> {
        match &self.stage {
            Stage::Active { timer, .. } => Some(timer.state()),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.stage, Stage::Complete)
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.bank.count();
        let answered = self.outcomes.len();
        SessionProgress {
            total,
            answered,
            remaining: total.saturating_sub(answered),
            current: self.phase().question(),
            is_complete: self.is_complete(),
        }
    }

    /// Dispatch one event.
    ///
    /// Ticks, delay expiries and selections that name a question other than the
    /// current one are stale and ignored.
    ///
    /// # Errors
    ///
    /// Propagates the error of the operation the event maps to.
    pub fn handle(&mut self, event: SessionEvent) -> Result<(), SessionError> {
        match event {
            SessionEvent::Start => self.start(),
            SessionEvent::OptionSelected { question, option } => {
                self.select_option(question, option)
            }
            SessionEvent::Tick { question } => self.on_tick(question),
            SessionEvent::TransitionElapsed { question } => self.on_transition_elapsed(question),
        }
    }

    /// Begin the session with the first question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyStarted` unless the session has not started yet.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if !matches!(self.stage, Stage::NotStarted) {
            return Err(SessionError::AlreadyStarted);
        }
        info!(questions = self.bank.count(), "quiz session started");
        self.activate(0)
    }

    /// User picked `option` on `question`.
    ///
    /// # Errors
    ///
    /// See [`SessionController::submit_answer`].
    pub fn select_option(&mut self, question: usize, option: usize) -> Result<(), SessionError> {
        if let Some(current) = self.phase().question() {
            if current != question {
                debug!(question, current, option, "stale selection ignored");
                return Ok(());
            }
        }
        self.submit_answer(Some(option))
    }

    /// Record the answer for the active question; `None` means no selection.
    ///
    /// A second answer for the same question is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` when no question is active and
    /// `SessionError::InvalidOption` for a selection outside the option list.
    pub fn submit_answer(&mut self, selected: Option<usize>) -> Result<(), SessionError> {
        let phase = self.stage.phase();
        let Stage::Active { question, timer } = &mut self.stage else {
            return Err(SessionError::InvalidTransition {
                action: "submit an answer",
                phase,
            });
        };

        let index = question.index();
        let current = self.bank.get(index)?;
        if let Some(option) = selected.filter(|&option| option >= current.option_count()) {
            return Err(SessionError::InvalidOption {
                question: index,
                option,
                options: current.option_count(),
            });
        }

        if !question.mark_answered() {
            debug!(question = index, "question already answered");
            return Ok(());
        }

        timer.cancel();
        let outcome = QuestionOutcome::record(current, selected, timer.state().seconds_remaining);
        info!(
            question = index,
            selected = ?selected,
            correct = outcome.is_correct(),
            "answer recorded"
        );

        self.view.highlight_answer(current.correct_index(), selected);
        self.outcomes.push(outcome);

        let delay = self.scheduler.after(
            self.settings.transition_delay(),
            SessionEvent::TransitionElapsed { question: index },
        );
        self.stage = Stage::TransitionDelay {
            question: index,
            delay,
        };
        Ok(())
    }

    /// One second passed on the countdown of `question`.
    ///
    /// # Errors
    ///
    /// Returns the error of recording the timeout, which cannot happen for a
    /// well-formed bank.
    pub fn on_tick(&mut self, question: usize) -> Result<(), SessionError> {
        let Stage::Active {
            question: state,
            timer,
        } = &mut self.stage
        else {
            trace!(question, "tick outside an active question ignored");
            return Ok(());
        };
        if state.index() != question {
            debug!(question, current = state.index(), "stale tick ignored");
            return Ok(());
        }

        let Some(tick) = timer.on_tick() else {
            return Ok(());
        };
        self.view.update_timer(tick.seconds_remaining, tick.low_time);

        if tick.expired {
            info!(question, "question timed out");
            self.submit_answer(None)?;
        }
        Ok(())
    }

    /// The post-answer pause after `question` is over: advance or finish.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Bank`/`Timer`/`Report` only if the controller's own
    /// bookkeeping is inconsistent.
    pub fn on_transition_elapsed(&mut self, question: usize) -> Result<(), SessionError> {
        let current = matches!(
            self.stage,
            Stage::TransitionDelay { question: pending, .. } if pending == question
        );
        if !current {
            debug!(question, phase = %self.phase(), "stale transition ignored");
            return Ok(());
        }

        let next = question + 1;
        if next < self.bank.count() {
            self.activate(next)
        } else {
            self.complete()
        }
    }

    /// Stop all scheduled work and leave the session as it is. Outcomes already
    /// recorded stay valid; a half-answered question records nothing.
    pub fn shutdown(&mut self) {
        match &mut self.stage {
            Stage::Active { timer, .. } => timer.cancel(),
            Stage::TransitionDelay { delay, .. } => delay.cancel(),
            Stage::Complete | Stage::Cancelled => return,
            Stage::NotStarted => {}
        }
        info!(
            phase = %self.phase(),
            answered = self.outcomes.len(),
            "quiz session cancelled"
        );
        self.stage = Stage::Cancelled;
    }

    fn activate(&mut self, index: usize) -> Result<(), SessionError> {
        let question = self.bank.get(index)?;
        debug!(question = index, "activating question");

        self.view.show_question(
            index,
            self.bank.count(),
            question.prompt(),
            question.options(),
        );

        let countdown = self.settings.countdown_secs();
        let mut timer = QuestionTimer::new(index, self.settings.low_time_threshold_secs());
        timer.start(countdown, &mut self.scheduler)?;
        self.view
            .update_timer(countdown, self.settings.is_low_time(countdown));

        self.stage = Stage::Active {
            question: QuestionState::new(index),
            timer,
        };
        Ok(())
    }

    fn complete(&mut self) -> Result<(), SessionError> {
        let report = QuizReport::from_outcomes(&self.bank, &self.outcomes)?;
        info!(
            score = report.score(),
            total = report.total(),
            "quiz session complete"
        );
        self.stage = Stage::Complete;
        self.view.show_results(&report);
        self.report = Some(report);
        Ok(())
    }
}

impl<V, S> fmt::Debug for SessionController<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionController")
            .field("questions", &self.bank.count())
            .field("phase", &self.stage.phase())
            .field("outcomes_len", &self.outcomes.len())
            .field("has_report", &self.report.is_some())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ManualScheduler, RecordingView, ViewCall};
    use quiz_core::model::QuestionSpec;

    type Controller = SessionController<RecordingView, ManualScheduler>;

    fn bank(n: usize) -> QuestionBank {
        let specs = (0..n)
            .map(|i| QuestionSpec {
                prompt: format!("Question {}", i + 1),
                options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                correct_index: i % 4,
            })
            .collect();
        QuestionBank::from_specs(specs).unwrap()
    }

    fn controller(n: usize) -> (Controller, ManualScheduler) {
        let scheduler = ManualScheduler::new();
        let controller = SessionController::new(
            bank(n),
            QuizSettings::default(),
            RecordingView::new(),
            scheduler.clone(),
        );
        (controller, scheduler)
    }

    fn correct(i: usize) -> usize {
        i % 4
    }

    fn finish_delay(controller: &mut Controller, scheduler: &ManualScheduler) {
        let event = scheduler.fire_delay().expect("delay scheduled");
        controller.handle(event).unwrap();
    }

    fn run_out_clock(controller: &mut Controller, scheduler: &ManualScheduler) {
        while let Some(event) = scheduler.ticker() {
            controller.handle(event).unwrap();
        }
    }

    #[test]
    fn start_activates_first_question_and_timer() {
        let (mut c, scheduler) = controller(3);
        assert_eq!(c.phase(), SessionPhase::NotStarted);

        c.handle(SessionEvent::Start).unwrap();

        assert_eq!(c.phase(), SessionPhase::Active(0));
        assert_eq!(
            c.timer_state(),
            Some(TimerState {
                seconds_remaining: 10,
                running: true
            })
        );
        assert_eq!(scheduler.ticker(), Some(SessionEvent::Tick { question: 0 }));
        assert!(matches!(
            &c.view().calls[0],
            ViewCall::ShowQuestion { index: 0, total: 3, prompt, .. } if prompt == "Question 1"
        ));
        assert_eq!(c.view().timer_values(), vec![(10, false)]);
    }

    #[test]
    fn start_twice_is_rejected() {
        let (mut c, _scheduler) = controller(2);
        c.start().unwrap();
        let err = c.start().unwrap_err();
        assert!(matches!(err, SessionError::AlreadyStarted));
        assert_eq!(c.phase(), SessionPhase::Active(0));
    }

    #[test]
    fn answering_all_correctly_scores_full_marks() {
        let (mut c, scheduler) = controller(6);
        c.start().unwrap();

        for i in 0..6 {
            assert_eq!(c.phase(), SessionPhase::Active(i));
            c.select_option(i, correct(i)).unwrap();
            assert_eq!(c.phase(), SessionPhase::TransitionDelay(i));
            finish_delay(&mut c, &scheduler);
        }

        assert_eq!(c.phase(), SessionPhase::Complete);
        let report = c.report().unwrap();
        assert_eq!(report.score(), 6);
        assert_eq!(c.outcomes().len(), 6);
        assert!(c.outcomes().iter().all(|o| o.is_correct() && o.selected_index().is_some()));
        assert_eq!(c.view().reports().len(), 1);
        assert_eq!(scheduler.live_tasks(), 0);
    }

    #[test]
    fn timeout_records_no_answer_and_advances() {
        let (mut c, scheduler) = controller(6);
        c.start().unwrap();
        for i in 0..2 {
            c.select_option(i, correct(i)).unwrap();
            finish_delay(&mut c, &scheduler);
        }
        assert_eq!(c.phase(), SessionPhase::Active(2));

        run_out_clock(&mut c, &scheduler);

        assert_eq!(c.phase(), SessionPhase::TransitionDelay(2));
        let outcome = &c.outcomes()[2];
        assert_eq!(outcome.question_index(), 2);
        assert_eq!(outcome.selected_index(), None);
        assert!(!outcome.is_correct());
        assert!(c.view().calls.contains(&ViewCall::HighlightAnswer {
            correct_index: correct(2),
            selected_index: None
        }));

        finish_delay(&mut c, &scheduler);
        assert_eq!(c.phase(), SessionPhase::Active(3));
    }

    #[test]
    fn countdown_is_shown_each_second_with_low_time_flag() {
        let (mut c, scheduler) = controller(1);
        c.start().unwrap();
        run_out_clock(&mut c, &scheduler);

        let values = c.view().timer_values();
        let seconds: Vec<_> = values.iter().map(|(s, _)| *s).collect();
        assert_eq!(seconds, (0..=10).rev().collect::<Vec<_>>());
        assert!(values.iter().all(|(s, low)| *low == (*s <= 5)));
    }

    #[test]
    fn double_click_records_first_selection_only() {
        let (mut c, _scheduler) = controller(3);
        c.start().unwrap();

        c.select_option(0, 1).unwrap();
        let err = c.select_option(0, 0).unwrap_err();

        assert!(matches!(err, SessionError::InvalidTransition { .. }));
        assert!(err.is_misuse());
        assert_eq!(c.outcomes().len(), 1);
        assert_eq!(c.outcomes()[0].selected_index(), Some(1));
    }

    #[test]
    fn click_after_timeout_keeps_the_timeout() {
        let (mut c, scheduler) = controller(3);
        c.start().unwrap();
        c.select_option(0, correct(0)).unwrap();
        finish_delay(&mut c, &scheduler);

        run_out_clock(&mut c, &scheduler);
        assert_eq!(c.phase(), SessionPhase::TransitionDelay(1));

        let err = c
            .handle(SessionEvent::OptionSelected {
                question: 1,
                option: correct(1),
            })
            .unwrap_err();

        assert!(err.is_misuse());
        assert_eq!(c.phase(), SessionPhase::TransitionDelay(1));
        let for_question: Vec<_> = c
            .outcomes()
            .iter()
            .filter(|o| o.question_index() == 1)
            .collect();
        assert_eq!(for_question.len(), 1);
        assert_eq!(for_question[0].selected_index(), None);
        assert!(!for_question[0].is_correct());
    }

    #[test]
    fn answer_cancels_timer_and_late_ticks_are_ignored() {
        let (mut c, scheduler) = controller(2);
        c.start().unwrap();
        c.handle(SessionEvent::Tick { question: 0 }).unwrap();
        c.select_option(0, 0).unwrap();

        assert_eq!(scheduler.ticker(), None);
        assert_eq!(c.outcomes()[0].seconds_remaining(), 9);

        let shown = c.view().calls.len();
        c.handle(SessionEvent::Tick { question: 0 }).unwrap();
        assert_eq!(c.view().calls.len(), shown);
        assert_eq!(c.outcomes().len(), 1);
    }

    #[test]
    fn stale_events_do_not_touch_the_current_question() {
        let (mut c, scheduler) = controller(3);
        c.start().unwrap();
        c.select_option(0, 0).unwrap();
        finish_delay(&mut c, &scheduler);
        assert_eq!(c.phase(), SessionPhase::Active(1));

        c.handle(SessionEvent::OptionSelected {
            question: 0,
            option: 2,
        })
        .unwrap();
        c.handle(SessionEvent::Tick { question: 0 }).unwrap();
        c.handle(SessionEvent::TransitionElapsed { question: 0 }).unwrap();

        assert_eq!(c.phase(), SessionPhase::Active(1));
        assert_eq!(c.outcomes().len(), 1);
        assert_eq!(c.timer_state().unwrap().seconds_remaining, 10);
    }

    #[test]
    fn invalid_option_records_nothing() {
        let (mut c, _scheduler) = controller(1);
        c.start().unwrap();

        let err = c.select_option(0, 4).unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidOption {
                question: 0,
                option: 4,
                options: 4
            }
        ));
        assert_eq!(c.phase(), SessionPhase::Active(0));
        assert!(c.outcomes().is_empty());
    }

    #[test]
    fn answering_before_start_is_invalid() {
        let (mut c, _scheduler) = controller(1);
        let err = c.submit_answer(Some(0)).unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidTransition {
                phase: SessionPhase::NotStarted,
                ..
            }
        ));
    }

    #[test]
    fn last_answer_goes_straight_to_complete() {
        let (mut c, scheduler) = controller(6);
        c.start().unwrap();
        for i in 0..5 {
            c.select_option(i, correct(i)).unwrap();
            finish_delay(&mut c, &scheduler);
        }

        assert_eq!(c.phase(), SessionPhase::Active(5));
        c.select_option(5, 0).unwrap();
        assert_eq!(c.phase(), SessionPhase::TransitionDelay(5));
        assert!(c.report().is_none());
        finish_delay(&mut c, &scheduler);

        assert_eq!(c.phase(), SessionPhase::Complete);
        assert_eq!(c.view().shown_questions(), (0..6).collect::<Vec<_>>());
        assert_eq!(c.view().reports().len(), 1);
        assert_eq!(c.report().unwrap().score(), 5);

        // Complete is terminal.
        c.handle(SessionEvent::TransitionElapsed { question: 5 }).unwrap();
        assert!(c.submit_answer(Some(0)).is_err());
        assert_eq!(c.view().reports().len(), 1);
        assert_eq!(c.outcomes().len(), 6);
    }

    #[test]
    fn shutdown_mid_question_cancels_timer_without_partial_outcome() {
        let (mut c, scheduler) = controller(3);
        c.start().unwrap();
        c.select_option(0, 0).unwrap();
        finish_delay(&mut c, &scheduler);
        c.handle(SessionEvent::Tick { question: 1 }).unwrap();

        c.shutdown();

        assert_eq!(c.phase(), SessionPhase::Cancelled);
        assert_eq!(scheduler.live_tasks(), 0);
        assert_eq!(c.outcomes().len(), 1);
        assert!(c.report().is_none());
        assert!(c.select_option(1, 0).is_err());
    }

    #[test]
    fn shutdown_during_delay_cancels_pending_advance() {
        let (mut c, scheduler) = controller(2);
        c.start().unwrap();
        c.select_option(0, 0).unwrap();

        c.shutdown();

        assert_eq!(scheduler.live_tasks(), 0);
        assert_eq!(c.phase(), SessionPhase::Cancelled);
    }

    #[test]
    fn progress_tracks_answers() {
        let (mut c, scheduler) = controller(3);
        c.start().unwrap();
        c.select_option(0, 0).unwrap();
        finish_delay(&mut c, &scheduler);

        let progress = c.progress();
        assert_eq!(progress.total, 3);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.remaining, 2);
        assert_eq!(progress.current, Some(1));
        assert!(!progress.is_complete);
    }

    #[test]
    fn at_most_one_timer_is_live() {
        let (mut c, scheduler) = controller(4);
        c.start().unwrap();
        for i in 0..4 {
            assert_eq!(scheduler.live_tasks(), 1);
            c.select_option(i, correct(i)).unwrap();
            assert_eq!(scheduler.ticker(), None);
            finish_delay(&mut c, &scheduler);
        }
        assert_eq!(scheduler.live_tasks(), 0);
    }
}
