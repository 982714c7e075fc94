use std::error::Error;
use std::fmt;

use crate::clock::{Clock, Countdown};
use crate::config::DurationMode;
use crate::session::Session;
use crate::stats::{self, FinalResult, LiveMetrics};
use crate::words::WordSupplier;

/// The finite set of inputs a session reacts to. Every mutation flows
/// through [`Controller::apply`], so the whole machine is drivable without a
/// rendering harness.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// The input surface reports the full new buffer for the current word.
    Input(String),
    /// The separator key signalled a word boundary.
    Commit,
    /// The deletion key was pressed on an empty buffer.
    NavigateBack,
    /// Periodic clock re-evaluation.
    Tick,
}

#[derive(Debug, PartialEq, Eq)]
pub enum SetupError {
    /// The supplier produced no words; a zero-word session is never entered.
    EmptyWordBatch,
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::EmptyWordBatch => write!(f, "word supplier returned an empty batch"),
        }
    }
}

impl Error for SetupError {}

/// Orchestrates one session at a time: seeds words from the supplier, routes
/// commands into the session, polls the countdown, and finalizes exactly
/// once. Replacing the session wholesale on reset is what keeps ticks from a
/// previous session from leaking into the next one.
pub struct Controller<C: Clock> {
    clock: C,
    supplier: Box<dyn WordSupplier>,
    mode: DurationMode,
    batch_size: usize,
    countdown: Countdown,
    session: Session,
    live: LiveMetrics,
    final_result: Option<FinalResult>,
}

impl<C: Clock> fmt::Debug for Controller<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller").finish_non_exhaustive()
    }
}

impl<C: Clock> Controller<C> {
    pub fn new(
        clock: C,
        supplier: Box<dyn WordSupplier>,
        mode: DurationMode,
        batch_size: usize,
    ) -> Result<Self, SetupError> {
        let mut controller = Self {
            clock,
            supplier,
            mode,
            batch_size,
            countdown: Countdown::new(mode.as_secs()),
            session: Session::new(Vec::new(), mode.as_secs()),
            live: LiveMetrics::default(),
            final_result: None,
        };
        controller.start(mode)?;
        Ok(controller)
    }

    /// Begin a fresh session in `mode`: new words, clock armed but inert
    /// until the first qualifying input.
    pub fn start(&mut self, mode: DurationMode) -> Result<(), SetupError> {
        let words = self.supplier.next_batch(self.batch_size);
        if words.is_empty() {
            return Err(SetupError::EmptyWordBatch);
        }

        self.mode = mode;
        self.countdown = Countdown::new(mode.as_secs());
        self.session = Session::new(words, mode.as_secs());
        self.live = LiveMetrics::default();
        self.final_result = None;
        Ok(())
    }

    /// Discard the current session and start over with the current mode.
    pub fn reset(&mut self) -> Result<(), SetupError> {
        self.start(self.mode)
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Input(buffer) => {
                if self.session.on_input(&buffer, self.clock.now()) {
                    self.refresh_live();
                }
            }
            Command::Commit => {
                if self.session.commit_word(self.clock.now()) {
                    if self.session.is_exhausted() {
                        // Typed through the whole supply before the clock ran
                        // out; fetch another batch so input never stalls.
                        let batch = self.supplier.next_batch(self.batch_size);
                        self.session.extend(batch);
                    }
                    self.refresh_live();
                }
            }
            Command::NavigateBack => {
                if self.session.backspace_navigate() {
                    self.refresh_live();
                }
            }
            Command::Tick => self.on_tick(),
        }
    }

    fn on_tick(&mut self) {
        if self.session.finished || !self.session.has_started() {
            return;
        }

        let now = self.clock.now();
        self.live = stats::live_metrics(&self.session, now);

        if self.countdown.is_expired(self.session.started_at, now) {
            // First zero-crossing; `finished` guards against a second pass.
            self.session.finish();
            self.final_result = Some(stats::final_result(&self.session, now));
        }
    }

    fn refresh_live(&mut self) {
        self.live = stats::live_metrics(&self.session, self.clock.now());
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn live(&self) -> LiveMetrics {
        self.live
    }

    pub fn final_result(&self) -> Option<FinalResult> {
        self.final_result
    }

    pub fn mode(&self) -> DurationMode {
        self.mode
    }

    pub fn is_finished(&self) -> bool {
        self.session.finished
    }

    pub fn remaining_secs(&self) -> u64 {
        self.countdown
            .remaining_secs(self.session.started_at, self.clock.now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::session::WordStatus;
    use crate::words::FixedWordSupplier;
    use assert_matches::assert_matches;
    use std::time::Duration;

    fn controller(words: &[&str], mode: DurationMode) -> (Controller<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let supplier = Box::new(FixedWordSupplier::new(words));
        let c = Controller::new(clock.clone(), supplier, mode, words.len()).unwrap();
        (c, clock)
    }

    fn type_word(c: &mut Controller<ManualClock>, word: &str) {
        let mut buffer = String::new();
        for ch in word.chars() {
            buffer.push(ch);
            c.apply(Command::Input(buffer.clone()));
        }
        c.apply(Command::Commit);
    }

    #[test]
    fn empty_supplier_is_a_setup_error() {
        let supplier = Box::new(FixedWordSupplier::new(&[]));
        let result = Controller::new(ManualClock::new(), supplier, DurationMode::Secs30, 50);

        assert_matches!(result, Err(SetupError::EmptyWordBatch));
    }

    #[test]
    fn clock_is_inert_until_first_input() {
        let (mut c, clock) = controller(&["the", "cat"], DurationMode::Secs15);
        clock.advance(Duration::from_secs(100));
        c.apply(Command::Tick);

        assert!(!c.is_finished());
        assert_eq!(c.remaining_secs(), 15);
    }

    #[test]
    fn tick_finalizes_exactly_once() {
        let (mut c, clock) = controller(&["the", "cat"], DurationMode::Secs15);
        type_word(&mut c, "the");

        clock.advance(Duration::from_secs(15));
        c.apply(Command::Tick);
        assert!(c.is_finished());
        let first = c.final_result().unwrap();

        clock.advance(Duration::from_secs(30));
        c.apply(Command::Tick);
        c.apply(Command::Tick);
        assert_eq!(c.final_result(), Some(first));
    }

    #[test]
    fn finished_session_absorbs_input() {
        let (mut c, clock) = controller(&["the", "cat"], DurationMode::Secs15);
        type_word(&mut c, "the");
        clock.advance(Duration::from_secs(15));
        c.apply(Command::Tick);

        let live_before = c.live();
        c.apply(Command::Input("c".to_string()));
        c.apply(Command::Commit);
        c.apply(Command::NavigateBack);

        assert_eq!(c.live(), live_before);
        assert_eq!(c.session().current_word_index, 1);
    }

    #[test]
    fn exhausted_supply_is_extended_with_a_fresh_batch() {
        let (mut c, _clock) = controller(&["the"], DurationMode::Secs60);
        type_word(&mut c, "the");

        assert!(!c.session().is_exhausted());
        assert_eq!(c.session().words.len(), 2);
        assert_eq!(c.session().words[1], "the");
    }

    #[test]
    fn scenario_two_words_then_expiry() {
        let (mut c, clock) = controller(&["the", "cat"], DurationMode::Secs15);
        type_word(&mut c, "the");
        type_word(&mut c, "cat");

        clock.advance(Duration::from_secs(15));
        c.apply(Command::Tick);

        let result = c.final_result().unwrap();
        assert_eq!(result.accuracy, 100);
        // 2 words in 15 seconds
        assert_eq!(result.wpm, 8);
        assert_eq!(result.score, 120);
    }

    #[test]
    fn incorrect_word_scenario() {
        let (mut c, clock) = controller(&["cat", "dog"], DurationMode::Secs15);
        type_word(&mut c, "xyz");

        let states = &c.session().word_states;
        assert_eq!(states[0].status, WordStatus::Incorrect);
        assert_eq!(states[0].verdicts.len(), 3);

        clock.advance(Duration::from_secs(15));
        c.apply(Command::Tick);
        assert_eq!(c.final_result().unwrap().accuracy, 0);
    }

    #[test]
    fn navigate_back_reopens_previous_word() {
        let (mut c, _clock) = controller(&["the", "cat"], DurationMode::Secs30);
        type_word(&mut c, "teh");

        c.apply(Command::NavigateBack);
        let s = c.session();
        assert_eq!(s.current_word_index, 0);
        assert_eq!(s.input, "the");
        assert_eq!(s.word_states[0].status, WordStatus::Pending);
    }

    #[test]
    fn live_metrics_update_on_tick() {
        let (mut c, clock) = controller(&["the", "cat"], DurationMode::Secs60);
        type_word(&mut c, "the");

        clock.advance(Duration::from_secs(30));
        c.apply(Command::Tick);

        assert_eq!(c.live().wpm, 2);
        assert_eq!(c.live().accuracy, 100);
        assert_eq!(c.remaining_secs(), 30);
    }

    #[test]
    fn mode_change_resets_the_session() {
        let (mut c, _clock) = controller(&["the", "cat"], DurationMode::Secs15);
        type_word(&mut c, "the");

        c.start(DurationMode::Secs60).unwrap();
        assert_eq!(c.mode(), DurationMode::Secs60);
        assert_eq!(c.remaining_secs(), 60);
        assert_eq!(c.session().current_word_index, 0);
        assert!(!c.session().has_started());
        assert_eq!(c.live(), LiveMetrics::default());
    }
}
