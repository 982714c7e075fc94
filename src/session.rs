use std::time::SystemTime;

/// Lifecycle of a single target word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WordStatus {
    Pending,
    Current,
    Correct,
    Incorrect,
}

/// Per-position classification of a typed character against the target word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharVerdict {
    Pending,
    Correct,
    Incorrect,
}

/// Typing progress for one target word. The verdicts are only meaningful
/// while the word is current; committed words keep the verdicts they had at
/// commit time for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordState {
    pub status: WordStatus,
    pub verdicts: Vec<CharVerdict>,
}

impl WordState {
    pub fn pending() -> Self {
        Self {
            status: WordStatus::Pending,
            verdicts: Vec::new(),
        }
    }
}

/// Classify `input` against `word` position by position. The result always
/// covers `max(input chars, word chars)` positions: overflow typed past the
/// end of the word is incorrect, untyped tail positions are pending.
pub fn char_verdicts(input: &str, word: &str) -> Vec<CharVerdict> {
    let typed: Vec<char> = input.chars().collect();
    let target: Vec<char> = word.chars().collect();
    let len = typed.len().max(target.len());

    (0..len)
        .map(|i| {
            if i >= typed.len() {
                CharVerdict::Pending
            } else if i >= target.len() {
                CharVerdict::Incorrect
            } else if typed[i] == target[i] {
                CharVerdict::Correct
            } else {
                CharVerdict::Incorrect
            }
        })
        .collect()
}

/// One timed typing attempt, from reset to finish.
///
/// All mutation happens through the three input operations plus `finish`;
/// every one of them is a defined no-op once the session has finished.
#[derive(Debug)]
pub struct Session {
    pub words: Vec<String>,
    pub word_states: Vec<WordState>,
    pub current_word_index: usize,
    pub input: String,
    pub started_at: Option<SystemTime>,
    pub finished: bool,
    pub duration_secs: u64,
}

impl Session {
    pub fn new(words: Vec<String>, duration_secs: u64) -> Self {
        let word_states = words.iter().map(|_| WordState::pending()).collect();
        Self {
            words,
            word_states,
            current_word_index: 0,
            input: String::new(),
            started_at: None,
            finished: false,
            duration_secs,
        }
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// The input buffer has advanced past the last supplied word.
    pub fn is_exhausted(&self) -> bool {
        self.current_word_index >= self.words.len()
    }

    /// Append a fresh batch of target words, keeping the index in range
    /// after the original supply has been typed through.
    pub fn extend(&mut self, batch: Vec<String>) {
        self.word_states
            .extend(batch.iter().map(|_| WordState::pending()));
        self.words.extend(batch);
    }

    /// Replace the input buffer with the value reported by the input surface
    /// and recompute the current word's verdicts. Returns whether the session
    /// was mutated.
    ///
    /// A buffer ending in a separator is ignored here; word boundaries are
    /// signalled exclusively through `commit_word`.
    pub fn on_input(&mut self, new_buffer: &str, now: SystemTime) -> bool {
        if self.finished || self.is_exhausted() {
            return false;
        }
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
        if new_buffer.ends_with(' ') {
            return false;
        }

        self.input = new_buffer.to_string();
        let word = &self.words[self.current_word_index];
        self.word_states[self.current_word_index] = WordState {
            status: WordStatus::Current,
            verdicts: char_verdicts(&self.input, word),
        };
        true
    }

    /// Finalize the current word and advance. The committed word keeps the
    /// verdicts computed by the last `on_input`. Returns whether the index
    /// advanced; an empty (or whitespace-only) buffer never advances, so
    /// repeated separator keystrokes are absorbed.
    pub fn commit_word(&mut self, now: SystemTime) -> bool {
        if self.finished || self.is_exhausted() {
            return false;
        }
        let trimmed = self.input.trim();
        if trimmed.is_empty() {
            return false;
        }
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }

        let state = &mut self.word_states[self.current_word_index];
        state.status = if trimmed == self.words[self.current_word_index] {
            WordStatus::Correct
        } else {
            WordStatus::Incorrect
        };
        self.current_word_index += 1;
        self.input.clear();
        true
    }

    /// Step back to the previous word, discarding its recorded verdict and
    /// seeding the buffer with its full text for re-typing. Only permitted on
    /// an empty buffer with at least one committed word.
    pub fn backspace_navigate(&mut self) -> bool {
        if self.finished || !self.input.is_empty() || self.current_word_index == 0 {
            return false;
        }

        self.current_word_index -= 1;
        self.word_states[self.current_word_index] = WordState::pending();
        self.input = self.words[self.current_word_index].clone();
        true
    }

    /// Monotonic false -> true; the session becomes read-only afterwards.
    pub fn finish(&mut self) {
        self.finished = true;
    }
}
