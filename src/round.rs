use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::{CORRECT_POINTS, ERROR_FLASH_MS, HINT_COST, REVEAL_DELAY_MS, SUCCESS_DELAY_MS};

/// Visual state of the active round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    None,
    Success,
    Error,
    Revealed,
}

/// How a round ended. Delivered from `on_tick` once the post-feedback delay
/// has elapsed, so the player sees the result before the word changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct { points: u32 },
    Skipped,
}

/// Random permutation of `word`, re-rolled until it differs from the
/// original. Words without two distinct characters are returned as-is since
/// no differing permutation exists.
pub fn scramble(word: &str, rng: &mut impl Rng) -> String {
    let original: Vec<char> = word.chars().collect();
    if original.len() < 2 || original.iter().all(|&c| c == original[0]) {
        return word.to_string();
    }

    let mut shuffled = original.clone();
    loop {
        shuffled.shuffle(rng);
        if shuffled != original {
            return shuffled.into_iter().collect();
        }
    }
}

/// A single word challenge: the scrambled form, the player's input, hint
/// bookkeeping, and the delayed outcome signal. Replaced wholesale when the
/// game advances to the next word.
#[derive(Debug)]
pub struct Round {
    serial: u64,
    target: String,
    scrambled: String,
    input: String,
    hint: Option<String>,
    hint_pending: bool,
    feedback: Feedback,
    error_flash_ms: u64,
    resolve: Option<(u64, Outcome)>,
}

impl Round {
    pub fn new(serial: u64, target: &str, rng: &mut impl Rng) -> Self {
        Self {
            serial,
            target: target.to_string(),
            scrambled: scramble(target, rng),
            input: String::new(),
            hint: None,
            hint_pending: false,
            feedback: Feedback::None,
            error_flash_ms: 0,
            resolve: None,
        }
    }

    pub fn serial(&self) -> u64 {
        self.serial
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn scrambled(&self) -> &str {
        &self.scrambled
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn hint_pending(&self) -> bool {
        self.hint_pending
    }

    pub fn feedback(&self) -> Feedback {
        self.feedback
    }

    /// True once an outcome is scheduled; the round no longer reacts to
    /// input while it plays out.
    pub fn is_resolving(&self) -> bool {
        self.resolve.is_some()
    }

    pub fn push_char(&mut self, c: char) {
        if self.feedback == Feedback::Revealed || self.is_resolving() {
            return;
        }
        self.input.push(c);
    }

    pub fn backspace(&mut self) {
        if self.feedback == Feedback::Revealed || self.is_resolving() {
            return;
        }
        self.input.pop();
    }

    /// Case-insensitive exact match against the target. A hit schedules the
    /// `Correct` outcome (hint cost already deducted); a miss flashes the
    /// error state and clears the input.
    pub fn submit(&mut self) {
        if self.input.trim().is_empty()
            || self.feedback == Feedback::Revealed
            || self.is_resolving()
        {
            return;
        }

        if self.input.eq_ignore_ascii_case(&self.target) {
            self.feedback = Feedback::Success;
            self.error_flash_ms = 0;
            let points = if self.hint.is_some() {
                CORRECT_POINTS - HINT_COST
            } else {
                CORRECT_POINTS
            };
            self.resolve = Some((SUCCESS_DELAY_MS, Outcome::Correct { points }));
        } else {
            self.feedback = Feedback::Error;
            self.error_flash_ms = ERROR_FLASH_MS;
            self.input.clear();
        }
    }

    /// Marks a hint request as in flight. At most one hint per word: returns
    /// false (and changes nothing) while a hint is pending, already granted,
    /// or the round is revealed.
    pub fn begin_hint(&mut self) -> bool {
        if self.hint.is_some() || self.hint_pending || self.feedback == Feedback::Revealed {
            return false;
        }
        self.hint_pending = true;
        true
    }

    /// Stores an arrived hint. Arrivals for another round's serial are stale
    /// and dropped.
    pub fn apply_hint(&mut self, serial: u64, text: String) {
        if serial != self.serial {
            log::debug!("dropping stale hint for round {serial}");
            return;
        }
        self.hint_pending = false;
        self.hint = Some(text);
    }

    /// Reveals the answer and schedules the `Skipped` outcome. Revealed is
    /// terminal: no further guesses, hints, or skips are accepted.
    pub fn skip(&mut self) {
        if self.feedback == Feedback::Revealed || self.is_resolving() {
            return;
        }
        self.feedback = Feedback::Revealed;
        self.input = self.target.clone();
        self.error_flash_ms = 0;
        self.resolve = Some((REVEAL_DELAY_MS, Outcome::Skipped));
    }

    /// Advances the round's delays by `elapsed_ms`. Returns the outcome once
    /// its delay has fully elapsed.
    pub fn on_tick(&mut self, elapsed_ms: u64) -> Option<Outcome> {
        if self.error_flash_ms > 0 {
            self.error_flash_ms = self.error_flash_ms.saturating_sub(elapsed_ms);
            if self.error_flash_ms == 0 && self.feedback == Feedback::Error {
                self.feedback = Feedback::None;
            }
        }

        if let Some((remaining, outcome)) = self.resolve.as_mut() {
            *remaining = remaining.saturating_sub(elapsed_ms);
            if *remaining == 0 {
                let outcome = *outcome;
                self.resolve = None;
                return Some(outcome);
            }
        }
        None
    }
}
