use rand::Rng;

use crate::config::{Difficulty, SKIP_COST, STREAK_BONUS, STREAK_BONUS_AFTER, TIME_BONUS_SECS};
use crate::supply::WordSupply;

/// Top-level game phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Menu,
    Playing,
    Paused,
    GameOver,
}

/// Score and streak aggregation for one game. Reset on every start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub score: u32,
    pub streak: u32,
    pub best_streak: u32,
}

impl Stats {
    /// Applies a correct guess: difficulty multiplier on the base points,
    /// streak increment, and the streak bonus once the streak exceeds the
    /// threshold. Returns the total awarded.
    pub fn apply_correct(&mut self, base_points: u32, multiplier: f64) -> u32 {
        let adjusted = (base_points as f64 * multiplier).round() as u32;
        self.streak += 1;
        let bonus = if self.streak > STREAK_BONUS_AFTER {
            STREAK_BONUS
        } else {
            0
        };
        self.score += adjusted + bonus;
        self.best_streak = self.best_streak.max(self.streak);
        adjusted + bonus
    }

    /// Applies a skip: the cost comes off the score, floored at zero, and
    /// the streak resets.
    pub fn apply_skip(&mut self) {
        self.score = self.score.saturating_sub(SKIP_COST);
        self.streak = 0;
    }
}

/// The countdown resource. Armed only while Playing; the session arms and
/// cancels it exclusively at phase-transition boundaries, so there is never
/// a second decrement source.
#[derive(Debug, Clone, Copy, Default)]
struct Countdown {
    armed: bool,
    carry_ms: u64,
}

impl Countdown {
    fn arm(&mut self) {
        self.armed = true;
        self.carry_ms = 0;
    }

    fn cancel(&mut self) {
        self.armed = false;
        self.carry_ms = 0;
    }

    /// Accumulates elapsed wall-clock and yields the number of whole seconds
    /// that passed. Disarmed countdowns never yield.
    fn advance(&mut self, elapsed_ms: u64) -> u32 {
        if !self.armed {
            return 0;
        }
        self.carry_ms += elapsed_ms;
        let seconds = (self.carry_ms / 1000) as u32;
        self.carry_ms %= 1000;
        seconds
    }
}

/// The session state machine: phase, difficulty, clock, and stats.
#[derive(Debug)]
pub struct Session {
    pub phase: Phase,
    pub difficulty: Difficulty,
    pub time_remaining: u32,
    pub stats: Stats,
    countdown: Countdown,
    duration_override: Option<u32>,
}

impl Session {
    pub fn new(difficulty: Difficulty, duration_override: Option<u32>) -> Self {
        Self {
            phase: Phase::Menu,
            difficulty,
            time_remaining: 0,
            stats: Stats::default(),
            countdown: Countdown::default(),
            duration_override,
        }
    }

    /// Seconds a fresh game runs for: the CLI override wins over the tier.
    pub fn duration_secs(&self) -> u32 {
        self.duration_override
            .unwrap_or(self.difficulty.settings().duration_secs)
    }

    /// Starts (or restarts) a game: stats zeroed, clock set, supply
    /// reshuffled to its first word. Reachable from every phase.
    pub fn start(&mut self, supply: &mut WordSupply, rng: &mut impl Rng) {
        self.stats = Stats::default();
        self.time_remaining = self.duration_secs();
        supply.reshuffle(rng);
        self.countdown.cancel();
        self.countdown.arm();
        self.phase = Phase::Playing;
    }

    /// Playing <-> Paused. The countdown is handed over at the boundary; no
    /// other state changes.
    pub fn toggle_pause(&mut self) {
        match self.phase {
            Phase::Playing => {
                self.countdown.cancel();
                self.phase = Phase::Paused;
            }
            Phase::Paused => {
                self.countdown.arm();
                self.phase = Phase::Playing;
            }
            _ => {}
        }
    }

    pub fn end_game(&mut self) {
        self.countdown.cancel();
        self.phase = Phase::GameOver;
    }

    /// GameOver -> Menu; a no-op anywhere else.
    pub fn to_menu(&mut self) {
        if self.phase == Phase::GameOver {
            self.phase = Phase::Menu;
        }
    }

    /// Feeds elapsed wall-clock into the countdown. Returns true when the
    /// clock just ran out and the session transitioned to GameOver.
    pub fn on_tick(&mut self, elapsed_ms: u64) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        for _ in 0..self.countdown.advance(elapsed_ms) {
            self.time_remaining = self.time_remaining.saturating_sub(1);
            if self.time_remaining == 0 {
                self.end_game();
                return true;
            }
        }
        false
    }

    pub fn add_time_bonus(&mut self) {
        self.time_remaining += TIME_BONUS_SECS;
    }

    pub fn apply_correct(&mut self, base_points: u32) -> u32 {
        self.stats
            .apply_correct(base_points, self.difficulty.settings().multiplier)
    }

    pub fn apply_skip(&mut self) {
        self.stats.apply_skip();
    }

    /// Difficulty can only be changed from the menu.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        if self.phase == Phase::Menu {
            self.difficulty = difficulty;
        }
    }

    pub fn countdown_armed(&self) -> bool {
        self.countdown.armed
    }
}
