use crate::config::Difficulty;
use crate::round::{Outcome, Round};
use crate::session::{Phase, Session};
use crate::supply::WordSupply;

/// Everything a hint dispatch needs; handed to the presentation layer so the
/// actual request can run off the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintRequest {
    pub word: String,
    pub difficulty: Difficulty,
    pub serial: u64,
}

/// A playable game: the session state machine, the word supply, and the
/// active round, wired together. The presentation layer only calls action
/// methods and reads state; all rules live here and below.
#[derive(Debug)]
pub struct Game {
    pub session: Session,
    pub supply: WordSupply,
    pub round: Round,
    serial: u64,
}

impl Game {
    pub fn new(difficulty: Difficulty, duration_override: Option<u32>, supply: WordSupply) -> Self {
        let round = Round::new(0, supply.current(), &mut rand::thread_rng());
        Self {
            session: Session::new(difficulty, duration_override),
            supply,
            round,
            serial: 0,
        }
    }

    /// Starts or restarts a game; identical behavior from every phase.
    pub fn start(&mut self) {
        let mut rng = rand::thread_rng();
        self.session.start(&mut self.supply, &mut rng);
        self.next_round();
    }

    pub fn toggle_pause(&mut self) {
        self.session.toggle_pause();
    }

    pub fn to_menu(&mut self) {
        self.session.to_menu();
    }

    pub fn push_char(&mut self, c: char) {
        if self.session.phase == Phase::Playing {
            self.round.push_char(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.session.phase == Phase::Playing {
            self.round.backspace();
        }
    }

    pub fn submit(&mut self) {
        if self.session.phase == Phase::Playing {
            self.round.submit();
        }
    }

    pub fn skip(&mut self) {
        if self.session.phase == Phase::Playing {
            self.round.skip();
        }
    }

    /// Claims the round's single hint slot. `Some` means the caller must
    /// dispatch the request and route the arrival back via `apply_hint`.
    pub fn begin_hint(&mut self) -> Option<HintRequest> {
        if self.session.phase != Phase::Playing {
            return None;
        }
        if !self.round.begin_hint() {
            return None;
        }
        Some(HintRequest {
            word: self.round.target().to_string(),
            difficulty: self.session.difficulty,
            serial: self.round.serial(),
        })
    }

    /// Routes an arrived hint to the round; the round itself drops stale
    /// serials. Ignored outside an active game.
    pub fn apply_hint(&mut self, serial: u64, text: String) {
        if matches!(self.session.phase, Phase::Playing | Phase::Paused) {
            self.round.apply_hint(serial, text);
        }
    }

    /// Advances all clocks by one tick. Round delays only run while Playing,
    /// so pausing freezes feedback mid-flight along with the countdown.
    pub fn on_tick(&mut self, elapsed_ms: u64) {
        if self.session.on_tick(elapsed_ms) {
            // The clock ran out this very tick; any scheduled outcome dies
            // with the round.
            return;
        }
        if self.session.phase != Phase::Playing {
            return;
        }
        if let Some(outcome) = self.round.on_tick(elapsed_ms) {
            self.resolve_round(outcome);
        }
    }

    fn resolve_round(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Correct { points } => {
                self.session.apply_correct(points);
                self.session.add_time_bonus();
            }
            Outcome::Skipped => {
                self.session.apply_skip();
            }
        }
        let mut rng = rand::thread_rng();
        self.supply.advance(&mut rng);
        self.next_round();
    }

    fn next_round(&mut self) {
        self.serial += 1;
        self.round = Round::new(self.serial, self.supply.current(), &mut rand::thread_rng());
    }
}
