pub mod config;
pub mod game;
pub mod generate;
pub mod hints;
pub mod round;
pub mod runtime;
pub mod session;
pub mod supply;
pub mod ui;
pub mod wordbank;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    sync::mpsc::Sender,
    sync::Arc,
    time::Duration,
};

use crate::config::{
    Difficulty, CATEGORIES, DEFAULT_CATEGORIES, STATUS_OUTCOME_MS, STATUS_VALIDATION_MS,
    TICK_RATE_MS,
};
use crate::game::Game;
use crate::generate::{GeminiModel, GenError, TextModel};
use crate::hints::spawn_hint_request;
use crate::runtime::{CrosstermEvents, EventSource, FixedTicker, GameEvent, Runner};
use crate::session::Phase;
use crate::supply::{spawn_word_generation, WordSupply};
use crate::wordbank::WordBank;

/// timed word-unscramble tui with streak scoring and ai-generated word packs
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Unscramble words against the clock. Score streaks, buy hints, skip at a price, \
                  and top up the word list from an AI generator when a key is configured."
)]
pub struct Cli {
    /// difficulty tier preselected in the menu
    #[clap(short, long, value_enum, default_value_t = Difficulty::Medium)]
    difficulty: Difficulty,

    /// override the round duration in seconds (default comes from the tier)
    #[clap(short = 's', long)]
    seconds: Option<u32>,

    /// embedded word list to play with
    #[clap(short = 'l', long, default_value = "default")]
    word_list: String,
}

/// Menu-only state: category selection, the transient status line, and the
/// word-generation in-progress flag.
#[derive(Debug)]
pub struct MenuState {
    pub selected: Vec<String>,
    pub category_cursor: usize,
    pub status: Option<(String, u64)>,
    pub loading_words: bool,
}

impl Default for MenuState {
    fn default() -> Self {
        Self {
            selected: DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
            category_cursor: 0,
            status: None,
            loading_words: false,
        }
    }
}

impl MenuState {
    fn toggle_category(&mut self) {
        let cat = CATEGORIES[self.category_cursor].to_string();
        if let Some(pos) = self.selected.iter().position(|c| *c == cat) {
            self.selected.remove(pos);
        } else {
            self.selected.push(cat);
        }
    }

    fn set_status(&mut self, text: impl Into<String>, ttl_ms: u64) {
        self.status = Some((text.into(), ttl_ms));
    }

    fn tick_status(&mut self, elapsed_ms: u64) {
        if let Some((_, ttl)) = self.status.as_mut() {
            *ttl = ttl.saturating_sub(elapsed_ms);
            if *ttl == 0 {
                self.status = None;
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generation {
    Available,
    Offline,
}

pub struct App {
    pub game: Game,
    pub menu: MenuState,
    pub generation: Generation,
    pub should_quit: bool,
    model: Option<Arc<dyn TextModel>>,
    tx: Sender<GameEvent>,
}

impl App {
    pub fn new(
        cli: &Cli,
        bank: &WordBank,
        model: Option<Arc<dyn TextModel>>,
        tx: Sender<GameEvent>,
    ) -> Self {
        let generation = if model.is_some() {
            Generation::Available
        } else {
            Generation::Offline
        };
        Self {
            game: Game::new(cli.difficulty, cli.seconds, WordSupply::from_bank(bank)),
            menu: MenuState::default(),
            generation,
            should_quit: false,
            model,
            tx,
        }
    }

    pub fn on_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::Tick => self.on_tick(),
            GameEvent::Key(key) => self.on_key(key),
            GameEvent::Resize => {}
            GameEvent::HintReady { serial, text } => self.game.apply_hint(serial, text),
            GameEvent::WordsReady { result } => self.on_words_ready(result),
        }
    }

    fn on_tick(&mut self) {
        self.menu.tick_status(TICK_RATE_MS);
        self.game.on_tick(TICK_RATE_MS);
    }

    fn on_words_ready(&mut self, result: Result<Vec<String>, GenError>) {
        self.menu.loading_words = false;
        // A batch that arrives after the menu was left is stale; the word
        // list must not change mid-game.
        if self.game.session.phase != Phase::Menu {
            log::debug!("discarding word batch that arrived outside the menu");
            return;
        }
        let outcome = self.game.supply.augment(result);
        let message = outcome.message(self.game.session.difficulty, &self.menu.selected);
        self.menu.set_status(message, STATUS_OUTCOME_MS);
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.game.session.phase {
            Phase::Menu => self.on_menu_key(key),
            Phase::Playing => self.on_playing_key(key),
            Phase::Paused => self.on_paused_key(key),
            Phase::GameOver => self.on_game_over_key(key),
        }
    }

    fn on_menu_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.game.start(),
            KeyCode::Left => self.cycle_difficulty(-1),
            KeyCode::Right => self.cycle_difficulty(1),
            KeyCode::Up => {
                self.menu.category_cursor =
                    (self.menu.category_cursor + CATEGORIES.len() - 1) % CATEGORIES.len();
            }
            KeyCode::Down => {
                self.menu.category_cursor = (self.menu.category_cursor + 1) % CATEGORIES.len();
            }
            KeyCode::Char(' ') => self.menu.toggle_category(),
            KeyCode::Char('g') => self.request_words(),
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn on_playing_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('k') => self.game.skip(),
                KeyCode::Char('r') => self.game.start(),
                _ => {}
            }
            return;
        }
        match key.code {
            KeyCode::Esc => self.game.toggle_pause(),
            KeyCode::Enter => self.game.submit(),
            KeyCode::Backspace => self.game.backspace(),
            KeyCode::Tab => self.request_hint(),
            KeyCode::Char(c) => self.game.push_char(c),
            _ => {}
        }
    }

    fn on_paused_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('p') => self.game.toggle_pause(),
            KeyCode::Char('r') => self.game.start(),
            _ => {}
        }
    }

    fn on_game_over_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Char('r') => self.game.start(),
            KeyCode::Char('m') => self.game.to_menu(),
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn cycle_difficulty(&mut self, step: i32) {
        let all = Difficulty::all();
        let current = all
            .iter()
            .position(|d| *d == self.game.session.difficulty)
            .unwrap_or(1);
        let next = (current as i32 + step).rem_euclid(all.len() as i32) as usize;
        self.game.session.set_difficulty(all[next]);
    }

    fn request_hint(&mut self) {
        if let Some(request) = self.game.begin_hint() {
            spawn_hint_request(
                self.model.clone(),
                request.word,
                request.difficulty,
                request.serial,
                self.tx.clone(),
            );
        }
    }

    fn request_words(&mut self) {
        if self.menu.loading_words {
            return;
        }
        let dispatch = spawn_word_generation(
            self.model.clone(),
            self.game.session.difficulty,
            self.menu.selected.clone(),
            self.tx.clone(),
        );
        match dispatch {
            Ok(()) => {
                self.menu.loading_words = true;
                self.menu.status = None;
            }
            Err(message) => self.menu.set_status(message, STATUS_VALIDATION_MS),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let Some(bank) = WordBank::load(&cli.word_list) else {
        let mut cmd = Cli::command();
        cmd.error(
            ErrorKind::InvalidValue,
            format!(
                "unknown word list '{}' (available: {})",
                cli.word_list,
                WordBank::names().join(", ")
            ),
        )
        .exit();
    };

    let model: Option<Arc<dyn TextModel>> = match GeminiModel::from_env() {
        Some(model) => Some(Arc::new(model)),
        None => {
            log::warn!("GEMINI_API_KEY not set; hints and word packs use offline fallbacks");
            None
        }
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = CrosstermEvents::new();
    let mut app = App::new(&cli, &bank, model, events.sender());
    let result = run(&mut terminal, &mut app, events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: impl EventSource,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(events, FixedTicker::new(Duration::from_millis(TICK_RATE_MS)));

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
        app.on_event(runner.step());
        if app.should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{REVEAL_DELAY_MS, SUCCESS_DELAY_MS};
    use crate::runtime::TestEventSource;

    fn test_cli() -> Cli {
        Cli {
            difficulty: Difficulty::Medium,
            seconds: None,
            word_list: "default".into(),
        }
    }

    fn test_app() -> (App, TestEventSource) {
        let events = TestEventSource::new();
        let bank = WordBank::load("default").unwrap();
        let app = App::new(&test_cli(), &bank, None, events.sender());
        (app, events)
    }

    fn key(code: KeyCode) -> GameEvent {
        GameEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> GameEvent {
        GameEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn tick_ms(app: &mut App, total_ms: u64) {
        for _ in 0..(total_ms / TICK_RATE_MS) {
            app.on_event(GameEvent::Tick);
        }
    }

    #[test]
    fn test_enter_starts_a_game_from_the_menu() {
        let (mut app, _events) = test_app();
        assert_eq!(app.game.session.phase, Phase::Menu);

        app.on_event(key(KeyCode::Enter));

        assert_eq!(app.game.session.phase, Phase::Playing);
        assert_eq!(app.game.session.time_remaining, 60);
    }

    #[test]
    fn test_difficulty_cycles_in_the_menu() {
        let (mut app, _events) = test_app();

        app.on_event(key(KeyCode::Right));
        assert_eq!(app.game.session.difficulty, Difficulty::Hard);
        app.on_event(key(KeyCode::Right));
        assert_eq!(app.game.session.difficulty, Difficulty::Easy);
        app.on_event(key(KeyCode::Left));
        assert_eq!(app.game.session.difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_category_toggle_roundtrip() {
        let (mut app, _events) = test_app();
        let first = CATEGORIES[0].to_string();
        assert!(app.menu.selected.contains(&first));

        app.on_event(key(KeyCode::Char(' ')));
        assert!(!app.menu.selected.contains(&first));

        app.on_event(key(KeyCode::Char(' ')));
        assert!(app.menu.selected.contains(&first));
    }

    #[test]
    fn test_typed_guess_flows_into_the_round() {
        let (mut app, _events) = test_app();
        app.on_event(key(KeyCode::Enter));

        let word = app.game.round.target().to_string();
        for c in word.chars() {
            app.on_event(key(KeyCode::Char(c)));
        }
        app.on_event(key(KeyCode::Enter));
        tick_ms(&mut app, SUCCESS_DELAY_MS);

        assert_eq!(app.game.session.stats.score, 20);
        assert_eq!(app.game.session.stats.streak, 1);
    }

    #[test]
    fn test_ctrl_k_skips_the_word() {
        let (mut app, _events) = test_app();
        app.on_event(key(KeyCode::Enter));

        app.on_event(ctrl('k'));
        assert_eq!(app.game.round.feedback(), crate::round::Feedback::Revealed);

        tick_ms(&mut app, REVEAL_DELAY_MS);
        assert_eq!(app.game.session.stats.streak, 0);
    }

    #[test]
    fn test_esc_pauses_and_resumes() {
        let (mut app, _events) = test_app();
        app.on_event(key(KeyCode::Enter));

        app.on_event(key(KeyCode::Esc));
        assert_eq!(app.game.session.phase, Phase::Paused);

        // Keystrokes while paused do not leak into the input.
        app.on_event(key(KeyCode::Char('x')));
        assert_eq!(app.game.round.input(), "");

        app.on_event(key(KeyCode::Esc));
        assert_eq!(app.game.session.phase, Phase::Playing);
    }

    #[test]
    fn test_hint_request_resolves_through_the_event_channel() {
        let (mut app, events) = test_app();
        app.on_event(key(KeyCode::Enter));

        app.on_event(key(KeyCode::Tab));
        assert!(app.game.round.hint_pending());

        // Offline model resolves immediately to the fallback hint.
        let event = events
            .recv_timeout(Duration::from_secs(1))
            .expect("hint event due");
        app.on_event(event);

        assert!(!app.game.round.hint_pending());
        assert!(app.game.round.hint().is_some());
    }

    #[test]
    fn test_generate_with_no_categories_is_rejected_locally() {
        let (mut app, events) = test_app();
        app.menu.selected.clear();

        app.on_event(key(KeyCode::Char('g')));

        assert!(!app.menu.loading_words);
        let (message, _) = app.menu.status.clone().expect("validation message set");
        assert_eq!(message, crate::supply::EMPTY_CATEGORIES_MSG);
        assert!(events.recv_timeout(Duration::from_millis(50)).is_err());
    }

    #[test]
    fn test_generation_outcome_lands_in_the_status_line() {
        let (mut app, events) = test_app();

        app.on_event(key(KeyCode::Char('g')));
        assert!(app.menu.loading_words);

        let event = events
            .recv_timeout(Duration::from_secs(1))
            .expect("generation event due");
        app.on_event(event);

        assert!(!app.menu.loading_words);
        let (message, _) = app.menu.status.clone().expect("outcome message set");
        assert_eq!(message, crate::supply::GENERATION_FAILED_MSG);
    }

    #[test]
    fn test_word_batch_arriving_mid_game_is_discarded() {
        let (mut app, _events) = test_app();
        app.on_event(key(KeyCode::Char('g')));
        app.on_event(key(KeyCode::Enter)); // start before the batch lands
        let len_before = app.game.supply.len();

        app.on_event(GameEvent::WordsReady {
            result: Ok(vec!["AMBROSIA".into()]),
        });

        assert_eq!(app.game.supply.len(), len_before);
        assert!(!app.menu.loading_words);
    }

    #[test]
    fn test_status_message_expires() {
        let (mut app, _events) = test_app();
        app.menu.selected.clear();
        app.on_event(key(KeyCode::Char('g')));
        assert!(app.menu.status.is_some());

        tick_ms(&mut app, STATUS_VALIDATION_MS);
        assert!(app.menu.status.is_none());
    }

    #[test]
    fn test_game_over_keys() {
        let (mut app, _events) = test_app();
        app.on_event(key(KeyCode::Enter));
        app.game.session.end_game();

        app.on_event(key(KeyCode::Char('r')));
        assert_eq!(app.game.session.phase, Phase::Playing);

        app.game.session.end_game();
        app.on_event(key(KeyCode::Char('m')));
        assert_eq!(app.game.session.phase, Phase::Menu);
    }

    #[test]
    fn test_ctrl_c_quits_from_any_phase() {
        let (mut app, _events) = test_app();
        app.on_event(ctrl('c'));
        assert!(app.should_quit);
    }
}
