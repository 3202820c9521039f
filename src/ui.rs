use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::config::{Difficulty, CATEGORIES, HINT_COST, LOW_TIME_SECS, SKIP_COST};
use crate::round::Feedback;
use crate::session::Phase;
use crate::{App, Generation};

const HORIZONTAL_MARGIN: u16 = 4;

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

fn accent() -> Style {
    bold().fg(Color::Yellow)
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.game.session.phase {
            Phase::Menu => render_menu(self, area, buf),
            Phase::Playing => render_playing(self, area, buf),
            Phase::Paused => render_paused(self, area, buf),
            Phase::GameOver => render_game_over(self, area, buf),
        }
    }
}

/// Renders `lines` as one vertically centered, horizontally padded block.
/// `extra_rows` reserves room for lines expected to wrap.
fn centered_block(lines: Vec<Line>, extra_rows: u16, area: Rect, buf: &mut Buffer) {
    let height = lines.len() as u16 + extra_rows;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Min(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[1], buf);
}

fn render_menu(app: &App, area: Rect, buf: &mut Buffer) {
    let session = &app.game.session;
    let mut lines = vec![
        Line::from(Span::styled("J U M B L E", accent())),
        Line::from(Span::styled("Ready to Scramble?", bold())),
        Line::default(),
        difficulty_selector(session.difficulty),
        Line::from(Span::styled(session.difficulty.settings().description, dim())),
        Line::default(),
        Line::from(Span::styled("WORD PACKS", dim().add_modifier(Modifier::BOLD))),
    ];

    for (idx, category) in CATEGORIES.iter().enumerate() {
        let selected = app.menu.selected.iter().any(|c| c == category);
        let marker = if selected { "[x]" } else { "[ ]" };
        let mut style = if selected { accent() } else { dim() };
        if idx == app.menu.category_cursor {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        lines.push(Line::from(Span::styled(format!("{marker} {category}"), style)));
    }

    lines.push(Line::default());
    if app.menu.loading_words {
        lines.push(Line::from(Span::styled(
            "Generating words...",
            accent().add_modifier(Modifier::ITALIC),
        )));
    } else if let Some((message, _)) = &app.menu.status {
        lines.push(Line::from(Span::styled(
            message.clone(),
            accent().add_modifier(Modifier::ITALIC),
        )));
    } else if app.generation == Generation::Offline {
        lines.push(Line::from(Span::styled(
            "offline mode: set GEMINI_API_KEY for AI hints and word packs",
            dim(),
        )));
    } else {
        lines.push(Line::default());
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "enter start | left/right difficulty | up/down + space categories | g generate | q quit",
        dim(),
    )));

    centered_block(lines, 1, area, buf);
}

fn difficulty_selector(current: Difficulty) -> Line<'static> {
    let mut spans = Vec::new();
    for (idx, tier) in Difficulty::all().into_iter().enumerate() {
        if idx > 0 {
            spans.push(Span::raw("  "));
        }
        let settings = tier.settings();
        let text = format!(" {} {}s ", settings.label, settings.duration_secs);
        let style = if tier == current {
            bold().fg(Color::Black).bg(Color::Yellow)
        } else {
            dim()
        };
        spans.push(Span::styled(text, style));
    }
    Line::from(spans)
}

fn hud_line(app: &App) -> Line<'static> {
    let session = &app.game.session;
    let time_style = if session.time_remaining < LOW_TIME_SECS {
        bold().fg(Color::Red)
    } else {
        bold()
    };
    Line::from(vec![
        Span::styled(format!("score {}", session.stats.score), bold()),
        Span::styled("   ", dim()),
        Span::styled(format!("{}s", session.time_remaining), time_style),
        Span::styled("   ", dim()),
        Span::styled(format!("streak {}", session.stats.streak), bold()),
        Span::styled(
            format!("   {}", session.difficulty.settings().label),
            dim(),
        ),
    ])
}

fn render_playing(app: &App, area: Rect, buf: &mut Buffer) {
    let round = &app.game.round;

    let scrambled = round.scrambled().chars().join(" ");
    let input_line = match round.feedback() {
        Feedback::Revealed => Line::from(Span::styled(round.input().to_string(), accent())),
        Feedback::Success => {
            Line::from(Span::styled(round.input().to_string(), bold().fg(Color::Green)))
        }
        _ if round.input().is_empty() => Line::from(Span::styled(
            "type your guess...",
            dim().add_modifier(Modifier::ITALIC),
        )),
        _ => Line::from(Span::styled(format!("{}_", round.input()), bold())),
    };

    let feedback_line = match round.feedback() {
        Feedback::Success => Line::from(Span::styled("correct!", bold().fg(Color::Green))),
        Feedback::Error => Line::from(Span::styled("not quite", bold().fg(Color::Red))),
        Feedback::Revealed => Line::from(Span::styled(
            format!("the answer was: {}", round.target()),
            accent(),
        )),
        Feedback::None => Line::default(),
    };

    let hint_line = if round.hint_pending() {
        Line::from(Span::styled(
            "conjuring a hint...",
            dim().add_modifier(Modifier::ITALIC),
        ))
    } else if let Some(hint) = round.hint() {
        Line::from(Span::styled(
            format!("hint: {hint}"),
            accent().add_modifier(Modifier::ITALIC),
        ))
    } else {
        Line::default()
    };

    // Long hints wrap; reserve rows for them so the block stays centered.
    let usable = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let hint_rows = round
        .hint()
        .map(|h| h.width() as u16 / usable)
        .unwrap_or(0);

    let lines = vec![
        hud_line(app),
        Line::default(),
        Line::from(Span::styled("unscramble the word", dim())),
        Line::from(Span::styled(scrambled, accent())),
        Line::default(),
        input_line,
        feedback_line,
        hint_line,
        Line::default(),
        Line::from(Span::styled(
            format!(
                "enter submit | tab hint (-{HINT_COST}) | ctrl+k skip (-{SKIP_COST}) | esc pause"
            ),
            dim(),
        )),
    ];

    centered_block(lines, hint_rows, area, buf);
}

fn render_paused(app: &App, area: Rect, buf: &mut Buffer) {
    let lines = vec![
        hud_line(app),
        Line::default(),
        Line::from(Span::styled("PAUSED", accent())),
        Line::from(Span::styled(
            format!("{} difficulty", app.game.session.difficulty.settings().label),
            dim(),
        )),
        Line::default(),
        Line::from(Span::styled("esc resume | r restart", dim())),
    ];

    centered_block(lines, 0, area, buf);
}

fn render_game_over(app: &App, area: Rect, buf: &mut Buffer) {
    let session = &app.game.session;
    let lines = vec![
        Line::from(Span::styled("Time's Up!", accent())),
        Line::default(),
        Line::from(Span::styled(
            format!("you missed: {}", app.game.round.target()),
            bold().fg(Color::Red),
        )),
        Line::default(),
        Line::from(Span::styled("FINAL SCORE", dim())),
        Line::from(Span::styled(format!("{}", session.stats.score), accent())),
        Line::from(Span::styled(
            format!(
                "best streak {} | {}",
                session.stats.best_streak,
                session.difficulty.settings().label
            ),
            dim(),
        )),
        Line::default(),
        Line::from(Span::styled("r play again | m menu | q quit", dim())),
    ];

    centered_block(lines, 0, area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{EventSource, TestEventSource};
    use crate::wordbank::WordBank;
    use clap::Parser;
    use ratatui::{backend::TestBackend, Terminal};

    fn test_app() -> App {
        let events = TestEventSource::new();
        let cli = crate::Cli::parse_from(["jumble"]);
        let bank = WordBank::load("default").unwrap();
        App::new(&cli, &bank, None, events.sender())
    }

    fn rendered(app: &App) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| f.render_widget(app, f.area())).unwrap();

        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .join("\n")
    }

    #[test]
    fn test_menu_screen_shows_tiers_and_categories() {
        let app = test_app();
        let screen = rendered(&app);

        assert!(screen.contains("Ready to Scramble?"));
        assert!(screen.contains("Medium 60s"));
        for category in CATEGORIES {
            assert!(screen.contains(category), "missing category {category}");
        }
        assert!(screen.contains("offline mode"));
    }

    #[test]
    fn test_playing_screen_shows_scramble_and_hud() {
        let mut app = test_app();
        app.game.start();
        let screen = rendered(&app);

        assert!(screen.contains("score 0"));
        assert!(screen.contains("60s"));
        assert!(screen.contains("unscramble the word"));

        // The scrambled form is rendered letter-spaced.
        let spaced = app.game.round.scrambled().chars().join(" ");
        assert!(screen.contains(&spaced));
    }

    #[test]
    fn test_paused_screen_shows_overlay() {
        let mut app = test_app();
        app.game.start();
        app.game.toggle_pause();
        let screen = rendered(&app);

        assert!(screen.contains("PAUSED"));
        assert!(screen.contains("esc resume"));
    }

    #[test]
    fn test_game_over_screen_shows_missed_word_and_score() {
        let mut app = test_app();
        app.game.start();
        app.game.session.end_game();
        let screen = rendered(&app);

        assert!(screen.contains("Time's Up!"));
        assert!(screen.contains(&format!("you missed: {}", app.game.round.target())));
        assert!(screen.contains("FINAL SCORE"));
    }

    #[test]
    fn test_hint_is_rendered_when_present() {
        let mut app = test_app();
        app.game.start();
        let serial = app.game.round.serial();
        app.game.apply_hint(serial, "bees make it".into());
        let screen = rendered(&app);

        assert!(screen.contains("hint: bees make it"));
    }
}
