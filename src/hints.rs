use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

use crate::config::Difficulty;
use crate::generate::TextModel;
use crate::runtime::GameEvent;

/// Offline hint derived only from the word itself; easier tiers reveal more.
/// Must stay computable without any external state.
pub fn fallback_hint(word: &str, difficulty: Difficulty) -> String {
    let first = word.chars().next().unwrap_or('?');
    let last = word.chars().last().unwrap_or('?');
    let len = word.chars().count();

    match difficulty {
        Difficulty::Easy => format!("Starts with {first}, ends with {last}."),
        Difficulty::Medium => format!("It starts with \"{first}\" and has {len} letters."),
        Difficulty::Hard => format!("A word with {len} letters."),
    }
}

pub fn hint_prompt(word: &str, difficulty: Difficulty) -> String {
    let style = difficulty.settings().hint_style;
    format!(
        "Provide a hint for the word \"{word}\" related to crypto, finance, or bees. \
         {style} Max 15 words. Do not contain the word \"{word}\" itself."
    )
}

/// Dispatches one best-effort hint request off the event loop. The result
/// always arrives as a `HintReady` event carrying `serial`; a failure of any
/// kind resolves to the offline fallback instead of an error.
pub fn spawn_hint_request(
    model: Option<Arc<dyn TextModel>>,
    word: String,
    difficulty: Difficulty,
    serial: u64,
    tx: Sender<GameEvent>,
) {
    let fallback = fallback_hint(&word, difficulty);

    let Some(model) = model else {
        let _ = tx.send(GameEvent::HintReady {
            serial,
            text: fallback,
        });
        return;
    };

    thread::spawn(move || {
        let text = match model.complete(&hint_prompt(&word, difficulty)) {
            Ok(text) => text,
            Err(err) => {
                log::debug!("hint generation failed for {word}: {err}");
                fallback
            }
        };
        let _ = tx.send(GameEvent::HintReady { serial, text });
    });
}
