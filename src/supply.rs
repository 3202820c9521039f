use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::{Difficulty, GENERATED_WORD_COUNT};
use crate::generate::{parse_word_payload, GenError, TextModel};
use crate::runtime::GameEvent;
use crate::wordbank::WordBank;

pub const EMPTY_CATEGORIES_MSG: &str = "Please select at least one category.";
pub const NO_NEW_WORDS_MSG: &str = "No new unique words found.";
pub const GENERATION_FAILED_MSG: &str = "Could not generate words. Try again.";

/// The working word list: an ordered set of unique uppercase words plus the
/// index of the word currently in play.
#[derive(Debug, Clone)]
pub struct WordSupply {
    words: Vec<String>,
    index: usize,
}

impl WordSupply {
    /// Normalizes to uppercase, drops blanks, and deduplicates while keeping
    /// first-occurrence order.
    pub fn new(words: Vec<String>) -> Self {
        let words = words
            .into_iter()
            .map(|w| w.trim().to_uppercase())
            .filter(|w| !w.is_empty())
            .unique()
            .collect();
        Self { words, index: 0 }
    }

    pub fn from_bank(bank: &WordBank) -> Self {
        Self::new(bank.words.clone())
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &str {
        self.words.get(self.index).map(String::as_str).unwrap_or("")
    }

    /// Fresh random order, back to the first word.
    pub fn reshuffle(&mut self, rng: &mut impl Rng) {
        self.words.shuffle(rng);
        self.index = 0;
    }

    /// Moves to the next word. Running off the end reshuffles the whole list
    /// in place, so the supply never runs dry.
    pub fn advance(&mut self, rng: &mut impl Rng) {
        if self.index + 1 >= self.words.len() {
            self.reshuffle(rng);
        } else {
            self.index += 1;
        }
    }

    /// Appends incoming words not already present (case-sensitive exact
    /// match); returns how many were actually added.
    pub fn merge_new(&mut self, incoming: Vec<String>) -> usize {
        let mut added = 0;
        for word in incoming {
            if !self.words.contains(&word) {
                self.words.push(word);
                added += 1;
            }
        }
        added
    }

    /// Folds a generation response into the list and classifies the result.
    /// Never fails; the game continues on the existing list either way.
    pub fn augment(&mut self, response: Result<Vec<String>, GenError>) -> AugmentOutcome {
        match response {
            Err(err) => {
                log::debug!("word generation failed: {err}");
                AugmentOutcome::Failed
            }
            Ok(words) if words.is_empty() => AugmentOutcome::Failed,
            Ok(words) => {
                let added = self.merge_new(words);
                if added == 0 {
                    AugmentOutcome::NoNewWords
                } else {
                    AugmentOutcome::Added(added)
                }
            }
        }
    }
}

/// What an augmentation attempt amounted to, for the menu status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AugmentOutcome {
    Added(usize),
    NoNewWords,
    Failed,
}

impl AugmentOutcome {
    pub fn message(self, difficulty: Difficulty, categories: &[String]) -> String {
        match self {
            AugmentOutcome::Added(count) => {
                let summary = if categories.len() > 3 {
                    format!("{}...", categories.iter().take(2).join(", "))
                } else {
                    categories.iter().join(", ")
                };
                format!(
                    "Added {count} {} words for: {summary}",
                    difficulty.settings().label
                )
            }
            AugmentOutcome::NoNewWords => NO_NEW_WORDS_MSG.to_string(),
            AugmentOutcome::Failed => GENERATION_FAILED_MSG.to_string(),
        }
    }
}

pub fn word_list_prompt(count: usize, categories: &[String], style: &str) -> String {
    let topics = categories.iter().join(", ");
    format!(
        "Generate a list of {count} unique single-word nouns related to: {topics}. \
         The words should be {style}. \
         Return ONLY a JSON array of uppercase strings. No markdown formatting. \
         Example: [\"YIELD\", \"HIVE\", \"TOKEN\"]"
    )
}

/// Dispatches one word-pack request off the event loop. An empty category
/// selection is rejected locally, before anything leaves the process; the
/// result otherwise arrives as a `WordsReady` event.
pub fn spawn_word_generation(
    model: Option<Arc<dyn TextModel>>,
    difficulty: Difficulty,
    categories: Vec<String>,
    tx: Sender<GameEvent>,
) -> Result<(), &'static str> {
    if categories.is_empty() {
        return Err(EMPTY_CATEGORIES_MSG);
    }

    let Some(model) = model else {
        let _ = tx.send(GameEvent::WordsReady {
            result: Err(GenError::MissingCredential),
        });
        return Ok(());
    };

    let prompt = word_list_prompt(
        GENERATED_WORD_COUNT,
        &categories,
        difficulty.settings().word_style,
    );
    thread::spawn(move || {
        let result = model
            .complete(&prompt)
            .and_then(|text| parse_word_payload(&text));
        let _ = tx.send(GameEvent::WordsReady { result });
    });
    Ok(())
}
