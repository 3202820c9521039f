use clap::ValueEnum;

/// Event-loop tick interval; drives the countdown and feedback delays.
pub const TICK_RATE_MS: u64 = 100;

// Scoring
pub const CORRECT_POINTS: u32 = 20;
pub const HINT_COST: u32 = 5;
pub const SKIP_COST: u32 = 10;
pub const TIME_BONUS_SECS: u32 = 3;
pub const STREAK_BONUS: u32 = 5;
/// The streak bonus applies once the streak exceeds this count.
pub const STREAK_BONUS_AFTER: u32 = 2;

// Feedback timing
pub const SUCCESS_DELAY_MS: u64 = 500;
pub const ERROR_FLASH_MS: u64 = 500;
pub const REVEAL_DELAY_MS: u64 = 2000;

// Menu / word-pack generation
pub const GENERATED_WORD_COUNT: usize = 10;
pub const STATUS_VALIDATION_MS: u64 = 3000;
pub const STATUS_OUTCOME_MS: u64 = 4000;

/// Below this many seconds the countdown is rendered as urgent.
pub const LOW_TIME_SECS: u32 = 10;

/// Categories offered for word-pack generation.
pub const CATEGORIES: [&str; 7] = [
    "Crypto",
    "DeFi",
    "Beekeeping",
    "Honey",
    "NFTs",
    "Security",
    "Trading",
];

/// Categories preselected when the app starts.
pub const DEFAULT_CATEGORIES: [&str; 2] = ["Crypto", "Honey"];

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Static per-tier configuration. Loaded once; never mutated.
#[derive(Debug, Clone, Copy)]
pub struct DifficultySettings {
    pub label: &'static str,
    pub duration_secs: u32,
    pub description: &'static str,
    pub multiplier: f64,
    /// Guidance sentence inserted into the hint prompt.
    pub hint_style: &'static str,
    /// Adjectives inserted into the word-list prompt.
    pub word_style: &'static str,
}

impl Difficulty {
    pub fn all() -> [Difficulty; 3] {
        [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
    }

    pub fn settings(self) -> DifficultySettings {
        match self {
            Difficulty::Easy => DifficultySettings {
                label: "Easy",
                duration_secs: 90,
                description: "90s - simple words",
                multiplier: 0.8,
                hint_style: "Give a clear, simple definition or synonym. \
                             It should be easy for a beginner to guess.",
                word_style: "simple, basic, widely known, beginner-friendly",
            },
            Difficulty::Medium => DifficultySettings {
                label: "Medium",
                duration_secs: 60,
                description: "60s - standard",
                multiplier: 1.0,
                hint_style: "Give a clever, standard crossword-style clue. \
                             Not too obvious, but solvable.",
                word_style: "standard, common, intermediate",
            },
            Difficulty::Hard => DifficultySettings {
                label: "Hard",
                duration_secs: 45,
                description: "45s - complex words",
                multiplier: 1.5,
                hint_style: "Give a cryptic, abstract, or witty riddle. \
                             It should be challenging and require deep knowledge.",
                word_style: "complex, obscure, technical, advanced, cryptic",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_lists_every_tier() {
        let all = Difficulty::all();
        assert_eq!(all.len(), 3);
        assert!(all.contains(&Difficulty::Easy));
        assert!(all.contains(&Difficulty::Medium));
        assert!(all.contains(&Difficulty::Hard));
    }

    #[test]
    fn test_durations_shrink_with_difficulty() {
        assert_eq!(Difficulty::Easy.settings().duration_secs, 90);
        assert_eq!(Difficulty::Medium.settings().duration_secs, 60);
        assert_eq!(Difficulty::Hard.settings().duration_secs, 45);
    }

    #[test]
    fn test_multipliers_grow_with_difficulty() {
        let easy = Difficulty::Easy.settings().multiplier;
        let medium = Difficulty::Medium.settings().multiplier;
        let hard = Difficulty::Hard.settings().multiplier;
        assert!(easy < medium && medium < hard);
        assert_eq!(medium, 1.0);
    }

    #[test]
    fn test_labels_match_display() {
        for tier in Difficulty::all() {
            assert_eq!(tier.settings().label, tier.to_string());
        }
    }

    #[test]
    fn test_default_categories_are_offered() {
        for cat in DEFAULT_CATEGORIES {
            assert!(CATEGORIES.contains(&cat));
        }
    }
}
