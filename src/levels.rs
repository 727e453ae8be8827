use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

pub const MAX_LEVEL: u8 = 10;

/// A single level: the sentence to type and its base goals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelDefinition {
    pub sentence: &'static str,
    pub base_time_limit_secs: f64,
    pub base_required_accuracy: f64,
}

const LEVELS: [LevelDefinition; MAX_LEVEL as usize] = [
    LevelDefinition {
        sentence: "Hello Start typing to level up",
        base_time_limit_secs: 999.0,
        base_required_accuracy: 70.0,
    },
    LevelDefinition {
        sentence: "The quick brown fox jumps",
        base_time_limit_secs: 60.0,
        base_required_accuracy: 75.0,
    },
    LevelDefinition {
        sentence: "Python is great for coding",
        base_time_limit_secs: 50.0,
        base_required_accuracy: 78.0,
    },
    LevelDefinition {
        sentence: "Practice daily for tech interviews",
        base_time_limit_secs: 45.0,
        base_required_accuracy: 80.0,
    },
    LevelDefinition {
        sentence: "Django React fullstack projects rock",
        base_time_limit_secs: 40.0,
        base_required_accuracy: 82.0,
    },
    LevelDefinition {
        sentence: "BTech grads build amazing portfolios",
        base_time_limit_secs: 35.0,
        base_required_accuracy: 84.0,
    },
    LevelDefinition {
        sentence: "Mumbai coders type super fast now",
        base_time_limit_secs: 30.0,
        base_required_accuracy: 86.0,
    },
    LevelDefinition {
        sentence: "Level up your typing speed mastery",
        base_time_limit_secs: 27.0,
        base_required_accuracy: 88.0,
    },
    LevelDefinition {
        sentence: "You are almost a typing champion",
        base_time_limit_secs: 24.0,
        base_required_accuracy: 90.0,
    },
    LevelDefinition {
        sentence: "Congratulations Master Typist Achieved",
        base_time_limit_secs: 20.0,
        base_required_accuracy: 92.0,
    },
];

/// Multipliers applied on top of a level's base goals and score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    pub time_multiplier: f64,
    pub accuracy_multiplier: f64,
    pub score_multiplier: f64,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Menu order
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn profile(self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                time_multiplier: 1.5,
                accuracy_multiplier: 0.8,
                score_multiplier: 1.0,
            },
            Difficulty::Medium => DifficultyProfile {
                time_multiplier: 1.0,
                accuracy_multiplier: 1.0,
                score_multiplier: 1.5,
            },
            Difficulty::Hard => DifficultyProfile {
                time_multiplier: 0.7,
                accuracy_multiplier: 1.2,
                score_multiplier: 2.0,
            },
        }
    }

    /// Position in [`Difficulty::ALL`]
    pub fn index(self) -> usize {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
        }
    }
}

impl FromStr for Difficulty {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CatalogError::UnknownDifficulty(s.to_string()))
    }
}

pub fn get_level(n: u8) -> Result<&'static LevelDefinition, CatalogError> {
    if (1..=MAX_LEVEL).contains(&n) {
        Ok(&LEVELS[(n - 1) as usize])
    } else {
        Err(CatalogError::OutOfRange(n))
    }
}

/// Infallible lookup for callers that already keep `n` in range
pub(crate) fn level_clamped(n: u8) -> &'static LevelDefinition {
    &LEVELS[(n.clamp(1, MAX_LEVEL) - 1) as usize]
}

pub fn get_difficulty(name: &str) -> Result<DifficultyProfile, CatalogError> {
    name.parse::<Difficulty>().map(Difficulty::profile)
}

/// Effective (time limit, required accuracy) for a level under a difficulty
pub fn effective_goals(level: &LevelDefinition, difficulty: Difficulty) -> (f64, f64) {
    let profile = difficulty.profile();
    (
        level.base_time_limit_secs * profile.time_multiplier,
        level.base_required_accuracy * profile.accuracy_multiplier,
    )
}
