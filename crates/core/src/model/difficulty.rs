use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Lowest career level.
pub const MIN_LEVEL: u32 = 1;
/// Highest career level; no progression past it.
pub const MAX_LEVEL: u32 = 100;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown difficulty: {0}")]
pub struct ParseDifficultyError(pub String);

/// Question difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Extreme,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Extreme,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Extreme => "Extreme",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "extreme" => Ok(Difficulty::Extreme),
            _ => Err(ParseDifficultyError(s.to_string())),
        }
    }
}

/// Clamps a level into `[MIN_LEVEL, MAX_LEVEL]`.
#[must_use]
pub fn clamp_level(level: u32) -> u32 {
    level.clamp(MIN_LEVEL, MAX_LEVEL)
}

/// Maps a career level to its difficulty tier.
///
/// Bands are inclusive on their upper bound: 1–20 Easy, 21–50 Medium,
/// 51–80 Hard, 81–100 Extreme. Out-of-range levels are clamped first, so
/// `0` reads as level 1 and anything above 100 reads as level 100.
#[must_use]
pub fn difficulty_for_level(level: u32) -> Difficulty {
    match clamp_level(level) {
        0..=20 => Difficulty::Easy,
        21..=50 => Difficulty::Medium,
        51..=80 => Difficulty::Hard,
        _ => Difficulty::Extreme,
    }
}
