use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::catalog::DEFAULT_VOICE;
use crate::model::{Difficulty, GameMode, clamp_level, difficulty_for_level};

/// Question count used for every campaign round.
pub const CAMPAIGN_QUESTION_COUNT: u32 = 5;
/// Bounds for the classic question count.
pub const MIN_QUESTION_COUNT: u32 = 1;
pub const MAX_QUESTION_COUNT: u32 = 20;
/// Default classic question count.
pub const DEFAULT_QUESTION_COUNT: u32 = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("topic cannot be empty")]
    EmptyTopic,

    #[error("question count must be between {min} and {max}, got {count}")]
    InvalidCount { count: u32, min: u32, max: u32 },

    #[error("language cannot be empty")]
    EmptyLanguage,
}

/// Player choices for a new quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSettings {
    pub topic: String,
    pub difficulty: Difficulty,
    pub count: u32,
    pub language: String,
    pub voice: String,
    pub mode: GameMode,
    pub level: Option<u32>,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            topic: String::new(),
            difficulty: Difficulty::Medium,
            count: DEFAULT_QUESTION_COUNT,
            language: "English".into(),
            voice: DEFAULT_VOICE.into(),
            mode: GameMode::Classic,
            level: None,
        }
    }
}

impl QuizSettings {
    /// Classic settings for a topic with the given difficulty and count.
    #[must_use]
    pub fn classic(topic: impl Into<String>, difficulty: Difficulty, count: u32) -> Self {
        Self {
            topic: topic.into(),
            difficulty,
            count,
            ..Self::default()
        }
    }

    /// Campaign settings: difficulty and count are derived from the level.
    #[must_use]
    pub fn campaign(topic: impl Into<String>, level: u32) -> Self {
        let level = clamp_level(level);
        Self {
            topic: topic.into(),
            difficulty: difficulty_for_level(level),
            count: CAMPAIGN_QUESTION_COUNT,
            mode: GameMode::Campaign,
            level: Some(level),
            ..Self::default()
        }
    }

    /// Difficulty actually requested from the generator.
    #[must_use]
    pub fn effective_difficulty(&self) -> Difficulty {
        match (self.mode, self.level) {
            (GameMode::Campaign, Some(level)) => difficulty_for_level(level),
            (GameMode::Campaign, None) => difficulty_for_level(crate::model::MIN_LEVEL),
            (GameMode::Classic, _) => self.difficulty,
        }
    }

    /// Question count actually requested from the generator.
    #[must_use]
    pub fn effective_count(&self) -> u32 {
        match self.mode {
            GameMode::Campaign => CAMPAIGN_QUESTION_COUNT,
            GameMode::Classic => self.count,
        }
    }

    /// # Errors
    ///
    /// Returns `SettingsError` for a blank topic or language, or a classic
    /// count outside `[MIN_QUESTION_COUNT, MAX_QUESTION_COUNT]`.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.topic.trim().is_empty() {
            return Err(SettingsError::EmptyTopic);
        }
        if self.language.trim().is_empty() {
            return Err(SettingsError::EmptyLanguage);
        }
        let count = self.effective_count();
        if !(MIN_QUESTION_COUNT..=MAX_QUESTION_COUNT).contains(&count) {
            return Err(SettingsError::InvalidCount {
                count,
                min: MIN_QUESTION_COUNT,
                max: MAX_QUESTION_COUNT,
            });
        }
        Ok(())
    }
}
