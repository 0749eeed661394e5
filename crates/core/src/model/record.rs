use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Difficulty, GameMode, QuizResult};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizRecordError {
    #[error("score ({score}) exceeds total ({total})")]
    ScoreExceedsTotal { score: u32, total: u32 },

    #[error("a finished quiz has at least one question")]
    EmptyQuiz,

    #[error("level_up is set without a new level")]
    MissingNewLevel,
}

/// Persisted summary of a finished quiz, used for the history list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizRecord {
    topic: String,
    mode: GameMode,
    difficulty: Difficulty,
    score: u32,
    total: u32,
    points: u32,
    level_up: bool,
    new_level: Option<u32>,
    completed_at: DateTime<Utc>,
}

impl QuizRecord {
    /// Builds a record from a finished result.
    ///
    /// # Errors
    ///
    /// Returns `QuizRecordError` when the result's totals are inconsistent.
    pub fn from_result(
        topic: impl Into<String>,
        mode: GameMode,
        difficulty: Difficulty,
        result: &QuizResult,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, QuizRecordError> {
        Self::from_persisted(
            topic.into(),
            mode,
            difficulty,
            result.score,
            result.total,
            result.points,
            result.level_up,
            result.new_level,
            completed_at,
        )
    }

    /// Rehydrate a record from storage.
    ///
    /// # Errors
    ///
    /// Returns `QuizRecordError` when the stored totals are inconsistent.
    #[allow(clippy::too_many_arguments, clippy::fn_params_excessive_bools)]
    pub fn from_persisted(
        topic: String,
        mode: GameMode,
        difficulty: Difficulty,
        score: u32,
        total: u32,
        points: u32,
        level_up: bool,
        new_level: Option<u32>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, QuizRecordError> {
        if total == 0 {
            return Err(QuizRecordError::EmptyQuiz);
        }
        if score > total {
            return Err(QuizRecordError::ScoreExceedsTotal { score, total });
        }
        if level_up && new_level.is_none() {
            return Err(QuizRecordError::MissingNewLevel);
        }
        Ok(Self {
            topic,
            mode,
            difficulty,
            score,
            total,
            points,
            level_up,
            new_level,
            completed_at,
        })
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    #[must_use]
    pub fn level_up(&self) -> bool {
        self.level_up
    }

    #[must_use]
    pub fn new_level(&self) -> Option<u32> {
        self.new_level
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn result(score: u32, total: u32) -> QuizResult {
        QuizResult {
            score,
            total,
            points: 320,
            history: Vec::new(),
            level_up: true,
            new_level: Some(12),
        }
    }

    #[test]
    fn record_copies_result_totals() {
        let record = QuizRecord::from_result(
            "Cats",
            GameMode::Campaign,
            Difficulty::Easy,
            &result(4, 5),
            fixed_now(),
        )
        .unwrap();
        assert_eq!(record.score(), 4);
        assert_eq!(record.points(), 320);
        assert_eq!(record.new_level(), Some(12));
    }

    #[test]
    fn inconsistent_totals_are_rejected() {
        let err = QuizRecord::from_result(
            "Cats",
            GameMode::Classic,
            Difficulty::Easy,
            &result(6, 5),
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(err, QuizRecordError::ScoreExceedsTotal { score: 6, total: 5 });
    }
}
