use serde::{Deserialize, Serialize};

use crate::model::AnswerEvent;

/// Final outcome of a quiz session.
///
/// Produced exactly once, when the session moves past its last question.
/// `level_up` and `new_level` stay unset until progression is resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    pub score: u32,
    pub total: u32,
    pub points: u32,
    pub history: Vec<AnswerEvent>,
    pub level_up: bool,
    pub new_level: Option<u32>,
}

impl QuizResult {
    /// Fraction of correct answers in `[0, 1]`; `0.0` for an empty result.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.score) / f64::from(self.total)
    }

    /// Score as a rounded percentage.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let pct = (self.ratio() * 100.0).round() as u32;
        pct
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.history.iter().filter(|e| e.chosen.is_skipped()).count()
    }
}

/// Persistent player level and points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProgress {
    pub level: u32,
    pub points: u64,
}

impl Default for PlayerProgress {
    fn default() -> Self {
        Self {
            level: crate::model::MIN_LEVEL,
            points: 0,
        }
    }
}
