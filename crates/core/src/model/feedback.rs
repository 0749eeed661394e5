use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FeedbackError {
    #[error("star rating must be between 1 and 5, got {0}")]
    InvalidStarRating(u8),

    #[error("unknown difficulty rating: {0}")]
    UnknownDifficultyRating(String),

    #[error("comment is too long ({len} > {max} chars)")]
    CommentTooLong { len: usize, max: usize },
}

/// Longest comment accepted with a feedback entry.
pub const MAX_COMMENT_CHARS: usize = 2_000;

/// How the player felt about the quiz difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DifficultyRating {
    #[serde(rename = "Too Easy")]
    TooEasy,
    #[serde(rename = "Just Right")]
    JustRight,
    #[serde(rename = "Too Hard")]
    TooHard,
}

impl DifficultyRating {
    pub const ALL: [DifficultyRating; 3] = [
        DifficultyRating::TooEasy,
        DifficultyRating::JustRight,
        DifficultyRating::TooHard,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DifficultyRating::TooEasy => "Too Easy",
            DifficultyRating::JustRight => "Just Right",
            DifficultyRating::TooHard => "Too Hard",
        }
    }

    /// # Errors
    ///
    /// Returns `FeedbackError::UnknownDifficultyRating` for any other label.
    pub fn parse(value: &str) -> Result<Self, FeedbackError> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == value)
            .ok_or_else(|| FeedbackError::UnknownDifficultyRating(value.to_string()))
    }
}

/// Feedback as entered on the result screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackDraft {
    pub topic: String,
    pub score: u32,
    pub total: u32,
    pub difficulty_rating: DifficultyRating,
    pub star_rating: u8,
    pub comment: String,
}

impl FeedbackDraft {
    /// Assigns an id and timestamp after validating ratings and comment length.
    ///
    /// # Errors
    ///
    /// Returns `FeedbackError` if the star rating is outside 1–5 or the
    /// comment exceeds `MAX_COMMENT_CHARS`.
    pub fn validate(self, created_at: DateTime<Utc>) -> Result<Feedback, FeedbackError> {
        if !(1..=5).contains(&self.star_rating) {
            return Err(FeedbackError::InvalidStarRating(self.star_rating));
        }
        let len = self.comment.chars().count();
        if len > MAX_COMMENT_CHARS {
            return Err(FeedbackError::CommentTooLong {
                len,
                max: MAX_COMMENT_CHARS,
            });
        }

        Ok(Feedback {
            id: Uuid::new_v4(),
            created_at,
            topic: self.topic,
            score: self.score,
            total: self.total,
            difficulty_rating: self.difficulty_rating,
            star_rating: self.star_rating,
            comment: self.comment.trim().to_string(),
        })
    }
}

/// Stored feedback entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub topic: String,
    pub score: u32,
    pub total: u32,
    pub difficulty_rating: DifficultyRating,
    pub star_rating: u8,
    pub comment: String,
}
