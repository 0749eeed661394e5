use serde::{Deserialize, Serialize};
use std::fmt;

/// Label stored for a skipped question.
pub const SKIPPED_LABEL: &str = "Skipped";

/// What the player did with a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Chosen {
    Option(String),
    Skipped,
}

impl Chosen {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Chosen::Option(value) => value,
            Chosen::Skipped => SKIPPED_LABEL,
        }
    }

    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Chosen::Skipped)
    }
}

impl fmt::Display for Chosen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record of one resolved question. Appended to the session history, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerEvent {
    pub question: String,
    pub chosen: Chosen,
    pub correct_answer: String,
    pub is_correct: bool,
    pub explanation: String,
    pub points_awarded: u32,
    pub elapsed_secs: f64,
}
