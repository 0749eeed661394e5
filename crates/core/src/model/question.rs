use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("a question needs exactly {expected} options, got {len}")]
    WrongOptionCount { expected: usize, len: usize },

    #[error("options cannot be empty")]
    EmptyOption,

    #[error("options must be distinct, found duplicate: {0}")]
    DuplicateOption(String),

    #[error("correct answer is not one of the options: {0}")]
    CorrectAnswerNotAnOption(String),
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Number of answer options every question carries.
pub const OPTIONS_PER_QUESTION: usize = 4;

/// A single multiple-choice trivia question.
///
/// Questions are validated once when they arrive from the generator and are
/// immutable afterwards. The serialized field names follow the generator's
/// JSON schema (`question`, `options`, `correctAnswer`, `explanation`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionDraft", into = "QuestionDraft")]
pub struct Question {
    text: String,
    options: Vec<String>,
    correct_answer: String,
    explanation: String,
}

impl Question {
    /// Builds a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text is empty, there are not exactly
    /// four distinct non-empty options, or the correct answer is not one of them.
    pub fn new(
        text: impl Into<String>,
        options: Vec<String>,
        correct_answer: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        let correct_answer = correct_answer.into();

        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if options.len() != OPTIONS_PER_QUESTION {
            return Err(QuestionError::WrongOptionCount {
                expected: OPTIONS_PER_QUESTION,
                len: options.len(),
            });
        }
        for (idx, option) in options.iter().enumerate() {
            if option.trim().is_empty() {
                return Err(QuestionError::EmptyOption);
            }
            if options[..idx].contains(option) {
                return Err(QuestionError::DuplicateOption(option.clone()));
            }
        }
        if !options.contains(&correct_answer) {
            return Err(QuestionError::CorrectAnswerNotAnOption(correct_answer));
        }

        Ok(Self {
            text,
            options,
            correct_answer,
            explanation: explanation.into(),
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    #[must_use]
    pub fn is_correct(&self, option: &str) -> bool {
        self.correct_answer == option
    }
}

/// Unvalidated wire shape of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
}

impl QuestionDraft {
    /// # Errors
    ///
    /// Returns `QuestionError` when the draft does not form a valid question.
    pub fn validate(self) -> Result<Question, QuestionError> {
        Question::new(
            self.question,
            self.options,
            self.correct_answer,
            self.explanation,
        )
    }
}

impl TryFrom<QuestionDraft> for Question {
    type Error = QuestionError;

    fn try_from(draft: QuestionDraft) -> Result<Self, Self::Error> {
        draft.validate()
    }
}

impl From<Question> for QuestionDraft {
    fn from(q: Question) -> Self {
        Self {
            question: q.text,
            options: q.options,
            correct_answer: q.correct_answer,
            explanation: q.explanation,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
