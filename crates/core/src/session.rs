//! Quiz session state machine.
//!
//! A session walks an ordered list of questions. Each question is first
//! resolved (answered or skipped), then explicitly advanced past, so the UI can
//! show feedback in between. Moving past the last question finishes the
//! session and yields the [`QuizResult`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::{AnswerEvent, Chosen, Question, QuizResult};
use crate::scoring::{apply_answer, clamp_elapsed};
use crate::time::elapsed_secs;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("a session needs at least one question")]
    Empty,

    #[error("cannot {operation} while the session is {phase}")]
    InvalidStateTransition {
        operation: &'static str,
        phase: SessionPhase,
    },

    #[error("{0:?} is not an option of the current question")]
    InvalidOption(String),

    #[error("no current question, the session is finished")]
    OutOfRange,

    #[error("inconsistent session state: {0}")]
    Corrupt(&'static str),
}

//
// ─── PHASES ────────────────────────────────────────────────────────────────────
//

/// Where the session stands relative to the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Current question shown, not yet answered or skipped.
    Awaiting,
    /// Current question answered or skipped, waiting for `advance`.
    Resolved,
    /// Past the last question.
    Finished,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionPhase::Awaiting => "awaiting an answer",
            SessionPhase::Resolved => "waiting to advance",
            SessionPhase::Finished => "finished",
        })
    }
}

/// Outcome of [`QuizSession::advance`].
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    Next,
    Finished(QuizResult),
}

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    /// 1-based position of the current question, capped at `total`.
    pub position: usize,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One quiz attempt, from the first question to the result.
///
/// Every transition validates before mutating: a rejected call leaves the
/// session exactly as it was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SessionState", into = "SessionState")]
pub struct QuizSession {
    questions: Vec<Question>,
    current_index: usize,
    history: Vec<AnswerEvent>,
    score: u32,
    points: u32,
    streak: u32,
    presented_at: DateTime<Utc>,
}

impl QuizSession {
    /// Starts a session with the first question presented at `presented_at`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if `questions` is empty.
    pub fn new(questions: Vec<Question>, presented_at: DateTime<Utc>) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }
        Ok(Self {
            questions,
            current_index: 0,
            history: Vec::new(),
            score: 0,
            points: 0,
            streak: 0,
            presented_at,
        })
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.current_index >= self.questions.len() {
            SessionPhase::Finished
        } else if self.history.len() > self.current_index {
            SessionPhase::Resolved
        } else {
            SessionPhase::Awaiting
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase() == SessionPhase::Finished
    }

    /// True once the current question has been answered or skipped.
    #[must_use]
    pub fn is_current_resolved(&self) -> bool {
        self.phase() == SessionPhase::Resolved
    }

    /// # Errors
    ///
    /// Returns `SessionError::OutOfRange` once the session is finished.
    pub fn current_question(&self) -> Result<&Question, SessionError> {
        self.questions
            .get(self.current_index)
            .ok_or(SessionError::OutOfRange)
    }

    /// The event recorded for the current question, if it is resolved.
    #[must_use]
    pub fn current_event(&self) -> Option<&AnswerEvent> {
        if self.is_current_resolved() {
            self.history.last()
        } else {
            None
        }
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn history(&self) -> &[AnswerEvent] {
        &self.history
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    #[must_use]
    pub fn streak(&self) -> u32 {
        self.streak
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn presented_at(&self) -> DateTime<Utc> {
        self.presented_at
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.questions.len();
        SessionProgress {
            total,
            answered: self.history.len(),
            remaining: total.saturating_sub(self.history.len()),
            position: (self.current_index + 1).min(total),
        }
    }

    /// Answers the current question with one of its options.
    ///
    /// Elapsed time is measured from when the question was presented to
    /// `answered_at`. Does not advance.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidStateTransition` if the session is finished
    /// or the current question is already resolved, and
    /// `SessionError::InvalidOption` if `option` is not one of its options.
    pub fn answer(
        &mut self,
        option: &str,
        answered_at: DateTime<Utc>,
    ) -> Result<&AnswerEvent, SessionError> {
        self.require_awaiting("answer")?;
        let question = &self.questions[self.current_index];
        if !question.has_option(option) {
            return Err(SessionError::InvalidOption(option.to_string()));
        }

        let is_correct = question.is_correct(option);
        let elapsed = clamp_elapsed(elapsed_secs(self.presented_at, answered_at));
        let scored = apply_answer(is_correct, elapsed, self.streak);

        let event = AnswerEvent {
            question: question.text().to_string(),
            chosen: Chosen::Option(option.to_string()),
            correct_answer: question.correct_answer().to_string(),
            is_correct,
            explanation: question.explanation().to_string(),
            points_awarded: scored.points,
            elapsed_secs: elapsed,
        };

        if is_correct {
            self.score += 1;
        }
        self.points = self.points.saturating_add(scored.points);
        self.streak = scored.streak_after;
        self.history.push(event);
        self.resolved_event()
    }

    /// Skips the current question: records a `Skipped` event and resets the streak.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidStateTransition` if the session is finished
    /// or the current question is already resolved.
    pub fn skip(&mut self) -> Result<&AnswerEvent, SessionError> {
        self.require_awaiting("skip")?;
        let question = &self.questions[self.current_index];
        let event = AnswerEvent {
            question: question.text().to_string(),
            chosen: Chosen::Skipped,
            correct_answer: question.correct_answer().to_string(),
            is_correct: false,
            explanation: question.explanation().to_string(),
            points_awarded: 0,
            elapsed_secs: 0.0,
        };
        self.streak = 0;
        self.history.push(event);
        self.resolved_event()
    }

    /// Moves past the resolved current question.
    ///
    /// The next question counts as presented at `presented_at`. Moving past
    /// the last question finishes the session and returns the result, which
    /// always includes the last question's event.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidStateTransition` unless the current
    /// question has been answered or skipped.
    pub fn advance(&mut self, presented_at: DateTime<Utc>) -> Result<Advance, SessionError> {
        match self.phase() {
            SessionPhase::Resolved => {}
            phase => {
                return Err(SessionError::InvalidStateTransition {
                    operation: "advance",
                    phase,
                });
            }
        }

        self.current_index += 1;
        if self.current_index == self.questions.len() {
            return Ok(Advance::Finished(self.build_result()));
        }
        self.presented_at = presented_at;
        Ok(Advance::Next)
    }

    /// Finishes the session from its last question.
    ///
    /// Equivalent to the final [`advance`](Self::advance), for callers that
    /// know they are on the last question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidStateTransition` unless the last question
    /// is the current one and has been answered or skipped.
    pub fn finish(&mut self) -> Result<QuizResult, SessionError> {
        let phase = self.phase();
        if phase != SessionPhase::Resolved || self.current_index + 1 != self.questions.len() {
            return Err(SessionError::InvalidStateTransition {
                operation: "finish",
                phase,
            });
        }
        self.current_index += 1;
        Ok(self.build_result())
    }

    fn require_awaiting(&self, operation: &'static str) -> Result<(), SessionError> {
        match self.phase() {
            SessionPhase::Awaiting => Ok(()),
            phase => Err(SessionError::InvalidStateTransition { operation, phase }),
        }
    }

    fn resolved_event(&self) -> Result<&AnswerEvent, SessionError> {
        self.history
            .last()
            .ok_or(SessionError::Corrupt("history empty after resolving"))
    }

    fn build_result(&self) -> QuizResult {
        QuizResult {
            score: self.score,
            total: u32::try_from(self.questions.len()).unwrap_or(u32::MAX),
            points: self.points,
            history: self.history.clone(),
            level_up: false,
            new_level: None,
        }
    }
}

//
// ─── SERIALIZED FORM ───────────────────────────────────────────────────────────
//

/// Plain serialized shape of a session. Checked against the session
/// invariants when converted back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub questions: Vec<Question>,
    pub current_index: usize,
    pub history: Vec<AnswerEvent>,
    pub score: u32,
    pub points: u32,
    pub streak: u32,
    pub presented_at: DateTime<Utc>,
}

impl From<QuizSession> for SessionState {
    fn from(s: QuizSession) -> Self {
        Self {
            questions: s.questions,
            current_index: s.current_index,
            history: s.history,
            score: s.score,
            points: s.points,
            streak: s.streak,
            presented_at: s.presented_at,
        }
    }
}

impl TryFrom<SessionState> for QuizSession {
    type Error = SessionError;

    fn try_from(state: SessionState) -> Result<Self, Self::Error> {
        if state.questions.is_empty() {
            return Err(SessionError::Empty);
        }
        let len = state.questions.len();
        if state.current_index > len {
            return Err(SessionError::Corrupt("current index past the end"));
        }
        let resolved_ahead = state.history.len().checked_sub(state.current_index);
        match resolved_ahead {
            Some(0) => {}
            Some(1) if state.current_index < len => {}
            _ => return Err(SessionError::Corrupt("history length does not match index")),
        }
        let correct = state.history.iter().filter(|e| e.is_correct).count();
        if usize::try_from(state.score).ok() != Some(correct) {
            return Err(SessionError::Corrupt("score does not match history"));
        }
        let awarded: u64 = state
            .history
            .iter()
            .map(|e| u64::from(e.points_awarded))
            .sum();
        if u64::from(state.points) != awarded {
            return Err(SessionError::Corrupt("points do not match history"));
        }

        Ok(Self {
            questions: state.questions,
            current_index: state.current_index,
            history: state.history,
            score: state.score,
            points: state.points,
            streak: state.streak,
            presented_at: state.presented_at,
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
