use dioxus::prelude::*;
use quiz_core::session::SessionError;
use services::{GenerationError, QuizLoopError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    /// No API key configured.
    GenerationDisabled,
    /// The generator failed after every retry.
    GenerationFailed,
    InvalidSettings,
    /// Stored level and points could not be read.
    ProgressUnavailable,
    /// A quiz action that the current question does not allow.
    InvalidAction,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ViewError::GenerationDisabled => {
                "Quiz generation is not configured. Set QUIZ_GEMINI_API_KEY and restart."
            }
            ViewError::GenerationFailed => {
                "Failed to generate quiz. Please check your connection or try a different topic."
            }
            ViewError::InvalidSettings => "Please choose a topic and a valid question count.",
            ViewError::ProgressUnavailable => "Could not load your progress.",
            ViewError::InvalidAction => "That move isn't allowed right now.",
            ViewError::Unknown => "Something went wrong. Please try again.",
        }
    }
}

impl From<&QuizLoopError> for ViewError {
    fn from(err: &QuizLoopError) -> Self {
        match err {
            QuizLoopError::Generation(GenerationError::Disabled) => ViewError::GenerationDisabled,
            QuizLoopError::Generation(_) => ViewError::GenerationFailed,
            QuizLoopError::Settings(_) => ViewError::InvalidSettings,
            QuizLoopError::Progress(_) => ViewError::ProgressUnavailable,
            QuizLoopError::Session(SessionError::Empty | SessionError::Corrupt(_)) => {
                ViewError::Unknown
            }
            QuizLoopError::Session(_) => ViewError::InvalidAction,
            _ => ViewError::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
