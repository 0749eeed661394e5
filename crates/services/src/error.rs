//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{FeedbackError, QuestionError, SettingsError};
use quiz_core::session::SessionError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Transport failure talking to the Gemini API.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GeminiError {
    #[error("gemini is not configured")]
    Disabled,
    #[error("gemini request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by question generators.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("question generation is not configured")]
    Disabled,
    #[error("question generation failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(reqwest::Error),
    #[error("question generation returned an empty response")]
    EmptyResponse,
    #[error("question generation returned malformed json: {0}")]
    Malformed(String),
    #[error("generated question {index} is invalid: {source}")]
    InvalidQuestion {
        index: usize,
        #[source]
        source: QuestionError,
    },
    #[error("question generation returned no questions")]
    Empty,
}

impl From<GeminiError> for GenerationError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::Disabled => Self::Disabled,
            GeminiError::HttpStatus(status) => Self::HttpStatus(status),
            GeminiError::Http(err) => Self::Http(err),
        }
    }
}

/// Errors emitted by speech synthesis.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SpeechError {
    #[error("speech synthesis is not configured")]
    Disabled,
    #[error("speech synthesis failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(reqwest::Error),
    #[error("speech response carried no audio")]
    MissingAudio,
    #[error("unknown voice: {0}")]
    UnknownVoice(String),
    #[error("nothing to speak")]
    EmptyText,
}

impl From<GeminiError> for SpeechError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::Disabled => Self::Disabled,
            GeminiError::HttpStatus(status) => Self::HttpStatus(status),
            GeminiError::Http(err) => Self::Http(err),
        }
    }
}

/// Errors emitted by the remote progress store.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RemoteStoreError {
    #[error("remote store request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("remote store returned an unexpected value: {0}")]
    Malformed(String),
}

/// Errors emitted by account sign-up and sign-in.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("accounts are not configured")]
    Disabled,
    #[error("please enter a valid email address")]
    InvalidEmail,
    #[error("password must be at least {min} characters")]
    WeakPassword { min: usize },
    #[error("an account with this email already exists")]
    EmailExists,
    #[error("wrong email or password")]
    InvalidCredentials,
    #[error("too many attempts, try again later")]
    TooManyAttempts,
    #[error("sign-in was rejected: {0}")]
    Rejected(String),
    #[error("sign-in failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("sign-in returned an unexpected account id: {0}")]
    Malformed(String),
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `FeedbackService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FeedbackServiceError {
    #[error(transparent)]
    Invalid(#[from] FeedbackError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `QuizLoopService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizLoopError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
}

/// Whether a failure is worth retrying.
pub trait Transient {
    fn is_transient(&self) -> bool;
}

fn status_is_transient(status: reqwest::StatusCode) -> bool {
    status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS
}

impl Transient for GenerationError {
    fn is_transient(&self) -> bool {
        match self {
            Self::Disabled => false,
            Self::HttpStatus(status) => status_is_transient(*status),
            Self::Http(_) | Self::EmptyResponse | Self::Malformed(_) => true,
            Self::InvalidQuestion { .. } | Self::Empty => true,
        }
    }
}

impl Transient for SpeechError {
    fn is_transient(&self) -> bool {
        match self {
            Self::Disabled | Self::UnknownVoice(_) | Self::EmptyText => false,
            Self::HttpStatus(status) => status_is_transient(*status),
            Self::Http(_) | Self::MissingAudio => true,
        }
    }
}
