#![forbid(unsafe_code)]

pub mod app_services;
pub mod auth;
pub mod config;
pub mod error;
pub mod feedback_service;
pub mod gemini;
pub mod generation;
pub mod identity;
pub mod pending;
pub mod progress_service;
pub mod quiz_loop;
pub mod remote;
pub mod retry;
pub mod speech;

pub use quiz_core::Clock;

pub use app_services::{AppServices, Collaborators};
pub use auth::{AccountAuth, AccountService, AccountSession, AccountSlot, FirebaseAuth};
pub use config::{AuthConfig, GeminiConfig, RemoteStoreConfig, ServicesConfig};
pub use error::{
    AppServicesError, AuthError, FeedbackServiceError, GenerationError, ProgressError, QuizLoopError,
    RemoteStoreError, SpeechError,
};
pub use feedback_service::FeedbackService;
pub use generation::{GeminiQuestionGenerator, GenerationRequest, QuestionGenerator};
pub use identity::PlayerIdentity;
pub use pending::{AutoGenerator, PendingQuiz, PendingQuizMailbox, PendingStart};
pub use progress_service::ProgressService;
pub use quiz_loop::{ActiveQuiz, Completion, QuizLoopService};
pub use remote::{FirebaseProgressStore, RemoteProgressStore};
pub use retry::RetryPolicy;
pub use speech::{SpeechCache, SpeechService, SpeechSynthesizer};
pub use storage::repository::QuizRecordRow;
