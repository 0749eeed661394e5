#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{
    FeedbackRepository, IdentityRepository, InMemoryRepository, ProgressRepository,
    QuizRecordRepository, QuizRecordRow, Storage, StorageError,
};
