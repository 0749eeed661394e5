use async_trait::async_trait;
use quiz_core::model::{Feedback, PlayerId, PlayerProgress, QuizRecord, RecordId};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// A stored quiz record with its row id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizRecordRow {
    pub id: RecordId,
    pub record: QuizRecord,
}

impl QuizRecordRow {
    #[must_use]
    pub fn new(id: RecordId, record: QuizRecord) -> Self {
        Self { id, record }
    }
}

/// Local copy of the player's level and points.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Load stored progress, or the default (level 1, 0 points) when none exists.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be read.
    async fn get_progress(&self) -> Result<PlayerProgress, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the level cannot be stored.
    async fn save_level(&self, level: u32) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the points cannot be stored.
    async fn save_points(&self, points: u64) -> Result<(), StorageError>;
}

/// Device-level player identity.
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the identity cannot be read.
    async fn get_player_id(&self) -> Result<Option<PlayerId>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the identity cannot be stored.
    async fn save_player_id(&self, id: &PlayerId) -> Result<(), StorageError>;
}

#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the id already exists, or other storage errors.
    async fn append_feedback(&self, feedback: &Feedback) -> Result<(), StorageError>;

    /// Most recent feedback first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the entries cannot be read.
    async fn list_feedback(&self, limit: u32) -> Result<Vec<Feedback>, StorageError>;
}

#[async_trait]
pub trait QuizRecordRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn append_record(&self, record: &QuizRecord) -> Result<RecordId, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_record(&self, id: RecordId) -> Result<QuizRecord, StorageError>;

    /// Most recently completed first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the records cannot be read.
    async fn list_recent(&self, limit: u32) -> Result<Vec<QuizRecordRow>, StorageError>;
}

//
// ─── IN-MEMORY ─────────────────────────────────────────────────────────────────
//

#[derive(Default)]
struct MemoryState {
    progress: Option<PlayerProgress>,
    player_id: Option<PlayerId>,
    feedback: VecDeque<Feedback>,
    records: Vec<QuizRecordRow>,
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryState>, StorageError> {
        self.state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn get_progress(&self) -> Result<PlayerProgress, StorageError> {
        Ok(self.lock()?.progress.unwrap_or_default())
    }

    async fn save_level(&self, level: u32) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        guard.progress.get_or_insert_with(PlayerProgress::default).level = level;
        Ok(())
    }

    async fn save_points(&self, points: u64) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        guard
            .progress
            .get_or_insert_with(PlayerProgress::default)
            .points = points;
        Ok(())
    }
}

#[async_trait]
impl IdentityRepository for InMemoryRepository {
    async fn get_player_id(&self) -> Result<Option<PlayerId>, StorageError> {
        Ok(self.lock()?.player_id.clone())
    }

    async fn save_player_id(&self, id: &PlayerId) -> Result<(), StorageError> {
        self.lock()?.player_id = Some(id.clone());
        Ok(())
    }
}

#[async_trait]
impl FeedbackRepository for InMemoryRepository {
    async fn append_feedback(&self, feedback: &Feedback) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        if guard.feedback.iter().any(|f| f.id == feedback.id) {
            return Err(StorageError::Conflict);
        }
        guard.feedback.push_front(feedback.clone());
        Ok(())
    }

    async fn list_feedback(&self, limit: u32) -> Result<Vec<Feedback>, StorageError> {
        let guard = self.lock()?;
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(guard.feedback.iter().take(limit).cloned().collect())
    }
}

#[async_trait]
impl QuizRecordRepository for InMemoryRepository {
    async fn append_record(&self, record: &QuizRecord) -> Result<RecordId, StorageError> {
        let mut guard = self.lock()?;
        let next = i64::try_from(guard.records.len())
            .map_err(|_| StorageError::Serialization("record id overflow".into()))?
            + 1;
        let id = RecordId::new(next);
        guard.records.push(QuizRecordRow::new(id, record.clone()));
        Ok(id)
    }

    async fn get_record(&self, id: RecordId) -> Result<QuizRecord, StorageError> {
        let guard = self.lock()?;
        guard
            .records
            .iter()
            .find(|row| row.id == id)
            .map(|row| row.record.clone())
            .ok_or(StorageError::NotFound)
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<QuizRecordRow>, StorageError> {
        let guard = self.lock()?;
        let mut rows = guard.records.clone();
        rows.sort_by(|a, b| {
            b.record
                .completed_at()
                .cmp(&a.record.completed_at())
                .then(b.id.cmp(&a.id))
        });
        rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(rows)
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
    pub identity: Arc<dyn IdentityRepository>,
    pub feedback: Arc<dyn FeedbackRepository>,
    pub records: Arc<dyn QuizRecordRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        Self {
            progress: Arc::new(repo.clone()),
            identity: Arc::new(repo.clone()),
            feedback: Arc::new(repo.clone()),
            records: Arc::new(repo),
        }
    }
}
