use quiz_core::model::{QuizRecord, RecordId};

use super::SqliteRepository;
use super::mapping::{conn, map_record_row};
use crate::repository::{QuizRecordRepository, QuizRecordRow, StorageError};

#[async_trait::async_trait]
impl QuizRecordRepository for SqliteRepository {
    async fn append_record(&self, record: &QuizRecord) -> Result<RecordId, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO quiz_records (topic, mode, difficulty, score, total, points, level_up, new_level, completed_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ",
        )
        .bind(record.topic())
        .bind(record.mode().as_str())
        .bind(record.difficulty().as_str())
        .bind(i64::from(record.score()))
        .bind(i64::from(record.total()))
        .bind(i64::from(record.points()))
        .bind(i64::from(record.level_up()))
        .bind(record.new_level().map(i64::from))
        .bind(record.completed_at())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(RecordId::new(res.last_insert_rowid()))
    }

    async fn get_record(&self, id: RecordId) -> Result<QuizRecord, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, topic, mode, difficulty, score, total, points, level_up, new_level, completed_at
            FROM quiz_records WHERE id = ?1
            ",
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?
        .ok_or(StorageError::NotFound)?;

        map_record_row(&row).map(|row| row.record)
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<QuizRecordRow>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, topic, mode, difficulty, score, total, points, level_up, new_level, completed_at
            FROM quiz_records
            ORDER BY completed_at DESC, id DESC
            LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_record_row).collect()
    }
}
