use quiz_core::model::Feedback;

use super::SqliteRepository;
use super::mapping::{conn, map_feedback_row};
use crate::repository::{FeedbackRepository, StorageError};

#[async_trait::async_trait]
impl FeedbackRepository for SqliteRepository {
    async fn append_feedback(&self, feedback: &Feedback) -> Result<(), StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO feedback (id, created_at, topic, score, total, difficulty_rating, star_rating, comment)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(id) DO NOTHING
            ",
        )
        .bind(feedback.id.to_string())
        .bind(feedback.created_at)
        .bind(feedback.topic.as_str())
        .bind(i64::from(feedback.score))
        .bind(i64::from(feedback.total))
        .bind(feedback.difficulty_rating.as_str())
        .bind(i64::from(feedback.star_rating))
        .bind(feedback.comment.as_str())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::Conflict);
        }
        Ok(())
    }

    async fn list_feedback(&self, limit: u32) -> Result<Vec<Feedback>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, created_at, topic, score, total, difficulty_rating, star_rating, comment
            FROM feedback
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_feedback_row).collect()
    }
}
