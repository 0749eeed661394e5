use chrono::Utc;
use quiz_core::model::{PlayerId, PlayerProgress};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{conn, i64_to_u32, i64_to_u64, ser, u64_to_i64};
use crate::repository::{IdentityRepository, ProgressRepository, StorageError};

#[async_trait::async_trait]
impl ProgressRepository for SqliteRepository {
    async fn get_progress(&self) -> Result<PlayerProgress, StorageError> {
        let row = sqlx::query("SELECT level, points FROM player_progress WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        let Some(row) = row else {
            return Ok(PlayerProgress::default());
        };
        Ok(PlayerProgress {
            level: i64_to_u32("level", row.try_get("level").map_err(ser)?)?,
            points: i64_to_u64("points", row.try_get("points").map_err(ser)?)?,
        })
    }

    async fn save_level(&self, level: u32) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO player_progress (id, level, points, updated_at)
            VALUES (1, ?1, 0, ?2)
            ON CONFLICT(id) DO UPDATE SET
                level = excluded.level,
                updated_at = excluded.updated_at
            ",
        )
        .bind(i64::from(level))
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(conn)?;
        Ok(())
    }

    async fn save_points(&self, points: u64) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO player_progress (id, level, points, updated_at)
            VALUES (1, 1, ?1, ?2)
            ON CONFLICT(id) DO UPDATE SET
                points = excluded.points,
                updated_at = excluded.updated_at
            ",
        )
        .bind(u64_to_i64("points", points)?)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(conn)?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl IdentityRepository for SqliteRepository {
    async fn get_player_id(&self) -> Result<Option<PlayerId>, StorageError> {
        let row = sqlx::query("SELECT player_id FROM app_identity WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        row.map(|row| {
            let raw: String = row.try_get("player_id").map_err(ser)?;
            raw.parse::<PlayerId>().map_err(ser)
        })
        .transpose()
    }

    async fn save_player_id(&self, id: &PlayerId) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO app_identity (id, player_id, created_at)
            VALUES (1, ?1, ?2)
            ON CONFLICT(id) DO UPDATE SET player_id = excluded.player_id
            ",
        )
        .bind(id.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(conn)?;
        Ok(())
    }
}
