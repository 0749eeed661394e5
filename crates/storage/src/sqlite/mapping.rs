use quiz_core::model::{
    Difficulty, DifficultyRating, Feedback, GameMode, QuizRecord, RecordId,
};
use sqlx::Row;
use uuid::Uuid;

use crate::repository::{QuizRecordRow, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn(e: sqlx::Error) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn i64_to_u32(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

pub(crate) fn u64_to_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn parse_mode(s: &str) -> Result<GameMode, StorageError> {
    GameMode::from_str_opt(s)
        .ok_or_else(|| StorageError::Serialization(format!("invalid mode: {s}")))
}

pub(crate) fn parse_difficulty(s: &str) -> Result<Difficulty, StorageError> {
    s.parse::<Difficulty>().map_err(ser)
}

pub(crate) fn map_record_row(row: &sqlx::sqlite::SqliteRow) -> Result<QuizRecordRow, StorageError> {
    let mode: String = row.try_get("mode").map_err(ser)?;
    let difficulty: String = row.try_get("difficulty").map_err(ser)?;
    let new_level = row
        .try_get::<Option<i64>, _>("new_level")
        .map_err(ser)?
        .map(|v| i64_to_u32("new_level", v))
        .transpose()?;

    let record = QuizRecord::from_persisted(
        row.try_get::<String, _>("topic").map_err(ser)?,
        parse_mode(&mode)?,
        parse_difficulty(&difficulty)?,
        i64_to_u32("score", row.try_get("score").map_err(ser)?)?,
        i64_to_u32("total", row.try_get("total").map_err(ser)?)?,
        i64_to_u32("points", row.try_get("points").map_err(ser)?)?,
        row.try_get::<i64, _>("level_up").map_err(ser)? != 0,
        new_level,
        row.try_get("completed_at").map_err(ser)?,
    )
    .map_err(ser)?;

    Ok(QuizRecordRow::new(
        RecordId::new(row.try_get("id").map_err(ser)?),
        record,
    ))
}

pub(crate) fn map_feedback_row(row: &sqlx::sqlite::SqliteRow) -> Result<Feedback, StorageError> {
    let id: String = row.try_get("id").map_err(ser)?;
    let rating: String = row.try_get("difficulty_rating").map_err(ser)?;
    let stars: i64 = row.try_get("star_rating").map_err(ser)?;

    Ok(Feedback {
        id: Uuid::parse_str(&id).map_err(ser)?,
        created_at: row.try_get("created_at").map_err(ser)?,
        topic: row.try_get("topic").map_err(ser)?,
        score: i64_to_u32("score", row.try_get("score").map_err(ser)?)?,
        total: i64_to_u32("total", row.try_get("total").map_err(ser)?)?,
        difficulty_rating: DifficultyRating::parse(&rating).map_err(ser)?,
        star_rating: u8::try_from(stars)
            .map_err(|_| StorageError::Serialization(format!("invalid star_rating: {stars}")))?,
        comment: row.try_get("comment").map_err(ser)?,
    })
}
