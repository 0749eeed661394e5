use services::QuizRecordRow;

use crate::vm::time_fmt::format_datetime;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordCardVm {
    pub id: i64,
    pub topic: String,
    pub mode_label: &'static str,
    pub difficulty: &'static str,
    pub score_label: String,
    pub points: u32,
    pub level_badge: Option<String>,
    pub completed_at_str: String,
}

impl From<&QuizRecordRow> for RecordCardVm {
    fn from(row: &QuizRecordRow) -> Self {
        let record = &row.record;
        Self {
            id: row.id.value(),
            topic: record.topic().to_string(),
            mode_label: record.mode().label(),
            difficulty: record.difficulty().as_str(),
            score_label: format!("{}/{}", record.score(), record.total()),
            points: record.points(),
            level_badge: record.new_level().map(|level| format!("Reached level {level}")),
            completed_at_str: format_datetime(record.completed_at()),
        }
    }
}

#[must_use]
pub fn map_record_cards(rows: &[QuizRecordRow]) -> Vec<RecordCardVm> {
    rows.iter().map(RecordCardVm::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Difficulty, GameMode, QuizRecord, RecordId};
    use quiz_core::time::fixed_now;

    #[test]
    fn card_shows_score_and_level_badge() {
        let record = QuizRecord::from_persisted(
            "Volcanoes".into(),
            GameMode::Campaign,
            Difficulty::Hard,
            4,
            5,
            612,
            true,
            Some(61),
            fixed_now(),
        )
        .unwrap();
        let rows = vec![QuizRecordRow::new(RecordId::new(3), record)];

        let cards = map_record_cards(&rows);
        assert_eq!(cards[0].id, 3);
        assert_eq!(cards[0].mode_label, "Career Mode");
        assert_eq!(cards[0].difficulty, "Hard");
        assert_eq!(cards[0].score_label, "4/5");
        assert_eq!(cards[0].level_badge.as_deref(), Some("Reached level 61"));
    }
}
