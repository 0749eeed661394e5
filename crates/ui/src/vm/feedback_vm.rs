use quiz_core::model::Feedback;

use crate::vm::time_fmt::format_datetime;

/// One submitted feedback entry on the history screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackRowVm {
    pub topic: String,
    pub stars: String,
    pub rating_label: &'static str,
    pub score_label: String,
    pub comment: Option<String>,
    pub created_at_str: String,
}

impl From<&Feedback> for FeedbackRowVm {
    fn from(feedback: &Feedback) -> Self {
        let filled = usize::from(feedback.star_rating.min(5));
        Self {
            topic: feedback.topic.clone(),
            stars: format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled)),
            rating_label: feedback.difficulty_rating.as_str(),
            score_label: format!("{}/{}", feedback.score, feedback.total),
            comment: Some(feedback.comment.trim().to_string()).filter(|c| !c.is_empty()),
            created_at_str: format_datetime(feedback.created_at),
        }
    }
}

#[must_use]
pub fn map_feedback_rows(entries: &[Feedback]) -> Vec<FeedbackRowVm> {
    entries.iter().map(FeedbackRowVm::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{DifficultyRating, FeedbackDraft};
    use quiz_core::time::fixed_now;

    #[test]
    fn row_renders_stars_and_hides_blank_comment() {
        let feedback = FeedbackDraft {
            topic: "Bees".into(),
            score: 3,
            total: 5,
            difficulty_rating: DifficultyRating::JustRight,
            star_rating: 4,
            comment: "   ".into(),
        }
        .validate(fixed_now())
        .unwrap();

        let rows = map_feedback_rows(&[feedback]);
        assert_eq!(rows[0].stars, "★★★★☆");
        assert_eq!(rows[0].rating_label, "Just Right");
        assert_eq!(rows[0].score_label, "3/5");
        assert_eq!(rows[0].comment, None);
    }
}
