use quiz_core::model::{DifficultyRating, FeedbackDraft, GameMode, QuizResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryRowVm {
    pub question: String,
    pub chosen: String,
    pub correct_answer: String,
    pub is_correct: bool,
    pub skipped: bool,
    pub points: u32,
}

/// Final screen summary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultVm {
    pub topic: String,
    pub score: u32,
    pub total: u32,
    pub percentage: u32,
    pub points: u32,
    pub headline: &'static str,
    pub emoji: &'static str,
    pub level_up_label: Option<String>,
    pub rows: Vec<HistoryRowVm>,
}

impl ResultVm {
    #[must_use]
    pub fn new(topic: &str, mode: GameMode, result: &QuizResult) -> Self {
        let percentage = result.percentage();
        let (headline, emoji) = headline_for(percentage);
        let level_up_label = match (mode, result.new_level) {
            (GameMode::Campaign, Some(level)) if result.level_up => {
                Some(format!("Level Up! You reached level {level}"))
            }
            _ => None,
        };
        let rows = result
            .history
            .iter()
            .map(|event| HistoryRowVm {
                question: event.question.clone(),
                chosen: event.chosen.to_string(),
                correct_answer: event.correct_answer.clone(),
                is_correct: event.is_correct,
                skipped: event.chosen.is_skipped(),
                points: event.points_awarded,
            })
            .collect();

        Self {
            topic: topic.to_string(),
            score: result.score,
            total: result.total,
            percentage,
            points: result.points,
            headline,
            emoji,
            level_up_label,
            rows,
        }
    }
}

fn headline_for(percentage: u32) -> (&'static str, &'static str) {
    match percentage {
        100.. => ("Perfect Score! You're a Genius!", "🏆"),
        80..=99 => ("Great Job! You know your stuff.", "🌟"),
        50..=79 => ("Good effort! Keep learning.", "👍"),
        _ => ("Don't give up! Try again.", "📚"),
    }
}

/// Result-screen feedback form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FeedbackFormVm {
    pub star_rating: u8,
    pub difficulty_rating: Option<DifficultyRating>,
    pub comment: String,
    pub submitted: bool,
}

impl FeedbackFormVm {
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.submitted && (1..=5).contains(&self.star_rating) && self.difficulty_rating.is_some()
    }

    #[must_use]
    pub fn to_draft(&self, result: &ResultVm) -> Option<FeedbackDraft> {
        if !self.can_submit() {
            return None;
        }
        Some(FeedbackDraft {
            topic: result.topic.clone(),
            score: result.score,
            total: result.total,
            difficulty_rating: self.difficulty_rating?,
            star_rating: self.star_rating,
            comment: self.comment.clone(),
        })
    }
}
