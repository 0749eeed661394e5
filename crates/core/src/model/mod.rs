mod answer;
pub mod catalog;
mod difficulty;
mod feedback;
mod ids;
mod mode;
mod question;
mod record;
mod result;
mod settings;

pub use answer::{AnswerEvent, Chosen, SKIPPED_LABEL};
pub use difficulty::{
    Difficulty, MAX_LEVEL, MIN_LEVEL, ParseDifficultyError, clamp_level, difficulty_for_level,
};
pub use feedback::{DifficultyRating, Feedback, FeedbackDraft, FeedbackError, MAX_COMMENT_CHARS};
pub use ids::{ParsePlayerIdError, PlayerId, RecordId};
pub use mode::GameMode;
pub use question::{OPTIONS_PER_QUESTION, Question, QuestionDraft, QuestionError};
pub use record::{QuizRecord, QuizRecordError};
pub use result::{PlayerProgress, QuizResult};
pub use settings::{
    CAMPAIGN_QUESTION_COUNT, DEFAULT_QUESTION_COUNT, MAX_QUESTION_COUNT, MIN_QUESTION_COUNT,
    QuizSettings, SettingsError,
};
