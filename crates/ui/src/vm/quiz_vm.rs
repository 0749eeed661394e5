use quiz_core::model::{AnswerEvent, Chosen, QuizResult, QuizSettings};
use quiz_core::session::{Advance, SessionPhase};
use services::{ActiveQuiz, Completion, PendingQuiz, QuizLoopService};

use crate::views::ViewError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionState {
    Idle,
    Correct,
    Wrong,
    Dimmed,
}

impl OptionState {
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            OptionState::Idle => "quiz-option",
            OptionState::Correct => "quiz-option quiz-option--correct",
            OptionState::Wrong => "quiz-option quiz-option--wrong",
            OptionState::Dimmed => "quiz-option quiz-option--dimmed",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub label: String,
    pub state: OptionState,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PlayOutcome {
    Continue,
    /// The last question was resolved; the result still needs saving.
    Finished(QuizResult),
}

/// A finished quiz after it was persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct SavedQuiz {
    pub result: QuizResult,
    pub completion: Completion,
}

/// Screen-facing wrapper around a running quiz.
#[derive(Clone, Debug, PartialEq)]
pub struct QuizVm {
    quiz: ActiveQuiz,
}

impl QuizVm {
    #[must_use]
    pub fn new(quiz: ActiveQuiz) -> Self {
        Self { quiz }
    }

    #[must_use]
    pub fn quiz(&self) -> &ActiveQuiz {
        &self.quiz
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.quiz.settings
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        self.quiz.topic()
    }

    #[must_use]
    pub fn question_text(&self) -> Option<&str> {
        self.quiz.session.current_question().ok().map(|q| q.text())
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.quiz.session.phase() == SessionPhase::Resolved
    }

    #[must_use]
    pub fn current_event(&self) -> Option<&AnswerEvent> {
        self.quiz.session.current_event()
    }

    #[must_use]
    pub fn options(&self) -> Vec<OptionVm> {
        let Ok(question) = self.quiz.session.current_question() else {
            return Vec::new();
        };
        let event = self.current_event();
        question
            .options()
            .iter()
            .map(|label| {
                let state = match event {
                    None => OptionState::Idle,
                    Some(_) if label == question.correct_answer() => OptionState::Correct,
                    Some(AnswerEvent {
                        chosen: Chosen::Option(chosen),
                        ..
                    }) if chosen == label => OptionState::Wrong,
                    Some(_) => OptionState::Dimmed,
                };
                OptionVm {
                    label: label.clone(),
                    state,
                }
            })
            .collect()
    }

    #[must_use]
    pub fn progress_label(&self) -> String {
        let progress = self.quiz.session.progress();
        format!("Question {} of {}", progress.position, progress.total)
    }

    #[must_use]
    pub fn score_label(&self) -> String {
        format!("Score: {}", self.quiz.session.score())
    }

    #[must_use]
    pub fn points_label(&self) -> String {
        format!("{} pts", self.quiz.session.points())
    }

    #[must_use]
    pub fn streak_label(&self) -> Option<String> {
        let streak = self.quiz.session.streak();
        (streak >= 2).then(|| format!("{streak} in a row 🔥"))
    }

    /// Text to read aloud: the question, or the explanation once resolved.
    #[must_use]
    pub fn speech_text(&self) -> Option<String> {
        match self.current_event() {
            Some(event) => Some(event.explanation.clone()).filter(|e| !e.trim().is_empty()),
            None => self.question_text().map(str::to_string),
        }
    }

    /// # Errors
    ///
    /// Returns `ViewError::InvalidAction` if the option is rejected.
    pub fn answer(&mut self, quiz_loop: &QuizLoopService, option: &str) -> Result<(), ViewError> {
        quiz_loop
            .answer(&mut self.quiz, option)
            .map(|_| ())
            .map_err(|e| ViewError::from(&e))
    }

    /// # Errors
    ///
    /// Returns `ViewError::InvalidAction` if the question is already resolved.
    pub fn skip(&mut self, quiz_loop: &QuizLoopService) -> Result<(), ViewError> {
        quiz_loop
            .skip(&mut self.quiz)
            .map(|_| ())
            .map_err(|e| ViewError::from(&e))
    }

    /// Moves on to the next question or resolves the result.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::InvalidAction` if the current question is unresolved.
    pub fn advance(&mut self, quiz_loop: &QuizLoopService) -> Result<PlayOutcome, ViewError> {
        match quiz_loop.advance(&mut self.quiz).map_err(|e| ViewError::from(&e))? {
            Advance::Next => Ok(PlayOutcome::Continue),
            Advance::Finished(result) => Ok(PlayOutcome::Finished(result)),
        }
    }
}

/// Apply progression and store the finished quiz.
pub async fn save_finished(
    quiz_loop: &QuizLoopService,
    quiz: &ActiveQuiz,
    mut result: QuizResult,
) -> SavedQuiz {
    let completion = quiz_loop.complete(quiz, &mut result).await;
    SavedQuiz { result, completion }
}

/// # Errors
///
/// Returns the `ViewError` matching the generation, progress or settings
/// failure.
pub async fn start_quiz(
    quiz_loop: &QuizLoopService,
    settings: QuizSettings,
) -> Result<QuizVm, ViewError> {
    quiz_loop
        .start_quiz(settings)
        .await
        .map(QuizVm::new)
        .map_err(|e| ViewError::from(&e))
}

/// # Errors
///
/// Returns `ViewError::Unknown` if the drop is unusable.
pub fn start_pending_quiz(
    quiz_loop: &QuizLoopService,
    pending: PendingQuiz,
) -> Result<QuizVm, ViewError> {
    quiz_loop
        .start_pending(pending)
        .map(QuizVm::new)
        .map_err(|e| ViewError::from(&e))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use quiz_core::model::{Difficulty, Question};
    use quiz_core::time::fixed_clock;
    use services::{
        GenerationError, GenerationRequest, PendingQuizMailbox, PlayerIdentity, ProgressService,
        QuestionGenerator, RetryPolicy,
    };
    use storage::repository::InMemoryRepository;

    use super::*;

    struct CapitalsGenerator;

    #[async_trait]
    impl QuestionGenerator for CapitalsGenerator {
        async fn generate(
            &self,
            request: &GenerationRequest,
        ) -> Result<Vec<Question>, GenerationError> {
            Ok((0..request.count)
                .map(|i| {
                    Question::new(
                        format!("Capital #{i}?"),
                        vec!["Paris".into(), "Rome".into(), "Oslo".into(), "Lima".into()],
                        "Paris",
                        "Paris is the capital of France.",
                    )
                    .unwrap()
                })
                .collect())
        }
    }

    fn quiz_loop() -> QuizLoopService {
        let repo = InMemoryRepository::new();
        let progress = ProgressService::new(
            Arc::new(repo.clone()),
            PlayerIdentity::new(Arc::new(repo.clone()), None),
            None,
        );
        QuizLoopService::new(
            fixed_clock(),
            Arc::new(CapitalsGenerator),
            progress,
            Arc::new(repo),
            Arc::new(PendingQuizMailbox::new()),
        )
        .with_retry(RetryPolicy::no_delay(1))
    }

    #[tokio::test]
    async fn wrong_answer_highlights_both_options() {
        let quiz_loop = quiz_loop();
        let settings = QuizSettings::classic("Capitals", Difficulty::Easy, 2);
        let mut vm = start_quiz(&quiz_loop, settings).await.unwrap();
        assert_eq!(vm.progress_label(), "Question 1 of 2");
        assert!(vm.options().iter().all(|o| o.state == OptionState::Idle));

        vm.answer(&quiz_loop, "Rome").unwrap();
        let states: Vec<_> = vm.options().into_iter().map(|o| o.state).collect();
        assert_eq!(
            states,
            vec![
                OptionState::Correct,
                OptionState::Wrong,
                OptionState::Dimmed,
                OptionState::Dimmed
            ]
        );
        assert_eq!(
            vm.speech_text().as_deref(),
            Some("Paris is the capital of France.")
        );
        assert_eq!(vm.answer(&quiz_loop, "Paris"), Err(ViewError::InvalidAction));
        assert_eq!(vm.skip(&quiz_loop), Err(ViewError::InvalidAction));
    }

    #[tokio::test]
    async fn last_advance_finishes_and_saves() {
        let quiz_loop = quiz_loop();
        let settings = QuizSettings::classic("Capitals", Difficulty::Easy, 2);
        let mut vm = start_quiz(&quiz_loop, settings).await.unwrap();

        vm.answer(&quiz_loop, "Paris").unwrap();
        assert_eq!(vm.advance(&quiz_loop).unwrap(), PlayOutcome::Continue);

        vm.skip(&quiz_loop).unwrap();
        let PlayOutcome::Finished(result) = vm.advance(&quiz_loop).unwrap() else {
            panic!("expected the quiz to finish");
        };
        let saved = save_finished(&quiz_loop, vm.quiz(), result).await;
        assert_eq!(saved.result.score, 1);
        assert_eq!(saved.result.skipped(), 1);
        assert!(saved.completion.record_id.is_some());
        assert_eq!(
            saved.completion.progress.map(|p| p.points),
            Some(u64::from(saved.result.points))
        );
    }

    #[tokio::test]
    async fn advance_before_answering_is_rejected() {
        let quiz_loop = quiz_loop();
        let settings = QuizSettings::classic("Capitals", Difficulty::Easy, 1);
        let mut vm = start_quiz(&quiz_loop, settings).await.unwrap();
        assert_eq!(vm.advance(&quiz_loop), Err(ViewError::InvalidAction));
        assert_eq!(vm.question_text(), Some("Capital #0?"));
    }
}
