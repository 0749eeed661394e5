use std::sync::Arc;

use quiz_core::model::{
    AnswerEvent, GameMode, PlayerProgress, QuizRecord, QuizResult, QuizSettings, RecordId,
};
use quiz_core::session::{Advance, QuizSession};
use quiz_core::{Clock, resolve_progression};
use storage::repository::{QuizRecordRepository, QuizRecordRow};

use crate::error::QuizLoopError;
use crate::generation::{GenerationRequest, QuestionGenerator};
use crate::pending::{PendingQuiz, PendingQuizMailbox};
use crate::progress_service::ProgressService;
use crate::retry::{RetryPolicy, retry};

/// A running quiz: the session plus the settings it was generated for.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveQuiz {
    pub settings: QuizSettings,
    pub session: QuizSession,
}

impl ActiveQuiz {
    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.settings.mode
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.settings.topic
    }
}

/// What finishing a quiz changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Stored progress after the quiz; `None` when it could not be read.
    pub progress: Option<PlayerProgress>,
    pub record_id: Option<RecordId>,
}

/// Orchestrates quiz start, play, and persisted completion.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    generator: Arc<dyn QuestionGenerator>,
    retry: RetryPolicy,
    progress: ProgressService,
    records: Arc<dyn QuizRecordRepository>,
    mailbox: Arc<PendingQuizMailbox>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        generator: Arc<dyn QuestionGenerator>,
        progress: ProgressService,
        records: Arc<dyn QuizRecordRepository>,
        mailbox: Arc<PendingQuizMailbox>,
    ) -> Self {
        Self {
            clock,
            generator,
            retry: RetryPolicy::quiz(),
            progress,
            records,
            mailbox,
        }
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn mailbox(&self) -> Arc<PendingQuizMailbox> {
        Arc::clone(&self.mailbox)
    }

    /// Generate questions and start a session.
    ///
    /// Campaign settings take their level from stored progress. A manual
    /// start discards any pending drop.
    ///
    /// # Errors
    ///
    /// Returns `QuizLoopError::Settings` for invalid settings,
    /// `QuizLoopError::Progress` when a campaign level cannot be read and
    /// `QuizLoopError::Generation` when generation fails after retries; no
    /// session is created in any of these cases.
    pub async fn start_quiz(&self, settings: QuizSettings) -> Result<ActiveQuiz, QuizLoopError> {
        let settings = match settings.mode {
            GameMode::Campaign => {
                let stored = self.progress.local_progress().await?;
                QuizSettings {
                    voice: settings.voice,
                    language: settings.language,
                    ..QuizSettings::campaign(settings.topic, stored.level)
                }
            }
            GameMode::Classic => settings,
        };
        settings.validate()?;

        if self.mailbox.clear().is_some() {
            tracing::debug!("discarded pending drop for a manual start");
        }

        let request = GenerationRequest::from_settings(&settings);
        let questions = retry(&self.retry, "quiz", || self.generator.generate(&request)).await?;
        let session = QuizSession::new(questions, self.clock.now())?;

        tracing::info!(
            topic = %settings.topic,
            mode = %settings.mode,
            questions = session.total(),
            "quiz started"
        );
        Ok(ActiveQuiz { settings, session })
    }

    /// Start a session from a claimed drop.
    ///
    /// # Errors
    ///
    /// Returns `QuizLoopError::Session` if the drop carries no questions.
    pub fn start_pending(&self, pending: PendingQuiz) -> Result<ActiveQuiz, QuizLoopError> {
        let settings = pending.settings();
        let session = QuizSession::new(pending.questions, self.clock.now())?;
        tracing::info!(topic = %settings.topic, "pending quiz started");
        Ok(ActiveQuiz { settings, session })
    }

    /// # Errors
    ///
    /// Returns `QuizLoopError::Session` for an invalid option or transition.
    pub fn answer(&self, quiz: &mut ActiveQuiz, option: &str) -> Result<AnswerEvent, QuizLoopError> {
        Ok(quiz.session.answer(option, self.clock.now())?.clone())
    }

    /// # Errors
    ///
    /// Returns `QuizLoopError::Session` if the question is already resolved.
    pub fn skip(&self, quiz: &mut ActiveQuiz) -> Result<AnswerEvent, QuizLoopError> {
        Ok(quiz.session.skip()?.clone())
    }

    /// # Errors
    ///
    /// Returns `QuizLoopError::Session` unless the current question is resolved.
    pub fn advance(&self, quiz: &mut ActiveQuiz) -> Result<Advance, QuizLoopError> {
        Ok(quiz.session.advance(self.clock.now())?)
    }

    /// Apply the level decision and persist the outcome.
    ///
    /// Progress is re-read from local storage so points accumulate on what
    /// is stored, not on whatever the caller last saw. `result` gets its
    /// level-up fields filled in; the level is saved only on a campaign
    /// level-up. Returns once local writes are done; remote sync continues
    /// in the background. Storage failures are logged.
    pub async fn complete(&self, quiz: &ActiveQuiz, result: &mut QuizResult) -> Completion {
        let progress = match self.progress.local_progress().await {
            Ok(stored) => Some(self.apply_progression(quiz, result, stored).await),
            Err(e) => {
                tracing::error!(error = %e, "failed to read progress for completion");
                None
            }
        };

        let record_id = match QuizRecord::from_result(
            quiz.topic(),
            quiz.mode(),
            quiz.settings.effective_difficulty(),
            result,
            self.clock.now(),
        ) {
            Ok(record) => match self.records.append_record(&record).await {
                Ok(id) => Some(id),
                Err(e) => {
                    tracing::error!(error = %e, "failed to save quiz record");
                    None
                }
            },
            Err(e) => {
                tracing::error!(error = %e, "finished quiz did not form a record");
                None
            }
        };

        tracing::info!(
            score = result.score,
            total = result.total,
            points = result.points,
            level_up = result.level_up,
            "quiz completed"
        );
        Completion {
            progress,
            record_id,
        }
    }

    async fn apply_progression(
        &self,
        quiz: &ActiveQuiz,
        result: &mut QuizResult,
        stored: PlayerProgress,
    ) -> PlayerProgress {
        let decision = resolve_progression(result, quiz.mode(), stored.level);
        decision.apply_to(result);

        let mut progress = PlayerProgress {
            level: stored.level,
            points: stored.points.saturating_add(u64::from(result.points)),
        };

        if decision.level_up {
            match self.progress.save_level(decision.new_level).await {
                Ok(saved) => progress.level = saved,
                Err(e) => tracing::error!(error = %e, "failed to save level"),
            }
        }
        if let Err(e) = self.progress.save_points(progress.points).await {
            tracing::error!(error = %e, "failed to save points");
            progress.points = stored.points;
        }
        progress
    }

    /// Recent finished quizzes, newest first.
    ///
    /// # Errors
    ///
    /// Returns `QuizLoopError::Storage` if the records cannot be read.
    pub async fn recent_records(&self, limit: u32) -> Result<Vec<QuizRecordRow>, QuizLoopError> {
        Ok(self.records.list_recent(limit).await?)
    }
}
