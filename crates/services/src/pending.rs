//! Background quiz drops.
//!
//! An [`AutoGenerator`] periodically generates a quiz on a random topic and
//! publishes it into a single-slot [`PendingQuizMailbox`]. The mailbox keeps
//! only the latest drop; the player consumes it explicitly.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use quiz_core::Clock;
use quiz_core::model::catalog::random_topic;
use quiz_core::model::{Difficulty, Question, QuizSettings};

use crate::error::GenerationError;
use crate::generation::{AUTO_DROP_LANGUAGE, GenerationRequest, QuestionGenerator};
use crate::retry::{RetryPolicy, retry};

/// A generated quiz waiting to be played.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingQuiz {
    pub topic: String,
    pub questions: Vec<Question>,
    pub generated_at: DateTime<Utc>,
}

impl PendingQuiz {
    /// Drops are always played as classic quizzes.
    #[must_use]
    pub fn settings(&self) -> QuizSettings {
        let count = u32::try_from(self.questions.len()).unwrap_or(u32::MAX);
        QuizSettings {
            language: AUTO_DROP_LANGUAGE.into(),
            ..QuizSettings::classic(self.topic.clone(), Difficulty::Medium, count)
        }
    }
}

/// Outcome of asking to start the pending quiz.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingStart {
    /// Taken out of the mailbox; start it.
    Ready(PendingQuiz),
    /// A session is running; ask the player before replacing it. The quiz
    /// stays in the mailbox.
    NeedsConfirmation { topic: String },
    Nothing,
}

#[derive(Default)]
struct MailboxState {
    slot: Option<PendingQuiz>,
    next_drop_at: Option<DateTime<Utc>>,
    drops: u64,
}

#[derive(Default)]
pub struct PendingQuizMailbox {
    state: Mutex<MailboxState>,
}

impl PendingQuizMailbox {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MailboxState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a new drop, returning the one it replaced.
    pub fn publish(&self, quiz: PendingQuiz) -> Option<PendingQuiz> {
        let mut state = self.lock();
        state.drops += 1;
        state.slot.replace(quiz)
    }

    #[must_use]
    pub fn pending_topic(&self) -> Option<String> {
        self.lock().slot.as_ref().map(|q| q.topic.clone())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().slot.is_none()
    }

    /// Number of drops published so far; lets pollers notice a new one.
    #[must_use]
    pub fn drop_count(&self) -> u64 {
        self.lock().drops
    }

    pub fn clear(&self) -> Option<PendingQuiz> {
        self.lock().slot.take()
    }

    /// Take the pending quiz, unless a session is active and the player has
    /// not confirmed abandoning it.
    pub fn claim(&self, session_active: bool, confirmed: bool) -> PendingStart {
        let mut state = self.lock();
        let Some(topic) = state.slot.as_ref().map(|quiz| quiz.topic.clone()) else {
            return PendingStart::Nothing;
        };
        if session_active && !confirmed {
            return PendingStart::NeedsConfirmation { topic };
        }
        state
            .slot
            .take()
            .map_or(PendingStart::Nothing, PendingStart::Ready)
    }

    pub fn schedule_next_drop(&self, at: DateTime<Utc>) {
        self.lock().next_drop_at = Some(at);
    }

    /// Whole seconds until the next drop, rounded up; `None` when no
    /// generator is running.
    #[must_use]
    pub fn seconds_until_next_drop(&self, now: DateTime<Utc>) -> Option<u64> {
        let next = self.lock().next_drop_at?;
        let millis = (next - now).num_milliseconds().max(0);
        Some(u64::try_from(millis).unwrap_or(0).div_ceil(1_000))
    }
}

/// Periodic background generation into the mailbox.
#[derive(Clone)]
pub struct AutoGenerator {
    generator: Arc<dyn QuestionGenerator>,
    mailbox: Arc<PendingQuizMailbox>,
    interval: Duration,
    retry: RetryPolicy,
    clock: Clock,
}

impl AutoGenerator {
    #[must_use]
    pub fn new(
        generator: Arc<dyn QuestionGenerator>,
        mailbox: Arc<PendingQuizMailbox>,
        interval: Duration,
        clock: Clock,
    ) -> Self {
        Self {
            generator,
            mailbox,
            interval,
            retry: RetryPolicy::quiz(),
            clock,
        }
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    fn next_drop_at(&self) -> DateTime<Utc> {
        let interval = chrono::Duration::from_std(self.interval)
            .unwrap_or_else(|_| chrono::Duration::days(1));
        self.clock.now() + interval
    }

    /// Generate one drop on `topic` and publish it.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` when every attempt fails; the mailbox is left
    /// untouched.
    pub async fn drop_topic(&self, topic: &str) -> Result<(), GenerationError> {
        let request = GenerationRequest::auto_drop(topic);
        let questions =
            retry(&self.retry, "auto-drop", || self.generator.generate(&request)).await?;
        let quiz = PendingQuiz {
            topic: topic.to_string(),
            questions,
            generated_at: self.clock.now(),
        };
        if let Some(replaced) = self.mailbox.publish(quiz) {
            tracing::debug!(topic = %replaced.topic, "replaced unplayed drop");
        }
        tracing::info!(topic, "new quiz ready");
        Ok(())
    }

    /// Generate one drop on a random topic.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` when every attempt fails.
    pub async fn drop_once(&self) -> Result<(), GenerationError> {
        let topic = {
            let mut rng = rand::rng();
            random_topic(&mut rng)
        };
        self.drop_topic(topic).await
    }

    /// Runs forever: one drop per interval, the first after one interval.
    pub async fn run(self) {
        self.mailbox.schedule_next_drop(self.next_drop_at());
        let start = tokio::time::Instant::now() + self.interval;
        let mut ticker = tokio::time::interval_at(start, self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.mailbox.schedule_next_drop(self.next_drop_at());
            if let Err(e) = self.drop_once().await {
                tracing::warn!(error = %e, "background quiz generation failed");
            }
        }
    }

    #[must_use]
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration as ChronoDuration;
    use quiz_core::time::{fixed_clock, fixed_now};
    use std::sync::atomic::{AtomicU32, Ordering};

    fn question(text: &str) -> Question {
        Question::new(
            text,
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            "a",
            "because",
        )
        .unwrap()
    }

    fn pending(topic: &str) -> PendingQuiz {
        PendingQuiz {
            topic: topic.into(),
            questions: vec![question("Q1"), question("Q2")],
            generated_at: fixed_now(),
        }
    }

    struct CountingGenerator {
        calls: AtomicU32,
        fail: bool,
    }

    #[async_trait]
    impl QuestionGenerator for CountingGenerator {
        async fn generate(
            &self,
            request: &GenerationRequest,
        ) -> Result<Vec<Question>, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(GenerationError::EmptyResponse);
            }
            assert_eq!(request.count, 10);
            assert_eq!(request.difficulty, Difficulty::Medium);
            assert_eq!(request.language, "English");
            Ok((0..request.count).map(|i| question(&format!("Q{i}"))).collect())
        }
    }

    fn generator(fail: bool) -> (AutoGenerator, Arc<PendingQuizMailbox>, Arc<CountingGenerator>) {
        let source = Arc::new(CountingGenerator {
            calls: AtomicU32::new(0),
            fail,
        });
        let mailbox = Arc::new(PendingQuizMailbox::new());
        let auto = AutoGenerator::new(
            source.clone(),
            Arc::clone(&mailbox),
            Duration::from_secs(300),
            fixed_clock(),
        )
        .with_retry(RetryPolicy::no_delay(3));
        (auto, mailbox, source)
    }

    #[test]
    fn mailbox_keeps_only_latest() {
        let mailbox = PendingQuizMailbox::new();
        assert!(mailbox.publish(pending("Cats")).is_none());
        let replaced = mailbox.publish(pending("Dogs")).unwrap();
        assert_eq!(replaced.topic, "Cats");
        assert_eq!(mailbox.pending_topic().as_deref(), Some("Dogs"));
        assert_eq!(mailbox.drop_count(), 2);
    }

    #[test]
    fn active_session_requires_confirmation() {
        let mailbox = PendingQuizMailbox::new();
        assert_eq!(mailbox.claim(false, false), PendingStart::Nothing);

        mailbox.publish(pending("Cats"));
        assert_eq!(
            mailbox.claim(true, false),
            PendingStart::NeedsConfirmation {
                topic: "Cats".into()
            }
        );
        assert!(!mailbox.is_empty());

        match mailbox.claim(true, true) {
            PendingStart::Ready(quiz) => assert_eq!(quiz.topic, "Cats"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(mailbox.is_empty());
    }

    #[test]
    fn idle_player_gets_quiz_without_confirmation() {
        let mailbox = PendingQuizMailbox::new();
        mailbox.publish(pending("Cats"));
        assert!(matches!(mailbox.claim(false, false), PendingStart::Ready(_)));
    }

    #[test]
    fn countdown_rounds_up_and_floors_at_zero() {
        let mailbox = PendingQuizMailbox::new();
        assert_eq!(mailbox.seconds_until_next_drop(fixed_now()), None);

        mailbox.schedule_next_drop(fixed_now() + ChronoDuration::milliseconds(299_500));
        assert_eq!(mailbox.seconds_until_next_drop(fixed_now()), Some(300));
        assert_eq!(
            mailbox.seconds_until_next_drop(fixed_now() + ChronoDuration::seconds(400)),
            Some(0)
        );
    }

    #[test]
    fn pending_quiz_plays_as_classic() {
        let settings = pending("Cats").settings();
        assert_eq!(settings.mode, quiz_core::model::GameMode::Classic);
        assert_eq!(settings.count, 2);
        assert_eq!(settings.difficulty, Difficulty::Medium);
    }

    #[tokio::test]
    async fn drop_once_publishes_ten_questions() {
        let (auto, mailbox, source) = generator(false);
        auto.drop_once().await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        match mailbox.claim(false, false) {
            PendingStart::Ready(quiz) => {
                assert_eq!(quiz.questions.len(), 10);
                assert!(quiz_core::model::catalog::all_topics().contains(&quiz.topic.as_str()));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn failed_drop_leaves_mailbox_alone() {
        let (auto, mailbox, source) = generator(true);
        mailbox.publish(pending("Earlier"));
        assert!(auto.drop_topic("Cats").await.is_err());
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
        assert_eq!(mailbox.pending_topic().as_deref(), Some("Earlier"));
    }

    #[tokio::test(start_paused = true)]
    async fn run_drops_once_per_interval() {
        let (auto, mailbox, source) = generator(false);
        let handle = auto.spawn();

        tokio::time::sleep(Duration::from_secs(299)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
        assert!(mailbox.seconds_until_next_drop(fixed_now()).is_some());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(mailbox.drop_count(), 1);

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        handle.abort();
    }
}
