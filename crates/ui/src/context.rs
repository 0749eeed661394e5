use std::sync::Arc;

use services::{
    AccountService, Clock, FeedbackService, PendingQuizMailbox, ProgressService, QuizLoopService,
    SpeechService,
};

pub trait UiApp: Send + Sync {
    fn clock(&self) -> Clock;
    fn generation_enabled(&self) -> bool;

    fn quiz_loop(&self) -> Arc<QuizLoopService>;
    fn progress(&self) -> Arc<ProgressService>;
    fn feedback(&self) -> Arc<FeedbackService>;
    fn speech(&self) -> Arc<SpeechService>;
    fn mailbox(&self) -> Arc<PendingQuizMailbox>;
    fn accounts(&self) -> Arc<AccountService>;
}

#[derive(Clone)]
pub struct AppContext {
    clock: Clock,
    generation_enabled: bool,

    quiz_loop: Arc<QuizLoopService>,
    progress: Arc<ProgressService>,
    feedback: Arc<FeedbackService>,
    speech: Arc<SpeechService>,
    mailbox: Arc<PendingQuizMailbox>,
    accounts: Arc<AccountService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            clock: app.clock(),
            generation_enabled: app.generation_enabled(),
            quiz_loop: app.quiz_loop(),
            progress: app.progress(),
            feedback: app.feedback(),
            speech: app.speech(),
            mailbox: app.mailbox(),
            accounts: app.accounts(),
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// False when no API key is configured; the start form says so.
    #[must_use]
    pub fn generation_enabled(&self) -> bool {
        self.generation_enabled
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn feedback(&self) -> Arc<FeedbackService> {
        Arc::clone(&self.feedback)
    }

    #[must_use]
    pub fn speech(&self) -> Arc<SpeechService> {
        Arc::clone(&self.speech)
    }

    #[must_use]
    pub fn mailbox(&self) -> Arc<PendingQuizMailbox> {
        Arc::clone(&self.mailbox)
    }

    #[must_use]
    pub fn accounts(&self) -> Arc<AccountService> {
        Arc::clone(&self.accounts)
    }
}

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
