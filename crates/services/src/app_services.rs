use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::auth::{AccountAuth, AccountService, AccountSession, AccountSlot, FirebaseAuth};
use crate::config::ServicesConfig;
use crate::error::AppServicesError;
use crate::feedback_service::FeedbackService;
use crate::gemini::GeminiClient;
use crate::generation::{GeminiQuestionGenerator, QuestionGenerator};
use crate::identity::PlayerIdentity;
use crate::pending::{AutoGenerator, PendingQuizMailbox};
use crate::progress_service::ProgressService;
use crate::quiz_loop::QuizLoopService;
use crate::remote::{FirebaseProgressStore, RemoteProgressStore};
use crate::speech::{GeminiSpeechSynthesizer, SpeechCache, SpeechService, SpeechSynthesizer};

/// Outbound collaborators; swapped for fakes in tests.
#[derive(Clone)]
pub struct Collaborators {
    pub generator: Arc<dyn QuestionGenerator>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub remote: Option<Arc<dyn RemoteProgressStore>>,
    pub auth: Arc<dyn AccountAuth>,
    /// Signed-in account shared by identity and the remote store.
    pub accounts: Arc<AccountSlot>,
}

/// Assembles app-facing services from storage and configuration.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    generation_enabled: bool,
    identity: PlayerIdentity,
    accounts: Arc<AccountService>,
    quiz_loop: Arc<QuizLoopService>,
    progress: Arc<ProgressService>,
    feedback: Arc<FeedbackService>,
    speech: Arc<SpeechService>,
    auto_generator: AutoGenerator,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or player id setup fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        config: ServicesConfig,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let services = Self::from_storage(storage, clock, config);
        let player = services.identity.resolve().await?;
        tracing::debug!(%player, signed_in = services.identity.is_signed_in(), "player resolved");
        Ok(services)
    }

    /// Build services over an existing storage backend.
    #[must_use]
    pub fn from_storage(storage: Storage, clock: Clock, config: ServicesConfig) -> Self {
        let gemini = GeminiClient::new(config.gemini.clone());
        let generation_enabled = gemini.enabled();
        if !generation_enabled {
            tracing::warn!("QUIZ_GEMINI_API_KEY is not set; quiz generation is disabled");
        }
        let generator: Arc<dyn QuestionGenerator> =
            Arc::new(GeminiQuestionGenerator::new(gemini.clone()));
        let synthesizer: Arc<dyn SpeechSynthesizer> =
            Arc::new(GeminiSpeechSynthesizer::new(gemini));

        let auth = FirebaseAuth::new(config.auth.clone());
        if !auth.enabled() {
            tracing::info!("QUIZ_AUTH_API_KEY is not set; account sign-in is disabled");
        }
        let accounts = Arc::new(AccountSlot::default());
        let remote: Option<Arc<dyn RemoteProgressStore>> = config.remote.clone().map(|c| {
            Arc::new(FirebaseProgressStore::new(c).with_accounts(Arc::clone(&accounts)))
                as Arc<dyn RemoteProgressStore>
        });

        Self::assemble(
            storage,
            clock,
            &config,
            Collaborators {
                generator,
                synthesizer,
                remote,
                auth: Arc::new(auth),
                accounts,
            },
            generation_enabled,
        )
    }

    /// Wire services around the given collaborators.
    ///
    /// A configured account uid seeds an empty account slot.
    #[must_use]
    pub fn assemble(
        storage: Storage,
        clock: Clock,
        config: &ServicesConfig,
        collaborators: Collaborators,
        generation_enabled: bool,
    ) -> Self {
        let Collaborators {
            generator,
            synthesizer,
            remote,
            auth,
            accounts,
        } = collaborators;
        if let (None, Some(uid)) = (accounts.current(), &config.account_uid) {
            accounts.set(AccountSession::from_uid(uid.clone()));
        }
        let identity =
            PlayerIdentity::with_accounts(Arc::clone(&storage.identity), Arc::clone(&accounts));
        let account_service = Arc::new(AccountService::new(auth, accounts));
        let progress = ProgressService::new(
            Arc::clone(&storage.progress),
            identity.clone(),
            remote.clone(),
        );
        let feedback = Arc::new(FeedbackService::new(
            clock,
            Arc::clone(&storage.feedback),
            identity.clone(),
            remote,
        ));
        let mailbox = Arc::new(PendingQuizMailbox::new());
        let quiz_loop = Arc::new(QuizLoopService::new(
            clock,
            Arc::clone(&generator),
            progress.clone(),
            Arc::clone(&storage.records),
            Arc::clone(&mailbox),
        ));
        let speech = Arc::new(SpeechService::new(
            synthesizer,
            Arc::new(SpeechCache::default()),
        ));
        let auto_generator =
            AutoGenerator::new(generator, mailbox, config.auto_gen_interval, clock);

        Self {
            clock,
            generation_enabled,
            identity,
            accounts: account_service,
            quiz_loop,
            progress: Arc::new(progress),
            feedback,
            speech,
            auto_generator,
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn generation_enabled(&self) -> bool {
        self.generation_enabled
    }

    #[must_use]
    pub fn identity(&self) -> &PlayerIdentity {
        &self.identity
    }

    #[must_use]
    pub fn accounts(&self) -> Arc<AccountService> {
        Arc::clone(&self.accounts)
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
        self.quiz_loop.mailbox()
    }

    /// Background generator feeding this app's mailbox; not started.
    #[must_use]
    pub fn auto_generator(&self) -> AutoGenerator {
        self.auto_generator.clone()
    }
}
