use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use quiz_core::model::{
    Difficulty, Feedback, GameMode, PlayerId, PlayerProgress, Question, QuizSettings,
};
use quiz_core::session::Advance;
use quiz_core::time::fixed_clock;
use services::error::{RemoteStoreError, SpeechError};
use services::{
    AccountAuth, AccountSession, ActiveQuiz, AppServices, AuthError, Collaborators,
    GenerationError, GenerationRequest, QuestionGenerator, QuizLoopService, RemoteProgressStore,
    ServicesConfig, SpeechSynthesizer,
};
use storage::repository::Storage;

struct FixedGenerator;

#[async_trait]
impl QuestionGenerator for FixedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<Question>, GenerationError> {
        Ok((0..request.count)
            .map(|i| {
                Question::new(
                    format!("{} question {i}", request.topic),
                    vec!["right".into(), "wrong 1".into(), "wrong 2".into(), "wrong 3".into()],
                    "right",
                    "Because.",
                )
                .unwrap()
            })
            .collect())
    }
}

struct SilentSynthesizer;

#[async_trait]
impl SpeechSynthesizer for SilentSynthesizer {
    async fn synthesize(&self, _text: &str, _voice: &str) -> Result<String, SpeechError> {
        Ok("AAAA".into())
    }
}

/// Accepts one account, `ada@lovelace.dev` / `secret1`, with uid `ada`.
struct OneAccountAuth;

#[async_trait]
impl AccountAuth for OneAccountAuth {
    async fn sign_up(&self, _email: &str, _password: &str) -> Result<AccountSession, AuthError> {
        Err(AuthError::EmailExists)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AccountSession, AuthError> {
        if email == "ada@lovelace.dev" && password == "secret1" {
            Ok(AccountSession {
                uid: "ada".parse().unwrap(),
                email: Some(email.to_string()),
                id_token: Some("jwt".into()),
            })
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

#[derive(Default)]
struct MemoryRemote {
    levels: Mutex<HashMap<String, u32>>,
    points: Mutex<HashMap<String, u64>>,
}

#[async_trait]
impl RemoteProgressStore for MemoryRemote {
    async fn fetch_level(&self, player: &PlayerId) -> Result<Option<u32>, RemoteStoreError> {
        Ok(self.levels.lock().unwrap().get(player.as_str()).copied())
    }

    async fn fetch_points(&self, player: &PlayerId) -> Result<Option<u64>, RemoteStoreError> {
        Ok(self.points.lock().unwrap().get(player.as_str()).copied())
    }

    async fn put_level(&self, player: &PlayerId, level: u32) -> Result<(), RemoteStoreError> {
        self.levels.lock().unwrap().insert(player.to_string(), level);
        Ok(())
    }

    async fn put_points(&self, player: &PlayerId, points: u64) -> Result<(), RemoteStoreError> {
        self.points.lock().unwrap().insert(player.to_string(), points);
        Ok(())
    }

    async fn push_feedback(&self, _: &PlayerId, _: &Feedback) -> Result<(), RemoteStoreError> {
        Ok(())
    }
}

fn app_with_remote(storage: Storage, remote: Option<Arc<dyn RemoteProgressStore>>) -> AppServices {
    AppServices::assemble(
        storage,
        fixed_clock(),
        &ServicesConfig::offline(),
        Collaborators {
            generator: Arc::new(FixedGenerator),
            synthesizer: Arc::new(SilentSynthesizer),
            remote,
            auth: Arc::new(OneAccountAuth),
            accounts: Arc::default(),
        },
        true,
    )
}

fn app(storage: Storage) -> AppServices {
    app_with_remote(storage, None)
}

async fn play(loop_svc: &QuizLoopService, quiz: &mut ActiveQuiz, correct: usize) -> quiz_core::model::QuizResult {
    let mut answered = 0;
    loop {
        if answered < correct {
            loop_svc.answer(quiz, "right").unwrap();
        } else {
            loop_svc.answer(quiz, "wrong 1").unwrap();
        }
        answered += 1;
        match loop_svc.advance(quiz).unwrap() {
            Advance::Next => {}
            Advance::Finished(result) => return result,
        }
    }
}

#[tokio::test]
async fn campaign_win_levels_up_and_persists() {
    let storage = Storage::in_memory();
    let services = app(storage.clone());
    let loop_svc = services.quiz_loop();
    assert_eq!(services.progress().load().await.unwrap(), PlayerProgress::default());

    let mut quiz = loop_svc
        .start_quiz(QuizSettings::campaign("Astronomy", 1))
        .await
        .unwrap();
    assert_eq!(quiz.mode(), GameMode::Campaign);

    let mut result = play(&loop_svc, &mut quiz, 3).await;
    assert_eq!(result.score, 3);
    assert_eq!(result.total, 5);

    let completion = loop_svc.complete(&quiz, &mut result).await;
    assert!(result.level_up);
    assert_eq!(result.new_level, Some(2));
    let progress = completion.progress.unwrap();
    assert_eq!(progress.level, 2);
    assert_eq!(progress.points, u64::from(result.points));

    let stored = storage.progress.get_progress().await.unwrap();
    assert_eq!(stored, progress);

    let records = loop_svc.recent_records(10).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(Some(records[0].id), completion.record_id);
    assert_eq!(records[0].record.topic(), "Astronomy");
    assert!(records[0].record.level_up());
}

#[tokio::test]
async fn veteran_campaign_keeps_stored_progress() {
    let storage = Storage::in_memory();
    storage.progress.save_level(40).await.unwrap();
    storage.progress.save_points(5_000).await.unwrap();
    let services = app(storage.clone());
    let loop_svc = services.quiz_loop();

    let mut quiz = loop_svc
        .start_quiz(QuizSettings::campaign("Glaciers", 1))
        .await
        .unwrap();
    assert_eq!(quiz.settings.level, Some(40));
    assert_eq!(quiz.settings.effective_difficulty(), Difficulty::Medium);

    let mut result = play(&loop_svc, &mut quiz, 5).await;
    let completion = loop_svc.complete(&quiz, &mut result).await;

    let expected = PlayerProgress {
        level: 41,
        points: 5_000 + u64::from(result.points),
    };
    assert_eq!(completion.progress, Some(expected));
    assert_eq!(storage.progress.get_progress().await.unwrap(), expected);
}

#[tokio::test]
async fn classic_quiz_adds_points_but_keeps_level() {
    let storage = Storage::in_memory();
    storage.progress.save_level(4).await.unwrap();
    storage.progress.save_points(1_000).await.unwrap();
    let services = app(storage.clone());
    let loop_svc = services.quiz_loop();

    let mut quiz = loop_svc
        .start_quiz(QuizSettings::classic("Rivers", Difficulty::Easy, 5))
        .await
        .unwrap();
    let mut result = play(&loop_svc, &mut quiz, 5).await;
    assert_eq!(result.score, 5);

    let completion = loop_svc.complete(&quiz, &mut result).await;
    assert!(!result.level_up);
    assert_eq!(result.new_level, None);
    let progress = completion.progress.unwrap();
    assert_eq!(progress.level, 4);
    assert_eq!(progress.points, 1_000 + u64::from(result.points));
}

#[tokio::test]
async fn campaign_loss_keeps_level() {
    let storage = Storage::in_memory();
    storage.progress.save_level(7).await.unwrap();
    let services = app(storage.clone());
    let loop_svc = services.quiz_loop();

    let mut quiz = loop_svc
        .start_quiz(QuizSettings::campaign("Opera", 1))
        .await
        .unwrap();
    let mut result = play(&loop_svc, &mut quiz, 2).await;

    let completion = loop_svc.complete(&quiz, &mut result).await;
    assert!(!result.level_up);
    assert_eq!(completion.progress.map(|p| p.level), Some(7));
    assert_eq!(storage.progress.get_progress().await.unwrap().level, 7);
}

#[tokio::test]
async fn pending_drop_plays_as_classic() {
    let storage = Storage::in_memory();
    let services = app(storage);
    services
        .auto_generator()
        .with_retry(services::RetryPolicy::no_delay(1))
        .drop_topic("Volcanoes")
        .await
        .unwrap();

    let mailbox = services.mailbox();
    assert_eq!(mailbox.pending_topic().as_deref(), Some("Volcanoes"));

    let services::PendingStart::Ready(pending) = mailbox.claim(false, false) else {
        panic!("expected a ready drop");
    };
    let quiz = services.quiz_loop().start_pending(pending).unwrap();
    assert_eq!(quiz.mode(), GameMode::Classic);
    assert_eq!(quiz.session.total(), 10);
    assert!(mailbox.is_empty());
}

#[tokio::test]
async fn speech_is_cached_per_voice() {
    let services = app(Storage::in_memory());
    let speech = services.speech();
    assert_eq!(speech.speak("Hello", "Kore").await.unwrap(), "AAAA");
    speech.speak("Hello", "Kore").await.unwrap();
    assert_eq!(speech.cache().len(), 1);
}

#[tokio::test]
async fn signing_in_loads_account_progress() {
    let remote = Arc::new(MemoryRemote::default());
    remote.levels.lock().unwrap().insert("ada".into(), 55);
    remote.points.lock().unwrap().insert("ada".into(), 9_000);
    let storage = Storage::in_memory();
    let services = app_with_remote(storage.clone(), Some(remote.clone()));
    let accounts = services.accounts();

    assert_eq!(services.progress().load().await.unwrap(), PlayerProgress::default());
    assert!(matches!(
        accounts.sign_in("ada@lovelace.dev", "wrong-pass").await,
        Err(AuthError::InvalidCredentials)
    ));

    accounts.sign_in("ada@lovelace.dev", "secret1").await.unwrap();
    assert!(services.identity().is_signed_in());
    let progress = services.progress().load().await.unwrap();
    assert_eq!((progress.level, progress.points), (55, 9_000));

    accounts.sign_out();
    let device = services.identity().resolve().await.unwrap();
    assert_ne!(device.as_str(), "ada");
    services.progress().save_points(9_100).await.unwrap();
    services.progress().flush_remote().await;
    assert_eq!(remote.points.lock().unwrap().get(device.as_str()).copied(), Some(9_100));
    assert_eq!(remote.points.lock().unwrap().get("ada").copied(), Some(9_000));
}
