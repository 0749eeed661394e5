use std::sync::Arc;

use async_trait::async_trait;
use quiz_core::model::{
    Difficulty, DifficultyRating, FeedbackDraft, GameMode, PlayerProgress, QuizRecord, RecordId,
};
use quiz_core::time::fixed_now;
use services::{AccountAuth, AccountSession, AuthError, PendingQuiz};
use storage::repository::{
    ProgressRepository, QuizRecordRepository, QuizRecordRow, Storage, StorageError,
};

use super::test_harness::{
    ViewKind, setup_view_harness, setup_view_harness_with, setup_view_harness_with_auth,
};

fn record(topic: &str) -> QuizRecord {
    QuizRecord::from_persisted(
        topic.to_string(),
        GameMode::Classic,
        Difficulty::Medium,
        3,
        5,
        420,
        false,
        None,
        fixed_now(),
    )
    .unwrap()
}

#[tokio::test(flavor = "current_thread")]
async fn play_view_smoke_renders_start_form() {
    let mut harness = setup_view_harness(ViewKind::Play, Storage::in_memory());
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Start Quiz"), "missing start button in {html}");
    assert!(html.contains("Level 1"), "missing level in {html}");
    assert!(html.contains("Career Mode"), "missing mode option in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn play_view_smoke_shows_stored_progress() {
    let storage = Storage::in_memory();
    storage.progress.save_level(40).await.unwrap();
    storage.progress.save_points(5_000).await.unwrap();
    let mut harness = setup_view_harness(ViewKind::Play, storage);
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Level 40"), "missing stored level in {html}");
    assert!(html.contains("5000 pts"), "missing stored points in {html}");
    assert!(!html.contains("Loading progress..."), "progress never loaded in {html}");
}

struct UnreadableProgress;

#[async_trait]
impl ProgressRepository for UnreadableProgress {
    async fn get_progress(&self) -> Result<PlayerProgress, StorageError> {
        Err(StorageError::Connection("locked".to_string()))
    }

    async fn save_level(&self, _level: u32) -> Result<(), StorageError> {
        Err(StorageError::Connection("locked".to_string()))
    }

    async fn save_points(&self, _points: u64) -> Result<(), StorageError> {
        Err(StorageError::Connection("locked".to_string()))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn play_view_smoke_reports_unreadable_progress() {
    let mut storage = Storage::in_memory();
    storage.progress = Arc::new(UnreadableProgress);
    let mut harness = setup_view_harness(ViewKind::Play, storage);
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(
        html.contains("Could not load your progress."),
        "missing progress error in {html}"
    );
    assert!(html.contains("progress-retry"), "missing retry in {html}");
    assert!(!html.contains("Level 1"), "default progress shown in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn play_view_smoke_warns_without_api_key() {
    let mut harness = setup_view_harness_with(ViewKind::Play, Storage::in_memory(), false);
    harness.rebuild();
    let html = harness.render();
    assert!(
        html.contains("QUIZ_GEMINI_API_KEY"),
        "missing configuration hint in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn play_view_smoke_announces_pending_drop() {
    let mut harness = setup_view_harness(ViewKind::Play, Storage::in_memory());
    let _ = harness.services.mailbox().publish(PendingQuiz {
        topic: "Glaciers".into(),
        questions: Vec::new(),
        generated_at: fixed_now(),
    });
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("New quiz ready: Glaciers"), "missing banner in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn history_view_smoke_lists_records() {
    let storage = Storage::in_memory();
    storage
        .records
        .append_record(&record("Deep Sea Creatures"))
        .await
        .expect("append record");

    let mut harness = setup_view_harness(ViewKind::History, storage);
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Deep Sea Creatures"), "missing topic in {html}");
    assert!(html.contains("Score: 3/5"), "missing score in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn history_view_smoke_lists_feedback() {
    let storage = Storage::in_memory();
    let feedback = FeedbackDraft {
        topic: "Lighthouses".into(),
        score: 4,
        total: 5,
        difficulty_rating: DifficultyRating::TooEasy,
        star_rating: 5,
        comment: "More about fog signals".into(),
    }
    .validate(fixed_now())
    .unwrap();
    storage.feedback.append_feedback(&feedback).await.unwrap();

    let mut harness = setup_view_harness(ViewKind::History, storage);
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Your feedback"), "missing feedback heading in {html}");
    assert!(html.contains("★★★★★ · Too Easy"), "missing rating in {html}");
    assert!(html.contains("More about fog signals"), "missing comment in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn history_view_smoke_renders_empty_state() {
    let mut harness = setup_view_harness(ViewKind::History, Storage::in_memory());
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("No quizzes played yet."), "missing empty state in {html}");
}

struct FailingRecords;

#[async_trait]
impl QuizRecordRepository for FailingRecords {
    async fn append_record(&self, _record: &QuizRecord) -> Result<RecordId, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn get_record(&self, _id: RecordId) -> Result<QuizRecord, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn list_recent(&self, _limit: u32) -> Result<Vec<QuizRecordRow>, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn history_view_smoke_renders_error_state() {
    let mut storage = Storage::in_memory();
    storage.records = Arc::new(FailingRecords);
    let mut harness = setup_view_harness(ViewKind::History, storage);
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Something went wrong"), "missing error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
}

struct AcceptingAuth;

#[async_trait]
impl AccountAuth for AcceptingAuth {
    async fn sign_up(&self, email: &str, _password: &str) -> Result<AccountSession, AuthError> {
        Ok(AccountSession {
            uid: "new-uid".parse().unwrap(),
            email: Some(email.to_string()),
            id_token: Some("jwt".into()),
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AccountSession, AuthError> {
        self.sign_up(email, password).await
    }
}

#[tokio::test(flavor = "current_thread")]
async fn account_view_smoke_explains_missing_configuration() {
    let mut harness = setup_view_harness(ViewKind::Account, Storage::in_memory());
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Playing as a guest"), "missing guest status in {html}");
    assert!(html.contains("QUIZ_AUTH_API_KEY"), "missing configuration hint in {html}");
    assert!(html.contains("Create account"), "missing sign-up button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn account_view_smoke_shows_signed_in_account() {
    let mut harness =
        setup_view_harness_with_auth(ViewKind::Account, Storage::in_memory(), Arc::new(AcceptingAuth));
    harness
        .services
        .accounts()
        .sign_in("ada@lovelace.dev", "secret1")
        .await
        .unwrap();
    harness.rebuild();
    let html = harness.render();
    assert!(
        html.contains("Signed in as ada@lovelace.dev"),
        "missing account in {html}"
    );
    assert!(html.contains("Sign out"), "missing sign-out in {html}");
    assert!(!html.contains("QUIZ_AUTH_API_KEY"), "unexpected hint in {html}");
}
