use std::sync::Arc;

use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use quiz_core::model::Question;
use quiz_core::time::fixed_clock;
use services::error::SpeechError;
use services::{
    AccountAuth, AccountService, AppServices, Clock, Collaborators, FeedbackService, FirebaseAuth,
    GenerationError, GenerationRequest, PendingQuizMailbox, ProgressService, QuestionGenerator,
    QuizLoopService, ServicesConfig, SpeechService, SpeechSynthesizer,
};
use storage::repository::Storage;

use crate::context::{UiApp, build_app_context};
use crate::views::{AccountView, HistoryView, PlayView};

pub struct StaticGenerator;

#[async_trait]
impl QuestionGenerator for StaticGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<Question>, GenerationError> {
        Ok((0..request.count)
            .map(|i| {
                Question::new(
                    format!("{} #{i}", request.topic),
                    vec!["A".into(), "B".into(), "C".into(), "D".into()],
                    "A",
                    "",
                )
                .expect("valid question")
            })
            .collect())
    }
}

struct MuteSynthesizer;

#[async_trait]
impl SpeechSynthesizer for MuteSynthesizer {
    async fn synthesize(&self, _text: &str, _voice: &str) -> Result<String, SpeechError> {
        Err(SpeechError::Disabled)
    }
}

#[derive(Clone)]
struct TestApp {
    services: AppServices,
}

impl UiApp for TestApp {
    fn clock(&self) -> Clock {
        self.services.clock()
    }

    fn generation_enabled(&self) -> bool {
        self.services.generation_enabled()
    }

    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        self.services.quiz_loop()
    }

    fn progress(&self) -> Arc<ProgressService> {
        self.services.progress()
    }

    fn feedback(&self) -> Arc<FeedbackService> {
        self.services.feedback()
    }

    fn speech(&self) -> Arc<SpeechService> {
        self.services.speech()
    }

    fn mailbox(&self) -> Arc<PendingQuizMailbox> {
        self.services.mailbox()
    }

    fn accounts(&self) -> Arc<AccountService> {
        self.services.accounts()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Play,
    History,
    Account,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Play => rsx! { PlayView {} },
        ViewKind::History => rsx! { HistoryView {} },
        ViewKind::Account => rsx! { AccountView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub services: AppServices,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind, storage: Storage) -> ViewHarness {
    setup_view_harness_with(view, storage, true)
}

pub fn setup_view_harness_with(
    view: ViewKind,
    storage: Storage,
    generation_enabled: bool,
) -> ViewHarness {
    setup_view_harness_full(view, storage, generation_enabled, Arc::new(FirebaseAuth::new(None)))
}

pub fn setup_view_harness_with_auth(
    view: ViewKind,
    storage: Storage,
    auth: Arc<dyn AccountAuth>,
) -> ViewHarness {
    setup_view_harness_full(view, storage, true, auth)
}

fn setup_view_harness_full(
    view: ViewKind,
    storage: Storage,
    generation_enabled: bool,
    auth: Arc<dyn AccountAuth>,
) -> ViewHarness {
    let services = AppServices::assemble(
        storage,
        fixed_clock(),
        &ServicesConfig::offline(),
        Collaborators {
            generator: Arc::new(StaticGenerator),
            synthesizer: Arc::new(MuteSynthesizer),
            remote: None,
            auth,
            accounts: Arc::default(),
        },
        generation_enabled,
    );
    let app = Arc::new(TestApp {
        services: services.clone(),
    });

    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });

    ViewHarness { dom, services }
}
