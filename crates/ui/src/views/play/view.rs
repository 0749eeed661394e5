use std::time::Duration;

use dioxus::document::eval;
use dioxus::prelude::*;
use quiz_core::model::PlayerProgress;
use quiz_core::model::catalog::random_topic;
use services::PendingStart;

use super::components::{
    ConfirmPending, PendingBanner, QuestionPanel, ResultPanel, SavingPanel, StartPanel,
};
use super::scripts::{pcm_playback_script, stop_playback_script};
use crate::context::AppContext;
use crate::views::ViewError;
use crate::vm::{
    FeedbackFormVm, PlayOutcome, QuizVm, ResultVm, StartFormVm, save_finished, start_pending_quiz,
    start_quiz,
};

#[derive(Clone, Debug, PartialEq)]
enum Phase {
    Start,
    Loading { topic: String },
    Playing,
    /// The last question is answered and the result is being stored.
    Saving,
    Result,
    Error(ViewError),
}

/// Invalidate whatever async work the previous quiz still has in flight.
fn next_epoch(mut epoch: Signal<u64>) -> u64 {
    let mut current = epoch.write();
    *current += 1;
    *current
}

#[component]
pub fn PlayView() -> Element {
    let ctx = use_context::<AppContext>();
    let generation_enabled = ctx.generation_enabled();

    let mut phase = use_signal(|| Phase::Start);
    let epoch = use_signal(|| 0_u64);
    let mut form = use_signal(StartFormVm::default);
    let progress = use_signal(|| None::<PlayerProgress>);
    let progress_error = use_signal(|| None::<ViewError>);
    let vm = use_signal(|| None::<QuizVm>);
    let action_error = use_signal(|| None::<ViewError>);
    let mut result = use_signal(|| None::<ResultVm>);
    let mut feedback_form = use_signal(FeedbackFormVm::default);
    let feedback_error = use_signal(|| None::<String>);
    let mut pending_topic = use_signal(|| None::<String>);
    let next_drop_secs = use_signal(|| None::<u64>);
    let mut confirm_topic = use_signal(|| None::<String>);
    let speech_error = use_signal(|| None::<String>);

    let progress_service = ctx.progress();
    let progress_loader = use_resource(move || {
        let progress_service = progress_service.clone();
        let mut progress = progress;
        let mut progress_error = progress_error;
        async move {
            match progress_service.load().await {
                Ok(loaded) => {
                    progress_error.set(None);
                    progress.set(Some(loaded));
                }
                Err(_) => {
                    progress.set(None);
                    progress_error.set(Some(ViewError::ProgressUnavailable));
                }
            }
        }
    });

    let mailbox = ctx.mailbox();
    let clock = ctx.clock();
    use_future(move || {
        let mailbox = mailbox.clone();
        let mut pending_topic = pending_topic;
        let mut next_drop_secs = next_drop_secs;
        async move {
            loop {
                let topic = mailbox.pending_topic();
                if *pending_topic.peek() != topic {
                    pending_topic.set(topic);
                }
                let secs = mailbox.seconds_until_next_drop(clock.now());
                if *next_drop_secs.peek() != secs {
                    next_drop_secs.set(secs);
                }
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        }
    });

    let quiz_loop = ctx.quiz_loop();
    let on_start = {
        let quiz_loop = quiz_loop.clone();
        use_callback(move |()| {
            let Some(current) = *progress.peek() else {
                return;
            };
            let quiz_loop = quiz_loop.clone();
            let mut vm = vm;
            let mut phase = phase;
            let settings = form.peek().to_settings(current.level);
            let ticket = next_epoch(epoch);
            phase.set(Phase::Loading {
                topic: settings.topic.clone(),
            });
            spawn(async move {
                let started = start_quiz(&quiz_loop, settings).await;
                if *epoch.peek() != ticket {
                    return;
                }
                match started {
                    Ok(started) => {
                        vm.set(Some(started));
                        phase.set(Phase::Playing);
                    }
                    Err(err) => phase.set(Phase::Error(err)),
                }
            });
        })
    };

    let begin_pending = {
        let quiz_loop = quiz_loop.clone();
        let mailbox = ctx.mailbox();
        use_callback(move |confirmed: bool| {
            let mut vm = vm;
            let mut action_error = action_error;
            let session_active = *phase.peek() == Phase::Playing;
            match mailbox.claim(session_active, confirmed) {
                PendingStart::Ready(pending) => {
                    confirm_topic.set(None);
                    pending_topic.set(None);
                    next_epoch(epoch);
                    match start_pending_quiz(&quiz_loop, pending) {
                        Ok(started) => {
                            result.set(None);
                            action_error.set(None);
                            vm.set(Some(started));
                            phase.set(Phase::Playing);
                        }
                        Err(err) => phase.set(Phase::Error(err)),
                    }
                }
                PendingStart::NeedsConfirmation { topic } => confirm_topic.set(Some(topic)),
                PendingStart::Nothing => pending_topic.set(None),
            }
        })
    };

    let on_answer = {
        let quiz_loop = quiz_loop.clone();
        use_callback(move |option: String| {
            let mut vm = vm;
            let mut action_error = action_error;
            let answered = vm
                .write()
                .as_mut()
                .map(|current| current.answer(&quiz_loop, &option));
            if let Some(outcome) = answered {
                action_error.set(outcome.err());
            }
        })
    };

    let on_skip = {
        let quiz_loop = quiz_loop.clone();
        use_callback(move |()| {
            let mut vm = vm;
            let mut action_error = action_error;
            let skipped = vm.write().as_mut().map(|current| current.skip(&quiz_loop));
            if let Some(outcome) = skipped {
                action_error.set(outcome.err());
            }
        })
    };

    let on_next = {
        let quiz_loop = quiz_loop.clone();
        use_callback(move |()| {
            let mut vm = vm;
            let mut phase = phase;
            let mut action_error = action_error;
            if *phase.peek() != Phase::Playing {
                return;
            }
            let advanced = vm.write().as_mut().map(|current| current.advance(&quiz_loop));
            let finished = match advanced {
                None => return,
                Some(Err(err)) => {
                    action_error.set(Some(err));
                    return;
                }
                Some(Ok(PlayOutcome::Continue)) => {
                    action_error.set(None);
                    return;
                }
                Some(Ok(PlayOutcome::Finished(finished))) => finished,
            };
            action_error.set(None);
            let Some(quiz) = vm.peek().as_ref().map(|current| current.quiz().clone()) else {
                return;
            };

            let quiz_loop = quiz_loop.clone();
            let ticket = *epoch.peek();
            let mut progress = progress;
            let mut progress_loader = progress_loader;
            let mut result = result;
            let mut feedback_form = feedback_form;
            let mut feedback_error = feedback_error;
            phase.set(Phase::Saving);
            spawn(async move {
                let saved = save_finished(&quiz_loop, &quiz, finished).await;
                match saved.completion.progress {
                    Some(stored) => progress.set(Some(stored)),
                    None => progress_loader.restart(),
                }
                if *epoch.peek() != ticket || *phase.peek() != Phase::Saving {
                    return;
                }
                result.set(Some(ResultVm::new(quiz.topic(), quiz.mode(), &saved.result)));
                feedback_form.set(FeedbackFormVm::default());
                feedback_error.set(None);
                vm.set(None);
                phase.set(Phase::Result);
            });
        })
    };

    let speech = ctx.speech();
    let on_speak = use_callback(move |()| {
        let speech = speech.clone();
        let text = vm.peek().as_ref().and_then(QuizVm::speech_text);
        let voice = form.peek().voice.clone();
        let Some(text) = text else {
            return;
        };
        let mut speech_error = speech_error;
        spawn(async move {
            match speech.speak(&text, &voice).await {
                Ok(audio) => {
                    speech_error.set(None);
                    let _ = eval(&pcm_playback_script(&audio));
                }
                Err(err) => speech_error.set(Some(err.to_string())),
            }
        });
    });

    let feedback = ctx.feedback();
    let on_feedback_submit = use_callback(move |()| {
        let feedback = feedback.clone();
        let draft = result
            .peek()
            .as_ref()
            .and_then(|summary| feedback_form.peek().to_draft(summary));
        let Some(draft) = draft else {
            return;
        };
        let mut feedback_form = feedback_form;
        let mut feedback_error = feedback_error;
        spawn(async move {
            match feedback.submit(draft).await {
                Ok(_) => {
                    feedback_error.set(None);
                    feedback_form.write().submitted = true;
                }
                Err(err) => feedback_error.set(Some(err.to_string())),
            }
        });
    });

    let on_back = use_callback(move |()| {
        let mut vm = vm;
        let mut action_error = action_error;
        let _ = eval(stop_playback_script());
        next_epoch(epoch);
        vm.set(None);
        action_error.set(None);
        result.set(None);
        phase.set(Phase::Start);
    });

    let current_phase = phase.read().clone();
    let current_progress = *progress.read();

    rsx! {
        div { class: "page play-page",
            h2 { "Quiz Master" }
            PendingBanner {
                pending_topic: pending_topic.read().clone(),
                next_drop_secs: *next_drop_secs.read(),
                on_play: move |()| begin_pending.call(false),
            }
            if let Some(topic) = confirm_topic.read().clone() {
                ConfirmPending {
                    topic,
                    on_confirm: move |confirmed: bool| {
                        if confirmed {
                            begin_pending.call(true);
                        } else {
                            confirm_topic.set(None);
                        }
                    },
                }
            }
            match current_phase {
                Phase::Start => rsx! {
                    if let Some(err) = *progress_error.read() {
                        div { class: "error",
                            p { "{err.message()}" }
                            button {
                                class: "btn btn-secondary",
                                id: "progress-retry",
                                r#type: "button",
                                onclick: move |_| {
                                    let mut progress_loader = progress_loader;
                                    progress_loader.restart();
                                },
                                "Retry"
                            }
                        }
                    }
                    StartPanel {
                        form: form.read().clone(),
                        progress: current_progress,
                        generation_enabled,
                        on_change: move |next: StartFormVm| form.set(next),
                        on_random_topic: move |()| {
                            let topic = {
                                let mut rng = rand::rng();
                                random_topic(&mut rng)
                            };
                            form.write().topic = topic.to_string();
                        },
                        on_start: move |()| on_start.call(()),
                    }
                },
                Phase::Loading { topic } => rsx! {
                    div { class: "loading",
                        div { class: "loading__spinner" }
                        p { "Generating your quiz on {topic}..." }
                    }
                },
                Phase::Playing => rsx! {
                    if let Some(current) = vm.read().as_ref() {
                        QuestionPanel {
                            question: current.question_text().unwrap_or_default().to_string(),
                            options: current.options(),
                            resolved: current.is_resolved(),
                            explanation: current.current_event().map(|e| e.explanation.clone()),
                            correct_answer: current.current_event().map(|e| e.correct_answer.clone()),
                            progress_label: current.progress_label(),
                            score_label: current.score_label(),
                            points_label: current.points_label(),
                            streak_label: current.streak_label(),
                            on_answer: move |option: String| on_answer.call(option),
                            on_skip: move |()| on_skip.call(()),
                            on_next: move |()| on_next.call(()),
                            on_speak: move |()| on_speak.call(()),
                        }
                    }
                    if let Some(err) = *action_error.read() {
                        p { class: "quiz__action-error", role: "alert", "{err.message()}" }
                    }
                    if let Some(message) = speech_error.read().clone() {
                        p { class: "quiz__speech-error", "{message}" }
                    }
                    button {
                        class: "btn btn-ghost",
                        r#type: "button",
                        onclick: move |_| on_back.call(()),
                        "Quit"
                    }
                },
                Phase::Saving => rsx! {
                    if let Some(current) = vm.read().as_ref() {
                        SavingPanel {
                            topic: current.topic().to_string(),
                            score_label: current.score_label(),
                            points_label: current.points_label(),
                        }
                    }
                    button {
                        class: "btn btn-ghost",
                        r#type: "button",
                        onclick: move |_| on_back.call(()),
                        "Quit"
                    }
                },
                Phase::Result => rsx! {
                    if let Some(summary) = result.read().clone() {
                        ResultPanel {
                            result: summary,
                            feedback: feedback_form.read().clone(),
                            feedback_error: feedback_error.read().clone(),
                            on_feedback_change: move |next: FeedbackFormVm| feedback_form.set(next),
                            on_feedback_submit: move |()| on_feedback_submit.call(()),
                            on_play_again: move |()| on_back.call(()),
                        }
                    }
                },
                Phase::Error(err) => rsx! {
                    div { class: "error",
                        p { "{err.message()}" }
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| on_start.call(()),
                            "Retry"
                        }
                        button {
                            class: "btn btn-ghost",
                            r#type: "button",
                            onclick: move |_| on_back.call(()),
                            "Back"
                        }
                    }
                },
            }
        }
    }
}
