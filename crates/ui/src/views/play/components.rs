use dioxus::prelude::*;
use quiz_core::model::{Difficulty, DifficultyRating, GameMode, PlayerProgress};

use crate::vm::{FeedbackFormVm, OptionVm, ResultVm, StartFormVm, format_countdown};

#[component]
pub(super) fn PendingBanner(
    pending_topic: Option<String>,
    next_drop_secs: Option<u64>,
    on_play: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: "pending-banner",
            if let Some(topic) = pending_topic {
                span { class: "pending-banner__ready", "New quiz ready: {topic}" }
                button {
                    class: "btn btn-primary",
                    id: "pending-play",
                    r#type: "button",
                    onclick: move |_| on_play.call(()),
                    "Play now"
                }
            } else if let Some(secs) = next_drop_secs {
                span { class: "pending-banner__countdown",
                    "Next surprise quiz in {format_countdown(secs)}"
                }
            }
        }
    }
}

#[component]
pub(super) fn ConfirmPending(topic: String, on_confirm: EventHandler<bool>) -> Element {
    rsx! {
        div { class: "confirm", role: "dialog", aria_modal: "true",
            p { "Abandon the current quiz and play \"{topic}\"?" }
            div { class: "confirm__actions",
                button {
                    class: "btn btn-primary",
                    id: "confirm-pending",
                    r#type: "button",
                    onclick: move |_| on_confirm.call(true),
                    "Play new quiz"
                }
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| on_confirm.call(false),
                    "Keep playing"
                }
            }
        }
    }
}

#[component]
pub(super) fn StartPanel(
    form: StartFormVm,
    /// `None` until stored progress has been read.
    progress: Option<PlayerProgress>,
    generation_enabled: bool,
    on_change: EventHandler<StartFormVm>,
    on_random_topic: EventHandler<()>,
    on_start: EventHandler<()>,
) -> Element {
    let hint = progress.map(|p| form.difficulty_hint(p.level));
    let can_start = generation_enabled && progress.is_some() && form.can_start();
    let is_campaign = form.mode == GameMode::Campaign;

    let form_topic = form.clone();
    let form_mode = form.clone();
    let form_difficulty = form.clone();
    let form_count = form.clone();
    let form_language = form.clone();
    let form_voice = form.clone();

    rsx! {
        section { class: "start-panel",
            div { class: "start-panel__stats",
                if let Some(progress) = progress {
                    span { "Level {progress.level}" }
                    span { "{progress.points} pts" }
                } else {
                    span { class: "start-panel__loading", "Loading progress..." }
                }
            }
            if !generation_enabled {
                p { class: "start-panel__warning",
                    "Quiz generation is not configured. Set QUIZ_GEMINI_API_KEY and restart."
                }
            }
            label { r#for: "start-topic", "Topic" }
            div { class: "start-panel__topic",
                input {
                    id: "start-topic",
                    r#type: "text",
                    placeholder: "e.g. Volcanoes",
                    value: "{form.topic}",
                    oninput: move |evt| {
                        let mut next = form_topic.clone();
                        next.topic = evt.value();
                        on_change.call(next);
                    },
                }
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| on_random_topic.call(()),
                    "Surprise me"
                }
            }
            label { r#for: "start-mode", "Mode" }
            select {
                id: "start-mode",
                value: "{form.mode.as_str()}",
                onchange: move |evt| {
                    let mut next = form_mode.clone();
                    next.set_mode(&evt.value());
                    on_change.call(next);
                },
                for mode in [GameMode::Classic, GameMode::Campaign] {
                    option { value: "{mode.as_str()}", "{mode.label()}" }
                }
            }
            if !is_campaign {
                label { r#for: "start-difficulty", "Difficulty" }
                select {
                    id: "start-difficulty",
                    value: "{form.difficulty}",
                    onchange: move |evt| {
                        let mut next = form_difficulty.clone();
                        next.set_difficulty(&evt.value());
                        on_change.call(next);
                    },
                    for difficulty in Difficulty::ALL {
                        option { value: "{difficulty}", "{difficulty}" }
                    }
                }
                label { r#for: "start-count", "Questions" }
                select {
                    id: "start-count",
                    value: "{form.count}",
                    onchange: move |evt| {
                        let mut next = form_count.clone();
                        next.set_count(&evt.value());
                        on_change.call(next);
                    },
                    for count in StartFormVm::count_options() {
                        option { value: "{count}", "{count}" }
                    }
                }
            }
            label { r#for: "start-language", "Language" }
            select {
                id: "start-language",
                value: "{form.language}",
                onchange: move |evt| {
                    let mut next = form_language.clone();
                    next.language = evt.value();
                    on_change.call(next);
                },
                for language in StartFormVm::language_options() {
                    option { value: "{language}", "{language}" }
                }
            }
            label { r#for: "start-voice", "Voice" }
            select {
                id: "start-voice",
                value: "{form.voice}",
                onchange: move |evt| {
                    let mut next = form_voice.clone();
                    next.voice = evt.value();
                    on_change.call(next);
                },
                for (id, label) in StartFormVm::voice_options() {
                    option { value: "{id}", "{label}" }
                }
            }
            if let Some(hint) = hint {
                p { class: "start-panel__hint", "{hint}" }
            }
            button {
                class: "btn btn-primary start-panel__go",
                id: "start-quiz",
                r#type: "button",
                disabled: !can_start,
                onclick: move |_| on_start.call(()),
                "Start Quiz"
            }
        }
    }
}

#[component]
pub(super) fn QuestionPanel(
    question: String,
    options: Vec<OptionVm>,
    resolved: bool,
    explanation: Option<String>,
    correct_answer: Option<String>,
    progress_label: String,
    score_label: String,
    points_label: String,
    streak_label: Option<String>,
    on_answer: EventHandler<String>,
    on_skip: EventHandler<()>,
    on_next: EventHandler<()>,
    on_speak: EventHandler<()>,
) -> Element {
    rsx! {
        section { class: "quiz",
            header { class: "quiz__header",
                span { "{progress_label}" }
                span { "{score_label}" }
                span { "{points_label}" }
                if let Some(streak) = streak_label {
                    span { class: "quiz__streak", "{streak}" }
                }
            }
            h3 { class: "quiz__question", "{question}" }
            div { class: "quiz__options",
                for option in options {
                    OptionButton { option, disabled: resolved, on_answer }
                }
            }
            if resolved {
                div { class: "quiz__explanation",
                    if let Some(answer) = correct_answer {
                        p { class: "quiz__answer", "Answer: {answer}" }
                    }
                    if let Some(text) = explanation {
                        p { "{text}" }
                    }
                }
            }
            footer { class: "quiz__actions",
                button {
                    class: "btn btn-ghost",
                    r#type: "button",
                    onclick: move |_| on_speak.call(()),
                    "🔊 Read aloud"
                }
                if resolved {
                    button {
                        class: "btn btn-primary",
                        id: "quiz-next",
                        r#type: "button",
                        onclick: move |_| on_next.call(()),
                        "Next"
                    }
                } else {
                    button {
                        class: "btn btn-secondary",
                        id: "quiz-skip",
                        r#type: "button",
                        onclick: move |_| on_skip.call(()),
                        "Skip"
                    }
                }
            }
        }
    }
}

#[component]
pub(super) fn SavingPanel(topic: String, score_label: String, points_label: String) -> Element {
    rsx! {
        section { class: "quiz quiz--saving",
            header { class: "quiz__header",
                span { "{topic}" }
                span { "{score_label}" }
                span { "{points_label}" }
            }
            div { class: "loading",
                div { class: "loading__spinner" }
                p { "Saving your results..." }
            }
        }
    }
}

#[component]
fn OptionButton(option: OptionVm, disabled: bool, on_answer: EventHandler<String>) -> Element {
    let label = option.label.clone();
    rsx! {
        button {
            class: "{option.state.class()}",
            r#type: "button",
            disabled,
            onclick: move |_| on_answer.call(label.clone()),
            "{option.label}"
        }
    }
}

#[component]
pub(super) fn ResultPanel(
    result: ResultVm,
    feedback: FeedbackFormVm,
    feedback_error: Option<String>,
    on_feedback_change: EventHandler<FeedbackFormVm>,
    on_feedback_submit: EventHandler<()>,
    on_play_again: EventHandler<()>,
) -> Element {
    rsx! {
        section { class: "result",
            div { class: "result__emoji", "{result.emoji}" }
            h3 { class: "result__headline", "{result.headline}" }
            p { class: "result__score", "{result.score} / {result.total} ({result.percentage}%)" }
            p { class: "result__points", "+{result.points} pts" }
            if let Some(label) = result.level_up_label.clone() {
                p { class: "result__level-up", "{label}" }
            }
            ol { class: "result__history",
                for row in result.rows.clone() {
                    li {
                        class: if row.is_correct { "result__row result__row--correct" } else { "result__row result__row--wrong" },
                        p { class: "result__question", "{row.question}" }
                        p { "Your answer: {row.chosen} · Correct: {row.correct_answer} · +{row.points}" }
                    }
                }
            }
            FeedbackForm {
                form: feedback,
                error: feedback_error,
                on_change: on_feedback_change,
                on_submit: on_feedback_submit,
            }
            button {
                class: "btn btn-primary",
                id: "play-again",
                r#type: "button",
                onclick: move |_| on_play_again.call(()),
                "Play Again"
            }
        }
    }
}

#[component]
fn FeedbackForm(
    form: FeedbackFormVm,
    error: Option<String>,
    on_change: EventHandler<FeedbackFormVm>,
    on_submit: EventHandler<()>,
) -> Element {
    if form.submitted {
        return rsx! {
            p { class: "feedback feedback--done", "Thanks for the feedback!" }
        };
    }
    let can_submit = form.can_submit();
    let form_comment = form.clone();

    rsx! {
        div { class: "feedback",
            h4 { "How was this quiz?" }
            div { class: "feedback__stars",
                for star in 1..=5u8 {
                    StarButton { star, selected: star <= form.star_rating, form: form.clone(), on_change }
                }
            }
            div { class: "feedback__ratings",
                for rating in DifficultyRating::ALL {
                    RatingButton { rating, selected: form.difficulty_rating == Some(rating), form: form.clone(), on_change }
                }
            }
            textarea {
                class: "feedback__comment",
                placeholder: "Anything else?",
                value: "{form.comment}",
                oninput: move |evt| {
                    let mut next = form_comment.clone();
                    next.comment = evt.value();
                    on_change.call(next);
                },
            }
            if let Some(message) = error {
                p { class: "feedback__error", "{message}" }
            }
            button {
                class: "btn btn-secondary",
                r#type: "button",
                disabled: !can_submit,
                onclick: move |_| on_submit.call(()),
                "Send feedback"
            }
        }
    }
}

#[component]
fn StarButton(
    star: u8,
    selected: bool,
    form: FeedbackFormVm,
    on_change: EventHandler<FeedbackFormVm>,
) -> Element {
    rsx! {
        button {
            class: if selected { "star star--on" } else { "star" },
            r#type: "button",
            aria_label: "{star} stars",
            onclick: move |_| {
                let mut next = form.clone();
                next.star_rating = star;
                on_change.call(next);
            },
            "★"
        }
    }
}

#[component]
fn RatingButton(
    rating: DifficultyRating,
    selected: bool,
    form: FeedbackFormVm,
    on_change: EventHandler<FeedbackFormVm>,
) -> Element {
    rsx! {
        button {
            class: if selected { "chip chip--on" } else { "chip" },
            r#type: "button",
            onclick: move |_| {
                let mut next = form.clone();
                next.difficulty_rating = Some(rating);
                on_change.call(next);
            },
            "{rating.as_str()}"
        }
    }
}
