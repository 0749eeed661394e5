use dioxus::prelude::*;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{FeedbackRowVm, RecordCardVm, map_feedback_rows, map_record_cards};

const HISTORY_LIMIT: u32 = 20;
const FEEDBACK_LIMIT: u32 = 10;

#[derive(Clone, Debug, PartialEq)]
struct HistoryData {
    cards: Vec<RecordCardVm>,
    feedback: Vec<FeedbackRowVm>,
}

#[component]
pub fn HistoryView() -> Element {
    let ctx = use_context::<AppContext>();
    let quiz_loop = ctx.quiz_loop();
    let feedback = ctx.feedback();

    let resource = use_resource(move || {
        let quiz_loop = quiz_loop.clone();
        let feedback = feedback.clone();
        async move {
            let rows = quiz_loop
                .recent_records(HISTORY_LIMIT)
                .await
                .map_err(|_| ViewError::Unknown)?;
            let entries = feedback
                .recent(FEEDBACK_LIMIT)
                .await
                .map_err(|_| ViewError::Unknown)?;
            Ok(HistoryData {
                cards: map_record_cards(&rows),
                feedback: map_feedback_rows(&entries),
            })
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            h2 { "History" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    if data.cards.is_empty() {
                        p { "No quizzes played yet." }
                    } else {
                        ul { class: "history",
                            for card in data.cards {
                                RecordCard { key: "{card.id}", card }
                            }
                        }
                    }
                    if !data.feedback.is_empty() {
                        h3 { "Your feedback" }
                        ul { class: "history history--feedback",
                            for (index, row) in data.feedback.into_iter().enumerate() {
                                FeedbackRow { key: "{index}", row }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
            }
        }
    }
}

#[component]
fn RecordCard(card: RecordCardVm) -> Element {
    rsx! {
        li { class: "history__item",
            div { class: "history__head",
                span { class: "history__topic", "{card.topic}" }
                span { class: "history__date", "{card.completed_at_str}" }
            }
            p {
                "{card.mode_label} · {card.difficulty} · Score: {card.score_label} · +{card.points} pts"
            }
            if let Some(badge) = card.level_badge {
                span { class: "history__badge", "{badge}" }
            }
        }
    }
}

#[component]
fn FeedbackRow(row: FeedbackRowVm) -> Element {
    rsx! {
        li { class: "history__item",
            div { class: "history__head",
                span { class: "history__topic", "{row.topic}" }
                span { class: "history__date", "{row.created_at_str}" }
            }
            p { "{row.stars} · {row.rating_label} · Score: {row.score_label}" }
            if let Some(comment) = row.comment {
                p { class: "history__comment", "{comment}" }
            }
        }
    }
}
