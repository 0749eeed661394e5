use dioxus::prelude::*;
use services::AccountSession;

use crate::context::AppContext;
use crate::vm::{AccountFormVm, account_label};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AccountAction {
    SignIn,
    SignUp,
}

#[component]
pub fn AccountView() -> Element {
    let ctx = use_context::<AppContext>();
    let accounts = ctx.accounts();
    let enabled = accounts.enabled();

    let mut session = use_signal({
        let accounts = accounts.clone();
        move || accounts.current()
    });
    let mut form = use_signal(AccountFormVm::default);
    let error = use_signal(|| None::<String>);

    let on_submit = {
        let accounts = accounts.clone();
        use_callback(move |action: AccountAction| {
            if !form.peek().can_submit() {
                return;
            }
            let accounts = accounts.clone();
            let (email, password) = {
                let mut current = form.write();
                current.busy = true;
                (current.email.clone(), current.password.clone())
            };
            let mut form = form;
            let mut session = session;
            let mut error = error;
            spawn(async move {
                let outcome = match action {
                    AccountAction::SignIn => accounts.sign_in(&email, &password).await,
                    AccountAction::SignUp => accounts.sign_up(&email, &password).await,
                };
                form.write().reset_after_attempt();
                match outcome {
                    Ok(signed_in) => {
                        error.set(None);
                        session.set(Some(signed_in));
                    }
                    Err(err) => error.set(Some(err.to_string())),
                }
            });
        })
    };

    let on_sign_out = use_callback(move |()| {
        let mut error = error;
        accounts.sign_out();
        error.set(None);
        session.set(None);
    });

    let current: Option<AccountSession> = session.read().clone();
    let current_form = form.read().clone();
    let can_submit = enabled && current_form.can_submit();

    rsx! {
        div { class: "page account-page",
            h2 { "Account" }
            p { class: "account__status", "{account_label(current.as_ref())}" }
            if current.is_some() {
                button {
                    class: "btn btn-secondary",
                    id: "sign-out",
                    r#type: "button",
                    onclick: move |_| on_sign_out.call(()),
                    "Sign out"
                }
            } else {
                if !enabled {
                    p { class: "account__warning",
                        "Accounts are not configured. Set QUIZ_AUTH_API_KEY to sync progress across devices."
                    }
                }
                label { r#for: "account-email", "Email" }
                input {
                    id: "account-email",
                    r#type: "email",
                    value: "{current_form.email}",
                    oninput: move |evt| form.write().email = evt.value(),
                }
                label { r#for: "account-password", "Password" }
                input {
                    id: "account-password",
                    r#type: "password",
                    value: "{current_form.password}",
                    oninput: move |evt| form.write().password = evt.value(),
                }
                div { class: "account__actions",
                    button {
                        class: "btn btn-primary",
                        id: "sign-in",
                        r#type: "button",
                        disabled: !can_submit,
                        onclick: move |_| on_submit.call(AccountAction::SignIn),
                        "Sign in"
                    }
                    button {
                        class: "btn btn-secondary",
                        id: "sign-up",
                        r#type: "button",
                        disabled: !can_submit,
                        onclick: move |_| on_submit.call(AccountAction::SignUp),
                        "Create account"
                    }
                }
                if let Some(message) = error.read().clone() {
                    p { class: "account__error", role: "alert", "{message}" }
                }
            }
        }
    }
}
