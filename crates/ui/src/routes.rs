use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{AccountView, DropAlerts, HistoryView, PlayView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", PlayView)] Play {},
        #[route("/history", HistoryView)] History {},
        #[route("/account", AccountView)] Account {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            DropAlerts {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    rsx! {
        nav { class: "sidebar",
            h1 { "Quiz Master" }
            ul {
                li { Link { to: Route::Play {}, "Play" } }
                li { Link { to: Route::History {}, "History" } }
                li { Link { to: Route::Account {}, "Account" } }
            }
        }
    }
}
