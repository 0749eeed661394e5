mod account;
mod alerts;
mod history;
mod play;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use account::AccountView;
pub use alerts::DropAlerts;
pub use history::HistoryView;
pub use play::PlayView;
pub use state::{ViewError, ViewState, view_state_from_resource};
