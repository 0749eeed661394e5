#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod progression;
pub mod scoring;
pub mod session;
pub mod time;

pub use error::Error;
pub use progression::{Progression, resolve_progression};
pub use scoring::{AnswerScore, compute_answer_points};
pub use session::{Advance, QuizSession, SessionError, SessionPhase, SessionProgress};
pub use time::Clock;
