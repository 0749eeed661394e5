use serde::{Deserialize, Serialize};
use std::fmt;

/// How a quiz is played.
///
/// - `Classic`: player-chosen difficulty and count, no level progression.
/// - `Campaign`: difficulty follows the persistent career level, and a good
///   enough score advances that level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameMode {
    #[default]
    Classic,
    Campaign,
}

impl GameMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            GameMode::Classic => "classic",
            GameMode::Campaign => "campaign",
        }
    }

    /// Inverse of [`GameMode::as_str`].
    #[must_use]
    pub fn from_str_opt(value: &str) -> Option<Self> {
        match value {
            "classic" => Some(GameMode::Classic),
            "campaign" => Some(GameMode::Campaign),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            GameMode::Classic => "Quick Play",
            GameMode::Campaign => "Career Mode",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
