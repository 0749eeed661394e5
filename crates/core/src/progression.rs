use crate::model::{GameMode, MAX_LEVEL, QuizResult};

/// Minimum score ratio for a campaign round to count as a win.
pub const LEVEL_UP_THRESHOLD: f64 = 0.6;

/// Level decision for a finished quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progression {
    pub level_up: bool,
    pub new_level: u32,
}

impl Progression {
    /// Copies the decision onto the result shown to the player.
    pub fn apply_to(self, result: &mut QuizResult) {
        result.level_up = self.level_up;
        result.new_level = self.level_up.then_some(self.new_level);
    }
}

/// Decides whether a finished quiz advances the career level.
///
/// Only campaign rounds level up: one level when at least 60% of the
/// questions were answered correctly and the player is below the level cap.
#[must_use]
pub fn resolve_progression(result: &QuizResult, mode: GameMode, current_level: u32) -> Progression {
    let unchanged = Progression {
        level_up: false,
        new_level: current_level,
    };

    if mode != GameMode::Campaign || result.total == 0 {
        return unchanged;
    }
    if result.ratio() >= LEVEL_UP_THRESHOLD && current_level < MAX_LEVEL {
        return Progression {
            level_up: true,
            new_level: current_level + 1,
        };
    }
    unchanged
}
