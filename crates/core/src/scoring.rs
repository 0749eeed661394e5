//! Points and streak rules for a single answer.
//!
//! The engine is a pure calculation. The session owns the running totals and
//! applies the streak rule after each answer.

/// Points for any correct answer.
pub const BASE_POINTS: u32 = 100;
/// Speed bonus for an instant answer.
pub const MAX_SPEED_BONUS: f64 = 50.0;
/// Speed bonus lost per elapsed second.
pub const SPEED_DECAY_PER_SEC: f64 = 3.0;
/// Bonus per correct answer already in the streak.
pub const STREAK_BONUS_STEP: u32 = 20;

/// Outcome of scoring one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerScore {
    pub points: u32,
    pub streak_after: u32,
}

/// Normalizes a measured elapsed time: negative or non-finite values become 0.
#[must_use]
pub fn clamp_elapsed(elapsed_secs: f64) -> f64 {
    if elapsed_secs.is_finite() && elapsed_secs > 0.0 {
        elapsed_secs
    } else {
        0.0
    }
}

/// Speed bonus: 50 at 0s, minus 3 per second, rounded, floored at 0.
#[must_use]
pub fn speed_bonus(elapsed_secs: f64) -> u32 {
    let raw = (MAX_SPEED_BONUS - clamp_elapsed(elapsed_secs) * SPEED_DECAY_PER_SEC).round();
    if raw <= 0.0 {
        return 0;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let bonus = raw as u32;
    bonus
}

/// Streak bonus, computed from the streak before this answer is applied.
#[must_use]
pub fn streak_bonus(streak_before: u32) -> u32 {
    streak_before.saturating_mul(STREAK_BONUS_STEP)
}

/// Points earned by one answer.
///
/// Incorrect and skipped answers earn nothing. Correct answers earn
/// `BASE_POINTS + speed_bonus + streak_bonus`.
#[must_use]
pub fn compute_answer_points(is_correct: bool, elapsed_secs: f64, streak_before: u32) -> u32 {
    if !is_correct {
        return 0;
    }
    BASE_POINTS
        .saturating_add(speed_bonus(elapsed_secs))
        .saturating_add(streak_bonus(streak_before))
}

/// Points plus the streak that follows: correct extends it, anything else resets it.
#[must_use]
pub fn apply_answer(is_correct: bool, elapsed_secs: f64, streak_before: u32) -> AnswerScore {
    AnswerScore {
        points: compute_answer_points(is_correct, elapsed_secs, streak_before),
        streak_after: if is_correct {
            streak_before.saturating_add(1)
        } else {
            0
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instant_first_correct_answer_is_150() {
        assert_eq!(compute_answer_points(true, 0.0, 0), 150);
    }

    #[test]
    fn speed_bonus_decays_to_zero() {
        assert_eq!(speed_bonus(0.0), 50);
        assert_eq!(speed_bonus(5.0), 35);
        // 50 - 3 * 16.5 = 0.5, rounds half away from zero.
        assert_eq!(speed_bonus(16.5), 1);
        assert_eq!(speed_bonus(16.67), 0);
        assert_eq!(speed_bonus(120.0), 0);
        assert_eq!(compute_answer_points(true, 30.0, 0), 100);
    }

    #[test]
    fn wrong_or_skipped_earns_nothing_and_resets_streak() {
        for streak in [0, 1, 7] {
            let score = apply_answer(false, 0.0, streak);
            assert_eq!(score.points, 0);
            assert_eq!(score.streak_after, 0);
        }
    }

    #[test]
    fn streak_bonus_is_linear() {
        let first = compute_answer_points(true, 20.0, 0);
        let third = compute_answer_points(true, 20.0, 2);
        assert_eq!(third - first, 40);
        assert_eq!(apply_answer(true, 20.0, 2).streak_after, 3);
    }

    #[test]
    fn negative_and_nan_elapsed_count_as_instant() {
        assert_eq!(compute_answer_points(true, -4.0, 0), 150);
        assert_eq!(compute_answer_points(true, f64::NAN, 0), 150);
    }
}
