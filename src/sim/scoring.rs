//! Entry scoring: flip counting and the training fitness delta
//!
//! Flip counting rounds the accumulated angle to half-flip resolution.
//! The fitness delta compares the raw accumulated angle against
//! `target_flips * 360` without wrapping either side - the comparison is
//! deliberately unnormalized and kept that way.

use crate::consts::HALF_FLIP_DEGREES;

use super::state::DiverState;

/// Reward for hitting the target angle exactly (avoids dividing by zero)
pub const PERFECT_ENTRY_REWARD: f32 = 200.0;
/// Numerator for entries within the near window
pub const NEAR_REWARD_SCALE: f32 = 1000.0;
/// Numerator for entries outside the near window
pub const FAR_REWARD_SCALE: f32 = 100.0;
/// Angle error boundary between the near and far reward branches, degrees
pub const NEAR_WINDOW_DEGREES: f32 = 90.0;
/// Paid for a straight-position entry, charged for anything else
pub const ENTRY_STATE_BONUS: f32 = 0.1;

/// Derive the half-flip count from an accumulated rotation angle.
///
/// `round(|angle| / 180)` half flips; an even count is whole flips, an odd
/// count carries the trailing half. Deterministic and idempotent.
pub fn flip_count(angle: f32) -> f32 {
    let half_flips = (angle.abs() / HALF_FLIP_DEGREES).round();
    if half_flips % 2.0 == 0.0 {
        half_flips / 2.0
    } else {
        (half_flips - 1.0) / 2.0 + 0.5
    }
}

/// Fitness delta for one terminated episode.
///
/// Accumulation onto a genome's running total is the caller's business;
/// this only computes the per-episode delta.
pub fn fitness_delta(final_angle: f32, target_angle: f32, terminal_state: DiverState) -> f32 {
    let mut delta = if terminal_state == DiverState::Straight {
        ENTRY_STATE_BONUS
    } else {
        -ENTRY_STATE_BONUS
    };

    let diff = (final_angle - target_angle).abs();
    delta += if diff > 0.0 && diff <= NEAR_WINDOW_DEGREES {
        NEAR_REWARD_SCALE / diff
    } else if diff > NEAR_WINDOW_DEGREES {
        FAR_REWARD_SCALE / diff
    } else {
        PERFECT_ENTRY_REWARD
    };
    delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_flip_count_reference_angles() {
        assert_eq!(flip_count(0.0), 0.0);
        assert_eq!(flip_count(360.0), 1.0);
        assert_eq!(flip_count(540.0), 1.5);
        assert_eq!(flip_count(720.0), 2.0);
        // rounding: 530 degrees is closest to 3 half flips
        assert_eq!(flip_count(530.0), 1.5);
        // sign of the spin direction does not matter
        assert_eq!(flip_count(-540.0), 1.5);
    }

    #[test]
    fn test_fitness_near_window() {
        // diff = 50: 1000/50 = 20, plus the straight-entry bonus
        let delta = fitness_delta(770.0, 720.0, DiverState::Straight);
        assert!((delta - 20.1).abs() < 1e-4);

        let delta = fitness_delta(770.0, 720.0, DiverState::Tuck);
        assert!((delta - 19.9).abs() < 1e-4);
    }

    #[test]
    fn test_fitness_far_window() {
        // diff = 200: 100/200 = 0.5
        let delta = fitness_delta(920.0, 720.0, DiverState::Straight);
        assert!((delta - 0.6).abs() < 1e-4);
    }

    #[test]
    fn test_fitness_perfect_entry_never_divides() {
        let delta = fitness_delta(720.0, 720.0, DiverState::Straight);
        assert!((delta - (PERFECT_ENTRY_REWARD + ENTRY_STATE_BONUS)).abs() < 1e-4);
        assert!(delta.is_finite());

        let delta = fitness_delta(720.0, 720.0, DiverState::Tuck);
        assert!((delta - (PERFECT_ENTRY_REWARD - ENTRY_STATE_BONUS)).abs() < 1e-4);
    }

    #[test]
    fn test_fitness_window_boundary() {
        // diff = 90 sits in the near branch; just past it drops to the far one
        let at_boundary = fitness_delta(810.0, 720.0, DiverState::Straight);
        assert!((at_boundary - (1000.0 / 90.0 + 0.1)).abs() < 1e-3);

        let past_boundary = fitness_delta(810.5, 720.0, DiverState::Straight);
        assert!((past_boundary - (100.0 / 90.5 + 0.1)).abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn prop_flip_count_idempotent_and_half_step(angle in -10_000.0f32..10_000.0) {
            let flips = flip_count(angle);
            prop_assert_eq!(flips, flip_count(angle));
            prop_assert!(flips >= 0.0);
            // always lands on a half-flip boundary
            prop_assert_eq!((flips * 2.0).fract(), 0.0);
        }

        #[test]
        fn prop_fitness_is_finite(
            final_angle in 0.0f32..5_000.0,
            half_steps in 1u32..13,
        ) {
            let target = half_steps as f32 * 0.5 * 360.0;
            let delta = fitness_delta(final_angle, target, DiverState::Straight);
            prop_assert!(delta.is_finite());
        }
    }
}
