//! Fixed-order per-tick episode advance
//!
//! One call to [`tick`] moves a single episode forward by one step, in the
//! same order both original drivers used: input, kinematics, rotation,
//! collision (scoring exactly once on first contact), then scene scroll.

use serde::{Deserialize, Serialize};

use crate::profile::EpisodeConfig;

use super::collision;
use super::scoring;
use super::state::EpisodeState;

/// What the diver is asked to do with the tuck this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Leave the flight state as it is
    #[default]
    Hold,
    /// Pull into the tuck (ignored unless straight)
    Tuck,
    /// Open back up (ignored unless tucked)
    Release,
}

/// Input for a single tick.
///
/// Interactive drivers map a press to `begin_fall`, a held key to
/// `Action::Tuck` each tick, and the release edge to `Action::Release`.
/// Training drivers resolve a policy's scores into the action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Step off the cliff and arm the scene scroll (no-op once airborne)
    pub begin_fall: bool,
    pub action: Action,
}

impl TickInput {
    /// Input that launches the diver on an otherwise quiet tick
    pub fn launch() -> Self {
        Self {
            begin_fall: true,
            action: Action::Hold,
        }
    }
}

/// Advance one episode by one tick.
///
/// After first contact the input/kinematics/rotation steps are skipped -
/// the episode outcome is already sealed - while the scene keeps settling
/// and the post-landing drift continues.
pub fn tick(state: &mut EpisodeState, config: &EpisodeConfig, input: &TickInput) {
    if !state.outcome.collided {
        // 1. external decision
        if input.begin_fall {
            state.diver.begin_fall();
            state.cliff.start_scrolling();
        }
        match input.action {
            Action::Tuck => state.diver.tuck(),
            Action::Release => state.diver.release_tuck(),
            Action::Hold => {}
        }

        // 2. kinematics, 3. rotation
        let falling = state.diver.is_airborne();
        state.diver.step_kinematics(falling);
        state.diver.step_rotation(&config.profile);

        // 4. contact check; scoring runs exactly once, on the first hit
        if collision::check_collision(&state.diver, &state.base, &config.geometry) {
            let final_angle = state.diver.angle;
            state.outcome.collided = true;
            state.outcome.final_angle = Some(final_angle);
            state.outcome.flip_count = Some(scoring::flip_count(final_angle));
            state.outcome.fitness_delta = Some(scoring::fitness_delta(
                final_angle,
                state.target_angle(),
                state.diver.state,
            ));
        }
    }

    // 5. scene scroll
    state
        .cliff
        .move_scroll(&config.profile, &config.geometry);
    state
        .base
        .move_scroll(state.cliff.fixed, state.diver.state, &config.profile);
    if state.cliff.fixed {
        state.diver.step_post_landing(&config.profile);
    }

    state.tick_index += 1;
}
