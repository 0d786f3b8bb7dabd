//! Diver flight state machine, kinematics, and per-episode state
//!
//! The diver's discrete state drives which spin rate applies and which
//! transitions are legal. Transition calls from the wrong source state are
//! silently ignored; that guarded-transition design is load-bearing, both
//! drivers lean on it (the human driver re-sends "tuck" every held tick, the
//! training driver re-sends "begin fall" every tick).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::profile::{EpisodeConfig, RateProfile};

use super::scene::{Base, Cliff, CliffSection};

/// Discrete flight position of the diver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiverState {
    /// On the cliff top, not yet launched
    Standing,
    /// Airborne, extended, slow rotation
    Straight,
    /// Airborne, tucked, fast rotation
    Tuck,
}

/// The diver: position, velocity, accumulated rotation, flight state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diver {
    /// Top-left position, y growing downward
    pub pos: Vec2,
    pub vel: Vec2,
    /// Accumulated rotation in degrees; never wrapped during flight
    pub angle: f32,
    pub state: DiverState,
}

impl Diver {
    pub fn new(spawn: Vec2) -> Self {
        Self {
            pos: spawn,
            vel: Vec2::ZERO,
            angle: 0.0,
            state: DiverState::Standing,
        }
    }

    /// Step off the cliff. Only valid from `Standing`; otherwise a no-op.
    pub fn begin_fall(&mut self) {
        if self.state == DiverState::Standing {
            self.state = DiverState::Straight;
            self.vel = Vec2::new(LAUNCH_VEL_X, LAUNCH_VEL_Y);
        }
    }

    /// Pull into the tuck. Only valid from `Straight`; otherwise a no-op.
    pub fn tuck(&mut self) {
        if self.state == DiverState::Straight {
            self.state = DiverState::Tuck;
        }
    }

    /// Open back up to straight. Only valid from `Tuck`; otherwise a no-op.
    pub fn release_tuck(&mut self) {
        if self.state == DiverState::Tuck {
            self.state = DiverState::Straight;
        }
    }

    /// True once the diver has left the cliff
    pub fn is_airborne(&self) -> bool {
        self.state != DiverState::Standing
    }

    /// Advance position by velocity, then velocity by gravity.
    ///
    /// Applies only while falling and above the kinematics ceiling; past the
    /// ceiling the diver holds still and the scrolling scene carries the
    /// fall. Forward acceleration only kicks in left of its bound - the
    /// asymmetry is intentional and kept exactly.
    pub fn step_kinematics(&mut self, is_falling: bool) {
        if is_falling && self.pos.y < KINEMATICS_CEILING {
            self.pos += self.vel;
            self.vel.y += GRAVITY;
            if self.pos.x < FORWARD_ACCEL_BOUND {
                self.vel.x += FORWARD_ACCEL;
            }
        }
    }

    /// Accumulate rotation for this tick at the current state's spin rate
    pub fn step_rotation(&mut self, profile: &RateProfile) {
        match self.state {
            DiverState::Straight => self.angle += profile.straight_spin,
            DiverState::Tuck => self.angle += profile.tuck_spin,
            DiverState::Standing => {}
        }
    }

    /// Continued visible fall once the background has stopped scrolling
    pub fn step_post_landing(&mut self, profile: &RateProfile) {
        self.pos.y += profile.post_landing_drift;
    }
}

/// Terminal facts about an episode, filled in exactly once at first contact
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeOutcome {
    /// Sticky contact flag; never reverts within an episode
    pub collided: bool,
    /// Accumulated angle at the moment of first contact
    pub final_angle: Option<f32>,
    /// Half-flip count derived from `final_angle`
    pub flip_count: Option<f32>,
    /// Training fitness delta, computed once and consumed at most once
    pub fitness_delta: Option<f32>,
}

/// Complete state of one episode: diver, scene, target, outcome
///
/// Owned exclusively by one driver (human game or one population member's
/// evaluation); episodes never read or write each other's state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeState {
    /// Completed tick count
    pub tick_index: u64,
    pub diver: Diver,
    pub cliff: Cliff,
    pub base: Base,
    /// Flip requirement for this episode, fixed at creation
    pub target_flips: f32,
    pub outcome: EpisodeOutcome,
}

impl EpisodeState {
    pub fn new(config: &EpisodeConfig, target_flips: f32) -> Self {
        Self {
            tick_index: 0,
            diver: Diver::new(config.geometry.diver_spawn),
            cliff: Cliff::new(&config.geometry),
            base: Base::new(&config.profile, &config.geometry),
            target_flips,
            outcome: EpisodeOutcome::default(),
        }
    }

    /// Target entry angle in raw accumulated degrees
    pub fn target_angle(&self) -> f32 {
        crate::target_angle(self.target_flips)
    }

    /// Read-only view for presentation layers
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.tick_index,
            diver: DiverSnapshot {
                pos: self.diver.pos,
                angle: self.diver.angle,
                state: self.diver.state,
            },
            scene: SceneSnapshot {
                section: self.cliff.section,
                scroll_offset: self.cliff.y,
                base_y: self.base.y,
                fixed: self.cliff.fixed,
            },
            collided: self.outcome.collided,
            flip_count: self.outcome.flip_count,
        }
    }
}

/// Diver fields a presentation layer needs to draw a frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiverSnapshot {
    pub pos: Vec2,
    pub angle: f32,
    pub state: DiverState,
}

/// Scene fields a presentation layer needs to draw a frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub section: CliffSection,
    pub scroll_offset: f32,
    pub base_y: f32,
    pub fixed: bool,
}

/// One frame's worth of read-only episode state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub diver: DiverSnapshot,
    pub scene: SceneSnapshot,
    pub collided: bool,
    pub flip_count: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn launched_diver() -> Diver {
        let mut diver = Diver::new(Vec2::new(90.0, 40.0));
        diver.begin_fall();
        diver
    }

    #[test]
    fn test_begin_fall_only_from_standing() {
        let mut diver = Diver::new(Vec2::new(90.0, 40.0));
        assert_eq!(diver.state, DiverState::Standing);
        assert_eq!(diver.vel, Vec2::ZERO);

        diver.begin_fall();
        assert_eq!(diver.state, DiverState::Straight);
        assert_eq!(diver.vel, Vec2::new(LAUNCH_VEL_X, LAUNCH_VEL_Y));

        // Re-launching mid-flight must not reset velocity
        diver.vel = Vec2::new(3.0, 5.0);
        diver.begin_fall();
        assert_eq!(diver.state, DiverState::Straight);
        assert_eq!(diver.vel, Vec2::new(3.0, 5.0));
    }

    #[test]
    fn test_tuck_and_release_are_guarded() {
        let mut diver = Diver::new(Vec2::new(90.0, 40.0));

        // Tucking while standing is ignored
        diver.tuck();
        assert_eq!(diver.state, DiverState::Standing);
        // Releasing while standing is ignored
        diver.release_tuck();
        assert_eq!(diver.state, DiverState::Standing);

        diver.begin_fall();
        diver.release_tuck(); // not tucked yet, ignored
        assert_eq!(diver.state, DiverState::Straight);

        diver.tuck();
        assert_eq!(diver.state, DiverState::Tuck);
        diver.tuck(); // already tucked, ignored
        assert_eq!(diver.state, DiverState::Tuck);

        diver.release_tuck();
        assert_eq!(diver.state, DiverState::Straight);
    }

    #[test]
    fn test_kinematics_respect_ceiling() {
        let mut diver = launched_diver();

        // First step from the spawn row: position moves by launch velocity
        diver.step_kinematics(true);
        assert_eq!(diver.pos, Vec2::new(92.0, 30.0));
        assert_eq!(diver.vel.y, LAUNCH_VEL_Y + GRAVITY);

        // Below the ceiling nothing moves even while falling
        diver.pos.y = KINEMATICS_CEILING + 10.0;
        let frozen = diver.clone();
        diver.step_kinematics(true);
        assert_eq!(diver, frozen);

        // Not falling: nothing moves regardless of height
        let mut standing = Diver::new(Vec2::new(90.0, 40.0));
        standing.step_kinematics(false);
        assert_eq!(standing.pos, Vec2::new(90.0, 40.0));
    }

    #[test]
    fn test_forward_accel_only_left_of_bound() {
        let mut diver = launched_diver();
        diver.pos = Vec2::new(30.0, 0.0);
        diver.step_kinematics(true);
        // x was left of the bound after the move, so vel.x grew
        assert_eq!(diver.vel.x, LAUNCH_VEL_X + FORWARD_ACCEL);

        let mut diver = launched_diver();
        diver.pos = Vec2::new(90.0, 0.0);
        diver.step_kinematics(true);
        assert_eq!(diver.vel.x, LAUNCH_VEL_X);
    }

    #[test]
    fn test_rotation_rates_per_state() {
        let profile = RateProfile::interactive();
        let mut diver = Diver::new(Vec2::new(90.0, 40.0));

        diver.step_rotation(&profile);
        assert_eq!(diver.angle, 0.0); // standing never spins

        diver.begin_fall();
        diver.step_rotation(&profile);
        assert_eq!(diver.angle, profile.straight_spin);

        diver.tuck();
        diver.step_rotation(&profile);
        assert_eq!(diver.angle, profile.straight_spin + profile.tuck_spin);
    }

    #[test]
    fn test_angle_accumulates_without_wrapping() {
        let profile = RateProfile::training();
        let mut diver = launched_diver();
        diver.tuck();
        for _ in 0..30 {
            diver.step_rotation(&profile);
        }
        // 30 ticks at 30 deg/tick: two and a half full rotations, unwrapped
        assert_eq!(diver.angle, 900.0);
    }

    proptest! {
        /// The state machine is closed over {Standing, Straight, Tuck} and
        /// never reaches Tuck without passing through Straight.
        #[test]
        fn prop_transitions_never_skip_straight(ops in proptest::collection::vec(0u8..3, 0..100)) {
            let mut diver = Diver::new(Vec2::new(90.0, 40.0));
            let mut prev = diver.state;
            for op in ops {
                match op {
                    0 => diver.begin_fall(),
                    1 => diver.tuck(),
                    _ => diver.release_tuck(),
                }
                let legal = match (prev, diver.state) {
                    // staying put is always legal (guarded no-op)
                    (a, b) if a == b => true,
                    (DiverState::Standing, DiverState::Straight) => true,
                    (DiverState::Straight, DiverState::Tuck) => true,
                    (DiverState::Tuck, DiverState::Straight) => true,
                    _ => false,
                };
                prop_assert!(legal, "illegal transition {:?} -> {:?}", prev, diver.state);
                prev = diver.state;
            }
        }
    }
}
