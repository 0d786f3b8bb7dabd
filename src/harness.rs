//! Episode harness: the narrow interface a search algorithm drives
//!
//! Genomes, speciation and fitness accumulation all live outside this crate.
//! What lives here is the environment contract: reset an episode, feed it
//! one decision per tick, read back a snapshot, and take the fitness delta
//! exactly once when the episode terminates. Episodes are fully isolated, so
//! a population evaluates in parallel with no locking.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::profile::EpisodeConfig;
use crate::sim::state::EpisodeState;
use crate::sim::tick::{Action, TickInput, tick};
use crate::sim::{Snapshot, check_collision};

/// What a decision policy sees each tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// The episode's target entry angle, raw accumulated degrees
    pub target_angle: f32,
    /// The diver's accumulated rotation so far
    pub current_angle: f32,
    /// Signed vertical gap `diver.y - base.y` (negative while above)
    pub height_above_base: f32,
}

/// Per-tick decision function evaluated against the observation.
///
/// Returns raw preference scores for `[Tuck, Release, Hold]`; the harness
/// picks the argmax (ties resolve to the earliest slot). Scores come
/// straight out of a network, so they are validated at this boundary:
/// a non-finite score is a fatal configuration error, never masked.
pub trait Policy {
    fn decide(&mut self, obs: &Observation) -> [f32; 3];
}

impl<F> Policy for F
where
    F: FnMut(&Observation) -> [f32; 3],
{
    fn decide(&mut self, obs: &Observation) -> [f32; 3] {
        self(obs)
    }
}

/// Harness-boundary failures (the simulation core itself is infallible)
#[derive(Debug, Clone, PartialEq)]
pub enum HarnessError {
    /// A policy produced NaN or infinite preference scores
    NonFiniteDecision { tick: u64, scores: [f32; 3] },
}

impl std::fmt::Display for HarnessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFiniteDecision { tick, scores } => {
                write!(f, "non-finite decision scores {scores:?} at tick {tick}")
            }
        }
    }
}

impl std::error::Error for HarnessError {}

/// One live episode plus the shared configuration it runs under
#[derive(Debug, Clone)]
pub struct Episode<'a> {
    config: &'a EpisodeConfig,
    state: EpisodeState,
    fitness_taken: bool,
}

impl<'a> Episode<'a> {
    /// Start an episode with an explicit flip requirement
    pub fn new(config: &'a EpisodeConfig, target_flips: f32) -> Self {
        Self {
            config,
            state: EpisodeState::new(config, target_flips),
            fitness_taken: false,
        }
    }

    /// Start an episode with a requirement drawn from the profile's range
    pub fn with_random_target(config: &'a EpisodeConfig, rng: &mut Pcg32) -> Self {
        let target = config.profile.sample_target_flips(rng);
        Self::new(config, target)
    }

    pub fn target_flips(&self) -> f32 {
        self.state.target_flips
    }

    /// What a policy gets to see this tick
    pub fn observation(&self) -> Observation {
        Observation {
            target_angle: self.state.target_angle(),
            current_angle: self.state.diver.angle,
            height_above_base: self.state.diver.pos.y - self.state.base.y,
        }
    }

    /// Advance one tick with an explicit input (interactive driving)
    pub fn step(&mut self, input: &TickInput) -> Snapshot {
        tick(&mut self.state, self.config, input);
        self.state.snapshot()
    }

    /// Evaluate the policy against the current observation and advance.
    ///
    /// `begin_fall` is asserted every tick the way the training loop always
    /// did; the guarded transitions make that idempotent.
    pub fn step_policy(&mut self, policy: &mut impl Policy) -> Result<Snapshot, HarnessError> {
        let scores = policy.decide(&self.observation());
        let action = resolve_action(scores, self.state.tick_index)?;
        Ok(self.step(&TickInput {
            begin_fall: true,
            action,
        }))
    }

    /// True once the diver has hit the surface
    pub fn is_terminal(&self) -> bool {
        self.state.outcome.collided
    }

    /// Fitness delta for this episode; `Some` exactly once, after contact.
    /// The caller owns accumulation onto its genome's running total.
    pub fn take_fitness_delta(&mut self) -> Option<f32> {
        if self.fitness_taken {
            return None;
        }
        let delta = self.state.outcome.fitness_delta?;
        self.fitness_taken = true;
        Some(delta)
    }

    /// Finalized half-flip count, if the episode has terminated
    pub fn flip_count(&self) -> Option<f32> {
        self.state.outcome.flip_count
    }

    /// Interactive win condition: landed exactly on the flip requirement.
    /// Both sides are half-step quantized, so exact equality is the test.
    pub fn is_win(&self) -> bool {
        self.state.outcome.flip_count == Some(self.state.target_flips)
    }

    /// Read-only view for presentation layers
    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    /// Whether the diver currently overlaps the surface (diagnostics)
    pub fn in_contact(&self) -> bool {
        check_collision(&self.state.diver, &self.state.base, &self.config.geometry)
    }
}

/// Argmax over `[Tuck, Release, Hold]` scores, earliest slot on ties
fn resolve_action(scores: [f32; 3], tick_index: u64) -> Result<Action, HarnessError> {
    if scores.iter().any(|s| !s.is_finite()) {
        return Err(HarnessError::NonFiniteDecision {
            tick: tick_index,
            scores,
        });
    }
    let mut best = 0;
    for (i, score) in scores.iter().enumerate().skip(1) {
        if *score > scores[best] {
            best = i;
        }
    }
    Ok(match best {
        0 => Action::Tuck,
        1 => Action::Release,
        _ => Action::Hold,
    })
}

/// Outcome summary for one evaluated episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeReport {
    pub target_flips: f32,
    pub flip_count: Option<f32>,
    pub final_angle: Option<f32>,
    pub fitness_delta: Option<f32>,
    pub ticks: u64,
    /// True if the external tick cap cut the episode off before contact
    pub capped: bool,
}

/// Drive one policy through one episode, bounded by an external tick cap.
///
/// The core enforces no timeout of its own; a runaway episode (a diver that
/// never reaches the surface) is the harness's problem, hence `max_ticks`.
pub fn run_episode(
    policy: &mut impl Policy,
    config: &EpisodeConfig,
    target_flips: f32,
    max_ticks: u64,
) -> Result<EpisodeReport, HarnessError> {
    let mut episode = Episode::new(config, target_flips);
    let mut ticks = 0u64;
    while !episode.is_terminal() && ticks < max_ticks {
        episode.step_policy(policy)?;
        ticks += 1;
    }

    let capped = !episode.is_terminal();
    if capped {
        log::warn!("episode hit the {max_ticks}-tick cap before contact");
    } else {
        log::debug!(
            "episode terminated after {ticks} ticks: flips {:?} (target {target_flips})",
            episode.flip_count()
        );
    }

    Ok(EpisodeReport {
        target_flips,
        flip_count: episode.flip_count(),
        final_angle: episode.state.outcome.final_angle,
        fitness_delta: episode.take_fitness_delta(),
        ticks,
        capped,
    })
}

/// Evaluate a whole population against one shared flip requirement.
///
/// The requirement is drawn once per call from the seeded RNG, the way one
/// generation of the original was graded against a single requirement.
/// Episodes are isolated, so the fan-out is a plain parallel map.
pub fn evaluate_population<P>(
    policies: &mut [P],
    config: &EpisodeConfig,
    seed: u64,
    max_ticks: u64,
) -> Result<Vec<EpisodeReport>, HarnessError>
where
    P: Policy + Send,
{
    let mut rng = Pcg32::seed_from_u64(seed);
    let target_flips = config.profile.sample_target_flips(&mut rng);
    log::info!(
        "evaluating {} policies against {target_flips} flips",
        policies.len()
    );

    policies
        .par_iter_mut()
        .map(|policy| run_episode(policy, config, target_flips, max_ticks))
        .collect()
}
