//! Deterministic simulation module
//!
//! All episode logic lives here. This module must be pure and deterministic:
//! - Fixed tick only (no wall-clock time)
//! - Seeded RNG only, and only at the harness boundary
//! - No rendering or platform dependencies
//!
//! One [`state::EpisodeState`] is the sole owner of everything a single
//! episode mutates; concurrent episodes never share mutable state.

pub mod collision;
pub mod scene;
pub mod scoring;
pub mod state;
pub mod tick;

pub use collision::{HitRect, check_collision};
pub use scene::{Base, Cliff, CliffSection};
pub use scoring::{fitness_delta, flip_count};
pub use state::{
    Diver, DiverSnapshot, DiverState, EpisodeOutcome, EpisodeState, SceneSnapshot, Snapshot,
};
pub use tick::{Action, TickInput, tick};
