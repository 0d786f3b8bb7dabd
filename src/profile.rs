//! Rate profiles and episode configuration
//!
//! The interactive and training builds of the original toy differed only in
//! a handful of scroll/spin constants. Here both live in one parameterized
//! [`RateProfile`], and the asset-derived dimensions are injected through
//! [`Geometry`] instead of module-level globals.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::collision::HitRect;
use crate::sim::state::DiverState;

/// Scroll, spin and target-range constants for one simulation mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateProfile {
    /// Cliff scroll rate per tick
    pub cliff_scroll: f32,
    /// Base (landing surface) scroll rate per tick
    pub base_scroll: f32,
    /// Rotation per tick in the straight position, degrees
    pub straight_spin: f32,
    /// Rotation per tick in the tucked position, degrees
    pub tuck_spin: f32,
    /// Downward drift per tick once the scene has stopped scrolling
    pub post_landing_drift: f32,
    /// Reference line the base surface hangs from at episode start
    pub base_start_y: f32,
    /// Flip targets are drawn from `1..=max_target_half_steps` half flips
    pub max_target_half_steps: u32,
    /// Presentation-layer throttle target; the core is tick-indexed
    pub tick_hz: u32,
}

impl RateProfile {
    /// Fast scroll rates tuned for human reaction time
    pub fn interactive() -> Self {
        Self {
            cliff_scroll: 5.0,
            base_scroll: 5.0,
            straight_spin: 0.3,
            tuck_spin: 13.0,
            post_landing_drift: 10.0,
            base_start_y: 1400.0,
            max_target_half_steps: 12,
            tick_hz: 60,
        }
    }

    /// Slow cliff scroll tuned for smoother training gradients
    pub fn training() -> Self {
        Self {
            cliff_scroll: 0.7,
            base_scroll: 0.8,
            straight_spin: 0.6,
            tuck_spin: 30.0,
            post_landing_drift: 20.0,
            base_start_y: 1550.0,
            max_target_half_steps: 9,
            tick_hz: 30,
        }
    }

    /// Look up a profile by name (`interactive` or `training`)
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "interactive" => Some(Self::interactive()),
            "training" => Some(Self::training()),
            _ => None,
        }
    }

    /// Draw a flip requirement from this profile's half-step range
    pub fn sample_target_flips(&self, rng: &mut impl rand::Rng) -> f32 {
        let half_steps = rng.random_range(1..=self.max_target_half_steps);
        half_steps as f32 * 0.5
    }
}

/// Asset-derived dimensions, passed into the simulation as plain data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Visible window height
    pub viewport_height: f32,
    /// Height of the top cliff section
    pub top_cliff_height: f32,
    /// Height of the middle cliff section
    pub middle_cliff_height: f32,
    /// Height of the base (water) silhouette
    pub base_height: f32,
    /// Width of the base silhouette
    pub base_width: f32,
    /// Depth of transparent sky inside the base silhouette above the water
    pub base_surface_inset: f32,
    /// Cliff scroll offset at episode start
    pub cliff_start_y: f32,
    /// Diver spawn position on the cliff top
    pub diver_spawn: Vec2,
    /// Horizontal reference used when positioning the base for overlap tests
    pub collision_ref_x: f32,
    /// Vertical reference used when positioning the base for overlap tests
    pub collision_ref_y: f32,
    /// Diver silhouette while standing
    pub standing_rect: HitRect,
    /// Diver silhouette in the straight position
    pub straight_rect: HitRect,
    /// Diver silhouette in the tucked position
    pub tuck_rect: HitRect,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            viewport_height: 600.0,
            top_cliff_height: 1200.0,
            middle_cliff_height: 900.0,
            base_height: 300.0,
            base_width: 800.0,
            base_surface_inset: 0.0,
            cliff_start_y: 70.0,
            diver_spawn: Vec2::new(90.0, 40.0),
            collision_ref_x: 100.0,
            collision_ref_y: 130.0,
            standing_rect: HitRect::new(24.0, 62.0),
            straight_rect: HitRect::new(30.0, 72.0),
            tuck_rect: HitRect::new(42.0, 44.0),
        }
    }
}

impl Geometry {
    /// Diver silhouette for the given flight state
    pub fn diver_rect(&self, state: DiverState) -> HitRect {
        match state {
            DiverState::Standing => self.standing_rect,
            DiverState::Straight => self.straight_rect,
            DiverState::Tuck => self.tuck_rect,
        }
    }
}

/// Read-only configuration shared by every episode of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeConfig {
    pub profile: RateProfile,
    #[serde(default)]
    pub geometry: Geometry,
}

impl EpisodeConfig {
    /// Interactive-mode configuration with the shipped asset dimensions
    pub fn interactive() -> Self {
        Self {
            profile: RateProfile::interactive(),
            geometry: Geometry::default(),
        }
    }

    /// Training-mode configuration with the shipped asset dimensions
    pub fn training() -> Self {
        Self {
            profile: RateProfile::training(),
            geometry: Geometry::default(),
        }
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        log::info!("Loaded episode config from {path}");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_profile_lookup_by_name() {
        assert_eq!(
            RateProfile::from_name("interactive"),
            Some(RateProfile::interactive())
        );
        assert_eq!(
            RateProfile::from_name("Training"),
            Some(RateProfile::training())
        );
        assert_eq!(RateProfile::from_name("arcade"), None);
    }

    #[test]
    fn test_target_sampling_stays_in_half_step_range() {
        let profile = RateProfile::training();
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..200 {
            let flips = profile.sample_target_flips(&mut rng);
            assert!(flips >= 0.5 && flips <= 4.5);
            // half-flip resolution only
            assert_eq!((flips * 2.0).fract(), 0.0);
        }
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = EpisodeConfig::training();
        let json = serde_json::to_string(&config).unwrap();
        let back: EpisodeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
