//! Cliff and base scroll model
//!
//! The fall is staged by scrolling the background up past a stationary
//! diver: a tall top cliff section, then a middle section that comes to rest
//! at the bottom of the viewport and stays there for the remainder of the
//! episode. The base (water) surface scrolls up at its own rate until the
//! cliff fixes or while the diver still stands on top.

use serde::{Deserialize, Serialize};

use crate::profile::{Geometry, RateProfile};

use super::state::DiverState;

/// Which cliff section is currently on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CliffSection {
    Top,
    Middle,
}

/// The vertically scrolling cliff backdrop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cliff {
    /// Vertical offset of the current section, decreasing while scrolling
    pub y: f32,
    pub section: CliffSection,
    /// Latched once the middle section reaches its resting offset
    pub fixed: bool,
    /// Armed by [`Cliff::start_scrolling`]; scrolling is a no-op before that
    pub moving: bool,
}

impl Cliff {
    pub fn new(geometry: &Geometry) -> Self {
        Self {
            y: geometry.cliff_start_y,
            section: CliffSection::Top,
            fixed: false,
            moving: false,
        }
    }

    /// Arm the scroll; called when the diver steps off
    pub fn start_scrolling(&mut self) {
        self.moving = true;
    }

    /// Scroll one tick's worth, switching Top -> Middle and finally latching
    /// the middle section at its resting offset.
    pub fn move_scroll(&mut self, profile: &RateProfile, geometry: &Geometry) {
        if self.fixed || !self.moving {
            return;
        }
        self.y -= profile.cliff_scroll;

        // Top section has scrolled past: hand over to the middle section,
        // which starts exactly where the top ended.
        if self.section == CliffSection::Top
            && self.y + geometry.top_cliff_height < geometry.viewport_height
        {
            self.section = CliffSection::Middle;
            self.y = 0.0;
        }

        // Middle section reached its resting offset: clamp and latch.
        let resting = geometry.viewport_height - geometry.middle_cliff_height;
        if self.section == CliffSection::Middle && self.y < resting {
            self.fixed = true;
            self.y = resting;
        }
    }
}

/// The landing surface scrolling up toward the diver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Base {
    /// Top edge of the base silhouette
    pub y: f32,
}

impl Base {
    pub fn new(profile: &RateProfile, geometry: &Geometry) -> Self {
        Self {
            y: profile.base_start_y - geometry.base_height,
        }
    }

    /// Scroll one tick's worth unless the scene has fixed or the diver has
    /// not left the cliff yet.
    pub fn move_scroll(&mut self, cliff_fixed: bool, diver_state: DiverState, profile: &RateProfile) {
        if cliff_fixed || diver_state == DiverState::Standing {
            return;
        }
        self.y -= profile.base_scroll;
    }
}
