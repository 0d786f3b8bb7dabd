//! Diver-vs-base collision detection
//!
//! The original toy tested pixel masks of the diver sprite against the base
//! sprite. Here each diver state carries an axis-aligned hit-rect sized to
//! its silhouette, tested against the base silhouette at the same relative
//! offset the mask test used. Exact pixel-mask parity is a non-goal; first
//! contact and stickiness semantics are what must match.

use serde::{Deserialize, Serialize};

use crate::profile::Geometry;

use super::scene::Base;
use super::state::Diver;

/// An axis-aligned silhouette, dimensions only (positioned by the caller)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitRect {
    pub width: f32,
    pub height: f32,
}

impl HitRect {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// True if the diver's current silhouette overlaps the base surface.
///
/// The base is positioned in diver-local space at the offset
/// `(collision_ref_x - diver.x, base.y - diver.y + collision_ref_y)`,
/// matching the reference points the original mask test was anchored to.
pub fn check_collision(diver: &Diver, base: &Base, geometry: &Geometry) -> bool {
    let silhouette = geometry.diver_rect(diver.state);

    let base_left = geometry.collision_ref_x - diver.pos.x;
    let base_top = base.y - diver.pos.y + geometry.collision_ref_y + geometry.base_surface_inset;
    let base_height = geometry.base_height - geometry.base_surface_inset;

    overlaps(
        0.0,
        0.0,
        silhouette.width,
        silhouette.height,
        base_left,
        base_top,
        geometry.base_width,
        base_height,
    )
}

/// Strict AABB overlap (touching edges do not count, as with mask overlap)
#[allow(clippy::too_many_arguments)]
fn overlaps(ax: f32, ay: f32, aw: f32, ah: f32, bx: f32, by: f32, bw: f32, bh: f32) -> bool {
    ax < bx + bw && bx < ax + aw && ay < by + bh && by < ay + ah
}
