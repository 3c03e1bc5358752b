//! Keeps hazard spawns clear of spawn-denial points.

use glam::Vec3;

use tripwire_core::config::SpawnDenialPoint;
use tripwire_core::constants::{SPAWN_DENIAL_PADDING, SPAWN_DENIAL_SCALE_MARKER};

/// Clearance a hazard of `object_width` must keep from `point`.
/// Marked points carry their own radius in `local_scale.x`.
pub fn denial_radius(point: &SpawnDenialPoint, object_width: f32) -> f32 {
    if point.name.contains(SPAWN_DENIAL_SCALE_MARKER) {
        point.local_scale.x
    } else {
        object_width + SPAWN_DENIAL_PADDING
    }
}

pub fn is_spawn_allowed(candidate: Vec3, points: &[SpawnDenialPoint], object_width: f32) -> bool {
    points
        .iter()
        .all(|point| candidate.distance(point.position) >= denial_radius(point, object_width))
}
