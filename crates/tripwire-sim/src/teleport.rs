//! Teleport effect: picks a linked zone and relocates the occupant there.

use glam::Vec3;
use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use tripwire_core::components::ExternalForces;
use tripwire_core::config::{AudioSettings, TeleportConfig};
use tripwire_core::constants::ENEMY_NAV_RADIUS;
use tripwire_core::enums::{ForceDirection, OccupantKind};
use tripwire_core::events::PresentationEvent;
use tripwire_core::types::{NetId, Transform, ZoneId};

use crate::dispatch::EffectResult;
use crate::nav::NavMesh;

/// A linked destination zone as seen by the firing zone.
#[derive(Debug, Clone, Copy)]
pub struct TeleportTarget {
    pub zone: ZoneId,
    pub frame: Transform,
    pub audio: AudioSettings,
}

pub struct TeleportContext<'a> {
    pub zone: ZoneId,
    pub config: &'a TeleportConfig,
    /// Resolved `config.targets`, unknown ids already filtered out.
    pub targets: &'a [TeleportTarget],
}

/// Uniform index into a list of `len` targets.
pub fn select_target(rng: &mut ChaCha8Rng, len: usize) -> Option<usize> {
    (len > 0).then(|| rng.gen_range(0..len))
}

/// Offset from the target along its own axes. Zero for a fixed destination
/// or when there is no target. Center has no meaning here and is zero too.
pub fn teleport_offset(
    mode: ForceDirection,
    target: Option<&Transform>,
    magnitude: f32,
    fixed_destination: bool,
) -> Vec3 {
    let Some(frame) = target else {
        return Vec3::ZERO;
    };
    if fixed_destination {
        return Vec3::ZERO;
    }
    let direction = match mode {
        ForceDirection::Forward => frame.forward(),
        ForceDirection::Backward => -frame.forward(),
        ForceDirection::Up => frame.up(),
        ForceDirection::Down => -frame.up(),
        ForceDirection::Left => -frame.right(),
        ForceDirection::Right => frame.right(),
        ForceDirection::Center => Vec3::ZERO,
    };
    direction.normalize_or_zero() * magnitude
}

/// Teleport one occupant. `None` if the occupant is stale or there is
/// nowhere to go.
pub fn apply_teleport(
    world: &mut World,
    occupant: Entity,
    ctx: &TeleportContext,
    rng: &mut ChaCha8Rng,
    nav: &dyn NavMesh,
    events: &mut Vec<PresentationEvent>,
) -> Option<EffectResult> {
    let kind = *world.get::<&OccupantKind>(occupant).ok()?;
    let net_id = *world.get::<&NetId>(occupant).ok()?;
    let config = ctx.config;

    let index = select_target(rng, ctx.targets.len());
    let target = index.map(|i| &ctx.targets[i]);
    let fixed = config.fixed_destination;
    let anchor = match (fixed, target) {
        (Some(point), _) => point,
        (None, Some(target)) => target.frame.position,
        (None, None) => {
            tracing::warn!(zone = %ctx.zone, "teleport has no destination");
            return None;
        }
    };
    let frame = target.map(|t| &t.frame);
    let mut destination = anchor
        + teleport_offset(
            config.force_direction,
            frame,
            config.force_magnitude,
            fixed.is_some(),
        );

    if let Some(target) = target {
        if config.sound_attracts_dogs {
            events.push(PresentationEvent::AudibleNoise {
                position: target.frame.position,
                range: target.audio.max_distance,
                loudness: target.audio.volume,
            });
        }
    }

    let mut force = Vec3::ZERO;
    match kind {
        OccupantKind::Player => {
            // Players hear the clip matching the chosen target.
            if let (Some(target), Some(clip)) = (target, index.and_then(|i| config.clips.get(i))) {
                events.push(PresentationEvent::PlayClip {
                    position: target.frame.position,
                    clip: clip.clone(),
                    volume: target.audio.volume,
                });
            }
            force = teleport_offset(
                config.force_direction,
                frame,
                config.force_magnitude_after_teleport,
                fixed.is_some(),
            );
            if let Ok(mut forces) = world.get::<&mut ExternalForces>(occupant) {
                forces.0 += force;
            }
        }
        OccupantKind::Enemy => {
            if let Some(target) = target {
                if !config.clips.is_empty() {
                    let clip = &config.clips[rng.gen_range(0..config.clips.len())];
                    events.push(PresentationEvent::PlayClip {
                        position: target.frame.position,
                        clip: clip.clone(),
                        volume: target.audio.volume,
                    });
                }
            }
            destination = nav.project(destination, ENEMY_NAV_RADIUS);
        }
    }

    let from = {
        let mut transform = world.get::<&mut Transform>(occupant).ok()?;
        let from = transform.position;
        transform.position = destination;
        from
    };
    events.push(PresentationEvent::Teleported {
        zone: ctx.zone,
        occupant: net_id,
        from,
        to: destination,
    });

    Some(EffectResult {
        alive: true,
        force,
        death_artifact: None,
        moved_to: Some(destination),
    })
}
