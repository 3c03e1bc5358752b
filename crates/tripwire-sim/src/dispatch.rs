//! Action dispatcher: applies a zone's damage effect to one occupant.
//!
//! Pure application: the engine decides *whether* an effect may run
//! (cooldown, authority) and this module decides *what* it does.

use glam::Vec3;
use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use tripwire_core::components::{ExternalForces, Health};
use tripwire_core::config::{AudioSourceSpec, DamageConfig, DeathPrefab};
use tripwire_core::enums::{ForceDirection, OccupantKind};
use tripwire_core::events::{DeathArtifactRequest, PresentationEvent};
use tripwire_core::types::{NetId, Transform, ZoneId};

/// Outcome of one dispatch. Consumed immediately by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectResult {
    pub alive: bool,
    /// Impulse added to the occupant (or the ragdoll, if it died).
    pub force: Vec3,
    pub death_artifact: Option<DeathArtifactRequest>,
    pub moved_to: Option<Vec3>,
}

impl EffectResult {
    pub fn is_terminal(&self) -> bool {
        !self.alive
    }
}

/// Unit direction for `mode`, or zero when it is undefined.
///
/// Forward/Backward/Left/Right follow the reference frame (zone or
/// occupant). Up/Down are world axes. Center points from the zone to the
/// occupant when `from_zone`, otherwise from the occupant to the zone.
pub fn resolve_direction(
    mode: ForceDirection,
    zone: &Transform,
    occupant: &Transform,
    from_zone: bool,
) -> Vec3 {
    let frame = if from_zone { zone } else { occupant };
    let direction = match mode {
        ForceDirection::Forward => frame.forward(),
        ForceDirection::Backward => -frame.forward(),
        ForceDirection::Up => Vec3::Y,
        ForceDirection::Down => Vec3::NEG_Y,
        ForceDirection::Left => -frame.right(),
        ForceDirection::Right => frame.right(),
        ForceDirection::Center => {
            if from_zone {
                occupant.position - zone.position
            } else {
                zone.position - occupant.position
            }
        }
    };
    direction.normalize_or_zero()
}

/// Scaled force vector for a damage zone.
pub fn force_vector(
    mode: ForceDirection,
    zone: &Transform,
    occupant: &Transform,
    from_zone: bool,
    magnitude: f32,
) -> Vec3 {
    resolve_direction(mode, zone, occupant, from_zone) * magnitude
}

/// Everything the dispatcher needs to know about the firing zone.
pub struct DamageContext<'a> {
    pub zone: ZoneId,
    pub frame: &'a Transform,
    pub config: &'a DamageConfig,
    /// Source bound to this occupant on entry, if the zone has any.
    pub audio_source: Option<&'a AudioSourceSpec>,
}

/// Apply one tick of damage. Returns `None` if the occupant is gone or
/// already dead (stale reference), leaving the world untouched.
pub fn apply_damage(
    world: &mut World,
    occupant: Entity,
    ctx: &DamageContext,
    rng: &mut ChaCha8Rng,
    events: &mut Vec<PresentationEvent>,
) -> Option<EffectResult> {
    let kind = *world.get::<&OccupantKind>(occupant).ok()?;
    let net_id = *world.get::<&NetId>(occupant).ok()?;
    let transform = *world.get::<&Transform>(occupant).ok()?;
    let config = ctx.config;

    let amount = match kind {
        OccupantKind::Player => config.damage_to_players,
        OccupantKind::Enemy => config.damage_to_enemies,
    };

    let died = {
        let mut health = world.get::<&mut Health>(occupant).ok()?;
        if health.dead {
            return None;
        }
        health.hp -= amount;
        if health.hp <= 0 {
            health.dead = true;
            if kind == OccupantKind::Player {
                health.cause = Some(config.cause_of_death);
                health.death_animation = Some(config.death_animation);
            }
        }
        health.dead
    };

    events.push(PresentationEvent::OccupantDamaged {
        zone: Some(ctx.zone),
        occupant: net_id,
        amount,
        default_sfx: kind == OccupantKind::Player && config.play_default_damage_sfx,
    });
    play_damage_sound(config, ctx.audio_source, rng, events);

    let (force, prefab) = match kind {
        OccupantKind::Player => {
            let mode = config.force_direction;
            let from_zone = config.force_direction_from_zone;
            if died {
                let ragdoll = force_vector(
                    mode,
                    ctx.frame,
                    &transform,
                    from_zone,
                    config.force_magnitude_after_death,
                );
                events.push(PresentationEvent::OccupantKilled {
                    occupant: net_id,
                    cause: Some(config.cause_of_death),
                    animation: Some(config.death_animation),
                    ragdoll_force: ragdoll,
                });
                (ragdoll, config.death_prefab_for_player.as_ref())
            } else {
                let push = force_vector(
                    mode,
                    ctx.frame,
                    &transform,
                    from_zone,
                    config.force_magnitude_after_damage,
                );
                if let Ok(mut forces) = world.get::<&mut ExternalForces>(occupant) {
                    forces.0 += push;
                }
                (push, None)
            }
        }
        OccupantKind::Enemy => {
            if died {
                events.push(PresentationEvent::OccupantKilled {
                    occupant: net_id,
                    cause: None,
                    animation: None,
                    ragdoll_force: Vec3::ZERO,
                });
            }
            let prefab = if died {
                config.death_prefab_for_enemy.as_ref()
            } else {
                None
            };
            (Vec3::ZERO, prefab)
        }
    };

    Some(EffectResult {
        alive: !died,
        force,
        death_artifact: prefab.map(|p| death_artifact(p, &transform, kind)),
        moved_to: None,
    })
}

fn death_artifact(prefab: &DeathPrefab, at: &Transform, kind: OccupantKind) -> DeathArtifactRequest {
    DeathArtifactRequest {
        prefab: prefab.name.clone(),
        position: at.position,
        rotation: at.rotation,
        networked: prefab.networked,
        for_player: kind == OccupantKind::Player,
    }
}

/// Pick a damage clip and play it from the bound source. Silent when the
/// zone has no clips or the occupant no source.
fn play_damage_sound(
    config: &DamageConfig,
    source: Option<&AudioSourceSpec>,
    rng: &mut ChaCha8Rng,
    events: &mut Vec<PresentationEvent>,
) {
    let Some(source) = source else {
        return;
    };
    if config.damage_clips.is_empty() {
        return;
    }
    if config.sound_attracts_dogs {
        events.push(PresentationEvent::AudibleNoise {
            position: source.position,
            range: source.max_distance,
            loudness: source.volume,
        });
    }
    let clip = &config.damage_clips[rng.gen_range(0..config.damage_clips.len())];
    events.push(PresentationEvent::PlayClip {
        position: source.position,
        clip: clip.clone(),
        volume: source.volume,
    });
}
