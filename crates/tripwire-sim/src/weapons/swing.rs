//! A single melee swing against the occupants the host reported as hit.

use glam::Vec3;
use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use tripwire_core::components::{Health, HeldWeapon};
use tripwire_core::config::WeaponConfig;
use tripwire_core::enums::{CauseOfDeath, OccupantKind};
use tripwire_core::events::PresentationEvent;
use tripwire_core::types::NetId;

use super::accumulator::DamageAccumulator;
use super::crit::{critical_hit, with_override};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwingOutcome {
    pub critical: bool,
    /// Damage dealt per target, in hit order.
    pub hits: Vec<(NetId, i32)>,
    pub kills: Vec<NetId>,
}

/// Resolve one swing. The weapon's live hit force is overridden by the
/// crit roll for this swing only. `None` if the wielder holds no weapon.
pub fn swing(
    world: &World,
    wielder: Entity,
    targets: &[Entity],
    tip: Vec3,
    rng: &mut ChaCha8Rng,
    accumulator: &mut DamageAccumulator,
    events: &mut Vec<PresentationEvent>,
) -> Option<SwingOutcome> {
    let mut weapon = world.get::<&mut HeldWeapon>(wielder).ok()?;
    let config = weapon.config.clone();
    let base = weapon.hit_force;
    let force = if config.crit_possible {
        critical_hit(base, rng, config.crit_chance)
    } else {
        base
    };

    let outcome = with_override(&mut weapon.hit_force, force, |force| {
        let mut outcome = SwingOutcome {
            critical: *force != base,
            ..Default::default()
        };
        for &target in targets {
            if let Some((id, amount, died)) =
                hit_target(world, target, *force, &config, accumulator, events)
            {
                outcome.hits.push((id, amount));
                if died {
                    outcome.kills.push(id);
                }
            }
        }
        outcome
    });

    if config.can_break_trees {
        events.push(PresentationEvent::DestroyTree { position: tip });
    }
    Some(outcome)
}

fn hit_target(
    world: &World,
    target: Entity,
    force: i32,
    config: &WeaponConfig,
    accumulator: &mut DamageAccumulator,
    events: &mut Vec<PresentationEvent>,
) -> Option<(NetId, i32, bool)> {
    let kind = *world.get::<&OccupantKind>(target).ok()?;
    let id = *world.get::<&NetId>(target).ok()?;
    let mut health = world.get::<&mut Health>(target).ok()?;
    if health.dead {
        return None;
    }

    let amount = match (kind, config.fractional_hit_force) {
        (OccupantKind::Enemy, Some(fraction)) => accumulator.accumulate(target, fraction),
        _ => force,
    };
    health.hp -= amount;
    let died = health.hp <= 0;
    if died {
        health.dead = true;
        if kind == OccupantKind::Player {
            health.cause = Some(CauseOfDeath::Bludgeoning);
        }
    }

    events.push(PresentationEvent::OccupantDamaged {
        zone: None,
        occupant: id,
        amount,
        default_sfx: kind == OccupantKind::Player,
    });
    if died {
        events.push(PresentationEvent::OccupantKilled {
            occupant: id,
            cause: health.cause,
            animation: None,
            ragdoll_force: Vec3::ZERO,
        });
    }
    Some((id, amount, died))
}
