//! Snapshot system: builds a complete SessionSnapshot from the session state.
//!
//! This system is read-only. It never modifies the world.

use hecs::World;

use tripwire_core::components::{ExternalForces, Health};
use tripwire_core::enums::{OccupantKind, PeerRole};
use tripwire_core::state::*;
use tripwire_core::types::{NetId, SimTime, Transform};

use crate::cooldown::SharedCooldown;
use crate::hazards::LightningHazard;
use crate::scheduler::Scheduler;
use crate::zone::TriggerZone;

pub struct SnapshotSources<'a> {
    pub world: &'a World,
    pub time: SimTime,
    pub role: PeerRole,
    pub zones: &'a [TriggerZone],
    pub hazards: &'a [LightningHazard],
    pub scheduler: &'a Scheduler,
    pub shared_cooldown: &'a SharedCooldown,
    pub stats: SessionStats,
}

pub fn build_snapshot(src: &SnapshotSources) -> SessionSnapshot {
    SessionSnapshot {
        time: src.time,
        role: src.role,
        zones: build_zones(src.world, src.zones),
        hazards: build_hazards(src.hazards),
        occupants: build_occupants(src.world),
        active_tasks: src.scheduler.active(),
        shared_cooldown_last_fired: src.shared_cooldown.last_fired(),
        stats: src.stats,
    }
}

/// Zones in creation order, each listing occupants by NetId.
fn build_zones(world: &World, zones: &[TriggerZone]) -> Vec<ZoneView> {
    zones
        .iter()
        .map(|zone| {
            let mut occupants: Vec<NetId> = zone
                .tracker
                .occupants()
                .filter_map(|e| world.get::<&NetId>(e).ok().map(|id| *id))
                .collect();
            occupants.sort();
            ZoneView {
                id: zone.id,
                effect: zone.effect_kind(),
                enabled: zone.enabled,
                occupants,
            }
        })
        .collect()
}

fn build_hazards(hazards: &[LightningHazard]) -> Vec<HazardView> {
    hazards
        .iter()
        .map(|h| HazardView {
            id: h.id,
            enabled: h.enabled,
            next_strike_tick: h.next_strike_at,
        })
        .collect()
}

/// Occupants sorted by NetId so snapshots compare equal across peers.
fn build_occupants(world: &World) -> Vec<OccupantView> {
    let mut occupants: Vec<OccupantView> = world
        .query::<(&NetId, &OccupantKind, &Transform, &Health, &ExternalForces)>()
        .iter()
        .map(|(_, (id, kind, transform, health, forces))| OccupantView {
            id: *id,
            kind: *kind,
            position: transform.position,
            hp: health.hp,
            dead: health.dead,
            external_forces: forces.0,
        })
        .collect();
    occupants.sort_by_key(|o| o.id);
    occupants
}
