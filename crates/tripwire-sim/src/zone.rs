//! A configured trigger zone: its effect, cooldown policy, occupants and RNG.

use std::sync::Arc;

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use tripwire_core::components::Health;
use tripwire_core::config::{AudioSourceSpec, ZoneEffectConfig, ZoneSpec};
use tripwire_core::enums::{EffectKind, OccupantKind};
use tripwire_core::types::{interval_ticks, secs_to_ticks, Transform, ZoneId};

use crate::cooldown::{CooldownPolicy, LocalCooldown, SharedCooldown};
use crate::occupancy::{EnterOutcome, OccupancyTracker};
use crate::rng::level_rng;

pub struct TriggerZone {
    pub id: ZoneId,
    pub transform: Transform,
    pub effect: ZoneEffectConfig,
    pub enabled: bool,
    pub policy: CooldownPolicy,
    pub tracker: OccupancyTracker,
    pub rng: ChaCha8Rng,
    /// Tick at which the zone was last enabled.
    pub enabled_at: u64,
    /// Ticks the zone stays enabled. 0 = forever.
    pub lifetime_ticks: u64,
    /// Gate for one-shot teleports under a local policy.
    pub teleport_clock: LocalCooldown,
}

impl TriggerZone {
    /// Build a zone from its spec. Zones opted into sharing receive the
    /// session's clock; the rest use local clocks.
    pub fn new(
        id: ZoneId,
        spec: ZoneSpec,
        shared: &Arc<SharedCooldown>,
        level_seed: Option<u64>,
        now: u64,
    ) -> Self {
        let (shared_flag, lifetime_ticks) = match &spec.effect {
            ZoneEffectConfig::Damage(config) => (
                config.shared_cooldown,
                secs_to_ticks(config.damage_duration as f64),
            ),
            ZoneEffectConfig::Teleport(config) => (config.shared_cooldown, 0),
        };
        let policy = if shared_flag {
            CooldownPolicy::Shared(shared.clone())
        } else {
            CooldownPolicy::Local
        };
        Self {
            id,
            transform: spec.transform,
            effect: spec.effect,
            enabled: true,
            policy,
            tracker: OccupancyTracker::new(),
            rng: level_rng(level_seed),
            enabled_at: now,
            lifetime_ticks,
            teleport_clock: LocalCooldown::new(),
        }
    }

    pub fn effect_kind(&self) -> EffectKind {
        match self.effect {
            ZoneEffectConfig::Damage(_) => EffectKind::Damage,
            ZoneEffectConfig::Teleport(_) => EffectKind::Teleport,
        }
    }

    /// Whether this zone acts on occupants of `kind`.
    pub fn accepts(&self, kind: OccupantKind) -> bool {
        match (&self.effect, kind) {
            (ZoneEffectConfig::Damage(_), OccupantKind::Player) => true,
            (ZoneEffectConfig::Damage(config), OccupantKind::Enemy) => config.trigger_for_enemies,
            (ZoneEffectConfig::Teleport(config), OccupantKind::Player) => config.trigger_for_players,
            (ZoneEffectConfig::Teleport(config), OccupantKind::Enemy) => config.trigger_for_enemies,
        }
    }

    /// Ticks between recurring effects for `kind`.
    pub fn interval_for(&self, kind: OccupantKind) -> u64 {
        match (&self.effect, kind) {
            (ZoneEffectConfig::Damage(config), OccupantKind::Player) => {
                interval_ticks(config.interval_for_players as f64)
            }
            (ZoneEffectConfig::Damage(config), OccupantKind::Enemy) => {
                interval_ticks(config.interval_for_enemies as f64)
            }
            (ZoneEffectConfig::Teleport(config), _) => secs_to_ticks(config.cooldown_secs as f64),
        }
    }

    /// Admission check plus tracker registration for recurring zones.
    /// Occupants without health, already dead or of a kind the zone ignores
    /// are silently skipped (`None`).
    pub fn on_enter(&mut self, world: &World, occupant: Entity) -> Option<EnterOutcome> {
        let kind = admit(world, occupant)?;
        if !self.enabled || !self.accepts(kind) {
            return None;
        }
        let sources: &[AudioSourceSpec] = match &self.effect {
            ZoneEffectConfig::Damage(config) => config.damage_audio_sources.as_slice(),
            ZoneEffectConfig::Teleport(_) => &[],
        };
        let position = world
            .get::<&Transform>(occupant)
            .map(|t| t.position)
            .unwrap_or_default();
        Some(self.tracker.on_enter(occupant, position, sources))
    }

    pub fn enable(&mut self, now: u64) {
        self.enabled = true;
        self.enabled_at = now;
    }

    /// Disable the zone, cancelling every occupant task.
    pub fn disable(&mut self) -> usize {
        self.enabled = false;
        self.tracker.on_zone_disable()
    }

    /// Whether the self-disable timer has run out at `now`.
    pub fn lifetime_expired(&self, now: u64) -> bool {
        self.enabled
            && self.lifetime_ticks > 0
            && now >= self.enabled_at.saturating_add(self.lifetime_ticks)
    }
}

/// Kind of a live occupant carrying health, or `None` if it cannot be affected.
pub fn admit(world: &World, occupant: Entity) -> Option<OccupantKind> {
    let kind = *world.get::<&OccupantKind>(occupant).ok()?;
    let health = world.get::<&Health>(occupant).ok()?;
    if health.dead {
        return None;
    }
    Some(kind)
}
