//! Session engine: the core of a Tripwire peer.
//!
//! `SessionEngine` owns the hecs occupant world, every trigger zone and
//! hazard, the session's shared cooldown clock and the recurring-task
//! scheduler. The host feeds it overlap signals and net messages; each
//! `tick()` returns presentation events and outbound messages. Completely
//! headless, so two engines with the same seed can be compared in tests.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use glam::Vec3;
use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use tripwire_core::commands::HostCommand;
use tripwire_core::components::{ExternalForces, Health, HeldWeapon};
use tripwire_core::config::{
    LightningConfig, OccupantSpec, SpawnDenialPoint, ZoneEffectConfig, ZoneSpec,
};
use tripwire_core::constants::COOLDOWN_POLL_TICKS;
use tripwire_core::enums::{EffectKind, OccupantKind, PeerRole};
use tripwire_core::events::PresentationEvent;
use tripwire_core::net::NetMessage;
use tripwire_core::state::{SessionSnapshot, SessionStats};
use tripwire_core::types::{HazardId, NetId, SimTime, Transform, ZoneId};
use tripwire_core::{TripwireError, TripwireResult};

use crate::authority::{self, Gate, Rejection};
use crate::cooldown::{CooldownPolicy, LocalCooldown, SharedCooldown};
use crate::dispatch::{apply_damage, DamageContext, EffectResult};
use crate::hazards::{self, LightningHazard};
use crate::nav::{NavMesh, OpenGround};
use crate::occupancy::{closest_source, EnterOutcome};
use crate::rng::level_rng;
use crate::scheduler::{Scheduler, TaskId};
use crate::systems;
use crate::systems::snapshot::SnapshotSources;
use crate::teleport::{apply_teleport, TeleportContext, TeleportTarget};
use crate::weapons::{self, DamageAccumulator};
use crate::zone::{admit, TriggerZone};

/// Configuration for starting a new session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Level seed shared by every peer. `None` = no level loaded.
    pub level_seed: Option<u64>,
    pub role: PeerRole,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            level_seed: Some(42),
            role: PeerRole::Authority,
        }
    }
}

impl SessionConfig {
    pub fn with_level_seed(mut self, seed: Option<u64>) -> Self {
        self.level_seed = seed;
        self
    }

    pub fn with_role(mut self, role: PeerRole) -> Self {
        self.role = role;
        self
    }
}

/// Everything produced by one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutput {
    /// Instant the tick simulated (before advancing).
    pub time: SimTime,
    pub presentation: Vec<PresentationEvent>,
    pub outbox: Vec<NetMessage>,
}

/// One peer's session.
pub struct SessionEngine {
    world: World,
    time: SimTime,
    role: PeerRole,
    level_seed: Option<u64>,
    zones: Vec<TriggerZone>,
    hazards: Vec<LightningHazard>,
    shared_cooldown: Arc<SharedCooldown>,
    scheduler: Scheduler,
    due_buffer: Vec<TaskId>,
    /// Authority-side rate limit for client intents, per residency.
    intent_clocks: BTreeMap<(ZoneId, NetId), LocalCooldown>,
    net_ids: BTreeMap<NetId, Entity>,
    command_queue: VecDeque<HostCommand>,
    inbox: VecDeque<NetMessage>,
    presentation: Vec<PresentationEvent>,
    outbox: Vec<NetMessage>,
    accumulator: DamageAccumulator,
    /// Created on the first swing.
    weapon_rng: Option<ChaCha8Rng>,
    nav: Box<dyn NavMesh>,
    listener_indoors: bool,
    spawn_denial_points: Vec<SpawnDenialPoint>,
    stats: SessionStats,
}

impl SessionEngine {
    pub fn new(config: SessionConfig) -> Self {
        tracing::info!(role = ?config.role, seed = ?config.level_seed, "session started");
        Self {
            world: World::new(),
            time: SimTime::default(),
            role: config.role,
            level_seed: config.level_seed,
            zones: Vec::new(),
            hazards: Vec::new(),
            shared_cooldown: Arc::new(SharedCooldown::new()),
            scheduler: Scheduler::new(),
            due_buffer: Vec::new(),
            intent_clocks: BTreeMap::new(),
            net_ids: BTreeMap::new(),
            command_queue: VecDeque::new(),
            inbox: VecDeque::new(),
            presentation: Vec::new(),
            outbox: Vec::new(),
            accumulator: DamageAccumulator::new(),
            weapon_rng: None,
            nav: Box::new(OpenGround),
            listener_indoors: false,
            spawn_denial_points: Vec::new(),
            stats: SessionStats::default(),
        }
    }

    /// Replace the navigation hook (defaults to [`OpenGround`]).
    pub fn with_nav_mesh(mut self, nav: impl NavMesh + 'static) -> Self {
        self.nav = Box::new(nav);
        self
    }

    /// Add a zone. Ids are assigned in creation order.
    pub fn add_zone(&mut self, spec: ZoneSpec) -> TripwireResult<ZoneId> {
        spec.validate()?;
        let id = ZoneId(self.zones.len() as u32);
        let zone = TriggerZone::new(id, spec, &self.shared_cooldown, self.level_seed, self.time.tick);
        tracing::debug!(zone = %id, effect = ?zone.effect_kind(), shared = zone.policy.is_shared(), "zone added");
        self.zones.push(zone);
        Ok(id)
    }

    /// Verify every teleport target refers to an existing zone.
    pub fn check_links(&self) -> TripwireResult<()> {
        for zone in &self.zones {
            if let ZoneEffectConfig::Teleport(config) = &zone.effect {
                if let Some(&target) = config.targets.iter().find(|t| self.zone_index(**t).is_none()) {
                    return Err(TripwireError::UnknownTeleportTarget { zone: zone.id, target });
                }
            }
        }
        Ok(())
    }

    pub fn add_lightning(
        &mut self,
        transform: Transform,
        config: LightningConfig,
    ) -> TripwireResult<HazardId> {
        config.validate()?;
        let id = HazardId(self.hazards.len() as u32);
        self.hazards.push(LightningHazard::new(id, transform, config, self.level_seed, self.time.tick));
        tracing::debug!(hazard = %id, "lightning hazard added");
        Ok(id)
    }

    /// Spawn an occupant. Enemies start with an empty damage carry.
    pub fn spawn_occupant(&mut self, spec: OccupantSpec) -> TripwireResult<Entity> {
        if self.net_ids.contains_key(&spec.id) {
            return Err(TripwireError::DuplicateOccupant(spec.id));
        }
        let health = Health {
            hp: spec.hp,
            ..Default::default()
        };
        let entity = self.world.spawn((
            spec.id,
            spec.kind,
            spec.transform,
            health,
            ExternalForces::default(),
        ));
        if let Some(config) = spec.weapon {
            let weapon = HeldWeapon {
                hit_force: config.hit_force,
                config,
            };
            // The entity was spawned above; insertion cannot miss.
            self.world
                .insert_one(entity, weapon)
                .map_err(|_| TripwireError::UnknownOccupant(spec.id))?;
        }
        if spec.kind == OccupantKind::Enemy {
            self.accumulator.register(entity);
        }
        self.net_ids.insert(spec.id, entity);
        tracing::debug!(occupant = %spec.id, kind = ?spec.kind, "occupant spawned");
        Ok(entity)
    }

    pub fn entity(&self, id: NetId) -> Option<Entity> {
        self.net_ids.get(&id).copied()
    }

    /// Queue a host command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: HostCommand) {
        self.command_queue.push_back(command);
    }

    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = HostCommand>) {
        self.command_queue.extend(commands);
    }

    /// Queue an inbound net message for the next tick.
    pub fn receive(&mut self, message: NetMessage) {
        self.inbox.push_back(message);
    }

    /// Advance the session by one tick.
    pub fn tick(&mut self) -> TickOutput {
        let time = self.time;
        self.process_commands();
        self.process_inbox();
        self.run_systems();
        self.time.advance();

        TickOutput {
            time,
            presentation: std::mem::take(&mut self.presentation),
            outbox: std::mem::take(&mut self.outbox),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        systems::snapshot::build_snapshot(&SnapshotSources {
            world: &self.world,
            time: self.time,
            role: self.role,
            zones: &self.zones,
            hazards: &self.hazards,
            scheduler: &self.scheduler,
            shared_cooldown: &self.shared_cooldown,
            stats: self.stats,
        })
    }

    /// Tear the session down: every task ends, every zone forgets its
    /// occupants and the shared clock is reset.
    pub fn end_session(&mut self) {
        let tasks = self.scheduler.active();
        self.scheduler.clear();
        for zone in &mut self.zones {
            zone.tracker.on_zone_disable();
        }
        self.shared_cooldown.reset();
        self.intent_clocks.clear();
        self.command_queue.clear();
        self.inbox.clear();
        tracing::info!(tick = self.time.tick, tasks, "session ended");
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn role(&self) -> PeerRole {
        self.role
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn shared_cooldown(&self) -> &Arc<SharedCooldown> {
        &self.shared_cooldown
    }

    /// Live recurring tasks for one occupant in one zone.
    pub fn active_tasks_for(&self, zone: ZoneId, occupant: NetId) -> usize {
        self.entity(occupant)
            .map(|e| self.scheduler.active_for(zone, e))
            .unwrap_or(0)
    }

    pub fn set_spawn_denial_points(&mut self, points: Vec<SpawnDenialPoint>) {
        self.spawn_denial_points = points;
    }

    /// Whether a hazard of `object_width` may spawn at `candidate`.
    pub fn hazard_spawn_allowed(&self, candidate: Vec3, object_width: f32) -> bool {
        hazards::is_spawn_allowed(candidate, &self.spawn_denial_points, object_width)
    }

    fn zone_index(&self, id: ZoneId) -> Option<usize> {
        let index = id.0 as usize;
        (index < self.zones.len()).then_some(index)
    }

    // ---- Commands ----

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: HostCommand) {
        let now = self.time.tick;
        match command {
            HostCommand::ZoneEnter { zone, occupant } => self.on_enter(zone, occupant),
            HostCommand::ZoneExit { zone, occupant } => {
                let (Some(index), Some(entity)) = (self.zone_index(zone), self.entity(occupant)) else {
                    tracing::warn!(%zone, %occupant, "exit for unknown zone or occupant");
                    return;
                };
                if self.zones[index].tracker.on_exit(entity) {
                    tracing::debug!(%zone, %occupant, "occupant left zone");
                }
            }
            HostCommand::Interact { zone, occupant } => self.on_interact(zone, occupant),
            HostCommand::Swing { wielder, targets, tip } => match authority::gate(self.role) {
                Gate::Commit => {
                    if self.apply_swing(wielder, &targets, tip) {
                        self.outbox.push(NetMessage::SwingCommit {
                            wielder,
                            targets,
                            tip,
                            tick: now,
                        });
                        self.stats.commits_sent += 1;
                    }
                }
                Gate::Forward => {
                    self.outbox.push(NetMessage::SwingIntent { wielder, targets, tip });
                    self.stats.intents_sent += 1;
                }
            },
            HostCommand::SetZoneEnabled { zone, enabled } => {
                let Some(index) = self.zone_index(zone) else {
                    tracing::warn!(%zone, "toggle for unknown zone");
                    return;
                };
                let zone = &mut self.zones[index];
                match (enabled, zone.enabled) {
                    (true, false) => zone.enable(now),
                    (false, true) => {
                        let released = zone.disable();
                        tracing::debug!(zone = %zone.id, released, "zone disabled");
                    }
                    _ => {}
                }
            }
            HostCommand::SetHazardEnabled { hazard, enabled } => {
                let Some(h) = self.hazards.get_mut(hazard.0 as usize) else {
                    tracing::warn!(%hazard, "toggle for unknown hazard");
                    return;
                };
                if enabled {
                    h.enable(now);
                } else {
                    h.disable();
                }
            }
            HostCommand::Despawn { occupant } => {
                // Tasks notice the missing entity when they next wake.
                if let Some(entity) = self.net_ids.remove(&occupant) {
                    let _ = self.world.despawn(entity);
                    self.accumulator.remove(entity);
                    tracing::debug!(%occupant, "occupant despawned");
                }
            }
            HostCommand::SetListenerIndoors { indoors } => self.listener_indoors = indoors,
        }
    }

    fn on_enter(&mut self, zone_id: ZoneId, occupant: NetId) {
        let (Some(index), Some(entity)) = (self.zone_index(zone_id), self.entity(occupant)) else {
            tracing::warn!(zone = %zone_id, %occupant, "enter for unknown zone or occupant");
            return;
        };
        let Some(kind) = admit(&self.world, entity) else {
            return;
        };
        if self.role == PeerRole::Client && kind == OccupantKind::Enemy {
            return;
        }

        let now = self.time.tick;
        match self.zones[index].effect_kind() {
            EffectKind::Damage => {
                let zone = &mut self.zones[index];
                if let Some(EnterOutcome::Started(token)) = zone.on_enter(&self.world, entity) {
                    let interval = zone.interval_for(kind);
                    self.scheduler.spawn(zone_id, entity, now, interval, token);
                    tracing::debug!(zone = %zone_id, %occupant, interval, "occupant entered zone");
                }
            }
            EffectKind::Teleport => self.try_teleport(index, entity, kind, now),
        }
    }

    fn on_interact(&mut self, zone_id: ZoneId, occupant: NetId) {
        let (Some(index), Some(entity)) = (self.zone_index(zone_id), self.entity(occupant)) else {
            tracing::warn!(zone = %zone_id, %occupant, "interact with unknown zone or occupant");
            return;
        };
        if self.zones[index].effect_kind() != EffectKind::Teleport {
            return;
        }
        if let Some(OccupantKind::Player) = admit(&self.world, entity) {
            self.try_teleport(index, entity, OccupantKind::Player, self.time.tick);
        }
    }

    /// One-shot teleport, gated by the zone's optional cooldown.
    fn try_teleport(&mut self, index: usize, entity: Entity, kind: OccupantKind, now: u64) {
        if !self.has_teleport_destination(index) {
            tracing::warn!(zone = %self.zones[index].id, "teleport has no destination");
            return;
        }
        let zone = &mut self.zones[index];
        if !zone.enabled || !zone.accepts(kind) {
            return;
        }
        let cooldown = zone.interval_for(kind);
        if !zone.policy.try_acquire(&mut zone.teleport_clock, now, cooldown) {
            tracing::debug!(zone = %zone.id, "teleport cooling down");
            return;
        }
        self.fire_effect(index, entity, now);
    }

    // ---- Net messages ----

    fn process_inbox(&mut self) {
        while let Some(message) = self.inbox.pop_front() {
            if let Err(rejection) = self.handle_message(message.clone()) {
                self.stats.rejected_messages += 1;
                tracing::warn!(?rejection, ?message, role = ?self.role, "rejected net message");
            }
        }
    }

    fn handle_message(&mut self, message: NetMessage) -> Result<(), Rejection> {
        authority::accepts(self.role, &message)?;
        let now = self.time.tick;
        match message {
            NetMessage::Intent { zone, occupant, effect } => {
                let (index, entity) = self.resolve(zone, occupant)?;
                let kind = admit(&self.world, entity).ok_or(Rejection::NotApplicable)?;
                let target = &self.zones[index];
                if !target.enabled || !target.accepts(kind) || target.effect_kind() != effect {
                    return Err(Rejection::NotApplicable);
                }
                if effect == EffectKind::Teleport && !self.has_teleport_destination(index) {
                    return Err(Rejection::NotApplicable);
                }
                let interval = target.interval_for(kind);
                let ready = self
                    .intent_clocks
                    .get(&(zone, occupant))
                    .map_or(true, |clock| clock.ready(now, interval));
                if !ready {
                    return Err(Rejection::CoolingDown);
                }
                if let CooldownPolicy::Shared(shared) = &target.policy {
                    if !shared.try_acquire(now, interval) {
                        return Err(Rejection::CoolingDown);
                    }
                }
                self.commit_effect(index, entity).ok_or(Rejection::NotApplicable)?;
                self.intent_clocks
                    .entry((zone, occupant))
                    .or_default()
                    .try_acquire(now, interval);
                self.outbox.push(NetMessage::Commit {
                    zone,
                    occupant,
                    effect,
                    tick: now,
                });
                self.stats.commits_sent += 1;
                Ok(())
            }
            NetMessage::Commit { zone, occupant, effect, tick } => {
                self.stats.commits_received += 1;
                let (index, entity) = self.resolve(zone, occupant)?;
                if self.zones[index].effect_kind() != effect {
                    return Err(Rejection::NotApplicable);
                }
                if self.zones[index].policy.is_shared() {
                    // Mirror the authority's acquisition instant.
                    self.shared_cooldown.try_acquire(tick, 0);
                }
                self.commit_effect(index, entity).ok_or(Rejection::NotApplicable)?;
                Ok(())
            }
            NetMessage::SwingIntent { wielder, targets, tip } => {
                if !self.apply_swing(wielder, &targets, tip) {
                    return Err(Rejection::UnknownOccupant);
                }
                self.outbox.push(NetMessage::SwingCommit {
                    wielder,
                    targets,
                    tip,
                    tick: now,
                });
                self.stats.commits_sent += 1;
                Ok(())
            }
            NetMessage::SwingCommit { wielder, targets, tip, .. } => {
                self.stats.commits_received += 1;
                if self.apply_swing(wielder, &targets, tip) {
                    Ok(())
                } else {
                    Err(Rejection::UnknownOccupant)
                }
            }
        }
    }

    fn resolve(&self, zone: ZoneId, occupant: NetId) -> Result<(usize, Entity), Rejection> {
        let index = self.zone_index(zone).ok_or(Rejection::UnknownZone)?;
        let entity = self.entity(occupant).ok_or(Rejection::UnknownOccupant)?;
        Ok((index, entity))
    }

    // ---- Systems ----

    fn run_systems(&mut self) {
        let now = self.time.tick;

        systems::lifetime::run(&mut self.zones, now);

        self.run_tasks(now);

        for hazard in &mut self.hazards {
            if hazard.run(now, self.nav.as_ref(), self.listener_indoors, &mut self.presentation) {
                self.stats.lightning_strikes += 1;
            }
        }
    }

    fn run_tasks(&mut self, now: u64) {
        self.scheduler.sweep_cancelled();
        let mut due = std::mem::take(&mut self.due_buffer);
        self.scheduler.collect_due(now, &mut due);
        for &id in &due {
            self.run_task(id, now);
        }
        self.due_buffer = due;
    }

    fn run_task(&mut self, id: TaskId, now: u64) {
        let Some(task) = self.scheduler.get(id) else {
            return;
        };
        let (zone_id, occupant, interval) = (task.zone, task.occupant, task.interval);
        // An earlier task this tick may have killed the occupant.
        if task.token.is_cancelled() {
            self.scheduler.remove(id);
            return;
        }
        let Some(index) = self.zone_index(zone_id) else {
            self.scheduler.remove(id);
            return;
        };
        if admit(&self.world, occupant).is_none() {
            self.scheduler.remove(id);
            self.zones[index].tracker.remove_terminal(occupant);
            tracing::debug!(zone = %zone_id, "stale occupant, task ended");
            return;
        }

        let zone = &self.zones[index];
        let Some(task) = self.scheduler.get_mut(id) else {
            return;
        };
        if !zone.policy.try_acquire(&mut task.local, now, interval) {
            task.wake_at = now + COOLDOWN_POLL_TICKS;
            return;
        }
        task.wake_at = now + interval;
        self.fire_effect(index, occupant, now);
    }

    // ---- Effects ----

    /// Route a locally triggered effect through the authority boundary.
    fn fire_effect(&mut self, index: usize, entity: Entity, now: u64) {
        let zone = self.zones[index].id;
        let effect = self.zones[index].effect_kind();
        let Ok(occupant) = self.world.get::<&NetId>(entity).map(|id| *id) else {
            return;
        };
        match authority::gate(self.role) {
            Gate::Commit => {
                if self.commit_effect(index, entity).is_some() {
                    self.outbox.push(NetMessage::Commit {
                        zone,
                        occupant,
                        effect,
                        tick: now,
                    });
                    self.stats.commits_sent += 1;
                }
            }
            Gate::Forward => {
                self.outbox.push(NetMessage::Intent { zone, occupant, effect });
                self.stats.intents_sent += 1;
            }
        }
    }

    /// Apply a zone's effect to one occupant and settle its consequences.
    fn commit_effect(&mut self, index: usize, entity: Entity) -> Option<EffectResult> {
        let result = match self.zones[index].effect_kind() {
            EffectKind::Damage => self.commit_damage(index, entity),
            EffectKind::Teleport => self.commit_teleport(index, entity),
        }?;
        self.stats.effects_applied += 1;

        if let Some(artifact) = &result.death_artifact {
            // Networked artifacts are spawned once by the authority and
            // replicated by the host; local ones spawn on every peer.
            if !artifact.networked || self.role == PeerRole::Authority {
                self.presentation
                    .push(PresentationEvent::SpawnDeathArtifact(artifact.clone()));
            }
        }
        if result.is_terminal() {
            self.end_occupant(entity);
            self.stats.deaths += 1;
        }
        Some(result)
    }

    fn commit_damage(&mut self, index: usize, entity: Entity) -> Option<EffectResult> {
        let position = self.world.get::<&Transform>(entity).ok()?.position;
        let zone = &mut self.zones[index];
        let ZoneEffectConfig::Damage(config) = &zone.effect else {
            return None;
        };
        let sources = &config.damage_audio_sources;
        let audio_source = zone
            .tracker
            .audio_source(entity)
            .or_else(|| closest_source(sources, position))
            .and_then(|i| sources.get(i));
        let ctx = DamageContext {
            zone: zone.id,
            frame: &zone.transform,
            config,
            audio_source,
        };
        apply_damage(&mut self.world, entity, &ctx, &mut zone.rng, &mut self.presentation)
    }

    fn commit_teleport(&mut self, index: usize, entity: Entity) -> Option<EffectResult> {
        let targets = self.teleport_targets(index);
        let zone = &mut self.zones[index];
        let ZoneEffectConfig::Teleport(config) = &zone.effect else {
            return None;
        };
        let ctx = TeleportContext {
            zone: zone.id,
            config,
            targets: &targets,
        };
        apply_teleport(
            &mut self.world,
            entity,
            &ctx,
            &mut zone.rng,
            self.nav.as_ref(),
            &mut self.presentation,
        )
    }

    /// Whether a teleport out of this zone would land anywhere.
    fn has_teleport_destination(&self, index: usize) -> bool {
        match &self.zones[index].effect {
            ZoneEffectConfig::Teleport(config) => {
                config.fixed_destination.is_some()
                    || config.targets.iter().any(|&id| self.zone_index(id).is_some())
            }
            ZoneEffectConfig::Damage(_) => false,
        }
    }

    /// Linked destinations of a teleport zone. Unknown ids are skipped.
    fn teleport_targets(&self, index: usize) -> Vec<TeleportTarget> {
        let ZoneEffectConfig::Teleport(config) = &self.zones[index].effect else {
            return Vec::new();
        };
        config
            .targets
            .iter()
            .filter_map(|&id| self.zone_index(id))
            .map(|i| {
                let target = &self.zones[i];
                let audio = match &target.effect {
                    ZoneEffectConfig::Teleport(c) => c.audio,
                    ZoneEffectConfig::Damage(_) => Default::default(),
                };
                TeleportTarget {
                    zone: target.id,
                    frame: target.transform,
                    audio,
                }
            })
            .collect()
    }

    /// Forget a dead occupant in every zone.
    fn end_occupant(&mut self, entity: Entity) {
        for zone in &mut self.zones {
            zone.tracker.remove_terminal(entity);
        }
        self.accumulator.remove(entity);
    }

    /// Resolve a swing. Returns false if the wielder is unknown or unarmed.
    fn apply_swing(&mut self, wielder: NetId, targets: &[NetId], tip: Vec3) -> bool {
        let Some(wielder_entity) = self.entity(wielder) else {
            return false;
        };
        let target_entities: Vec<Entity> = targets.iter().filter_map(|&t| self.entity(t)).collect();
        let level_seed = self.level_seed;
        let rng = self.weapon_rng.get_or_insert_with(|| level_rng(level_seed));
        let Some(outcome) = weapons::swing(
            &self.world,
            wielder_entity,
            &target_entities,
            tip,
            rng,
            &mut self.accumulator,
            &mut self.presentation,
        ) else {
            return false;
        };
        for killed in outcome.kills {
            if let Some(entity) = self.entity(killed) {
                self.end_occupant(entity);
                self.stats.deaths += 1;
            }
        }
        true
    }
}
