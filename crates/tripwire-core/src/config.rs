//! Static configuration records for zones, hazards, weapons and occupants.
//!
//! Every record is set once at creation. Missing fields in JSON fall back
//! to the defaults below.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::*;
use crate::error::{TripwireError, TripwireResult};
use crate::types::{NetId, Transform, ZoneId};

/// A positioned audio emitter referenced by zones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSourceSpec {
    pub position: Vec3,
    pub max_distance: f32,
    pub volume: f32,
}

impl Default for AudioSourceSpec {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            max_distance: DEFAULT_AUDIO_MAX_DISTANCE,
            volume: 1.0,
        }
    }
}

/// Object spawned where an occupant died.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeathPrefab {
    pub name: String,
    /// Networked prefabs are spawned by the authority only.
    #[serde(default)]
    pub networked: bool,
}

/// Damage-over-time zone settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageConfig {
    pub death_animation: DeathAnimation,
    pub force_direction: ForceDirection,
    pub force_magnitude_after_damage: f32,
    pub force_magnitude_after_death: f32,
    /// Resolve directions from the zone's frame (true) or the occupant's (false).
    pub force_direction_from_zone: bool,
    pub cause_of_death: CauseOfDeath,
    pub trigger_for_enemies: bool,
    /// Use the session-wide cooldown clock instead of a per-occupant one.
    pub shared_cooldown: bool,
    pub play_default_damage_sfx: bool,
    pub sound_attracts_dogs: bool,
    /// Seconds until the zone disables itself. 0 = never.
    pub damage_duration: f32,
    pub damage_to_players: i32,
    pub damage_to_enemies: i32,
    pub interval_for_players: f32,
    pub interval_for_enemies: f32,
    pub damage_clips: Vec<String>,
    pub damage_audio_sources: Vec<AudioSourceSpec>,
    pub death_prefab_for_player: Option<DeathPrefab>,
    pub death_prefab_for_enemy: Option<DeathPrefab>,
}

impl Default for DamageConfig {
    fn default() -> Self {
        Self {
            death_animation: DeathAnimation::Default,
            force_direction: ForceDirection::Forward,
            force_magnitude_after_damage: 0.0,
            force_magnitude_after_death: 0.0,
            force_direction_from_zone: true,
            cause_of_death: CauseOfDeath::Unknown,
            trigger_for_enemies: false,
            shared_cooldown: false,
            play_default_damage_sfx: false,
            sound_attracts_dogs: false,
            damage_duration: 0.0,
            damage_to_players: 0,
            damage_to_enemies: 0,
            interval_for_players: DEFAULT_DAMAGE_INTERVAL_SECS,
            interval_for_enemies: DEFAULT_DAMAGE_INTERVAL_SECS,
            damage_clips: Vec::new(),
            damage_audio_sources: Vec::new(),
            death_prefab_for_player: None,
            death_prefab_for_enemy: None,
        }
    }
}

impl DamageConfig {
    pub fn validate(&self) -> TripwireResult<()> {
        non_negative("damage_duration", self.damage_duration)?;
        non_negative("interval_for_players", self.interval_for_players)?;
        non_negative("interval_for_enemies", self.interval_for_enemies)?;
        Ok(())
    }
}

/// Volume and reach of a teleport zone's own audio source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub max_distance: f32,
    pub volume: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            max_distance: DEFAULT_AUDIO_MAX_DISTANCE,
            volume: 1.0,
        }
    }
}

/// Teleport zone settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeleportConfig {
    /// Linked zones to teleport to, in selection order.
    pub targets: Vec<ZoneId>,
    /// Fixed landing point. When set, directional offsets are zero.
    pub fixed_destination: Option<Vec3>,
    pub force_direction: ForceDirection,
    /// Offset from the target along the force direction.
    pub force_magnitude: f32,
    /// Impulse added to a player after landing.
    pub force_magnitude_after_teleport: f32,
    pub trigger_for_enemies: bool,
    pub trigger_for_players: bool,
    pub sound_attracts_dogs: bool,
    pub clips: Vec<String>,
    pub audio: AudioSettings,
    /// Minimum seconds between two teleports out of this zone. 0 = none.
    pub cooldown_secs: f32,
    pub shared_cooldown: bool,
}

impl Default for TeleportConfig {
    fn default() -> Self {
        Self {
            targets: Vec::new(),
            fixed_destination: None,
            force_direction: ForceDirection::Forward,
            force_magnitude: 1.0,
            force_magnitude_after_teleport: 0.0,
            trigger_for_enemies: false,
            trigger_for_players: false,
            sound_attracts_dogs: false,
            clips: Vec::new(),
            audio: AudioSettings::default(),
            cooldown_secs: 0.0,
            shared_cooldown: false,
        }
    }
}

impl TeleportConfig {
    pub fn validate(&self) -> TripwireResult<()> {
        non_negative("cooldown_secs", self.cooldown_secs)
    }
}

/// The effect a zone applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ZoneEffectConfig {
    Damage(DamageConfig),
    Teleport(TeleportConfig),
}

/// A zone placed in the level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSpec {
    #[serde(default)]
    pub transform: Transform,
    pub effect: ZoneEffectConfig,
}

impl ZoneSpec {
    pub fn validate(&self) -> TripwireResult<()> {
        match &self.effect {
            ZoneEffectConfig::Damage(config) => config.validate(),
            ZoneEffectConfig::Teleport(config) => config.validate(),
        }
    }
}

/// Scripted lightning emitter settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightningConfig {
    pub volume: f32,
    pub strike_clips: Vec<String>,
    /// Strike around the emitter (true) or around `bolt_positions` (false).
    pub use_object_position: bool,
    pub bolt_range_from_object: f32,
    pub bolt_positions: Vec<Vec3>,
    pub bolt_range_from_list: f32,
    pub strike_interval: f32,
    pub glow_width_multiplier: f32,
    pub number_of_bolts: u32,
    pub duration_min: f32,
    pub duration_max: f32,
    pub trunk_min: f32,
    pub trunk_max: f32,
}

impl Default for LightningConfig {
    fn default() -> Self {
        Self {
            volume: 0.2,
            strike_clips: Vec::new(),
            use_object_position: true,
            bolt_range_from_object: 10.0,
            bolt_positions: Vec::new(),
            bolt_range_from_list: 0.0,
            strike_interval: 5.0,
            glow_width_multiplier: 1.5,
            number_of_bolts: 1,
            duration_min: 0.6,
            duration_max: 1.2,
            trunk_min: 0.6,
            trunk_max: 1.2,
        }
    }
}

impl LightningConfig {
    pub fn validate(&self) -> TripwireResult<()> {
        non_negative("strike_interval", self.strike_interval)?;
        non_negative("bolt_range_from_object", self.bolt_range_from_object)?;
        non_negative("bolt_range_from_list", self.bolt_range_from_list)?;
        if self.duration_min > self.duration_max {
            return Err(TripwireError::InvalidConfig {
                field: "duration_min",
                reason: format!("{} exceeds duration_max {}", self.duration_min, self.duration_max),
            });
        }
        if self.trunk_min > self.trunk_max {
            return Err(TripwireError::InvalidConfig {
                field: "trunk_min",
                reason: format!("{} exceeds trunk_max {}", self.trunk_min, self.trunk_max),
            });
        }
        Ok(())
    }
}

/// Melee weapon settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponConfig {
    pub hit_force: i32,
    pub crit_possible: bool,
    /// Percent chance (0-100) that a hit deals double force.
    pub crit_chance: f32,
    pub can_break_trees: bool,
    /// Per-hit fractional force against enemies. Fractions carry over
    /// between hits on the same enemy.
    pub fractional_hit_force: Option<f32>,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            hit_force: 1,
            crit_possible: false,
            crit_chance: 0.0,
            can_break_trees: false,
            fractional_hit_force: None,
        }
    }
}

/// A spawn-denial point the hazard spawner keeps clear of.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnDenialPoint {
    pub name: String,
    pub position: Vec3,
    #[serde(default = "unit_scale")]
    pub local_scale: Vec3,
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

/// An occupant placed into the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupantSpec {
    pub id: NetId,
    pub kind: OccupantKind,
    #[serde(default)]
    pub transform: Transform,
    pub hp: i32,
    #[serde(default)]
    pub weapon: Option<WeaponConfig>,
}

fn non_negative(field: &'static str, value: f32) -> TripwireResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TripwireError::InvalidConfig {
            field,
            reason: format!("must be a finite non-negative number, got {value}"),
        })
    }
}
