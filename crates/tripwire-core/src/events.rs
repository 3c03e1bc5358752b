//! Fire-and-forget notifications for the presentation layer.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{NetId, ZoneId};

/// Request to place a death prefab where an occupant died.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeathArtifactRequest {
    pub prefab: String,
    pub position: Vec3,
    pub rotation: Quat,
    pub networked: bool,
    pub for_player: bool,
}

/// Events for the host's audio/VFX layer. Never awaited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PresentationEvent {
    /// Play a clip from an audio source.
    PlayClip {
        position: Vec3,
        clip: String,
        volume: f32,
    },
    /// A sound loud enough for enemies to hear.
    AudibleNoise {
        position: Vec3,
        range: f32,
        loudness: f32,
    },
    OccupantDamaged {
        zone: Option<ZoneId>,
        occupant: NetId,
        amount: i32,
        default_sfx: bool,
    },
    OccupantKilled {
        occupant: NetId,
        cause: Option<CauseOfDeath>,
        animation: Option<DeathAnimation>,
        ragdoll_force: Vec3,
    },
    Teleported {
        zone: ZoneId,
        occupant: NetId,
        from: Vec3,
        to: Vec3,
    },
    SpawnDeathArtifact(DeathArtifactRequest),
    LightningStrike {
        source: Vec3,
        destination: Vec3,
        glow_width_multiplier: f32,
        duration_range: (f32, f32),
        trunk_width_range: (f32, f32),
        generations: u32,
        /// Where the strike sound plays, just above the impact point.
        audio_position: Vec3,
        volume: f32,
        clip: Option<String>,
    },
    /// A weapon hit landed hard enough to fell a tree at `position`.
    DestroyTree { position: Vec3 },
}
