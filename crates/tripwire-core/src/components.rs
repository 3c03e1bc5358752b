//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in the engine and its systems, not components.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::WeaponConfig;
use crate::enums::*;

/// Hit points and death record of an occupant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub hp: i32,
    pub dead: bool,
    pub cause: Option<CauseOfDeath>,
    pub death_animation: Option<DeathAnimation>,
}

/// Accumulated external force applied to a player by the world.
/// Effects add to it; the host consumes and clears it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalForces(pub Vec3);

/// Weapon currently held by an occupant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeldWeapon {
    pub config: WeaponConfig,
    /// Live hit force. Swings may override it for exactly one hit.
    pub hit_force: i32,
}

// Transform, NetId and OccupantKind are defined in types.rs / enums.rs
// and attached to entities as components directly.
