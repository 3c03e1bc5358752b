//! Commands sent by the host to the simulation.
//!
//! Spatial overlap, interaction and despawn signals all arrive here and are
//! queued for processing at the next tick boundary.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::types::{HazardId, NetId, ZoneId};

/// All possible host signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HostCommand {
    // --- Spatial signals ---
    /// The overlap detector saw an occupant enter a zone.
    ZoneEnter { zone: ZoneId, occupant: NetId },
    /// The overlap detector saw an occupant leave a zone.
    ZoneExit { zone: ZoneId, occupant: NetId },

    // --- Player actions ---
    /// A player used the zone's interact prompt.
    Interact { zone: ZoneId, occupant: NetId },
    /// A player swung their held weapon; `targets` are the occupants hit.
    Swing {
        wielder: NetId,
        targets: Vec<NetId>,
        tip: Vec3,
    },

    // --- Lifecycle ---
    SetZoneEnabled { zone: ZoneId, enabled: bool },
    SetHazardEnabled { hazard: HazardId, enabled: bool },
    /// The occupant was destroyed by the host.
    Despawn { occupant: NetId },
    /// Whether the local listener is indoors (mutes outdoor hazards).
    SetListenerIndoors { indoors: bool },
}
