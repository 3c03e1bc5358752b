//! Session snapshot: the observable state of every zone and occupant.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{HazardId, NetId, SimTime, ZoneId};

/// Complete session state, built on demand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub time: SimTime,
    pub role: PeerRole,
    pub zones: Vec<ZoneView>,
    pub hazards: Vec<HazardView>,
    pub occupants: Vec<OccupantView>,
    /// Recurring tasks currently scheduled (cancelled ones excluded).
    pub active_tasks: usize,
    /// Tick of the last shared-cooldown acquisition.
    pub shared_cooldown_last_fired: Option<u64>,
    pub stats: SessionStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneView {
    pub id: ZoneId,
    pub effect: EffectKind,
    pub enabled: bool,
    /// Occupants currently tracked, in id order.
    pub occupants: Vec<NetId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardView {
    pub id: HazardId,
    pub enabled: bool,
    pub next_strike_tick: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupantView {
    pub id: NetId,
    pub kind: OccupantKind,
    pub position: Vec3,
    pub hp: i32,
    pub dead: bool,
    pub external_forces: Vec3,
}

/// Running counters for the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub effects_applied: u32,
    pub intents_sent: u32,
    pub commits_sent: u32,
    pub commits_received: u32,
    pub rejected_messages: u32,
    pub deaths: u32,
    pub lightning_strikes: u32,
}
