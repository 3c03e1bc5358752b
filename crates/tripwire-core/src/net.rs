//! Messages exchanged between peers across the authority boundary.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::EffectKind;
use crate::types::{NetId, ZoneId};

/// A message on the session wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NetMessage {
    /// Client to authority: a zone wants to apply an effect.
    Intent {
        zone: ZoneId,
        occupant: NetId,
        effect: EffectKind,
    },
    /// Authority to clients: the effect was applied; replicate it.
    Commit {
        zone: ZoneId,
        occupant: NetId,
        effect: EffectKind,
        tick: u64,
    },
    /// Client to authority: a weapon swing hit these occupants.
    SwingIntent {
        wielder: NetId,
        targets: Vec<NetId>,
        tip: Vec3,
    },
    /// Authority to clients: the swing was resolved; replicate it.
    SwingCommit {
        wielder: NetId,
        targets: Vec<NetId>,
        tip: Vec3,
        tick: u64,
    },
}
