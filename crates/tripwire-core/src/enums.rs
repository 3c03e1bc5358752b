//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Direction mode for impulses applied by trigger zones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForceDirection {
    #[default]
    Forward,
    Backward,
    Up,
    Down,
    Left,
    Right,
    /// Along the line between zone and occupant.
    Center,
}

/// Ragdoll variant spawned when a player dies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathAnimation {
    #[default]
    Default,
    HeadBurst,
    Spring,
    Electrocuted,
    ComedyMask,
    TragedyMask,
    Burnt,
    Snipped,
    SliceHead,
}

/// Cause of death recorded on a killed player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CauseOfDeath {
    #[default]
    Unknown,
    Bludgeoning,
    Gravity,
    Blast,
    Strangulation,
    Suffocation,
    Mauling,
    Gunshots,
    Crushing,
    Drowning,
    Abandoned,
    Electrocution,
    Kicking,
    Burning,
    Stabbing,
    Fan,
    Inertia,
    Snipping,
}

/// What kind of entity an occupant is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OccupantKind {
    Player,
    Enemy,
}

/// This peer's role in the networked session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeerRole {
    /// The single peer allowed to commit persistent state changes.
    #[default]
    Authority,
    /// A peer that forwards intents and applies committed effects.
    Client,
}

/// The kind of effect a zone applies to an occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    Damage,
    Teleport,
}
