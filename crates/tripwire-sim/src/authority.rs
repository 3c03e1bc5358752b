//! Authority boundary: decides whether this peer commits an effect or
//! forwards it, and which inbound messages it may act on.

use tripwire_core::enums::PeerRole;
use tripwire_core::net::NetMessage;

/// What a peer does with an effect its own zone wants to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Apply now and broadcast a commit.
    Commit,
    /// Send an intent to the authority and wait for its commit.
    Forward,
}

pub fn gate(role: PeerRole) -> Gate {
    match role {
        PeerRole::Authority => Gate::Commit,
        PeerRole::Client => Gate::Forward,
    }
}

/// Why an inbound message was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The message only makes sense on the other side of the boundary.
    WrongRole,
    UnknownZone,
    UnknownOccupant,
    /// The occupant is dead, or the zone is disabled or ignores its kind.
    NotApplicable,
    /// The shared cooldown has not elapsed for this intent.
    CoolingDown,
}

/// Whether `role` may act on `message` at all.
pub fn accepts(role: PeerRole, message: &NetMessage) -> Result<(), Rejection> {
    let for_authority = matches!(
        message,
        NetMessage::Intent { .. } | NetMessage::SwingIntent { .. }
    );
    match (role, for_authority) {
        (PeerRole::Authority, true) | (PeerRole::Client, false) => Ok(()),
        _ => Err(Rejection::WrongRole),
    }
}
