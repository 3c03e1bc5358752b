//! Error types for configuration and setup. Tick processing never fails;
//! runtime problems degrade to no-ops and are logged.

use crate::types::{NetId, ZoneId};

pub type TripwireResult<T> = Result<T, TripwireError>;

#[derive(Debug, thiserror::Error)]
pub enum TripwireError {
    #[error("unknown occupant: {0}")]
    UnknownOccupant(NetId),

    #[error("occupant id already in use: {0}")]
    DuplicateOccupant(NetId),

    #[error("teleport target {target} of {zone} does not exist")]
    UnknownTeleportTarget { zone: ZoneId, target: ZoneId },

    #[error("invalid config field `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("failed to parse session script: {0}")]
    Script(#[from] serde_json::Error),
}
