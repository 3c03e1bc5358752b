//! Lifetime system: switches off zones whose self-disable timer ran out.

use crate::zone::TriggerZone;

/// Disable every expired zone, cancelling its occupants' tasks.
pub fn run(zones: &mut [TriggerZone], now: u64) {
    for zone in zones.iter_mut().filter(|z| z.lifetime_expired(now)) {
        let released = zone.disable();
        tracing::debug!(zone = %zone.id, released, "zone lifetime expired");
    }
}
