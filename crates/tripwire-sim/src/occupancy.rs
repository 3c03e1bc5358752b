//! Occupancy tracking: reconciles enter/exit signals with recurring tasks.
//!
//! Entries are keyed by `hecs::Entity`, whose generation makes a recycled
//! slot a different key, so an occupant destroyed by the host can never
//! alias a newcomer.

use std::collections::BTreeMap;

use glam::Vec3;
use hecs::Entity;

use tripwire_core::config::AudioSourceSpec;

use crate::scheduler::CancelToken;

/// Residency state of one occupant inside one zone.
#[derive(Debug, Clone)]
pub struct OccupantEntry {
    pub token: CancelToken,
    /// Index of the closest zone audio source at entry.
    pub audio_source: Option<usize>,
}

/// Result of an enter signal.
#[derive(Debug, Clone)]
pub enum EnterOutcome {
    /// Occupant registered; schedule a task holding this token.
    Started(CancelToken),
    /// Occupant was already inside; nothing to do.
    AlreadyTracked,
}

#[derive(Debug, Default)]
pub struct OccupancyTracker {
    entries: BTreeMap<Entity, OccupantEntry>,
}

impl OccupancyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an occupant that passed the zone's admission checks.
    /// Re-entering while tracked is a no-op.
    pub fn on_enter(
        &mut self,
        occupant: Entity,
        position: Vec3,
        sources: &[AudioSourceSpec],
    ) -> EnterOutcome {
        if self.entries.contains_key(&occupant) {
            return EnterOutcome::AlreadyTracked;
        }
        let token = CancelToken::new();
        self.entries.insert(
            occupant,
            OccupantEntry {
                token: token.clone(),
                audio_source: closest_source(sources, position),
            },
        );
        EnterOutcome::Started(token)
    }

    /// Release the occupant. Its task sees the cancelled token on the next
    /// tick and ends. Returns false if it was not tracked.
    pub fn on_exit(&mut self, occupant: Entity) -> bool {
        match self.entries.remove(&occupant) {
            Some(entry) => {
                entry.token.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancel every task and forget every occupant. Returns how many were tracked.
    pub fn on_zone_disable(&mut self) -> usize {
        let count = self.entries.len();
        for entry in self.entries.values() {
            entry.token.cancel();
        }
        self.entries.clear();
        count
    }

    /// Drop an occupant that died or despawned. Same effect as an exit.
    pub fn remove_terminal(&mut self, occupant: Entity) -> bool {
        self.on_exit(occupant)
    }

    pub fn is_tracked(&self, occupant: Entity) -> bool {
        self.entries.contains_key(&occupant)
    }

    pub fn audio_source(&self, occupant: Entity) -> Option<usize> {
        self.entries.get(&occupant).and_then(|e| e.audio_source)
    }

    pub fn occupants(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Index of the source nearest to `position`. Ties keep the earlier source.
pub fn closest_source(sources: &[AudioSourceSpec], position: Vec3) -> Option<usize> {
    let (first, rest) = sources.split_first()?;
    let mut best = 0;
    let mut best_distance = first.position.distance(position);
    for (i, source) in rest.iter().enumerate() {
        let distance = source.position.distance(position);
        if distance < best_distance {
            best = i + 1;
            best_distance = distance;
        }
    }
    Some(best)
}
