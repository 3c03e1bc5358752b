//! Cooperative scheduler for recurring per-occupant zone tasks.
//!
//! Each (zone, occupant) residency owns one task. Tasks never run
//! concurrently: the engine walks due tasks in creation order once per
//! tick. Cancellation is cooperative through a shared [`CancelToken`] that
//! the scheduler checks every tick.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use hecs::Entity;

use tripwire_core::types::ZoneId;

use crate::cooldown::LocalCooldown;

/// Cooperative cancellation flag shared by a zone entry and its task.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Monotonic task identifier. Ordering = creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

/// One occupant's recurring action inside one zone.
#[derive(Debug, Clone)]
pub struct RecurringTask {
    pub zone: ZoneId,
    pub occupant: Entity,
    /// Tick at which the task next runs.
    pub wake_at: u64,
    /// Ticks between runs once the effect fired.
    pub interval: u64,
    /// Clock used when the zone's policy is local.
    pub local: LocalCooldown,
    pub token: CancelToken,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: BTreeMap<TaskId, RecurringTask>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a task whose first run is at `now`.
    pub fn spawn(
        &mut self,
        zone: ZoneId,
        occupant: Entity,
        now: u64,
        interval: u64,
        token: CancelToken,
    ) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.insert(
            id,
            RecurringTask {
                zone,
                occupant,
                wake_at: now,
                interval,
                local: LocalCooldown::new(),
                token,
            },
        );
        id
    }

    /// Drop every task whose token was cancelled. Returns how many ended.
    pub fn sweep_cancelled(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|_, task| !task.token.is_cancelled());
        before - self.tasks.len()
    }

    /// Collect ids of tasks due at `now` into `out`, in creation order.
    pub fn collect_due(&self, now: u64, out: &mut Vec<TaskId>) {
        out.clear();
        out.extend(
            self.tasks
                .iter()
                .filter(|(_, task)| task.wake_at <= now && !task.token.is_cancelled())
                .map(|(id, _)| *id),
        );
    }

    pub fn get(&self, id: TaskId) -> Option<&RecurringTask> {
        self.tasks.get(&id)
    }

    pub fn get_mut(&mut self, id: TaskId) -> Option<&mut RecurringTask> {
        self.tasks.get_mut(&id)
    }

    pub fn remove(&mut self, id: TaskId) -> Option<RecurringTask> {
        self.tasks.remove(&id)
    }

    /// Live (non-cancelled) tasks for one residency.
    pub fn active_for(&self, zone: ZoneId, occupant: Entity) -> usize {
        self.tasks
            .values()
            .filter(|t| t.zone == zone && t.occupant == occupant && !t.token.is_cancelled())
            .count()
    }

    /// Live tasks across all zones.
    pub fn active(&self) -> usize {
        self.tasks
            .values()
            .filter(|t| !t.token.is_cancelled())
            .count()
    }

    pub fn clear(&mut self) {
        for task in self.tasks.values() {
            task.token.cancel();
        }
        self.tasks.clear();
    }
}
