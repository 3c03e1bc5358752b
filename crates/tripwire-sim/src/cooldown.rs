//! Cooldown clocks gating how often an effect may fire.
//!
//! Times are tick instants. A clock grants `try_acquire(now, interval)` iff
//! it has never fired or `now >= last_fired + interval`, and on success
//! stores `now`. The stored instant never moves backwards.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Sentinel for a shared clock that has never fired.
const NEVER: u64 = u64::MAX;

fn permits(last_fired: Option<u64>, now: u64, interval: u64) -> bool {
    match last_fired {
        None => true,
        Some(last) => now >= last.saturating_add(interval),
    }
}

/// Uncontended clock owned by a single recurring task or zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalCooldown {
    last_fired: Option<u64>,
}

impl LocalCooldown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `try_acquire(now, interval)` would succeed.
    pub fn ready(&self, now: u64, interval: u64) -> bool {
        permits(self.last_fired, now, interval)
    }

    pub fn try_acquire(&mut self, now: u64, interval: u64) -> bool {
        if permits(self.last_fired, now, interval) {
            self.last_fired = Some(now);
            true
        } else {
            false
        }
    }

    pub fn last_fired(&self) -> Option<u64> {
        self.last_fired
    }
}

/// Session-wide clock shared by every zone that opts in.
///
/// Acquisition is a compare-exchange loop, so among concurrent callers
/// exactly one wins a given window.
#[derive(Debug)]
pub struct SharedCooldown {
    last_fired: AtomicU64,
}

impl Default for SharedCooldown {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedCooldown {
    pub fn new() -> Self {
        Self {
            last_fired: AtomicU64::new(NEVER),
        }
    }

    pub fn try_acquire(&self, now: u64, interval: u64) -> bool {
        let mut current = self.last_fired.load(Ordering::Acquire);
        loop {
            let last = (current != NEVER).then_some(current);
            if !permits(last, now, interval) {
                return false;
            }
            match self.last_fired.compare_exchange_weak(
                current,
                now,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }

    pub fn last_fired(&self) -> Option<u64> {
        let value = self.last_fired.load(Ordering::Acquire);
        (value != NEVER).then_some(value)
    }

    /// Forget the last acquisition. Called when the session ends.
    pub fn reset(&self) {
        self.last_fired.store(NEVER, Ordering::Release);
    }
}

/// Which clock a zone consults.
#[derive(Debug, Clone, Default)]
pub enum CooldownPolicy {
    /// Each caller brings its own [`LocalCooldown`].
    #[default]
    Local,
    /// Every zone holding this `Arc` shares one clock.
    Shared(Arc<SharedCooldown>),
}

impl CooldownPolicy {
    pub fn try_acquire(&self, local: &mut LocalCooldown, now: u64, interval: u64) -> bool {
        match self {
            CooldownPolicy::Local => local.try_acquire(now, interval),
            CooldownPolicy::Shared(clock) => clock.try_acquire(now, interval),
        }
    }

    pub fn is_shared(&self) -> bool {
        matches!(self, CooldownPolicy::Shared(_))
    }
}
