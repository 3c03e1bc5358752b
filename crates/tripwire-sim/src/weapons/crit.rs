//! Critical hit roll and the scoped override used to apply it.

use std::ops::{Deref, DerefMut};

use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Double `force` with `chance` percent probability (clamped to 0..=100).
pub fn critical_hit(force: i32, rng: &mut ChaCha8Rng, chance: f32) -> i32 {
    let roll = rng.gen::<f32>() * 100.0;
    if roll < chance.clamp(0.0, 100.0) {
        force * 2
    } else {
        force
    }
}

/// A shared value temporarily replaced; the saved value is written back
/// on drop, including early returns and unwinding.
pub struct Override<'a, T: Copy> {
    slot: &'a mut T,
    saved: T,
}

impl<'a, T: Copy> Override<'a, T> {
    pub fn new(slot: &'a mut T, value: T) -> Self {
        let saved = std::mem::replace(slot, value);
        Self { slot, saved }
    }

    pub fn saved(&self) -> T {
        self.saved
    }
}

impl<T: Copy> Deref for Override<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.slot
    }
}

impl<T: Copy> DerefMut for Override<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.slot
    }
}

impl<T: Copy> Drop for Override<'_, T> {
    fn drop(&mut self) {
        *self.slot = self.saved;
    }
}

/// Run `f` with `*slot == value`, then restore the previous value.
pub fn with_override<T: Copy, R>(slot: &mut T, value: T, f: impl FnOnce(&T) -> R) -> R {
    let guard = Override::new(slot, value);
    f(&guard)
}
