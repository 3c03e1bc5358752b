//! Per-enemy carry of fractional weapon damage.

use std::collections::HashMap;

use hecs::Entity;

#[derive(Debug, Default)]
pub struct DamageAccumulator {
    carried: HashMap<Entity, f32>,
}

impl DamageAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking an enemy with nothing carried.
    pub fn register(&mut self, enemy: Entity) {
        self.carried.insert(enemy, 0.0);
    }

    pub fn remove(&mut self, enemy: Entity) {
        self.carried.remove(&enemy);
    }

    /// Add `amount` to the enemy's carry and withdraw the whole part.
    /// Unregistered enemies start from zero.
    pub fn accumulate(&mut self, enemy: Entity, amount: f32) -> i32 {
        let carry = self.carried.entry(enemy).or_insert(0.0);
        *carry += amount;
        let whole = carry.floor();
        *carry -= whole;
        whole as i32
    }

    pub fn carried(&self, enemy: Entity) -> Option<f32> {
        self.carried.get(&enemy).copied()
    }
}
