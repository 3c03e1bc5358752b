//! Melee weapon hooks: critical hits, one-shot value overrides and
//! fractional damage carried between hits.

pub mod accumulator;
pub mod crit;
pub mod swing;

pub use accumulator::DamageAccumulator;
pub use crit::{critical_hit, with_override};
pub use swing::{swing, SwingOutcome};
