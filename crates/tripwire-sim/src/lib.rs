//! Simulation engine for Tripwire.
//!
//! Owns the hecs occupant world, runs trigger zones and hazards at a fixed
//! tick rate, gates state changes behind the session authority and produces
//! presentation events and net messages for the host.

pub mod authority;
pub mod cooldown;
pub mod dispatch;
pub mod engine;
pub mod hazards;
pub mod nav;
pub mod occupancy;
pub mod rng;
pub mod scheduler;
pub mod systems;
pub mod teleport;
pub mod weapons;
pub mod zone;

pub use engine::{SessionConfig, SessionEngine, TickOutput};
pub use tripwire_core as core;

#[cfg(test)]
mod tests;
