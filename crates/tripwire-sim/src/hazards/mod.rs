//! Ambient level hazards and the spawn geometry that keeps them apart.

pub mod lightning;
pub mod spawn_denial;

pub use lightning::LightningHazard;
pub use spawn_denial::{denial_radius, is_spawn_allowed};
