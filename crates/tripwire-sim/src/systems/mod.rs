//! Per-tick systems over the session state.
//!
//! Systems are free functions; they hold no state of their own.

pub mod lifetime;
pub mod snapshot;
