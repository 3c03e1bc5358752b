//! Core types and definitions for the Tripwire trigger-zone simulation.
//!
//! This crate defines the vocabulary shared by the engine and its hosts:
//! components, zone configuration, host commands, net messages,
//! presentation events, snapshots, constants and errors.
//! It has no dependency on the ECS or any runtime framework.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod net;
pub mod state;
pub mod types;

pub use error::{TripwireError, TripwireResult};
