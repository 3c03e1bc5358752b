//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Ticks a recurring task waits before re-polling a shared cooldown it lost.
pub const COOLDOWN_POLL_TICKS: u64 = 1;

// --- Determinism ---

/// Offset added to the level seed for every trigger/hazard/weapon RNG.
pub const SEED_OFFSET: u64 = 85;

/// RNG seed used when no level is loaded.
pub const FALLBACK_SEED: u64 = 69;

// --- Damage zones ---

/// Default repeat interval of damage zones (seconds).
pub const DEFAULT_DAMAGE_INTERVAL_SECS: f32 = 0.25;

/// Default reach of zone audio sources (meters).
pub const DEFAULT_AUDIO_MAX_DISTANCE: f32 = 50.0;

// --- Teleport ---

/// Radius searched around an enemy's landing point for walkable ground.
pub const ENEMY_NAV_RADIUS: f32 = 2.5;

// --- Lightning ---

/// Height above the strike point where the bolt starts (meters).
pub const LIGHTNING_SOURCE_HEIGHT: f32 = 160.0;

/// Width of the random horizontal offset applied to the bolt source.
pub const LIGHTNING_SOURCE_SPREAD: f32 = 64.0;

/// Upper bound of the delay between two strikes (seconds).
pub const LIGHTNING_MAX_INTERVAL_SECS: f64 = 9999.0;

/// Height of the strike audio above the hit point (meters).
pub const LIGHTNING_AUDIO_LIFT: f32 = 0.5;

// --- Hazard spawning ---

/// Clearance added to an object's width around spawn-denial points.
pub const SPAWN_DENIAL_PADDING: f32 = 6.0;

/// Name marker that makes a denial point use its own x scale as radius.
pub const SPAWN_DENIAL_SCALE_MARKER: &str = "_XuPatch";
