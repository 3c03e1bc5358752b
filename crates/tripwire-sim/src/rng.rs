//! Deterministic RNG construction.
//!
//! Every trigger, hazard and the weapon hook owns its own generator seeded
//! from the level seed plus a fixed offset, so peers running the same level
//! draw identical sequences.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use tripwire_core::constants::{FALLBACK_SEED, SEED_OFFSET};

/// Generator for a level-scoped object. `None` means no level is loaded.
pub fn level_rng(level_seed: Option<u64>) -> ChaCha8Rng {
    let seed = match level_seed {
        Some(seed) => seed.wrapping_add(SEED_OFFSET),
        None => FALLBACK_SEED,
    };
    ChaCha8Rng::seed_from_u64(seed)
}
