//! Seeded random number generation.
//!
//! Every randomized runner builds its own generator from an optional seed;
//! there is no process-wide random source.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a generator from a fixed seed.
///
/// Two generators created from the same seed yield the same stream.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates a generator from an optional seed, drawing a fresh one when `None`.
pub fn rng_from(seed: Option<u64>) -> StdRng {
    create_rng(seed.unwrap_or_else(rand::random))
}
