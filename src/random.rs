//! Random source helpers.
//!
//! Every randomized component takes `&mut R where R: Rng` so callers can
//! inject a seeded generator; these helpers cover the common cases.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a generator from an optional seed.
///
/// `None` draws a fresh seed from the thread-local generator, so two
/// unseeded runs are independent.
pub fn create_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::seed_from_u64(rand::random()),
    }
}

/// Derives the seed of the `index`-th restart from a base seed.
///
/// Uses the SplitMix64 finalizer so neighbouring indices produce
/// uncorrelated streams.
pub fn derive_seed(base: u64, index: u64) -> u64 {
    let mut z = base.wrapping_add(index.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
