// rng.rs - deterministic per-job random streams

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Derive an independent ChaCha20 stream for job `index` from a master
/// seed. SplitMix64 finalizer, so consecutive indices land far apart.
pub fn replica_rng(master: u64, index: usize) -> ChaCha20Rng {
    let mut x = master ^ (index as u64).wrapping_mul(0x9E3779B97F4A7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D049BB133111EB);
    ChaCha20Rng::seed_from_u64(x ^ (x >> 31))
}
