//! Random sources for the progression model.
//!
//! Every draw in the crate goes through an explicit `&mut R where R: Rng`, so
//! callers decide where randomness comes from. Drivers get their generators
//! from [`stream_rng`], which derives an independent, reproducible stream for
//! each named purpose (and optionally each index, e.g. a generator code in a
//! sweep) from a single run seed.

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::pathogen::consecutive_ones;

/// One fair coin as a progress increment: 0 or 1 with probability 1/2 each.
pub fn coin_increment<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    u32::from(rng.random::<bool>())
}

/// A truncated geometric draw in `0..=8`, `P(n) = 2^-(n+1)` for `n < 8`.
pub fn geometric_draw<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    consecutive_ones(rng.random::<u8>())
}

/// Builds the generator for the stream `name`/`index` under `seed`.
///
/// Streams with different names or indices are seeded independently, so a
/// sweep over a sub-range of codes draws exactly what the full sweep would
/// have drawn for those codes.
#[must_use]
pub fn stream_rng(seed: u64, name: &str, index: u64) -> StdRng {
    let name_hash = fnv1a(name.as_bytes());
    let mixed = splitmix64(splitmix64(seed ^ name_hash).wrapping_add(index));
    StdRng::seed_from_u64(mixed)
}

fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes.iter().fold(OFFSET, |hash, &b| {
        (hash ^ u64::from(b)).wrapping_mul(PRIME)
    })
}

fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
