//! Deterministic seeded generation utilities.
//!
//! Every random stream in the crate is an explicitly seeded [`ChaCha8Rng`]
//! derived from the world seed and a stable label, so independent subsystems
//! (vertex colors, each species) never share or race on one generator.
//! Trigonometry goes through `libm` so curve evaluation is bit-exact across
//! platforms.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ---------------------------------------------------------------------------
// Seed derivation
// ---------------------------------------------------------------------------

/// Derive a u64 seed from the world seed and a stream label.
///
/// Uses SipHash (via std's `DefaultHasher`) to combine the two into a
/// well-distributed value.
pub fn derive_seed(world_seed: u64, label: impl Hash) -> u64 {
    let mut hasher = DefaultHasher::new();
    world_seed.hash(&mut hasher);
    label.hash(&mut hasher);
    hasher.finish()
}

/// Seed for one species' placement stream.
pub fn species_seed(world_seed: u64, species: &str) -> u64 {
    derive_seed(world_seed, ("species", species))
}

/// RNG for the color jitter of the vertex at `index` in a grid.
///
/// One stream per vertex lets the grid be colored in any order, or in
/// parallel, with identical results.
pub fn vertex_rng(world_seed: u64, index: usize) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(derive_seed(world_seed, ("vertex", index as u64)))
}

// ---------------------------------------------------------------------------
// Deterministic math (libm)
// ---------------------------------------------------------------------------

/// Deterministic sine using libm (not platform libc).
#[inline]
pub fn det_sin(x: f64) -> f64 {
    libm::sin(x)
}

/// Deterministic cosine using libm.
#[inline]
pub fn det_cos(x: f64) -> f64 {
    libm::cos(x)
}
