//! Fractal Brownian motion (fBm) over Perlin noise, plus the smooth
//! interpolation helpers used wherever a hard threshold would leave seams.

use ::noise::{NoiseFn, Perlin};

/// Frequency multiplier between successive octaves.
pub const LACUNARITY: f64 = 2.0;
/// Amplitude multiplier between successive octaves.
pub const PERSISTENCE: f64 = 0.5;

/// Seeded coherent-noise source with a normalized fBm sampler.
///
/// Stateless after construction: every method takes `&self` and the type is
/// `Send + Sync`, so samples can be taken concurrently without locking.
#[derive(Clone, Debug)]
pub struct NoiseField {
    base: Perlin,
}

impl NoiseField {
    /// Create a noise field for the given world seed.
    pub fn new(seed: u64) -> Self {
        // Fold the high bits in so seeds differing only above bit 32 still diverge.
        let folded = (seed ^ (seed >> 32)) as u32;
        Self {
            base: Perlin::new(folded),
        }
    }

    /// Sample `octaves` layers of noise at `(x, z)`.
    ///
    /// Each octave doubles the frequency and halves the amplitude of the
    /// previous one. The sum is divided by the total amplitude so the result
    /// stays within `[-1, 1]` regardless of octave count. Zero octaves yield 0.
    pub fn fbm(&self, x: f64, z: f64, octaves: u32) -> f64 {
        let mut total = 0.0;
        let mut norm = 0.0;
        let mut frequency = 1.0;
        let mut amplitude = 1.0;

        for _ in 0..octaves {
            total += self.base.get([x * frequency, z * frequency]) * amplitude;
            norm += amplitude;

            frequency *= LACUNARITY;
            amplitude *= PERSISTENCE;
        }

        if norm == 0.0 {
            return 0.0;
        }
        (total / norm).clamp(-1.0, 1.0)
    }
}

/// Cubic Hermite ramp from 0 at `edge0` to 1 at `edge1`.
///
/// `edge0 > edge1` gives a falling ramp. Equal edges degrade to a step at `edge0`.
#[inline]
pub fn smoothstep(edge0: f64, edge1: f64, value: f64) -> f64 {
    if edge0 == edge1 {
        return if value < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((value - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Linear interpolation from `a` (t = 0) to `b` (t = 1).
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
