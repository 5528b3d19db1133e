//! The landscape height function.
//!
//! Composes rolling fBm hills, bluffs, the river channel, sandbars, small
//! hills, and trail flattening into one deterministic scalar field. Every
//! consumer (grid builder, rock scatterer, vegetation scatterer) samples
//! through [`HeightField`], so they all agree on the terrain shape.

use prairie_config::{RiverConfig, TerrainConfig, TrailConfig};
use serde::Serialize;

use crate::noise_field::{NoiseField, lerp};
use crate::river::RiverModel;
use crate::trail::TrailNetwork;

// Noise layer frequencies and octave counts.
const HILL_FREQUENCY: f64 = 0.015;
const HILL_OCTAVES: u32 = 4;
const DETAIL_FREQUENCY: f64 = 0.05;
const DETAIL_OCTAVES: u32 = 3;
const FINE_FREQUENCY: f64 = 0.15;
const FINE_OCTAVES: u32 = 2;

const BLUFF_FREQUENCY_X: f64 = 0.008;
const BLUFF_FREQUENCY_Z: f64 = 0.01;
const BLUFF_THRESHOLD: f64 = 0.3;
/// Bluffs only form in this `|z|` band along the river valley.
const BLUFF_BAND: (f64, f64) = (10.0, 25.0);

const SANDBAR_FREQUENCY: f64 = 0.05;
const SANDBAR_OFFSET: f64 = 100.0;
const SANDBAR_THRESHOLD: f64 = 0.4;
/// Sandbars sit between these fractions of the channel width from the centerline.
const SANDBAR_BAND: (f64, f64) = (0.3, 0.8);
const SANDBAR_FLOOR: f64 = -0.5;

const SMALL_HILL_FREQUENCY: f64 = 0.03;
const SMALL_HILL_OFFSET: f64 = 50.0;
const SMALL_HILL_THRESHOLD: f64 = 0.5;
const SMALL_HILL_MIN_RIVER_FACTOR: f64 = 0.8;

/// Trails are only carved where the river factor exceeds this (dry land).
pub const TRAIL_LAND_RIVER_FACTOR: f64 = 0.9;
const TRAIL_LOWERING: f64 = 0.7;
const TRAIL_MIN_HEIGHT: f64 = 0.2;

/// A bare height evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HeightSample {
    pub x: f64,
    pub z: f64,
    pub height: f64,
}

/// A height evaluation together with the context the biome colorizer needs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainSample {
    pub x: f64,
    pub z: f64,
    /// Final terrain height.
    pub height: f64,
    /// Unconstrained land height (rolling hills plus bluffs), before river carving.
    pub land_height: f64,
    /// Lateral distance to the river centerline.
    pub river_distance: f64,
    /// 0 in the channel, 1 on dry land.
    pub river_factor: f64,
    /// Combined main trail / settlement path weight.
    pub trail_factor: f64,
    pub is_bluff: bool,
    pub is_sandbar: bool,
}

impl TerrainSample {
    /// Drop the context, keeping position and height.
    pub fn height_sample(&self) -> HeightSample {
        HeightSample {
            x: self.x,
            z: self.z,
            height: self.height,
        }
    }
}

/// Deterministic height oracle for the whole landscape.
#[derive(Clone, Debug)]
pub struct HeightField {
    noise: NoiseField,
    river: RiverModel,
    trail: TrailNetwork,
    terrain: TerrainConfig,
}

impl HeightField {
    /// Build a height field. Parameters are expected to be validated.
    pub fn new(seed: u64, terrain: TerrainConfig, river: RiverConfig, trail: TrailConfig) -> Self {
        Self {
            noise: NoiseField::new(seed),
            river: RiverModel::new(river),
            trail: TrailNetwork::new(trail),
            terrain,
        }
    }

    /// Terrain height at `(x, z)`. Total over all finite inputs.
    pub fn height_at(&self, x: f64, z: f64) -> f64 {
        self.sample(x, z).height
    }

    /// Full evaluation at `(x, z)`.
    ///
    /// Stages run in a fixed order because later ones blend towards earlier results.
    pub fn sample(&self, x: f64, z: f64) -> TerrainSample {
        let t = &self.terrain;

        // Base rolling terrain.
        let mut land = self.noise.fbm(x * HILL_FREQUENCY, z * HILL_FREQUENCY, HILL_OCTAVES)
            * t.hill_amplitude
            + self
                .noise
                .fbm(x * DETAIL_FREQUENCY, z * DETAIL_FREQUENCY, DETAIL_OCTAVES)
                * t.detail_amplitude
            + self.noise.fbm(x * FINE_FREQUENCY, z * FINE_FREQUENCY, FINE_OCTAVES)
                * t.fine_amplitude;

        // Bluffs and cutbanks.
        let bluff_noise = self
            .noise
            .fbm(x * BLUFF_FREQUENCY_X, z * BLUFF_FREQUENCY_Z, 2);
        let is_bluff =
            bluff_noise > BLUFF_THRESHOLD && z.abs() > BLUFF_BAND.0 && z.abs() < BLUFF_BAND.1;
        if is_bluff {
            land += bluff_noise.abs() * t.bluff_strength;
        }

        // River carving.
        let width = self.river.width(x);
        let river_distance = self.river.distance(x, z);
        let river_factor = self.river.river_factor(x, z);
        let mut h = lerp(self.river.bed_height(x, z), land, river_factor);

        // Sandbars.
        let sandbar_noise = self.noise.fbm(
            x * SANDBAR_FREQUENCY + SANDBAR_OFFSET,
            z * SANDBAR_FREQUENCY,
            2,
        );
        let is_sandbar = sandbar_noise > SANDBAR_THRESHOLD
            && river_distance < width * SANDBAR_BAND.1
            && river_distance > width * SANDBAR_BAND.0;
        if is_sandbar {
            h = h.max(SANDBAR_FLOOR);
        }

        // Small hills away from the river.
        let hill_noise = self.noise.fbm(
            x * SMALL_HILL_FREQUENCY + SMALL_HILL_OFFSET,
            z * SMALL_HILL_FREQUENCY + SMALL_HILL_OFFSET,
            2,
        );
        if hill_noise > SMALL_HILL_THRESHOLD && river_factor > SMALL_HILL_MIN_RIVER_FACTOR {
            h += (hill_noise - SMALL_HILL_THRESHOLD) * t.hill_strength;
        }

        // Trail and settlement paths: shallow, slightly lowered corridors on land.
        let trail_factor = self.trail.trail_factor(x, z);
        if river_factor > TRAIL_LAND_RIVER_FACTOR {
            h = lerp(h, (h * TRAIL_LOWERING).max(TRAIL_MIN_HEIGHT), trail_factor);
        }

        TerrainSample {
            x,
            z,
            height: h,
            land_height: land,
            river_distance,
            river_factor,
            trail_factor,
            is_bluff,
            is_sandbar,
        }
    }

    /// Height sample without context.
    pub fn sample_height(&self, x: f64, z: f64) -> HeightSample {
        self.sample(x, z).height_sample()
    }

    /// River geometry used by this field.
    pub fn river(&self) -> &RiverModel {
        &self.river
    }

    /// Trail network used by this field.
    pub fn trail(&self) -> &TrailNetwork {
        &self.trail
    }

    /// Terrain parameters.
    pub fn terrain_config(&self) -> &TerrainConfig {
        &self.terrain
    }
}

impl Default for HeightField {
    fn default() -> Self {
        Self::new(
            0,
            TerrainConfig::default(),
            RiverConfig::default(),
            TrailConfig::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_height_deterministic() {
        let a = HeightField::default();
        let b = HeightField::default();
        for i in 0..200 {
            let x = i as f64 * 1.7 - 170.0;
            let z = i as f64 * -1.3 + 130.0;
            assert_eq!(
                a.height_at(x, z).to_bits(),
                b.height_at(x, z).to_bits(),
                "height must be bit-identical at ({x}, {z})"
            );
        }
    }

    #[test]
    fn test_channel_center_is_deep() {
        let field = HeightField::default();
        let h = field.height_at(0.0, 0.0);
        assert!(
            (-2.5..=-1.0).contains(&h),
            "River center at origin should be near max depth, got {h}"
        );
    }

    #[test]
    fn test_channel_centerline_is_below_water_everywhere() {
        let field = HeightField::default();
        for i in -30..30 {
            let x = i as f64 * 6.0;
            let z = field.river().meander(x);
            let s = field.sample(x, z);
            assert!(s.river_factor.abs() < EPSILON);
            assert!(
                s.height <= -0.5 + EPSILON,
                "centerline at x={x} should be underwater, got {}",
                s.height
            );
        }
    }

    #[test]
    fn test_far_point_has_no_trail_influence() {
        let field = HeightField::default();
        let s = field.sample(300.0, 0.0);
        assert_eq!(s.trail_factor, 0.0, "no trail or path reaches (300, 0)");
        assert!(s.height.is_finite());
    }

    #[test]
    fn test_trail_flattens_land() {
        let field = HeightField::default();
        let flat = HeightField::new(
            0,
            TerrainConfig::default(),
            RiverConfig::default(),
            TrailConfig {
                // Push the trail and paths far away.
                offset: 10_000.0,
                settlements: Vec::new(),
                ..Default::default()
            },
        );

        let mut checked = 0;
        for i in -40..40 {
            let x = i as f64 * 4.0;
            let z = field.trail().trail_z(x);
            let s = field.sample(x, z);
            if s.river_factor <= TRAIL_LAND_RIVER_FACTOR || s.trail_factor < 1.0 {
                continue;
            }
            let untouched = flat.height_at(x, z);
            let expected = (untouched * 0.7).max(0.2);
            assert!(
                (s.height - expected).abs() < 1e-9,
                "trail center at x={x}: got {}, expected {expected}",
                s.height
            );
            checked += 1;
        }
        assert!(checked > 10, "expected many dry trail samples, got {checked}");
    }

    #[test]
    fn test_sandbars_stay_above_floor() {
        let field = HeightField::default();
        let mut found = 0;
        for i in -200..200 {
            let x = i as f64 * 0.9;
            let center = field.river().meander(x);
            let w = field.river().width(x);
            for frac in [0.35, 0.5, 0.65, 0.75] {
                for side in [1.0, -1.0] {
                    let s = field.sample(x, center + side * w * frac);
                    if s.is_sandbar {
                        found += 1;
                        assert!(s.height >= -0.5 - EPSILON, "sandbar below floor: {}", s.height);
                    }
                }
            }
        }
        assert!(found > 0, "no sandbar samples in the channel");
    }

    #[test]
    fn test_bluffs_only_in_band() {
        let field = HeightField::default();
        for i in -100..100 {
            for j in -60..60 {
                let (x, z) = (i as f64 * 2.0, j as f64 * 1.0);
                let s = field.sample(x, z);
                if s.is_bluff {
                    assert!(z.abs() > 10.0 && z.abs() < 25.0, "bluff outside band at z={z}");
                }
            }
        }
    }

    #[test]
    fn test_different_seeds_change_land() {
        let a = HeightField::default();
        let b = HeightField::new(
            999,
            TerrainConfig::default(),
            RiverConfig::default(),
            TrailConfig::default(),
        );
        let differs = (0..50).any(|i| {
            let x = -120.0 + i as f64 * 3.3;
            (a.height_at(x, 80.0) - b.height_at(x, 80.0)).abs() > 1e-6
        });
        assert!(differs, "different seeds should produce different land");
    }

    #[test]
    fn test_sample_height_matches_height_at() {
        let field = HeightField::default();
        let hs = field.sample_height(42.0, -17.0);
        assert_eq!(hs.height, field.height_at(42.0, -17.0));
        assert_eq!((hs.x, hs.z), (42.0, -17.0));
    }
}
