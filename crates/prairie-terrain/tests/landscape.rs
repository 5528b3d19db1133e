//! End-to-end properties of the landscape generator.

use prairie_config::Config;
use prairie_terrain::{
    HeightField, Landscape, NoiseField, Palette, RiverModel, SpeciesProfile, WaterRule,
    build_terrain_grid, scatter_species,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn grass_profile() -> SpeciesProfile {
    SpeciesProfile::new("grass", 3_000, 180.0).with_height_range(-0.3, f64::INFINITY)
}

#[test]
fn test_height_is_deterministic_across_instances() {
    let a = Landscape::new(&Config::default()).unwrap();
    let b = Landscape::new(&Config::default()).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    for _ in 0..500 {
        let x = rng.random_range(-250.0..250.0);
        let z = rng.random_range(-250.0..250.0);
        assert_eq!(a.height_at(x, z).to_bits(), b.height_at(x, z).to_bits());
    }
}

#[test]
fn test_origin_is_inside_the_river() {
    let landscape = Landscape::new(&Config::default()).unwrap();
    let h = landscape.height_at(0.0, 0.0);
    assert!((-2.5..=-1.0).contains(&h), "expected channel depth, got {h}");
}

#[test]
fn test_far_point_is_plain_land() {
    let landscape = Landscape::new(&Config::default()).unwrap();
    let sample = landscape.sample(300.0, 0.0);
    assert_eq!(sample.trail_factor, 0.0, "no trail or settlement path reaches (300, 0)");
    assert!(sample.height.is_finite());
    assert!(!sample.is_bluff, "|z| = 0 is outside the bluff band");
}

#[test]
fn test_river_factor_is_monotonic() {
    let river = RiverModel::default();
    for i in -20..20 {
        let x = i as f64 * 9.5;
        let center = river.meander(x);
        let mut previous = 0.0;
        for step in 0..200 {
            let d = step as f64 * 0.1;
            let rf = river.river_factor(x, center + d);
            assert!(rf >= previous, "river factor decreased at x={x}, d={d}");
            assert!((0.0..=1.0).contains(&rf));
            previous = rf;
        }
    }
}

#[test]
fn test_fbm_stays_bounded() {
    let noise = NoiseField::new(3);
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    for octaves in 0..=6 {
        for _ in 0..2_000 {
            let x = rng.random_range(-1_000.0..1_000.0);
            let z = rng.random_range(-1_000.0..1_000.0);
            let v = noise.fbm(x, z, octaves);
            assert!((-1.2..=1.2).contains(&v), "fbm({x}, {z}, {octaves}) = {v}");
        }
    }
}

#[test]
fn test_small_grid_is_three_by_three() {
    let mut config = Config::default();
    config.terrain.size = 40.0;
    config.terrain.segments = 2;
    let grid = build_terrain_grid(&config).unwrap();
    assert_eq!(grid.vertex_count(), 9);
    assert_eq!(grid.triangle_count(), 8);

    // Colors blend between palette entries, then jitter shifts lightness by at
    // most `color_jitter`, which moves any channel by at most twice that.
    let entries = Palette::default().entries().map(|c| [c.r, c.g, c.b]);
    let slack = 2.0 * config.terrain.color_jitter + 1e-9;
    for v in grid.vertices() {
        assert!(v.color.is_valid(), "vertex color out of range: {:?}", v.color);
        for (channel, value) in [v.color.r, v.color.g, v.color.b].into_iter().enumerate() {
            let lo = entries.iter().map(|c| c[channel]).fold(f64::INFINITY, f64::min);
            let hi = entries.iter().map(|c| c[channel]).fold(f64::NEG_INFINITY, f64::max);
            assert!(
                value >= lo - slack && value <= hi + slack,
                "channel {channel} = {value} outside palette range [{lo}, {hi}]"
            );
        }
    }
}

#[test]
fn test_grid_shape_for_several_resolutions() {
    for segments in [1u32, 3, 10, 25] {
        let mut config = Config::default();
        config.terrain.size = 100.0;
        config.terrain.segments = segments;
        let grid = build_terrain_grid(&config).unwrap();
        let n = segments as usize;
        assert_eq!(grid.vertex_count(), (n + 1) * (n + 1));
        assert_eq!(grid.indices().len(), 6 * n * n);
    }
}

#[test]
fn test_scatter_respects_minimum_height() {
    let config = Config::default();
    let profile = SpeciesProfile::new("scenario", 1_000, 180.0).with_height_range(-0.3, 100.0);
    let placement = scatter_species(&config, &profile, 7).unwrap();
    assert!(placement.placed() <= 1_000);

    let field = HeightField::default();
    let mut rng = ChaCha8Rng::seed_from_u64(50);
    for _ in 0..50.min(placement.placed()) {
        let inst = placement.instances[rng.random_range(0..placement.placed())];
        let h = field.height_at(inst.position.x, inst.position.z);
        assert!(h >= -0.3, "instance at height {h}");
    }
}

#[test]
fn test_scatter_seeding() {
    let config = Config::default();
    let profile = grass_profile();
    let a = scatter_species(&config, &profile, 1).unwrap();
    let b = scatter_species(&config, &profile, 1).unwrap();
    let c = scatter_species(&config, &profile, 2).unwrap();
    assert_eq!(a.instances, b.instances);
    assert_ne!(a.instances, c.instances);

    let d = scatter_species(&config, &profile, 42).unwrap();
    let e = scatter_species(&config, &profile, 43).unwrap();
    assert_ne!(d.instances, e.instances);
    assert!(e.placed() <= profile.count as usize);
}

#[test]
fn test_water_exclusion_holds_end_to_end() {
    let config = Config::default();
    let landscape = Landscape::new(&config).unwrap();
    let profile = grass_profile().with_water(WaterRule::ExcludeNear { multiplier: 2.0 });
    let placement = landscape.scatter_species(&profile, 5).unwrap();
    for inst in &placement.instances {
        assert!(!landscape.is_near_water(inst.position.x, inst.position.z, 2.0));
    }
}

#[test]
fn test_full_vegetation_quota_bound() {
    let mut config = Config::default();
    config.vegetation.grass_density = 1_000;
    let landscape = Landscape::new(&config).unwrap();
    let placements = landscape.scatter_vegetation().unwrap();
    assert_eq!(placements.len(), landscape.vegetation().profiles().len());
    for (placement, profile) in placements.iter().zip(landscape.vegetation().profiles()) {
        assert!(placement.placed() <= profile.count as usize);
        let (lo, hi) = profile.height_range;
        for inst in &placement.instances {
            let h = landscape.height_at(inst.position.x, inst.position.z);
            assert!(h >= lo && h <= hi, "{} at height {h}", profile.name);
        }
    }
}

#[test]
fn test_seed_changes_terrain_but_not_river() {
    let mut config = Config::default();
    let a = Landscape::new(&config).unwrap();
    config.world.seed = 99;
    let b = Landscape::new(&config).unwrap();
    assert_eq!(a.field().river().meander(10.0), b.field().river().meander(10.0));
    let differs = (0..40).any(|i| {
        let x = -150.0 + i as f64 * 7.0;
        a.height_at(x, 120.0) != b.height_at(x, 120.0)
    });
    assert!(differs);
}
