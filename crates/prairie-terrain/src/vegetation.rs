//! Species catalogue and scatter orchestration.
//!
//! One [`SpeciesProfile`] per plant or prop kind, built from configuration.
//! Each species gets its own placement stream seeded from the world seed and
//! its name, so species can be scattered in any order, or concurrently, with
//! identical results.

use prairie_config::{Config, ConfigError, VegetationConfig, parse_hex_color};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::info;

use crate::biome::Rgb;
use crate::error::TerrainError;
use crate::heightfield::HeightField;
use crate::placement::{
    ClusterRule, Placement, PlacementEngine, RotationPolicy, SamplingRegion, ScaleRule, SiteRule,
    SpeciesProfile, TintRule, WaterRule,
};
use crate::seed::species_seed;

pub const GRASS: &str = "grass";
pub const TALL_GRASS: &str = "tall_grass";
pub const REEDS: &str = "reeds";
pub const DECIDUOUS: &str = "deciduous";
pub const WILLOW: &str = "willow";
pub const POPLAR: &str = "poplar";
pub const SPRUCE: &str = "spruce";
pub const BERRY_BUSH: &str = "berry_bush";
pub const ROCKS: &str = "rocks";

/// Trees keep clear of the river by this many channel widths.
const TREE_WATER_MULTIPLIER: f64 = 2.5;
/// Grass within this many widths of the river is tinted more saturated.
const LUSH_GRASS_MULTIPLIER: f64 = 2.5;
const LUSH_GRASS_SATURATION: f64 = 0.1;
const REED_INSTANCES_PER_CLUSTER: u32 = 20;
/// Rocks scatter over `±175` of the default `±180` world.
const ROCK_REACH: f64 = 175.0 / 180.0;

fn color(field: &str, value: &str) -> Result<Rgb, TerrainError> {
    parse_hex_color(value)
        .map(Rgb::from_array)
        .map_err(|_| {
            TerrainError::Config(ConfigError::MalformedColor {
                field: field.to_string(),
                value: value.to_string(),
            })
        })
}

fn share(total: u32, fraction: f64) -> u32 {
    (f64::from(total) * fraction).floor() as u32
}

/// Build the default catalogue for a world of half-width `extent`.
///
/// # Errors
///
/// Fails if a tint color does not parse.
pub fn default_species(
    veg: &VegetationConfig,
    extent: f64,
) -> Result<Vec<SpeciesProfile>, TerrainError> {
    let river_reach = extent * 0.85;

    let grass = SpeciesProfile::new(GRASS, veg.grass_density, extent)
        .with_height_range(-0.3, f64::INFINITY)
        .with_scale(ScaleRule::Uniform { min: 0.5, max: 1.1 })
        .with_tint(TintRule {
            base: color("vegetation.grass_color", &veg.grass_color)?,
            hue_span: 0.05,
            saturation_span: 0.1,
            lightness_span: 0.1,
            near_water_saturation: Some((LUSH_GRASS_MULTIPLIER, LUSH_GRASS_SATURATION)),
        });

    let tall_grass = SpeciesProfile::new(
        TALL_GRASS,
        share(veg.grass_density, veg.tall_grass_fraction),
        extent * 0.95,
    )
    .with_oversample(2)
    .with_height_range(0.5, 6.0)
    .with_scale(ScaleRule::Uniform { min: 0.8, max: 1.2 })
    .with_tint(TintRule::lightness(
        color("vegetation.tall_grass_color", &veg.tall_grass_color)?,
        0.1,
    ));

    let reed_count = veg
        .reed_cluster_count
        .checked_mul(REED_INSTANCES_PER_CLUSTER)
        .ok_or_else(|| {
            TerrainError::Config(ConfigError::Invalid {
                field: "vegetation.reed_cluster_count".to_string(),
                reason: format!(
                    "{} clusters of {REED_INSTANCES_PER_CLUSTER} reeds overflow the instance count",
                    veg.reed_cluster_count
                ),
            })
        })?;

    let reeds = SpeciesProfile::new(REEDS, reed_count, river_reach)
        .with_region(SamplingRegion::RiverBand {
            half_extent: river_reach,
            min_widths: 0.8,
            max_widths: 0.8,
            extra: 5.0,
        })
        .with_height_range(-0.5, 1.0)
        .with_scale(ScaleRule::PerAxis {
            horizontal: (0.8, 1.2),
            vertical: (0.7, 1.2),
        })
        .with_tint(TintRule::lightness(
            color("vegetation.reed_color", &veg.reed_color)?,
            0.1,
        ))
        .with_clusters(ClusterRule {
            anchors: veg.reed_cluster_count,
            members: (8, 19),
            radius: 2.0,
        });

    let deciduous = SpeciesProfile::new(
        DECIDUOUS,
        share(veg.tree_count, veg.deciduous_share),
        extent * 0.95,
    )
    .with_oversample(3)
    .with_height_range(1.0, 8.0)
    .with_water(WaterRule::ExcludeNear {
        multiplier: TREE_WATER_MULTIPLIER,
    })
    .with_scale(ScaleRule::Uniform { min: 0.8, max: 1.6 })
    .avoiding_settlements();

    let willow = SpeciesProfile::new(WILLOW, share(veg.tree_count, veg.willow_share), river_reach)
        .with_oversample(4)
        .with_region(SamplingRegion::RiverBand {
            half_extent: river_reach,
            min_widths: 1.0,
            max_widths: 1.0,
            extra: 15.0,
        })
        .with_height_range(0.0, 3.0)
        .with_scale(ScaleRule::Uniform { min: 0.9, max: 1.4 })
        .avoiding_settlements();

    let poplar = SpeciesProfile::new(POPLAR, share(veg.tree_count, veg.poplar_share), extent * 0.9)
        .with_oversample(3)
        .with_height_range(0.5, 7.0)
        .with_scale(ScaleRule::Uniform { min: 0.7, max: 1.3 })
        .avoiding_settlements();

    let spruce = SpeciesProfile::new(
        SPRUCE,
        share(veg.tree_count, veg.spruce_share),
        extent * 0.95,
    )
    .with_oversample(4)
    .with_height_range(2.0, 9.0)
    .with_scale(ScaleRule::Uniform { min: 0.6, max: 1.4 })
    .avoiding_settlements();

    let berry_bush = SpeciesProfile::new(BERRY_BUSH, veg.bush_count, river_reach)
        .with_oversample(3)
        .with_height_range(0.3, 4.0)
        .with_scale(ScaleRule::Stretched {
            min: 0.6,
            max: 1.4,
            vertical: (0.8, 1.2),
        })
        .avoiding_settlements();

    let rocks = SpeciesProfile::new(ROCKS, veg.rock_count, extent * ROCK_REACH)
        .with_oversample(2)
        .with_height_range(0.0, f64::INFINITY)
        .with_site(SiteRule::RiverbankOrHighGround {
            bank_min: 0.5,
            bank_max: 2.0,
            high_ground: 3.0,
        })
        .with_scale(ScaleRule::Stretched {
            min: 0.2,
            max: 0.8,
            vertical: (0.7, 0.7),
        })
        .with_rotation(RotationPolicy::Tumble {
            span: std::f64::consts::PI,
        })
        .with_sink(0.3)
        .avoiding_settlements();

    Ok(vec![
        grass, tall_grass, reeds, deciduous, willow, poplar, spruce, berry_bush, rocks,
    ])
}

/// Every species of one world, ready to scatter.
#[derive(Clone, Debug)]
pub struct VegetationSystem {
    world_seed: u64,
    profiles: Vec<SpeciesProfile>,
}

impl VegetationSystem {
    /// Build the catalogue from a full configuration.
    ///
    /// # Errors
    ///
    /// Returns the first configuration or profile problem found.
    pub fn from_config(config: &Config) -> Result<Self, TerrainError> {
        config.vegetation.validate()?;
        let profiles = default_species(&config.vegetation, config.world.extent)?;
        Self::with_profiles(config.world.seed, profiles)
    }

    /// Use a custom catalogue.
    ///
    /// # Errors
    ///
    /// [`TerrainError::InvalidProfile`] if any profile fails validation or
    /// two profiles share a name.
    pub fn with_profiles(
        world_seed: u64,
        profiles: Vec<SpeciesProfile>,
    ) -> Result<Self, TerrainError> {
        for (i, profile) in profiles.iter().enumerate() {
            profile.validate()?;
            if profiles[..i].iter().any(|p| p.name == profile.name) {
                return Err(TerrainError::profile(&profile.name, "duplicate species name"));
            }
        }
        Ok(Self {
            world_seed,
            profiles,
        })
    }

    pub fn profiles(&self) -> &[SpeciesProfile] {
        &self.profiles
    }

    pub fn profile(&self, name: &str) -> Option<&SpeciesProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    /// The placement seed of a species in this world.
    pub fn seed_for(&self, name: &str) -> u64 {
        species_seed(self.world_seed, name)
    }

    /// Scatter every species over `field` in parallel.
    ///
    /// Results are in catalogue order.
    ///
    /// # Errors
    ///
    /// [`TerrainError::InvalidProfile`] if the engine rejects a profile.
    pub fn scatter_all(&self, field: &HeightField) -> Result<Vec<Placement>, TerrainError> {
        let engine = PlacementEngine::new(field);
        let placements = self
            .profiles
            .par_iter()
            .map(|profile| {
                let mut rng = ChaCha8Rng::seed_from_u64(self.seed_for(&profile.name));
                engine.place(profile, &mut rng)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let total: usize = placements.iter().map(Placement::placed).sum();
        info!(
            "Scattered {total} instances across {} species",
            placements.len()
        );
        Ok(placements)
    }

    /// Scatter a single species by name. `Ok(None)` if the catalogue has no such species.
    ///
    /// # Errors
    ///
    /// [`TerrainError::InvalidProfile`] if the engine rejects the profile.
    pub fn scatter_one(
        &self,
        field: &HeightField,
        name: &str,
    ) -> Result<Option<Placement>, TerrainError> {
        let Some(profile) = self.profile(name) else {
            return Ok(None);
        };
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed_for(name));
        PlacementEngine::new(field).place(profile, &mut rng).map(Some)
    }
}
