//! Procedural prairie landscape: layered noise height field, river and trail
//! carving, rule-based biome coloring, terrain grid building, and constrained
//! instance placement for vegetation and props.

mod error;
mod grid;
mod heightfield;
mod landscape;
mod noise_field;
mod placement;
mod river;
mod seed;
mod trail;

pub mod biome;
pub mod vegetation;

pub use biome::{BiomeColorizer, BiomeRule, ColorContext, Palette, Rgb};
pub use error::TerrainError;
pub use grid::{MAX_SEGMENTS, TerrainGrid, TerrainVertex};
pub use heightfield::{HeightField, HeightSample, TRAIL_LAND_RIVER_FACTOR, TerrainSample};
pub use landscape::{Landscape, build_terrain_grid, scatter_species};
pub use noise_field::{NoiseField, lerp, smoothstep};
pub use placement::{
    ClusterRule, InstanceTransform, Placement, PlacementEngine, RotationPolicy, SamplingRegion,
    ScaleRule, SiteRule, SpeciesProfile, TintRule, WaterRule,
};
pub use river::{DEFAULT_NEAR_WATER_MULTIPLIER, RiverModel};
pub use seed::{derive_seed, species_seed, vertex_rng};
pub use trail::TrailNetwork;
pub use vegetation::{VegetationSystem, default_species};
