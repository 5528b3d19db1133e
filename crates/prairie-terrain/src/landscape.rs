//! One-stop facade over a validated configuration.

use prairie_config::Config;
use tracing::info;

use crate::biome::{BiomeColorizer, ColorContext, Palette, Rgb};
use crate::error::TerrainError;
use crate::grid::TerrainGrid;
use crate::heightfield::{HeightField, TerrainSample};
use crate::placement::{Placement, PlacementEngine, SpeciesProfile};
use crate::seed::derive_seed;
use crate::vegetation::VegetationSystem;

/// Height field, colorizer and species catalogue for one world.
///
/// Construction validates the whole configuration; every method afterwards
/// is either infallible or only checks its own arguments.
#[derive(Clone, Debug)]
pub struct Landscape {
    config: Config,
    field: HeightField,
    colorizer: BiomeColorizer,
    vegetation: VegetationSystem,
}

impl Landscape {
    /// # Errors
    ///
    /// [`TerrainError::Config`] for any out-of-range or malformed option.
    pub fn new(config: &Config) -> Result<Self, TerrainError> {
        config.validate()?;

        let field = HeightField::new(
            config.world.seed,
            config.terrain.clone(),
            config.river.clone(),
            config.trail.clone(),
        );
        let palette = Palette::from_config(&config.palette)?;
        let colorizer = BiomeColorizer::new(palette, config.terrain.color_jitter);
        let vegetation = VegetationSystem::from_config(config)?;

        Ok(Self {
            config: config.clone(),
            field,
            colorizer,
            vegetation,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn field(&self) -> &HeightField {
        &self.field
    }

    pub fn colorizer(&self) -> &BiomeColorizer {
        &self.colorizer
    }

    pub fn vegetation(&self) -> &VegetationSystem {
        &self.vegetation
    }

    pub fn height_at(&self, x: f64, z: f64) -> f64 {
        self.field.height_at(x, z)
    }

    pub fn sample(&self, x: f64, z: f64) -> TerrainSample {
        self.field.sample(x, z)
    }

    /// Proximity test with an explicit multiplier of the channel width.
    pub fn is_near_water(&self, x: f64, z: f64, multiplier: f64) -> bool {
        self.field.river().is_near_water(x, z, multiplier)
    }

    /// Proximity test with the configured default multiplier.
    pub fn is_near_water_default(&self, x: f64, z: f64) -> bool {
        self.field.river().is_near_water_default(x, z)
    }

    /// Color of the grid vertex `index` sitting at `(x, z)`.
    pub fn color_at(&self, x: f64, z: f64, index: usize) -> Rgb {
        let sample = self.field.sample(x, z);
        self.colorizer
            .color_at(&ColorContext::from(&sample), self.jitter_seed(), index)
    }

    /// Grid at the configured size and resolution.
    pub fn build_terrain_grid(&self) -> Result<TerrainGrid, TerrainError> {
        let grid = TerrainGrid::build(
            &self.field,
            &self.colorizer,
            self.config.terrain.size,
            self.config.terrain.segments,
            self.jitter_seed(),
        )?;
        let (lo, hi) = grid.height_range();
        info!(
            "Terrain grid {}x{}: {} vertices, {} triangles, heights {lo:.2}..{hi:.2}",
            grid.row_len(),
            grid.row_len(),
            grid.vertex_count(),
            grid.triangle_count()
        );
        Ok(grid)
    }

    /// Scatter one profile with an explicit seed.
    pub fn scatter_species(
        &self,
        profile: &SpeciesProfile,
        seed: u64,
    ) -> Result<Placement, TerrainError> {
        PlacementEngine::new(&self.field).scatter(profile, seed)
    }

    /// Scatter the whole configured catalogue.
    ///
    /// # Errors
    ///
    /// [`TerrainError::InvalidProfile`] if the engine rejects a profile.
    pub fn scatter_vegetation(&self) -> Result<Vec<Placement>, TerrainError> {
        self.vegetation.scatter_all(&self.field)
    }

    fn jitter_seed(&self) -> u64 {
        derive_seed(self.config.world.seed, "vertex-color")
    }
}

/// Validate `config` and build its terrain grid.
///
/// # Errors
///
/// [`TerrainError::Config`] if the configuration is invalid.
pub fn build_terrain_grid(config: &Config) -> Result<TerrainGrid, TerrainError> {
    Landscape::new(config)?.build_terrain_grid()
}

/// Scatter `profile` over the default landscape of `config`.
///
/// # Errors
///
/// Fails on an invalid configuration or profile.
pub fn scatter_species(
    config: &Config,
    profile: &SpeciesProfile,
    seed: u64,
) -> Result<Placement, TerrainError> {
    config.validate()?;
    let field = HeightField::new(
        config.world.seed,
        config.terrain.clone(),
        config.river.clone(),
        config.trail.clone(),
    );
    PlacementEngine::new(&field).scatter(profile, seed)
}
