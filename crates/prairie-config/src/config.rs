//! Configuration structs with documented defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level landscape configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// World-wide settings (seed, scatter domain).
    pub world: WorldConfig,
    /// Height field and grid settings.
    pub terrain: TerrainConfig,
    /// River channel geometry.
    pub river: RiverConfig,
    /// Cart trail and settlement paths.
    pub trail: TrailConfig,
    /// Biome colors.
    pub palette: PaletteConfig,
    /// Vegetation and prop populations.
    pub vegetation: VegetationConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// World-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Seed for noise and every random stream derived from it.
    pub seed: u64,
    /// Half-width of the square domain species are scattered over.
    pub extent: f64,
}

/// Height field and grid settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// Edge length of the square terrain grid in world units.
    pub size: f64,
    /// Number of grid cells along each edge.
    pub segments: u32,
    /// Amplitude of the large rolling hills.
    pub hill_amplitude: f64,
    /// Amplitude of the medium detail layer.
    pub detail_amplitude: f64,
    /// Amplitude of the fine detail layer.
    pub fine_amplitude: f64,
    /// Height added on bluff zones, scaled by the bluff noise.
    pub bluff_strength: f64,
    /// Height added on small hills above the hill noise threshold.
    pub hill_strength: f64,
    /// Maximum HSL lightness offset applied to each vertex color.
    pub color_jitter: f64,
}

/// River channel geometry.
///
/// Centerline: `sin(x * meander_frequency) * meander_amplitude
/// + sin(x * secondary_frequency) * secondary_amplitude`.
/// Width: `base_width + sin(x * width_frequency) * width_amplitude`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RiverConfig {
    pub meander_amplitude: f64,
    pub meander_frequency: f64,
    pub secondary_amplitude: f64,
    pub secondary_frequency: f64,
    pub base_width: f64,
    pub width_amplitude: f64,
    pub width_frequency: f64,
    /// Riverbed height at the channel center.
    pub bed_depth: f64,
    /// How far the bed rises from the center to the channel edge.
    pub bed_rise: f64,
    /// Default width multiplier for near-water checks.
    pub near_water_multiplier: f64,
}

/// A settlement (cabin) connected to the main trail by a straight path.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SettlementConfig {
    pub x: f64,
    pub z: f64,
}

/// Cart trail and settlement paths.
///
/// Trail centerline: `sin(x * frequency) * amplitude
/// + cos(x * secondary_frequency) * secondary_amplitude + offset`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrailConfig {
    pub amplitude: f64,
    pub frequency: f64,
    pub secondary_amplitude: f64,
    pub secondary_frequency: f64,
    pub offset: f64,
    /// Distance within which the trail has full effect.
    pub inner_radius: f64,
    /// Distance beyond which the trail has no effect.
    pub outer_radius: f64,
    /// Half-width of the corridor from a settlement to the trail.
    pub path_half_width: f64,
    /// Extra length past each end of a settlement path.
    pub path_margin: f64,
    /// Radius around each settlement kept clear of scattered objects.
    pub footprint_radius: f64,
    pub settlements: Vec<SettlementConfig>,
}

/// Biome colors as `#rrggbb` hex strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PaletteConfig {
    pub grass: String,
    pub dry_grass: String,
    pub riverbed: String,
    pub sandbar: String,
    pub bluff: String,
    pub trail: String,
}

/// Vegetation and prop populations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VegetationConfig {
    /// Number of short grass blades.
    pub grass_density: u32,
    /// Tall grass count as a fraction of `grass_density`.
    pub tall_grass_fraction: f64,
    /// Total tree budget, split between kinds by the shares below.
    pub tree_count: u32,
    pub deciduous_share: f64,
    pub willow_share: f64,
    pub poplar_share: f64,
    pub spruce_share: f64,
    pub reed_cluster_count: u32,
    pub bush_count: u32,
    pub rock_count: u32,
    pub grass_color: String,
    pub tall_grass_color: String,
    pub reed_color: String,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            extent: 180.0,
        }
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            size: 400.0,
            segments: 200,
            hill_amplitude: 6.0,
            detail_amplitude: 1.5,
            fine_amplitude: 0.3,
            bluff_strength: 4.0,
            hill_strength: 6.0,
            color_jitter: 0.025,
        }
    }
}

impl Default for RiverConfig {
    fn default() -> Self {
        Self {
            meander_amplitude: 12.0,
            meander_frequency: 0.03,
            secondary_amplitude: 5.0,
            secondary_frequency: 0.01,
            base_width: 8.0,
            width_amplitude: 4.0,
            width_frequency: 0.02,
            bed_depth: -2.5,
            bed_rise: 1.5,
            near_water_multiplier: 2.0,
        }
    }
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            amplitude: 25.0,
            frequency: 0.04,
            secondary_amplitude: 10.0,
            secondary_frequency: 0.02,
            offset: 25.0,
            inner_radius: 0.5,
            outer_radius: 3.0,
            path_half_width: 3.0,
            path_margin: 2.0,
            footprint_radius: 8.0,
            settlements: vec![
                SettlementConfig { x: -60.0, z: 50.0 },
                SettlementConfig { x: -20.0, z: -70.0 },
                SettlementConfig { x: 30.0, z: 70.0 },
                SettlementConfig { x: 80.0, z: -70.0 },
                SettlementConfig { x: 130.0, z: 55.0 },
            ],
        }
    }
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            grass: "#3a5f0b".to_string(),
            dry_grass: "#8f7e45".to_string(),
            riverbed: "#3d3d3d".to_string(),
            sandbar: "#c4a87c".to_string(),
            bluff: "#7a6b5a".to_string(),
            trail: "#6b5a4a".to_string(),
        }
    }
}

impl Default for VegetationConfig {
    fn default() -> Self {
        Self {
            grass_density: 50_000,
            tall_grass_fraction: 0.15,
            tree_count: 80,
            deciduous_share: 0.3,
            willow_share: 0.2,
            poplar_share: 0.25,
            spruce_share: 0.15,
            reed_cluster_count: 30,
            bush_count: 40,
            rock_count: 100,
            grass_color: "#3a5f0b".to_string(),
            tall_grass_color: "#4a6f1b".to_string(),
            reed_color: "#5a7a4a".to_string(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Returns `Some(new_config)` if the file on disk differs from `self`, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
