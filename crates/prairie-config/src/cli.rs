//! Command-line argument parsing for the landscape generator.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Prairie landscape generator command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "prairie-gen", about = "Procedural prairie landscape generator")]
pub struct CliArgs {
    /// World seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Terrain edge length in world units.
    #[arg(long)]
    pub size: Option<f64>,

    /// Grid cells along each terrain edge.
    #[arg(long)]
    pub segments: Option<u32>,

    /// Number of grass blades to scatter.
    #[arg(long)]
    pub grass_density: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write the generated landscape as JSON to this file.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.world.seed = seed;
        }
        if let Some(size) = args.size {
            self.terrain.size = size;
        }
        if let Some(segments) = args.segments {
            self.terrain.segments = segments;
        }
        if let Some(density) = args.grass_density {
            self.vegetation.grass_density = density;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
