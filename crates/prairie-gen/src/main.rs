//! Command-line generator for the prairie landscape.
//!
//! Loads `config.ron` (creating it with defaults on first run), applies CLI
//! overrides, builds the terrain grid and every vegetation species once, and
//! logs a summary. Pass `--export scene.json` to write the result to disk.
//!
//! Run with `cargo run -p prairie-gen -- --seed 7 --segments 100`.

mod export;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use prairie_config::{CliArgs, Config, ConfigError};
use prairie_terrain::Landscape;
use tracing::{error, info, warn};

use crate::export::{Snapshot, write_snapshot};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = args.config.clone().unwrap_or_else(|| {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("prairie")
    });

    // Logging is not up yet, so config failures go to stderr.
    let config = match resolve_config(&config_dir, &args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config from {}: {e}", config_dir.display());
            return ExitCode::from(2);
        }
    };

    let log_dir = config_dir.join("logs");
    prairie_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    info!(
        "Generating landscape: seed {}, size {}, {} segments",
        config.world.seed, config.terrain.size, config.terrain.segments
    );

    let landscape = match Landscape::new(&config) {
        Ok(landscape) => landscape,
        Err(e) => {
            error!("{e}");
            return ExitCode::from(2);
        }
    };

    let grid = match landscape.build_terrain_grid() {
        Ok(grid) => grid,
        Err(e) => {
            error!("Failed to build terrain grid: {e}");
            return ExitCode::from(2);
        }
    };

    let placements = match landscape.scatter_vegetation() {
        Ok(placements) => placements,
        Err(e) => {
            error!("Failed to scatter vegetation: {e}");
            return ExitCode::from(2);
        }
    };
    for placement in &placements {
        if placement.is_underfilled() {
            warn!(
                "{:<12} {:>6} / {:<6} (short by {})",
                placement.species,
                placement.placed(),
                placement.requested,
                placement.shortfall()
            );
        } else {
            info!(
                "{:<12} {:>6} / {:<6}",
                placement.species,
                placement.placed(),
                placement.requested
            );
        }
    }

    if let Some(path) = &args.export {
        let snapshot = Snapshot {
            config: &config,
            grid: &grid,
            placements: &placements,
        };
        if let Err(e) = write_snapshot(path, &snapshot) {
            error!("Failed to export {}: {e}", path.display());
            return ExitCode::FAILURE;
        }
        info!("Exported landscape to {}", path.display());
    }

    ExitCode::SUCCESS
}

/// Load `config.ron` from `config_dir` (writing defaults if it is absent) and
/// apply CLI overrides. An unreadable or malformed file is an error.
fn resolve_config(config_dir: &Path, args: &CliArgs) -> Result<Config, ConfigError> {
    let mut config = Config::load_or_create(config_dir)?;
    config.apply_cli_overrides(args);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> CliArgs {
        CliArgs::parse_from(std::iter::once("prairie-gen").chain(extra.iter().copied()))
    }

    #[test]
    fn test_missing_config_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let config = resolve_config(dir.path(), &args(&["--seed", "9"])).unwrap();
        assert_eq!(config.world.seed, 9);
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_malformed_config_is_not_replaced() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "(terrain: (segments: ").unwrap();
        assert!(matches!(
            resolve_config(dir.path(), &args(&[])),
            Err(ConfigError::ParseError(_))
        ));
    }
}
