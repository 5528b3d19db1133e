//! Configuration system for the prairie landscape generator.
//!
//! Provides the numeric and color options consumed by terrain generation,
//! persisted to disk as RON files. Supports CLI overrides via clap, reload
//! detection, forward/backward compatible serialization, and eager
//! validation that reports out-of-range values instead of clamping them.

mod cli;
mod config;
mod error;
mod validate;

pub use cli::CliArgs;
pub use config::{
    Config, DebugConfig, PaletteConfig, RiverConfig, SettlementConfig, TerrainConfig,
    TrailConfig, VegetationConfig, WorldConfig,
};
pub use error::ConfigError;
pub use validate::parse_hex_color;
