//! Errors raised by the landscape builders.

use prairie_config::ConfigError;

/// Errors returned when building a grid or scattering a species.
///
/// Samplers (`height_at`, `color_at`, river and trail functions) are total and
/// never produce these.
#[derive(Debug, thiserror::Error)]
pub enum TerrainError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid species profile '{species}': {reason}")]
    InvalidProfile { species: String, reason: String },
}

impl TerrainError {
    pub(crate) fn profile(species: &str, reason: impl Into<String>) -> Self {
        Self::InvalidProfile {
            species: species.to_string(),
            reason: reason.into(),
        }
    }
}
