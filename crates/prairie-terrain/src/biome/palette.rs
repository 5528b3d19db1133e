//! Biome palette: the parsed colors the rule table blends between.

use prairie_config::{ConfigError, PaletteConfig, parse_hex_color};

use super::Rgb;

/// Parsed terrain colors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Lush grass near water.
    pub grass: Rgb,
    /// Dry prairie on hilltops.
    pub dry_grass: Rgb,
    /// Deep riverbed.
    pub riverbed: Rgb,
    /// Sand on sandbars and in the shallows.
    pub sandbar: Rgb,
    /// Exposed earth on cutbanks.
    pub bluff: Rgb,
    /// Cart trail dirt.
    pub trail: Rgb,
}

impl Palette {
    /// Parse a palette from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MalformedColor`] naming the first entry that is not `#rrggbb`.
    pub fn from_config(config: &PaletteConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            grass: Rgb::from_array(parse_hex_color(&config.grass)?),
            dry_grass: Rgb::from_array(parse_hex_color(&config.dry_grass)?),
            riverbed: Rgb::from_array(parse_hex_color(&config.riverbed)?),
            sandbar: Rgb::from_array(parse_hex_color(&config.sandbar)?),
            bluff: Rgb::from_array(parse_hex_color(&config.bluff)?),
            trail: Rgb::from_array(parse_hex_color(&config.trail)?),
        })
    }

    /// All entries, for bounds checks.
    pub fn entries(&self) -> [Rgb; 6] {
        [
            self.grass,
            self.dry_grass,
            self.riverbed,
            self.sandbar,
            self.bluff,
            self.trail,
        ]
    }
}

impl Default for Palette {
    fn default() -> Self {
        // The default palette always parses.
        Self::from_config(&PaletteConfig::default()).unwrap_or(Self {
            grass: Rgb::new(0.227, 0.373, 0.043),
            dry_grass: Rgb::new(0.561, 0.494, 0.271),
            riverbed: Rgb::new(0.239, 0.239, 0.239),
            sandbar: Rgb::new(0.769, 0.659, 0.486),
            bluff: Rgb::new(0.478, 0.420, 0.353),
            trail: Rgb::new(0.420, 0.353, 0.290),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette_parses() {
        let palette = Palette::default();
        assert!((palette.riverbed.r - 0x3d as f64 / 255.0).abs() < 1e-12);
        assert!(palette.entries().iter().all(|c| c.is_valid()));
    }

    #[test]
    fn test_malformed_palette_rejected() {
        let config = PaletteConfig {
            bluff: "#12".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            Palette::from_config(&config),
            Err(ConfigError::MalformedColor { .. })
        ));
    }
}
