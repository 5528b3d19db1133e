//! Eager validation of configuration values.
//!
//! Out-of-range values are reported, never clamped or replaced with defaults.

use crate::config::{Config, PaletteConfig, RiverConfig, TerrainConfig, TrailConfig, VegetationConfig};
use crate::error::ConfigError;

/// Parse a `#rrggbb` (or bare `rrggbb`) hex color into linear `[0, 1]` channels.
pub fn parse_hex_color(value: &str) -> Result<[f64; 3], ConfigError> {
    parse_color_field("color", value)
}

pub(crate) fn parse_color_field(field: &str, value: &str) -> Result<[f64; 3], ConfigError> {
    let malformed = || ConfigError::MalformedColor {
        field: field.to_string(),
        value: value.to_string(),
    };

    let hex = value.trim().strip_prefix('#').unwrap_or(value.trim());
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(malformed());
    }
    let rgb = u32::from_str_radix(hex, 16).map_err(|_| malformed())?;

    Ok([
        ((rgb >> 16) & 0xff) as f64 / 255.0,
        ((rgb >> 8) & 0xff) as f64 / 255.0,
        (rgb & 0xff) as f64 / 255.0,
    ])
}

fn positive(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be > 0, got {value}")))
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be >= 0, got {value}")))
    }
}

fn finite(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be finite, got {value}")))
    }
}

impl Config {
    /// Check every section, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("world.extent", self.world.extent)?;
        self.terrain.validate()?;
        self.river.validate()?;
        self.trail.validate()?;
        self.palette.validate()?;
        self.vegetation.validate()?;
        Ok(())
    }
}

impl TerrainConfig {
    /// Validate grid dimensions and noise amplitudes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("terrain.size", self.size)?;
        if self.segments == 0 {
            return Err(ConfigError::invalid("terrain.segments", "must be at least 1"));
        }
        non_negative("terrain.hill_amplitude", self.hill_amplitude)?;
        non_negative("terrain.detail_amplitude", self.detail_amplitude)?;
        non_negative("terrain.fine_amplitude", self.fine_amplitude)?;
        non_negative("terrain.bluff_strength", self.bluff_strength)?;
        non_negative("terrain.hill_strength", self.hill_strength)?;
        non_negative("terrain.color_jitter", self.color_jitter)?;
        if self.color_jitter > 0.5 {
            return Err(ConfigError::invalid(
                "terrain.color_jitter",
                format!("must be <= 0.5, got {}", self.color_jitter),
            ));
        }
        Ok(())
    }
}

impl RiverConfig {
    /// Validate river geometry. The channel width must stay positive for every `x`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        finite("river.meander_amplitude", self.meander_amplitude)?;
        finite("river.meander_frequency", self.meander_frequency)?;
        finite("river.secondary_amplitude", self.secondary_amplitude)?;
        finite("river.secondary_frequency", self.secondary_frequency)?;
        finite("river.width_frequency", self.width_frequency)?;
        positive("river.base_width", self.base_width)?;
        non_negative("river.width_amplitude", self.width_amplitude)?;
        if self.width_amplitude >= self.base_width {
            return Err(ConfigError::invalid(
                "river.width_amplitude",
                format!(
                    "must be smaller than base_width ({}) so the channel never closes, got {}",
                    self.base_width, self.width_amplitude
                ),
            ));
        }
        finite("river.bed_depth", self.bed_depth)?;
        non_negative("river.bed_rise", self.bed_rise)?;
        positive("river.near_water_multiplier", self.near_water_multiplier)?;
        Ok(())
    }
}

impl TrailConfig {
    /// Validate trail curve, corridor widths, and settlement positions.
    pub fn validate(&self) -> Result<(), ConfigError> {
        finite("trail.amplitude", self.amplitude)?;
        finite("trail.frequency", self.frequency)?;
        finite("trail.secondary_amplitude", self.secondary_amplitude)?;
        finite("trail.secondary_frequency", self.secondary_frequency)?;
        finite("trail.offset", self.offset)?;
        non_negative("trail.inner_radius", self.inner_radius)?;
        positive("trail.outer_radius", self.outer_radius)?;
        if self.inner_radius >= self.outer_radius {
            return Err(ConfigError::invalid(
                "trail.inner_radius",
                format!(
                    "must be smaller than outer_radius ({}), got {}",
                    self.outer_radius, self.inner_radius
                ),
            ));
        }
        positive("trail.path_half_width", self.path_half_width)?;
        non_negative("trail.path_margin", self.path_margin)?;
        non_negative("trail.footprint_radius", self.footprint_radius)?;
        for (i, s) in self.settlements.iter().enumerate() {
            finite(&format!("trail.settlements[{i}].x"), s.x)?;
            finite(&format!("trail.settlements[{i}].z"), s.z)?;
        }
        Ok(())
    }
}

impl PaletteConfig {
    /// Ensure every palette entry parses as a hex color.
    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_color_field("palette.grass", &self.grass)?;
        parse_color_field("palette.dry_grass", &self.dry_grass)?;
        parse_color_field("palette.riverbed", &self.riverbed)?;
        parse_color_field("palette.sandbar", &self.sandbar)?;
        parse_color_field("palette.bluff", &self.bluff)?;
        parse_color_field("palette.trail", &self.trail)?;
        Ok(())
    }
}

impl VegetationConfig {
    /// Validate densities, shares, and tint colors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("vegetation.tall_grass_fraction", self.tall_grass_fraction)?;
        non_negative("vegetation.deciduous_share", self.deciduous_share)?;
        non_negative("vegetation.willow_share", self.willow_share)?;
        non_negative("vegetation.poplar_share", self.poplar_share)?;
        non_negative("vegetation.spruce_share", self.spruce_share)?;
        parse_color_field("vegetation.grass_color", &self.grass_color)?;
        parse_color_field("vegetation.tall_grass_color", &self.tall_grass_color)?;
        parse_color_field("vegetation.reed_color", &self.reed_color)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invalid_field(result: Result<(), ConfigError>, expected: &str) {
        match result {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected Invalid({expected}), got {other:?}"),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn test_parse_hex_color() {
        let c = parse_hex_color("#ff8000").unwrap();
        assert!((c[0] - 1.0).abs() < 1e-12);
        assert!((c[1] - 128.0 / 255.0).abs() < 1e-12);
        assert!(c[2].abs() < 1e-12);

        let bare = parse_hex_color("3a5f0b").unwrap();
        assert_eq!(bare, parse_hex_color("#3a5f0b").unwrap());
    }

    #[test]
    fn test_malformed_colors_rejected() {
        for bad in ["", "#", "#12345", "#1234567", "#gg0000", "green", "#+12345"] {
            assert!(
                matches!(parse_hex_color(bad), Err(ConfigError::MalformedColor { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_malformed_palette_names_field() {
        let mut config = Config::default();
        config.palette.sandbar = "sand".to_string();
        match config.validate() {
            Err(ConfigError::MalformedColor { field, value }) => {
                assert_eq!(field, "palette.sandbar");
                assert_eq!(value, "sand");
            }
            other => panic!("expected MalformedColor, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_segments_rejected() {
        let mut config = Config::default();
        config.terrain.segments = 0;
        assert_invalid_field(config.validate(), "terrain.segments");
    }

    #[test]
    fn test_non_positive_size_rejected() {
        let mut config = Config::default();
        config.terrain.size = -10.0;
        assert_invalid_field(config.validate(), "terrain.size");

        config.terrain.size = 0.0;
        assert_invalid_field(config.validate(), "terrain.size");

        config.terrain.size = f64::NAN;
        assert_invalid_field(config.validate(), "terrain.size");
    }

    #[test]
    fn test_negative_share_rejected() {
        let mut config = Config::default();
        config.vegetation.willow_share = -0.1;
        assert_invalid_field(config.validate(), "vegetation.willow_share");
    }

    #[test]
    fn test_river_width_must_stay_positive() {
        let mut config = Config::default();
        config.river.width_amplitude = config.river.base_width;
        assert_invalid_field(config.validate(), "river.width_amplitude");
    }

    #[test]
    fn test_trail_radii_order() {
        let mut config = Config::default();
        config.trail.inner_radius = 5.0;
        assert_invalid_field(config.validate(), "trail.inner_radius");
    }
}
