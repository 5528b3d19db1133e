//! Parametric river channel: a meandering centerline with varying width.
//!
//! The river runs along the x axis. Its geometry is a pure function of the
//! longitudinal coordinate, so nothing is stored beyond the parameters.

use prairie_config::RiverConfig;

use crate::noise_field::smoothstep;
use crate::seed::det_sin;

/// Multiplier used by [`RiverModel::is_near_water_default`].
pub const DEFAULT_NEAR_WATER_MULTIPLIER: f64 = 2.0;

/// River geometry oracle.
#[derive(Clone, Debug)]
pub struct RiverModel {
    config: RiverConfig,
}

impl RiverModel {
    /// Create a river from validated parameters.
    pub fn new(config: RiverConfig) -> Self {
        Self { config }
    }

    /// The z coordinate of the channel centerline at `x`.
    ///
    /// Two superimposed sine waves give the organic wandering.
    pub fn meander(&self, x: f64) -> f64 {
        let c = &self.config;
        det_sin(x * c.meander_frequency) * c.meander_amplitude
            + det_sin(x * c.secondary_frequency) * c.secondary_amplitude
    }

    /// Channel width at `x`. Always positive for a validated config.
    pub fn width(&self, x: f64) -> f64 {
        let c = &self.config;
        c.base_width + det_sin(x * c.width_frequency) * c.width_amplitude
    }

    /// Lateral distance from `(x, z)` to the centerline.
    pub fn distance(&self, x: f64, z: f64) -> f64 {
        (z - self.meander(x)).abs()
    }

    /// Blend weight between riverbed (0) and land (1).
    ///
    /// Zero within half a width of the centerline, one beyond one and a half
    /// widths, non-decreasing in between.
    pub fn river_factor(&self, x: f64, z: f64) -> f64 {
        let width = self.width(x);
        smoothstep(width * 0.5, width * 1.5, self.distance(x, z))
    }

    /// Riverbed height: deepest at the centerline, rising towards the edges.
    pub fn bed_height(&self, x: f64, z: f64) -> f64 {
        let width = self.width(x);
        self.config.bed_depth
            + smoothstep(0.0, width * 0.5, self.distance(x, z)) * self.config.bed_rise
    }

    /// `true` if `(x, z)` is within `width * multiplier` of the centerline.
    pub fn is_near_water(&self, x: f64, z: f64, multiplier: f64) -> bool {
        self.distance(x, z) < self.width(x) * multiplier
    }

    /// [`is_near_water`](Self::is_near_water) with the configured default multiplier.
    pub fn is_near_water_default(&self, x: f64, z: f64) -> bool {
        self.is_near_water(x, z, self.config.near_water_multiplier)
    }

    /// Return the river parameters.
    pub fn config(&self) -> &RiverConfig {
        &self.config
    }
}

impl Default for RiverModel {
    fn default() -> Self {
        Self::new(RiverConfig::default())
    }
}
