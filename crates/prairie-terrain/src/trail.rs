//! Cart trail and settlement paths.
//!
//! The main trail wanders across the map like the river, as a sum of two
//! waves. Each settlement is joined to the trail by a straight corridor that
//! runs along z to the trail point at the settlement's x.

use prairie_config::{SettlementConfig, TrailConfig};

use crate::noise_field::smoothstep;
use crate::seed::{det_cos, det_sin};

/// Trail geometry oracle.
#[derive(Clone, Debug)]
pub struct TrailNetwork {
    config: TrailConfig,
}

impl TrailNetwork {
    /// Create a trail network from validated parameters.
    pub fn new(config: TrailConfig) -> Self {
        Self { config }
    }

    /// The z coordinate of the main trail at `x`.
    pub fn trail_z(&self, x: f64) -> f64 {
        let c = &self.config;
        det_sin(x * c.frequency) * c.amplitude
            + det_cos(x * c.secondary_frequency) * c.secondary_amplitude
            + c.offset
    }

    /// Proximity weight of the main trail: 1 within `inner_radius`, 0 beyond `outer_radius`.
    pub fn main_trail_factor(&self, x: f64, z: f64) -> f64 {
        let distance = (z - self.trail_z(x)).abs();
        smoothstep(self.config.outer_radius, self.config.inner_radius, distance)
    }

    /// Proximity weight of a single settlement's path.
    ///
    /// The corridor spans from the settlement to the trail (plus `path_margin`
    /// past either end) and fades out across `path_half_width`.
    pub fn path_factor(&self, settlement: &SettlementConfig, x: f64, z: f64) -> f64 {
        let c = &self.config;
        let dx = (x - settlement.x).abs();
        if dx >= c.path_half_width {
            return 0.0;
        }

        let trail_z = self.trail_z(settlement.x);
        let min_z = settlement.z.min(trail_z) - c.path_margin;
        let max_z = settlement.z.max(trail_z) + c.path_margin;
        if z < min_z || z > max_z {
            return 0.0;
        }

        smoothstep(c.path_half_width, c.inner_radius, dx)
    }

    /// Combined trail weight: the maximum of the main trail and every settlement path.
    pub fn trail_factor(&self, x: f64, z: f64) -> f64 {
        self.config
            .settlements
            .iter()
            .map(|s| self.path_factor(s, x, z))
            .fold(self.main_trail_factor(x, z), f64::max)
    }

    /// `true` if `(x, z)` lies inside any settlement's footprint.
    pub fn in_settlement_footprint(&self, x: f64, z: f64) -> bool {
        let r2 = self.config.footprint_radius * self.config.footprint_radius;
        self.config.settlements.iter().any(|s| {
            let dx = x - s.x;
            let dz = z - s.z;
            dx * dx + dz * dz < r2
        })
    }

    /// Configured settlements.
    pub fn settlements(&self) -> &[SettlementConfig] {
        &self.config.settlements
    }

    /// Return the trail parameters.
    pub fn config(&self) -> &TrailConfig {
        &self.config
    }
}

impl Default for TrailNetwork {
    fn default() -> Self {
        Self::new(TrailConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_trail_z_at_origin() {
        let trail = TrailNetwork::default();
        // sin(0) * 25 + cos(0) * 10 + 25
        assert!((trail.trail_z(0.0) - 35.0).abs() < EPSILON);
    }

    #[test]
    fn test_main_trail_factor_profile() {
        let trail = TrailNetwork::default();
        let tz = trail.trail_z(12.0);
        assert!((trail.main_trail_factor(12.0, tz) - 1.0).abs() < EPSILON);
        assert!((trail.main_trail_factor(12.0, tz + 0.4) - 1.0).abs() < EPSILON);
        assert!(trail.main_trail_factor(12.0, tz + 3.0).abs() < EPSILON);
        let mid = trail.main_trail_factor(12.0, tz - 1.5);
        assert!(mid > 0.0 && mid < 1.0, "partial weight expected, got {mid}");
    }

    #[test]
    fn test_settlement_path_covers_corridor() {
        let trail = TrailNetwork::default();
        let cabin = trail.settlements()[1]; // (-20, -70), trail lies north of it
        let trail_z = trail.trail_z(cabin.x);
        let mid_z = (cabin.z + trail_z) * 0.5;

        assert!((trail.path_factor(&cabin, cabin.x, mid_z) - 1.0).abs() < EPSILON);
        assert!(trail.path_factor(&cabin, cabin.x + 3.5, mid_z).abs() < EPSILON);
        assert!(trail.path_factor(&cabin, cabin.x, cabin.z - 5.0).abs() < EPSILON);
        // Within the end margin.
        assert!(trail.path_factor(&cabin, cabin.x, cabin.z - 1.0) > 0.99);
    }

    #[test]
    fn test_trail_factor_takes_maximum() {
        let trail = TrailNetwork::default();
        let cabin = trail.settlements()[0];
        let z = (cabin.z + trail.trail_z(cabin.x)) * 0.5;
        let combined = trail.trail_factor(cabin.x + 1.0, z);
        let path = trail.path_factor(&cabin, cabin.x + 1.0, z);
        let main = trail.main_trail_factor(cabin.x + 1.0, z);
        assert!((combined - path.max(main)).abs() < EPSILON);
        assert!(combined > 0.0);
    }

    #[test]
    fn test_far_point_has_no_trail() {
        let trail = TrailNetwork::default();
        assert_eq!(trail.trail_factor(300.0, 0.0), 0.0);
        assert_eq!(trail.trail_factor(0.0, -150.0), 0.0);
    }

    #[test]
    fn test_settlement_footprint() {
        let trail = TrailNetwork::default();
        assert!(trail.in_settlement_footprint(-60.0, 50.0));
        assert!(trail.in_settlement_footprint(-55.0, 53.0));
        assert!(!trail.in_settlement_footprint(-60.0, 60.0));
        assert!(!trail.in_settlement_footprint(0.0, 0.0));
    }

    #[test]
    fn test_no_settlements_means_main_trail_only() {
        let trail = TrailNetwork::new(TrailConfig {
            settlements: Vec::new(),
            ..Default::default()
        });
        for (x, z) in [(-60.0, 40.0), (30.0, 60.0), (5.0, 35.0)] {
            assert_eq!(trail.trail_factor(x, z), trail.main_trail_factor(x, z));
        }
    }
}
