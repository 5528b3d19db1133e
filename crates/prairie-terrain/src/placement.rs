//! Instance placement: constrained rejection sampling over the height field.
//!
//! A [`SpeciesProfile`] describes one population. The engine draws candidate
//! positions, tests them against the profile's predicates, and emits an
//! [`InstanceTransform`] for every accepted candidate until the quota is met
//! or the attempt budget (`count × oversample`) runs out. Running out of
//! budget is an under-fill, not an error.

use std::f64::consts::TAU;

use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, warn};

use crate::biome::Rgb;
use crate::error::TerrainError;
use crate::heightfield::HeightField;

/// Water-proximity requirement, in multiples of the local channel width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WaterRule {
    /// No proximity test.
    Ignore,
    /// Reject candidates within `multiplier × width` of the centerline.
    ExcludeNear { multiplier: f64 },
    /// Reject candidates farther than `multiplier × width` from the centerline.
    RequireNear { multiplier: f64 },
}

/// Where candidate positions are drawn from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SamplingRegion {
    /// `x` and `z` uniform in `[-half_extent, half_extent)`.
    Uniform { half_extent: f64 },
    /// `x` uniform in `[-half_extent, half_extent)`, then `z` on a random side
    /// of the river at a lateral offset in
    /// `[min_widths × width, max_widths × width + extra)`.
    RiverBand {
        half_extent: f64,
        min_widths: f64,
        max_widths: f64,
        extra: f64,
    },
}

/// How each instance is scaled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScaleRule {
    /// One factor in `[min, max)` on all axes.
    Uniform { min: f64, max: f64 },
    /// A uniform factor in `[min, max)`, with the vertical axis further
    /// multiplied by a factor in `vertical`.
    Stretched {
        min: f64,
        max: f64,
        vertical: (f64, f64),
    },
    /// Independent factors for x, y and z. `horizontal` is drawn separately
    /// for x and for z.
    PerAxis {
        horizontal: (f64, f64),
        vertical: (f64, f64),
    },
}

/// How each instance is rotated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RotationPolicy {
    /// Uniform yaw in `[0, TAU)`.
    FreeY,
    /// A fixed yaw.
    Fixed(f64),
    /// Independent uniform rotation in `[0, span)` on each axis.
    Tumble { span: f64 },
}

/// A species-specific predicate evaluated after height and water tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SiteRule {
    /// Accept on the riverbank (lateral distance strictly between
    /// `bank_min × width` and `bank_max × width`) or on ground higher than
    /// `high_ground`.
    RiverbankOrHighGround {
        bank_min: f64,
        bank_max: f64,
        high_ground: f64,
    },
}

/// Per-instance color variation around a base color.
///
/// Each offset is `(u - 0.5) × span` for a uniform `u`, applied in HSL.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TintRule {
    pub base: Rgb,
    pub hue_span: f64,
    pub saturation_span: f64,
    pub lightness_span: f64,
    /// Extra saturation within `multiplier × width` of the river: `(multiplier, boost)`.
    pub near_water_saturation: Option<(f64, f64)>,
}

impl TintRule {
    /// Lightness-only variation.
    pub fn lightness(base: Rgb, span: f64) -> Self {
        Self {
            base,
            hue_span: 0.0,
            saturation_span: 0.0,
            lightness_span: span,
            near_water_saturation: None,
        }
    }
}

/// Two-level placement: anchors first, then members scattered in a disc around each.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClusterRule {
    /// Number of anchors drawn from the profile's sampling region.
    pub anchors: u32,
    /// Members attempted per anchor, inclusive range.
    pub members: (u32, u32),
    /// Disc radius around each anchor.
    pub radius: f64,
}

/// Configuration for one scattered population.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeciesProfile {
    pub name: String,
    /// Maximum number of instances to emit.
    pub count: u32,
    /// Attempt budget multiplier. Ignored by clustered profiles, whose
    /// budget is the member draws.
    pub oversample: u32,
    /// Inclusive `[min, max]` terrain height.
    pub height_range: (f64, f64),
    pub water: WaterRule,
    pub region: SamplingRegion,
    pub scale: ScaleRule,
    pub rotation: RotationPolicy,
    /// Reject candidates inside a settlement footprint.
    pub avoid_settlements: bool,
    pub site: Option<SiteRule>,
    /// Sink below the surface, as a fraction of the horizontal scale.
    pub sink: f64,
    pub tint: Option<TintRule>,
    pub clusters: Option<ClusterRule>,
}

impl SpeciesProfile {
    /// A uniform, free-rotating profile with no water or site rules.
    pub fn new(name: impl Into<String>, count: u32, half_extent: f64) -> Self {
        Self {
            name: name.into(),
            count,
            oversample: 1,
            height_range: (f64::NEG_INFINITY, f64::INFINITY),
            water: WaterRule::Ignore,
            region: SamplingRegion::Uniform { half_extent },
            scale: ScaleRule::Uniform { min: 1.0, max: 1.0 },
            rotation: RotationPolicy::FreeY,
            avoid_settlements: false,
            site: None,
            sink: 0.0,
            tint: None,
            clusters: None,
        }
    }

    pub fn with_oversample(mut self, oversample: u32) -> Self {
        self.oversample = oversample;
        self
    }

    pub fn with_height_range(mut self, min: f64, max: f64) -> Self {
        self.height_range = (min, max);
        self
    }

    pub fn with_water(mut self, water: WaterRule) -> Self {
        self.water = water;
        self
    }

    pub fn with_region(mut self, region: SamplingRegion) -> Self {
        self.region = region;
        self
    }

    pub fn with_scale(mut self, scale: ScaleRule) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotation(mut self, rotation: RotationPolicy) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn avoiding_settlements(mut self) -> Self {
        self.avoid_settlements = true;
        self
    }

    pub fn with_site(mut self, site: SiteRule) -> Self {
        self.site = Some(site);
        self
    }

    pub fn with_sink(mut self, sink: f64) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_tint(mut self, tint: TintRule) -> Self {
        self.tint = Some(tint);
        self
    }

    pub fn with_clusters(mut self, clusters: ClusterRule) -> Self {
        self.clusters = Some(clusters);
        self
    }

    /// Maximum number of candidate draws for a non-clustered run.
    pub fn attempt_budget(&self) -> u64 {
        u64::from(self.count) * u64::from(self.oversample)
    }

    /// Check that every range and multiplier is usable.
    ///
    /// # Errors
    ///
    /// [`TerrainError::InvalidProfile`] naming the first bad field.
    pub fn validate(&self) -> Result<(), TerrainError> {
        let fail = |reason: String| Err(TerrainError::profile(&self.name, reason));

        if self.name.is_empty() {
            return fail("name must not be empty".into());
        }
        if self.oversample == 0 {
            return fail("oversample must be at least 1".into());
        }
        let (lo, hi) = self.height_range;
        if lo.is_nan() || hi.is_nan() || lo > hi {
            return fail(format!("height range [{lo}, {hi}] is empty"));
        }
        match self.water {
            WaterRule::Ignore => {}
            WaterRule::ExcludeNear { multiplier } | WaterRule::RequireNear { multiplier } => {
                if !(multiplier.is_finite() && multiplier > 0.0) {
                    return fail(format!("water multiplier must be > 0, got {multiplier}"));
                }
            }
        }
        match self.region {
            SamplingRegion::Uniform { half_extent } => check_extent(half_extent)
                .map_err(|reason| TerrainError::profile(&self.name, reason))?,
            SamplingRegion::RiverBand {
                half_extent,
                min_widths,
                max_widths,
                extra,
            } => {
                check_extent(half_extent)
                    .map_err(|reason| TerrainError::profile(&self.name, reason))?;
                if !(min_widths >= 0.0 && max_widths >= min_widths && extra >= 0.0)
                    || !(max_widths.is_finite() && extra.is_finite())
                {
                    return fail(format!(
                        "river band [{min_widths}w, {max_widths}w + {extra}] is invalid"
                    ));
                }
            }
        }
        let scale_ranges = match self.scale {
            ScaleRule::Uniform { min, max } => vec![(min, max)],
            ScaleRule::Stretched { min, max, vertical } => vec![(min, max), vertical],
            ScaleRule::PerAxis {
                horizontal,
                vertical,
            } => vec![horizontal, vertical],
        };
        for (min, max) in scale_ranges {
            if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
                return fail(format!("scale range [{min}, {max}] must be positive"));
            }
        }
        if let Some(SiteRule::RiverbankOrHighGround {
            bank_min, bank_max, ..
        }) = self.site
        {
            if !(bank_min >= 0.0 && bank_max > bank_min && bank_max.is_finite()) {
                return fail(format!("riverbank band ({bank_min}, {bank_max}) is empty"));
            }
        }
        if !(self.sink.is_finite() && self.sink >= 0.0) {
            return fail(format!("sink must be >= 0, got {}", self.sink));
        }
        if let RotationPolicy::Tumble { span } = self.rotation
            && !(span.is_finite() && span > 0.0)
        {
            return fail(format!("tumble span must be > 0, got {span}"));
        }
        if let Some(c) = self.clusters {
            if c.members.0 > c.members.1 {
                return fail(format!(
                    "cluster member range [{}, {}] is empty",
                    c.members.0, c.members.1
                ));
            }
            if !(c.radius.is_finite() && c.radius > 0.0) {
                return fail(format!("cluster radius must be > 0, got {}", c.radius));
            }
        }
        Ok(())
    }
}

fn check_extent(half_extent: f64) -> Result<(), String> {
    if half_extent.is_finite() && half_extent > 0.0 {
        Ok(())
    } else {
        Err(format!("half extent must be > 0, got {half_extent}"))
    }
}

/// One accepted placement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct InstanceTransform {
    /// Anchor point; `y` is the terrain height minus any sink.
    pub position: DVec3,
    /// Euler angles in radians, applied in XYZ order.
    pub rotation: DVec3,
    pub scale: DVec3,
    pub tint: Option<Rgb>,
}

impl InstanceTransform {
    pub fn rotation_y(&self) -> f64 {
        self.rotation.y
    }
}

/// Result of one placement run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Placement {
    pub species: String,
    pub requested: u32,
    pub instances: Vec<InstanceTransform>,
}

impl Placement {
    pub fn placed(&self) -> usize {
        self.instances.len()
    }

    /// `true` if the attempt budget ran out before the quota was met.
    pub fn is_underfilled(&self) -> bool {
        self.placed() < self.requested as usize
    }

    pub fn shortfall(&self) -> usize {
        (self.requested as usize).saturating_sub(self.placed())
    }
}

/// Scatters species over a height field.
#[derive(Clone, Copy, Debug)]
pub struct PlacementEngine<'a> {
    field: &'a HeightField,
}

impl<'a> PlacementEngine<'a> {
    pub fn new(field: &'a HeightField) -> Self {
        Self { field }
    }

    /// Validate `profile` and place it with a generator seeded from `seed`.
    ///
    /// Identical `(profile, seed)` pairs always produce identical lists.
    ///
    /// # Errors
    ///
    /// [`TerrainError::InvalidProfile`] if the profile fails validation.
    pub fn scatter(&self, profile: &SpeciesProfile, seed: u64) -> Result<Placement, TerrainError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.place(profile, &mut rng)
    }

    /// Validate `profile` and place it drawing from `rng`.
    ///
    /// # Errors
    ///
    /// [`TerrainError::InvalidProfile`] if the profile fails validation;
    /// nothing is drawn from `rng` in that case.
    pub fn place<R: Rng + ?Sized>(
        &self,
        profile: &SpeciesProfile,
        rng: &mut R,
    ) -> Result<Placement, TerrainError> {
        profile.validate()?;
        let instances = match profile.clusters {
            Some(clusters) => self.place_clustered(profile, &clusters, rng),
            None => self.place_uniform(profile, rng),
        };

        let placement = Placement {
            species: profile.name.clone(),
            requested: profile.count,
            instances,
        };

        if placement.is_underfilled() {
            warn!(
                "Under-filled '{}': placed {} of {} requested",
                placement.species,
                placement.placed(),
                placement.requested
            );
        } else {
            debug!(
                "Placed {} '{}' instances",
                placement.placed(),
                placement.species
            );
        }
        Ok(placement)
    }

    fn place_uniform<R: Rng + ?Sized>(
        &self,
        profile: &SpeciesProfile,
        rng: &mut R,
    ) -> Vec<InstanceTransform> {
        let quota = profile.count as usize;
        let mut instances = Vec::with_capacity(quota.min(1 << 16));
        let mut attempts = 0u64;
        while instances.len() < quota && attempts < profile.attempt_budget() {
            attempts += 1;
            let (x, z) = self.draw_candidate(&profile.region, rng);
            if let Some(height) = self.accept(profile, x, z) {
                instances.push(self.emit(profile, x, height, z, rng));
            }
        }
        instances
    }

    fn place_clustered<R: Rng + ?Sized>(
        &self,
        profile: &SpeciesProfile,
        clusters: &ClusterRule,
        rng: &mut R,
    ) -> Vec<InstanceTransform> {
        let quota = profile.count as usize;
        let mut instances = Vec::new();
        for _ in 0..clusters.anchors {
            if instances.len() >= quota {
                break;
            }
            let (ax, az) = self.draw_candidate(&profile.region, rng);
            let members = rng.random_range(clusters.members.0..=clusters.members.1);
            for _ in 0..members {
                if instances.len() >= quota {
                    break;
                }
                let r = clusters.radius * rng.random::<f64>().sqrt();
                let theta = rng.random::<f64>() * TAU;
                let x = ax + r * theta.cos();
                let z = az + r * theta.sin();
                if let Some(height) = self.accept(profile, x, z) {
                    instances.push(self.emit(profile, x, height, z, rng));
                }
            }
        }
        instances
    }

    fn draw_candidate<R: Rng + ?Sized>(&self, region: &SamplingRegion, rng: &mut R) -> (f64, f64) {
        match *region {
            SamplingRegion::Uniform { half_extent } => (
                rng.random_range(-half_extent..half_extent),
                rng.random_range(-half_extent..half_extent),
            ),
            SamplingRegion::RiverBand {
                half_extent,
                min_widths,
                max_widths,
                extra,
            } => {
                let x = rng.random_range(-half_extent..half_extent);
                let river = self.field.river();
                let width = river.width(x);
                let side = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
                let near = width * min_widths;
                let far = width * max_widths + extra;
                let offset = near + rng.random::<f64>() * (far - near);
                (x, river.meander(x) + side * offset)
            }
        }
    }

    /// Shared predicate evaluation. Returns the terrain height when every rule passes.
    fn accept(&self, profile: &SpeciesProfile, x: f64, z: f64) -> Option<f64> {
        let height = self.field.height_at(x, z);
        let (lo, hi) = profile.height_range;
        if height < lo || height > hi {
            return None;
        }

        let river = self.field.river();
        let water_ok = match profile.water {
            WaterRule::Ignore => true,
            WaterRule::ExcludeNear { multiplier } => !river.is_near_water(x, z, multiplier),
            WaterRule::RequireNear { multiplier } => river.is_near_water(x, z, multiplier),
        };
        if !water_ok {
            return None;
        }

        if profile.avoid_settlements && self.field.trail().in_settlement_footprint(x, z) {
            return None;
        }

        match profile.site {
            None => {}
            Some(SiteRule::RiverbankOrHighGround {
                bank_min,
                bank_max,
                high_ground,
            }) => {
                let width = river.width(x);
                let distance = river.distance(x, z);
                let on_bank = distance > width * bank_min && distance < width * bank_max;
                if !on_bank && height <= high_ground {
                    return None;
                }
            }
        }

        Some(height)
    }

    fn emit<R: Rng + ?Sized>(
        &self,
        profile: &SpeciesProfile,
        x: f64,
        height: f64,
        z: f64,
        rng: &mut R,
    ) -> InstanceTransform {
        let scale = match profile.scale {
            ScaleRule::Uniform { min, max } => DVec3::splat(span(rng, min, max)),
            ScaleRule::Stretched { min, max, vertical } => {
                let s = span(rng, min, max);
                DVec3::new(s, s * span(rng, vertical.0, vertical.1), s)
            }
            ScaleRule::PerAxis {
                horizontal,
                vertical,
            } => DVec3::new(
                span(rng, horizontal.0, horizontal.1),
                span(rng, vertical.0, vertical.1),
                span(rng, horizontal.0, horizontal.1),
            ),
        };

        let rotation = match profile.rotation {
            RotationPolicy::FreeY => DVec3::new(0.0, rng.random::<f64>() * TAU, 0.0),
            RotationPolicy::Fixed(yaw) => DVec3::new(0.0, yaw, 0.0),
            RotationPolicy::Tumble { span } => DVec3::new(
                rng.random::<f64>() * span,
                rng.random::<f64>() * span,
                rng.random::<f64>() * span,
            ),
        };

        let tint = profile.tint.map(|t| {
            let boost = match t.near_water_saturation {
                Some((multiplier, boost)) if self.field.river().is_near_water(x, z, multiplier) => {
                    boost
                }
                _ => 0.0,
            };
            t.base.offset_hsl(
                (rng.random::<f64>() - 0.5) * t.hue_span,
                (rng.random::<f64>() - 0.5) * t.saturation_span + boost,
                (rng.random::<f64>() - 0.5) * t.lightness_span,
            )
        });

        InstanceTransform {
            position: DVec3::new(x, height - profile.sink * scale.x, z),
            rotation,
            scale,
            tint,
        }
    }
}

/// Uniform draw in `[min, max)`; returns `min` for an empty span.
fn span<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    min + rng.random::<f64>() * (max - min)
}
