//! Ordered biome rule table: maps a terrain sample to a vertex color.

use rand::Rng;

use super::{Palette, Rgb};
use crate::heightfield::{TRAIL_LAND_RIVER_FACTOR, TerrainSample};
use crate::seed::vertex_rng;

/// The inputs a rule may inspect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorContext {
    pub height: f64,
    pub river_factor: f64,
    pub trail_factor: f64,
    pub is_bluff: bool,
    pub is_sandbar: bool,
}

impl From<&TerrainSample> for ColorContext {
    fn from(s: &TerrainSample) -> Self {
        Self {
            height: s.height,
            river_factor: s.river_factor,
            trail_factor: s.trail_factor,
            is_bluff: s.is_bluff,
            is_sandbar: s.is_sandbar,
        }
    }
}

/// One entry of the rule table: a predicate plus the color it produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BiomeRule {
    /// `height < -1.5`.
    DeepRiverbed,
    /// `-1.5 <= height < -0.5`, blending riverbed into sand.
    Shallows,
    /// Sandbar patches still below the waterline.
    Sandbar,
    /// Trail and settlement paths on dry land.
    Trail,
    /// Bluff zones standing above `2`.
    ExposedBluff,
    /// `height < 1`.
    LushGrass,
    /// `1 <= height < 4`, blending grass into dry grass.
    PrairieGrass,
    /// Everything else.
    DryHilltop,
}

impl BiomeRule {
    /// Default evaluation order. First match wins.
    pub const DEFAULT_ORDER: [BiomeRule; 8] = [
        BiomeRule::DeepRiverbed,
        BiomeRule::Shallows,
        BiomeRule::Sandbar,
        BiomeRule::Trail,
        BiomeRule::ExposedBluff,
        BiomeRule::LushGrass,
        BiomeRule::PrairieGrass,
        BiomeRule::DryHilltop,
    ];

    /// Whether this rule applies to `ctx`, assuming earlier rules did not.
    pub fn matches(self, ctx: &ColorContext) -> bool {
        let h = ctx.height;
        match self {
            BiomeRule::DeepRiverbed => h < -1.5,
            BiomeRule::Shallows => (-1.5..-0.5).contains(&h),
            BiomeRule::Sandbar => ctx.is_sandbar && h < 0.0,
            BiomeRule::Trail => {
                ctx.trail_factor > 0.2 && ctx.river_factor > TRAIL_LAND_RIVER_FACTOR
            }
            BiomeRule::ExposedBluff => ctx.is_bluff && h > 2.0,
            BiomeRule::LushGrass => h < 1.0,
            BiomeRule::PrairieGrass => (1.0..4.0).contains(&h),
            BiomeRule::DryHilltop => true,
        }
    }

    /// The color this rule assigns to `ctx`.
    pub fn color(self, ctx: &ColorContext, palette: &Palette) -> Rgb {
        let h = ctx.height;
        match self {
            BiomeRule::DeepRiverbed => palette.riverbed,
            BiomeRule::Shallows => palette
                .riverbed
                .lerp(palette.sandbar, (h + 1.5).clamp(0.0, 1.0)),
            BiomeRule::Sandbar => palette.sandbar,
            BiomeRule::Trail => palette
                .grass
                .lerp(palette.trail, (ctx.trail_factor * 1.5).min(1.0)),
            BiomeRule::ExposedBluff => palette.bluff,
            BiomeRule::LushGrass => palette.grass,
            BiomeRule::PrairieGrass => palette
                .grass
                .lerp(palette.dry_grass, ((h - 1.0) / 3.0).clamp(0.0, 1.0)),
            BiomeRule::DryHilltop => palette.dry_grass,
        }
    }
}

/// Evaluates an ordered rule list top-down and applies seeded lightness jitter.
#[derive(Clone, Debug)]
pub struct BiomeColorizer {
    rules: Vec<BiomeRule>,
    palette: Palette,
    /// Maximum lightness offset, applied as a uniform draw in `[-jitter, jitter)`.
    jitter: f64,
}

impl BiomeColorizer {
    /// Default rule order with the given palette and jitter amplitude.
    pub fn new(palette: Palette, jitter: f64) -> Self {
        Self::with_rules(BiomeRule::DEFAULT_ORDER.to_vec(), palette, jitter)
    }

    /// Custom rule order. [`BiomeRule::DryHilltop`] acts as the fallback if nothing matches.
    pub fn with_rules(rules: Vec<BiomeRule>, palette: Palette, jitter: f64) -> Self {
        Self {
            rules,
            palette,
            jitter,
        }
    }

    /// First rule matching `ctx`.
    pub fn classify(&self, ctx: &ColorContext) -> BiomeRule {
        self.rules
            .iter()
            .copied()
            .find(|rule| rule.matches(ctx))
            .unwrap_or(BiomeRule::DryHilltop)
    }

    /// Color before jitter.
    pub fn base_color(&self, ctx: &ColorContext) -> Rgb {
        self.classify(ctx).color(ctx, &self.palette)
    }

    /// Color with lightness jitter drawn from `rng`.
    pub fn color_with_rng(&self, ctx: &ColorContext, rng: &mut impl Rng) -> Rgb {
        let base = self.base_color(ctx);
        if self.jitter == 0.0 {
            return base;
        }
        let offset = (rng.random::<f64>() - 0.5) * 2.0 * self.jitter;
        base.offset_hsl(0.0, 0.0, offset)
    }

    /// Color with jitter seeded from `(jitter_seed, index)`; reproducible per vertex.
    pub fn color_at(&self, ctx: &ColorContext, jitter_seed: u64, index: usize) -> Rgb {
        let mut rng = vertex_rng(jitter_seed, index);
        self.color_with_rng(ctx, &mut rng)
    }

    pub fn rules(&self) -> &[BiomeRule] {
        &self.rules
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn jitter(&self) -> f64 {
        self.jitter
    }
}

impl Default for BiomeColorizer {
    fn default() -> Self {
        Self::new(Palette::default(), 0.025)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(height: f64) -> ColorContext {
        ColorContext {
            height,
            river_factor: 1.0,
            trail_factor: 0.0,
            is_bluff: false,
            is_sandbar: false,
        }
    }

    #[test]
    fn test_height_bands_classify() {
        let c = BiomeColorizer::default();
        assert_eq!(c.classify(&ctx(-2.0)), BiomeRule::DeepRiverbed);
        assert_eq!(c.classify(&ctx(-1.5)), BiomeRule::Shallows);
        assert_eq!(c.classify(&ctx(-0.6)), BiomeRule::Shallows);
        assert_eq!(c.classify(&ctx(-0.5)), BiomeRule::LushGrass);
        assert_eq!(c.classify(&ctx(0.99)), BiomeRule::LushGrass);
        assert_eq!(c.classify(&ctx(1.0)), BiomeRule::PrairieGrass);
        assert_eq!(c.classify(&ctx(3.99)), BiomeRule::PrairieGrass);
        assert_eq!(c.classify(&ctx(4.0)), BiomeRule::DryHilltop);
    }

    #[test]
    fn test_first_match_wins() {
        let c = BiomeColorizer::default();
        // Deep water beats sandbar and trail flags.
        let deep = ColorContext {
            is_sandbar: true,
            trail_factor: 1.0,
            ..ctx(-2.0)
        };
        assert_eq!(c.classify(&deep), BiomeRule::DeepRiverbed);

        // Trail beats bluff.
        let trail_on_bluff = ColorContext {
            trail_factor: 0.8,
            is_bluff: true,
            ..ctx(3.0)
        };
        assert_eq!(c.classify(&trail_on_bluff), BiomeRule::Trail);

        let bluff = ColorContext {
            is_bluff: true,
            ..ctx(3.0)
        };
        assert_eq!(c.classify(&bluff), BiomeRule::ExposedBluff);

        let low_bluff = ColorContext {
            is_bluff: true,
            ..ctx(1.5)
        };
        assert_eq!(c.classify(&low_bluff), BiomeRule::PrairieGrass);
    }

    #[test]
    fn test_trail_requires_dry_land() {
        let c = BiomeColorizer::default();
        let wet_trail = ColorContext {
            trail_factor: 1.0,
            river_factor: 0.5,
            ..ctx(0.5)
        };
        assert_eq!(c.classify(&wet_trail), BiomeRule::LushGrass);
    }

    #[test]
    fn test_sandbar_only_below_zero() {
        let c = BiomeColorizer::default();
        let wet = ColorContext {
            is_sandbar: true,
            ..ctx(-0.3)
        };
        assert_eq!(c.classify(&wet), BiomeRule::Sandbar);
        let dry = ColorContext {
            is_sandbar: true,
            ..ctx(0.2)
        };
        assert_eq!(c.classify(&dry), BiomeRule::LushGrass);
    }

    #[test]
    fn test_blends_hit_endpoints() {
        let c = BiomeColorizer::default();
        let p = *c.palette();
        assert_eq!(c.base_color(&ctx(-1.5)), p.riverbed);
        assert_eq!(c.base_color(&ctx(1.0)), p.grass);
        let full_trail = ColorContext {
            trail_factor: 1.0,
            ..ctx(2.0)
        };
        let trail = c.base_color(&full_trail);
        assert!(
            (trail.r - p.trail.r).abs() < 1e-12
                && (trail.g - p.trail.g).abs() < 1e-12
                && (trail.b - p.trail.b).abs() < 1e-12,
            "full trail weight should give the trail color, got {trail:?}"
        );
    }

    #[test]
    fn test_jitter_is_reproducible_and_bounded() {
        let c = BiomeColorizer::default();
        let sample = ctx(0.5);
        let (_, _, base_l) = c.base_color(&sample).to_hsl();
        for index in 0..500 {
            let a = c.color_at(&sample, 42, index);
            let b = c.color_at(&sample, 42, index);
            assert_eq!(a, b, "jitter must be reproducible for vertex {index}");
            let (_, _, l) = a.to_hsl();
            assert!(
                (l - base_l).abs() <= 0.025 + 1e-9,
                "lightness offset {} exceeds jitter",
                l - base_l
            );
        }
    }

    #[test]
    fn test_zero_jitter_returns_base_color() {
        let c = BiomeColorizer::new(Palette::default(), 0.0);
        let sample = ctx(2.5);
        assert_eq!(c.color_at(&sample, 7, 3), c.base_color(&sample));
    }

    #[test]
    fn test_custom_rule_order() {
        let c = BiomeColorizer::with_rules(
            vec![BiomeRule::ExposedBluff, BiomeRule::LushGrass],
            Palette::default(),
            0.0,
        );
        assert_eq!(c.classify(&ctx(10.0)), BiomeRule::DryHilltop, "fallback");
        assert_eq!(c.classify(&ctx(-3.0)), BiomeRule::LushGrass);
    }
}
