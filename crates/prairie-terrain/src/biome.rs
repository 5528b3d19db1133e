//! Biome coloring: palette, HSL color math, and the ordered rule table.
//!
//! Rules are evaluated top-down and the first match decides the color, the
//! same first-match policy used for any ordered lookup table. A small seeded
//! lightness jitter gives the terrain texture.

mod color;
mod palette;
mod rules;

pub use color::Rgb;
pub use palette::Palette;
pub use rules::{BiomeColorizer, BiomeRule, ColorContext};
