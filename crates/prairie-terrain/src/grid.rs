//! Regular terrain grid: heights, biome colors, and normals for meshing.
//!
//! Vertices are laid out row by row along `+z`, each row running along `+x`,
//! matching a plane of `segments × segments` quads rotated flat onto XZ.
//! Building happens in two phases: a parallel height and color pass over
//! rows, then a normal pass over the finished heights.

use glam::DVec3;
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::biome::{BiomeColorizer, ColorContext, Rgb};
use crate::error::TerrainError;
use crate::heightfield::HeightField;

/// Largest segment count whose vertex indices fit in `u32`.
pub const MAX_SEGMENTS: u32 = 65_534;

/// One grid vertex.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TerrainVertex {
    pub position: DVec3,
    pub color: Rgb,
    pub normal: DVec3,
}

/// A `(segments + 1) × (segments + 1)` vertex grid with triangle indices.
#[derive(Clone, Debug, Serialize)]
pub struct TerrainGrid {
    size: f64,
    segments: u32,
    vertices: Vec<TerrainVertex>,
    indices: Vec<u32>,
}

impl TerrainGrid {
    /// Sample `field` and `colorizer` over a square of side `size` centered on the origin.
    ///
    /// # Errors
    ///
    /// [`TerrainError::Config`] if `size` is not a positive finite number or
    /// `segments` is zero or above [`MAX_SEGMENTS`].
    pub fn build(
        field: &HeightField,
        colorizer: &BiomeColorizer,
        size: f64,
        segments: u32,
        jitter_seed: u64,
    ) -> Result<Self, TerrainError> {
        validate_dimensions(size, segments)?;

        let row_len = segments as usize + 1;
        let step = size / segments as f64;
        let half = size * 0.5;

        let mut vertices = vec![
            TerrainVertex {
                position: DVec3::ZERO,
                color: Rgb::new(0.0, 0.0, 0.0),
                normal: DVec3::Y,
            };
            row_len * row_len
        ];

        // Phase 1: heights and colors, rows in parallel.
        vertices
            .par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(iz, row)| {
                let z = -half + iz as f64 * step;
                for (ix, vertex) in row.iter_mut().enumerate() {
                    let x = -half + ix as f64 * step;
                    let sample = field.sample(x, z);
                    let ctx = ColorContext::from(&sample);
                    vertex.position = DVec3::new(x, sample.height, z);
                    vertex.color = colorizer.color_at(&ctx, jitter_seed, iz * row_len + ix);
                }
            });

        let indices = triangle_indices(segments);

        // Phase 2: normals from final heights.
        compute_normals(&mut vertices, &indices);

        debug!(
            "Built terrain grid: {} vertices, {} triangles ({} threads)",
            vertices.len(),
            indices.len() / 3,
            rayon::current_num_threads()
        );

        Ok(Self {
            size,
            segments,
            vertices,
            indices,
        })
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn segments(&self) -> u32 {
        self.segments
    }

    /// Vertices along one edge.
    pub fn row_len(&self) -> usize {
        self.segments as usize + 1
    }

    pub fn vertices(&self) -> &[TerrainVertex] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Vertex at column `ix` (along x) and row `iz` (along z).
    pub fn vertex(&self, ix: usize, iz: usize) -> Option<&TerrainVertex> {
        let n = self.row_len();
        if ix >= n || iz >= n {
            return None;
        }
        self.vertices.get(iz * n + ix)
    }

    /// Triangle list, three indices per triangle, counter-clockwise seen from `+y`.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Lowest and highest vertex height.
    pub fn height_range(&self) -> (f64, f64) {
        self.vertices
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v.position.y), hi.max(v.position.y))
            })
    }

    /// Flat `xyz` positions for upload.
    pub fn position_buffer(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .flat_map(|v| v.position.as_vec3().to_array())
            .collect()
    }

    /// `rgb` colors for upload.
    pub fn color_buffer(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .flat_map(|v| v.color.to_array_f32())
            .collect()
    }

    /// `xyz` unit normals for upload.
    pub fn normal_buffer(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .flat_map(|v| v.normal.as_vec3().to_array())
            .collect()
    }
}

fn validate_dimensions(size: f64, segments: u32) -> Result<(), TerrainError> {
    prairie_config::TerrainConfig {
        size,
        segments,
        ..Default::default()
    }
    .validate()?;
    if segments > MAX_SEGMENTS {
        return Err(TerrainError::Config(prairie_config::ConfigError::Invalid {
            field: "terrain.segments".to_string(),
            reason: format!("must be at most {MAX_SEGMENTS}, got {segments}"),
        }));
    }
    Ok(())
}

/// Two triangles per quad: `(a, b, d)` and `(b, c, d)`, where `a` is the
/// quad's corner at `(ix, iz)`, `b` the next row, `c` diagonal and `d` the
/// next column.
fn triangle_indices(segments: u32) -> Vec<u32> {
    let n = segments + 1;
    let mut indices = Vec::with_capacity(segments as usize * segments as usize * 6);
    for iz in 0..segments {
        for ix in 0..segments {
            let a = ix + n * iz;
            let b = ix + n * (iz + 1);
            let c = (ix + 1) + n * (iz + 1);
            let d = (ix + 1) + n * iz;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    indices
}

/// Area-weighted vertex normals: sum the unnormalized face normals of every
/// adjacent triangle, then normalize.
fn compute_normals(vertices: &mut [TerrainVertex], indices: &[u32]) {
    let mut sums = vec![DVec3::ZERO; vertices.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let pa = vertices[a].position;
        let pb = vertices[b].position;
        let pc = vertices[c].position;
        let face = (pc - pb).cross(pa - pb);
        sums[a] += face;
        sums[b] += face;
        sums[c] += face;
    }
    for (vertex, sum) in vertices.iter_mut().zip(sums) {
        vertex.normal = sum.try_normalize().unwrap_or(DVec3::Y);
    }
}
