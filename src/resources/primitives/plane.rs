use glam::Vec2;

use super::grid_indices;
use crate::resources::geometry::{Attribute, Geometry};

pub struct PlaneOptions {
    pub width: f32,
    pub height: f32,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl Default for PlaneOptions {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            width_segments: 1,
            height_segments: 1,
        }
    }
}

/// Plane centered on the origin in XY, facing +Z.
#[must_use]
pub fn create_plane(options: &PlaneOptions) -> Geometry {
    let cols = options.width_segments.max(1);
    let rows = options.height_segments.max(1);
    let size = Vec2::new(options.width, options.height);

    let mut positions = Vec::new();
    let mut uvs = Vec::new();

    // Rows run bottom to top so the lattice winds counter-clockwise from +Z.
    for row in 0..=rows {
        for col in 0..=cols {
            let uv = Vec2::new(col as f32 / cols as f32, row as f32 / rows as f32);
            let p = (uv - 0.5) * size;
            positions.push([p.x, p.y, 0.0]);
            uvs.push(uv.to_array());
        }
    }
    let normals: Vec<[f32; 3]> = vec![[0.0, 0.0, 1.0]; positions.len()];

    let mut geo = Geometry::new();
    geo.set_attribute("position", Attribute::new(positions));
    geo.set_attribute("normal", Attribute::new(normals));
    geo.set_attribute("uv", Attribute::new(uvs));
    geo.set_indices(&grid_indices(cols, rows));
    geo
}
