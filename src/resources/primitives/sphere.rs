use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use super::grid_indices;
use crate::resources::geometry::{Attribute, Geometry};

pub struct SphereOptions {
    pub radius: f32,
    /// Longitude subdivisions (min 3).
    pub width_segments: u32,
    /// Latitude subdivisions (min 2).
    pub height_segments: u32,
}

impl Default for SphereOptions {
    fn default() -> Self {
        Self {
            radius: 1.0,
            width_segments: 32,
            height_segments: 16,
        }
    }
}

/// UV sphere with smooth normals, south pole first.
///
/// The seam column is duplicated so uvs wrap cleanly; pole rows keep their
/// degenerate triangles.
#[must_use]
pub fn create_sphere(options: &SphereOptions) -> Geometry {
    let cols = options.width_segments.max(3);
    let rows = options.height_segments.max(2);
    let vertex_count = ((cols + 1) * (rows + 1)) as usize;

    let mut positions = Vec::with_capacity(vertex_count);
    let mut normals = Vec::with_capacity(vertex_count);
    let mut uvs = Vec::with_capacity(vertex_count);

    for row in 0..=rows {
        let v = row as f32 / rows as f32;
        let (sin_theta, cos_theta) = (v * PI).sin_cos();
        for col in 0..=cols {
            let u = col as f32 / cols as f32;
            let (sin_phi, cos_phi) = (u * TAU).sin_cos();

            let dir = Vec3::new(-sin_theta * cos_phi, -cos_theta, sin_theta * sin_phi);
            positions.push((dir * options.radius).to_array());
            normals.push(dir.to_array());
            uvs.push(Vec2::new(u, 1.0 - v).to_array());
        }
    }

    let mut geo = Geometry::new();
    geo.set_attribute("position", Attribute::new(positions));
    geo.set_attribute("normal", Attribute::new(normals));
    geo.set_attribute("uv", Attribute::new(uvs));
    geo.set_indices(&grid_indices(cols, rows));
    geo
}
