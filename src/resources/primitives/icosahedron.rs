use glam::Vec3;

use crate::resources::geometry::{Attribute, Geometry};

const T: f32 = 1.618_034; // golden ratio

const VERTICES: [[f32; 3]; 12] = [
    [-1.0, T, 0.0],
    [1.0, T, 0.0],
    [-1.0, -T, 0.0],
    [1.0, -T, 0.0],
    [0.0, -1.0, T],
    [0.0, 1.0, T],
    [0.0, -1.0, -T],
    [0.0, 1.0, -T],
    [T, 0.0, -1.0],
    [T, 0.0, 1.0],
    [-T, 0.0, -1.0],
    [-T, 0.0, 1.0],
];

const FACES: [[u32; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

/// Regular icosahedron (no subdivision) with flat per-face normals.
///
/// Every face owns its three vertices, giving 60 vertices for 20 faces.
#[must_use]
pub fn create_icosahedron(radius: f32) -> Geometry {
    let positions: Vec<[f32; 3]> = FACES
        .iter()
        .flatten()
        .map(|&i| (Vec3::from_array(VERTICES[i as usize]).normalize() * radius).to_array())
        .collect();

    let mut geo = Geometry::new();
    geo.set_attribute("position", Attribute::new(positions));
    geo.compute_vertex_normals();
    geo
}
