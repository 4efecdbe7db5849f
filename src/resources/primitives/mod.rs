//! Procedural primitives for the debug scene and the ground plane.

pub mod icosahedron;
pub mod plane;
pub mod sphere;

pub use icosahedron::create_icosahedron;
pub use plane::{PlaneOptions, create_plane};
pub use sphere::{SphereOptions, create_sphere};

/// Triangle indices for a `(cols + 1) × (rows + 1)` vertex lattice laid out
/// row by row. Each cell is split along its `b`–`c` diagonal.
fn grid_indices(cols: u32, rows: u32) -> Vec<u32> {
    let stride = cols + 1;
    (0..rows)
        .flat_map(|row| (0..cols).map(move |col| row * stride + col))
        .flat_map(|a| {
            let b = a + 1;
            let c = a + stride;
            let d = c + 1;
            [a, b, c, b, d, c]
        })
        .collect()
}
