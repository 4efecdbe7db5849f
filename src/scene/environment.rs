//! Per-scene lighting singletons
//!
//! Every composed scene carries exactly one [`Environment`] (image-based
//! light) and exactly one [`ShadowCatcher`] (contact-shadow ground).

use glam::{Affine3A, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::assets::{AssetHandle, EnvironmentMap};
use crate::resources::geometry::Geometry;
use crate::resources::primitives::{PlaneOptions, create_plane};

/// Image-based environment lighting.
#[derive(Debug, Clone)]
pub struct Environment {
    /// The decoded HDR map shared with the loader.
    pub map: AssetHandle<EnvironmentMap>,
    /// Global multiplier; per-material intensity is applied on top.
    pub intensity: f32,
    /// Also draw the map as the visible background.
    pub background: bool,
    /// Rotation around +Y, in radians.
    pub rotation: f32,
}

impl Environment {
    #[must_use]
    pub fn new(map: AssetHandle<EnvironmentMap>) -> Self {
        Self {
            map,
            intensity: 1.0,
            background: false,
            rotation: 0.0,
        }
    }

    #[must_use]
    pub fn with_background(mut self, background: bool) -> Self {
        self.background = background;
        self
    }
}

/// Soft contact shadow projected onto an invisible ground plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowCatcher {
    pub position: Vec3,
    pub opacity: f32,
    pub blur: f32,
    /// Depth range captured above the ground.
    pub far: f32,
    /// Side length of the ground plane.
    pub scale: f32,
    pub resolution: u32,
}

impl Default for ShadowCatcher {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, -1.5, 0.0),
            opacity: 0.4,
            blur: 2.5,
            far: 4.0,
            scale: 10.0,
            resolution: 512,
        }
    }
}

impl ShadowCatcher {
    /// Square ground plane of side `scale`, in its own XY space.
    #[must_use]
    pub fn plane_geometry(&self) -> Geometry {
        create_plane(&PlaneOptions {
            width: self.scale,
            height: self.scale,
            ..Default::default()
        })
    }

    /// Lays the plane flat (facing +Y) at `position`.
    #[must_use]
    pub fn world_matrix(&self) -> Affine3A {
        Affine3A::from_rotation_translation(
            Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2),
            self.position,
        )
    }
}
