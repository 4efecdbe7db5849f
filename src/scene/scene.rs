use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use glam::{Affine3A, Vec3};
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use uuid::Uuid;

use crate::compose::BuildReport;
use crate::resources::geometry::{BoundingBox, Geometry};
use crate::resources::material::{Material, MaterialRole};
use crate::resources::tone_mapping::ToneMappingMode;
use crate::scene::environment::{Environment, ShadowCatcher};
use crate::scene::transform::Transform;
use crate::scene::{MeshKey, NodeKey};

static NEXT_SCENE_ID: AtomicU32 = AtomicU32::new(1);

/// Which composer produced a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKind {
    /// Built from a loaded jewelry asset.
    Viewer,
    /// Asset-independent material tuning scene.
    Debug,
}

// ============================================================================
// Camera / render state
// ============================================================================

/// Perspective camera placement for a view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSetup {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view, in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraSetup {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 1.0),
            target: Vec3::ZERO,
            fov: 45.0,
            near: 0.01,
            far: 100.0,
        }
    }
}

impl CameraSetup {
    /// Close-up framing used by the ring viewer.
    #[must_use]
    pub fn viewer() -> Self {
        Self::default()
    }

    /// Wider framing that fits both debug primitives.
    ///
    /// Only the position is chosen; the fov is the stock 75 degree
    /// perspective default.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            fov: 75.0,
            ..Self::default()
        }
    }
}

/// Global render state carried to the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub tone_mapping: ToneMappingMode,
    pub antialias: bool,
    pub shadows: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            tone_mapping: ToneMappingMode::ACESFilmic,
            antialias: true,
            shadows: true,
        }
    }
}

// ============================================================================
// Scene entities
// ============================================================================

/// A render object built for this scene.
///
/// Owns its geometry: the `Arc` is created by the composer from a processed
/// copy and is never shared with the source asset, so dropping the scene
/// releases it.
#[derive(Debug, Clone)]
pub struct RenderMesh {
    pub uuid: Uuid,
    pub name: String,
    /// Asset node this mesh was built from; `None` for primitives.
    pub source: Option<NodeKey>,
    pub geometry: Arc<Geometry>,
    pub material: Material,
    pub transform: Transform,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    pub visible: bool,
}

impl RenderMesh {
    /// Creates a mesh at the origin with the shadow flags of its material
    /// role: metal casts and receives, gems only cast.
    #[must_use]
    pub fn new(name: impl Into<String>, geometry: Geometry, material: Material) -> Self {
        let receive_shadow = material.role() == MaterialRole::Metal;
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            source: None,
            geometry: Arc::new(geometry),
            material,
            transform: Transform::new(),
            cast_shadow: true,
            receive_shadow,
            visible: true,
        }
    }

    #[inline]
    #[must_use]
    pub fn role(&self) -> MaterialRole {
        self.material.role()
    }

    /// Render meshes sit at the scene root, so local and world coincide.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> Affine3A {
        self.transform.compose_local()
    }

    #[must_use]
    pub fn world_bounding_box(&self) -> Option<BoundingBox> {
        self.geometry
            .compute_bounding_box()
            .map(|b| b.transform(&self.world_matrix()))
    }
}

/// Why a source node was kept as authored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassThroughKind {
    /// Has geometry but matched no material role.
    UnclassifiedMesh,
    /// Group or anchor node without geometry.
    Structural,
}

/// A source node carried into the scene unmodified.
///
/// Geometry, if any, is the asset's own `Arc`; it is not processed.
#[derive(Debug, Clone)]
pub struct PassThrough {
    pub node: NodeKey,
    pub name: String,
    pub kind: PassThroughKind,
    pub world: Affine3A,
    pub geometry: Option<Arc<Geometry>>,
}

// ============================================================================
// Scene
// ============================================================================

/// A composed, render-ready scene.
///
/// Scene is pure data: the consumer reads it, and only the composer that
/// built it writes to it. It always holds exactly one environment light and
/// one shadow-catching ground.
#[derive(Debug)]
pub struct Scene {
    pub id: u32,
    pub kind: SceneKind,

    pub meshes: SlotMap<MeshKey, RenderMesh>,
    pub pass_through: Vec<PassThrough>,

    pub environment: Environment,
    pub ground: ShadowCatcher,

    pub camera: CameraSetup,
    pub render: RenderSettings,

    /// Non-fatal problems met while composing.
    pub report: BuildReport,
}

impl Scene {
    #[must_use]
    pub fn new(kind: SceneKind, environment: Environment, ground: ShadowCatcher) -> Self {
        Self {
            id: NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed),
            kind,
            meshes: SlotMap::with_key(),
            pass_through: Vec::new(),
            environment,
            ground,
            camera: match kind {
                SceneKind::Viewer => CameraSetup::viewer(),
                SceneKind::Debug => CameraSetup::debug(),
            },
            render: RenderSettings::default(),
            report: BuildReport::default(),
        }
    }

    pub fn add_mesh(&mut self, mesh: RenderMesh) -> MeshKey {
        self.meshes.insert(mesh)
    }

    pub fn add_pass_through(&mut self, entity: PassThrough) {
        self.pass_through.push(entity);
    }

    #[must_use]
    pub fn get_mesh(&self, key: MeshKey) -> Option<&RenderMesh> {
        self.meshes.get(key)
    }

    pub fn iter_meshes(&self) -> impl Iterator<Item = (MeshKey, &RenderMesh)> {
        self.meshes.iter()
    }

    pub fn meshes_with_role(&self, role: MaterialRole) -> impl Iterator<Item = &RenderMesh> {
        self.meshes.values().filter(move |m| m.role() == role)
    }

    #[must_use]
    pub fn find_mesh(&self, name: &str) -> Option<&RenderMesh> {
        self.meshes.values().find(|m| m.name == name)
    }

    #[inline]
    #[must_use]
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Render meshes plus pass-through entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.meshes.len() + self.pass_through.len()
    }

    /// Always 1: the environment light.
    #[inline]
    #[must_use]
    pub fn light_count(&self) -> usize {
        1
    }

    /// Always 1: the contact-shadow ground.
    #[inline]
    #[must_use]
    pub fn ground_count(&self) -> usize {
        1
    }

    /// World-space bounds of every render mesh.
    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.meshes
            .values()
            .filter_map(RenderMesh::world_bounding_box)
            .reduce(|a, b| a.union(&b))
    }
}
