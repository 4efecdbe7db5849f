//! Scene composition
//!
//! Turns loaded assets into a render-ready [`Scene`]. Two composers exist:
//!
//! - [`build_viewer_scene`]: classifies every mesh node of a jewelry asset,
//!   builds a fresh render mesh per classified node and places it with the
//!   strategy of its role. Everything else passes through unmodified.
//! - [`build_debug_scene`]: a gold sphere and a diamond icosahedron, side by
//!   side, independent of any model asset.
//!
//! Both add exactly one environment light and one contact-shadow ground.
//!
//! Composition never fails as a whole. A node that cannot be built is skipped
//! and recorded as a [`BuildWarning`] in the scene's [`BuildReport`].

use std::fmt;
use std::sync::Arc;

use glam::Vec3;

use crate::assets::{AssetGraph, AssetHandle, EnvironmentMap};
use crate::classify::NodeClassifier;
use crate::errors::{Result, ViewerError};
use crate::placement::{Placement, PlacementStrategy, place_with};
use crate::resources::geometry::Geometry;
use crate::resources::material::{Material, MaterialRole, SharedProfiles};
use crate::resources::primitives::{SphereOptions, create_icosahedron, create_sphere};
use crate::scene::environment::Environment;
use crate::scene::node::Node;
use crate::scene::scene::{PassThrough, PassThroughKind, RenderMesh, Scene, SceneKind};
use crate::scene::transform_system::ChainDefect;
use crate::scene::NodeKey;
use crate::settings::{ViewSettings, ViewerSettings};

// ============================================================================
// Build report
// ============================================================================

/// A non-fatal problem met while composing a scene.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildWarning {
    /// The node produced no render mesh.
    NodeSkipped { node: String, reason: String },
    /// The node was placed with a best-effort matrix.
    TransformDegraded { node: String, defect: ChainDefect },
}

impl BuildWarning {
    #[must_use]
    pub fn node(&self) -> &str {
        match self {
            BuildWarning::NodeSkipped { node, .. } | BuildWarning::TransformDegraded { node, .. } => {
                node
            }
        }
    }
}

impl fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildWarning::NodeSkipped { node, reason } => {
                write!(f, "skipped node '{node}': {reason}")
            }
            BuildWarning::TransformDegraded { node, defect } => {
                write!(f, "transform propagation failed for '{node}': {defect}")
            }
        }
    }
}

/// Warnings collected during one scene build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    pub warnings: Vec<BuildWarning>,
}

impl BuildReport {
    pub fn push(&mut self, warning: BuildWarning) {
        log::warn!("{warning}");
        self.warnings.push(warning);
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    #[must_use]
    pub fn skipped_nodes(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, BuildWarning::NodeSkipped { .. }))
            .count()
    }

    #[must_use]
    pub fn degraded_transforms(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, BuildWarning::TransformDegraded { .. }))
            .count()
    }
}

// ============================================================================
// Viewer scene
// ============================================================================

/// Composes the ring viewer scene with the classifier rules from `settings`.
#[must_use]
pub fn build_viewer_scene(
    asset: &AssetHandle<AssetGraph>,
    environment: &AssetHandle<EnvironmentMap>,
    profiles: &SharedProfiles,
    settings: &ViewerSettings,
) -> Scene {
    build_viewer_scene_with(asset, environment, profiles, settings, &settings.classifier)
}

/// Composes the ring viewer scene with an explicit classifier.
#[must_use]
pub fn build_viewer_scene_with(
    asset: &AssetHandle<AssetGraph>,
    environment: &AssetHandle<EnvironmentMap>,
    profiles: &SharedProfiles,
    settings: &ViewerSettings,
    classifier: &dyn NodeClassifier,
) -> Scene {
    let mut scene = new_scene(SceneKind::Viewer, environment, settings, &settings.viewer);
    let graph: &AssetGraph = asset;

    for (key, node) in graph.nodes() {
        if !node.is_mesh() {
            scene.add_pass_through(pass_through(graph, key, node, PassThroughKind::Structural));
            continue;
        }

        let role = classifier.classify(node);
        log::debug!("Node '{}' classified as {role}", node.name);

        let Some(material) = profiles.material_for(role) else {
            scene.add_pass_through(pass_through(
                graph,
                key,
                node,
                PassThroughKind::UnclassifiedMesh,
            ));
            continue;
        };

        match build_render_mesh(graph, key, node, material) {
            Ok((mesh, defect)) => {
                if let Some(defect) = defect {
                    scene.report.push(BuildWarning::TransformDegraded {
                        node: node.name.clone(),
                        defect,
                    });
                }
                scene.add_mesh(mesh);
            }
            Err(err) => scene.report.push(BuildWarning::NodeSkipped {
                node: node.name.clone(),
                reason: err.to_string(),
            }),
        }
    }

    log_summary(&scene, asset.source());
    scene
}

fn build_render_mesh(
    graph: &AssetGraph,
    key: NodeKey,
    node: &Node,
    material: Material,
) -> Result<(RenderMesh, Option<ChainDefect>)> {
    let source = node
        .geometry
        .as_deref()
        .ok_or_else(|| ViewerError::InvalidGeometry("node has no geometry".to_string()))?;
    let geometry = prepare_geometry(source, material.role())?;
    let outcome = place_with(PlacementStrategy::for_material(&material), graph, key)?;

    let mut mesh = RenderMesh::new(node.name.clone(), geometry, material);
    mesh.source = Some(key);
    mesh.visible = node.visible;
    outcome.placement.apply_to(&mut mesh.transform);

    Ok((mesh, outcome.defect))
}

/// Role-specific geometry processing. The result never shares buffers with
/// `source`.
///
/// - Gem: de-indexed into per-face vertices, then normals recomputed, so
///   every facet shades flat.
/// - Metal: independent copy; normals computed only if missing.
pub fn prepare_geometry(source: &Geometry, role: MaterialRole) -> Result<Geometry> {
    if source.positions().is_none() {
        return Err(ViewerError::InvalidGeometry(
            "geometry has no position attribute".to_string(),
        ));
    }

    match role {
        MaterialRole::Gem => source.to_faceted(),
        MaterialRole::Metal | MaterialRole::Unclassified => {
            let mut copy = source.duplicate();
            if copy.ensure_normals() {
                log::debug!("Generated missing normals for metal geometry");
            }
            Ok(copy)
        }
    }
}

fn pass_through(graph: &AssetGraph, key: NodeKey, node: &Node, kind: PassThroughKind) -> PassThrough {
    PassThrough {
        node: key,
        name: node.name.clone(),
        kind,
        world: graph.resolve_world(key).matrix,
        geometry: node.geometry.as_ref().map(Arc::clone),
    }
}

// ============================================================================
// Debug scene
// ============================================================================

/// Composes the material tuning scene: a gold sphere at (-1.5, 0, 0) and a
/// diamond icosahedron at (1.5, 0, 0). No asset, no classification.
#[must_use]
pub fn build_debug_scene(
    environment: &AssetHandle<EnvironmentMap>,
    profiles: &SharedProfiles,
    settings: &ViewerSettings,
) -> Scene {
    let mut scene = new_scene(SceneKind::Debug, environment, settings, &settings.debug);

    let sphere = create_sphere(&SphereOptions {
        radius: 1.0,
        width_segments: 32,
        height_segments: 32,
    });
    let icosahedron = create_icosahedron(1.0);

    let entries = [
        ("Gold Sphere", sphere, MaterialRole::Metal, Vec3::new(-1.5, 0.0, 0.0)),
        ("Diamond Polyhedron", icosahedron, MaterialRole::Gem, Vec3::new(1.5, 0.0, 0.0)),
    ];

    for (name, geometry, role, position) in entries {
        let Some(material) = profiles.material_for(role) else {
            continue;
        };
        let geometry = match prepare_geometry(&geometry, role) {
            Ok(g) => g,
            Err(err) => {
                scene.report.push(BuildWarning::NodeSkipped {
                    node: name.to_string(),
                    reason: err.to_string(),
                });
                continue;
            }
        };

        let mut mesh = RenderMesh::new(name, geometry, material);
        Placement::Trs {
            position,
            rotation: glam::Quat::IDENTITY,
            scale: Vec3::ONE,
        }
        .apply_to(&mut mesh.transform);
        scene.add_mesh(mesh);
    }

    log_summary(&scene, "primitives");
    scene
}

// ============================================================================
// Shared
// ============================================================================

fn new_scene(
    kind: SceneKind,
    environment: &AssetHandle<EnvironmentMap>,
    settings: &ViewerSettings,
    view: &ViewSettings,
) -> Scene {
    let environment = Environment::new(environment.clone()).with_background(view.environment_background);
    let mut scene = Scene::new(kind, environment, settings.ground.clone());
    scene.camera = view.camera;
    scene.render = settings.render;
    scene
}

fn log_summary(scene: &Scene, source: &str) {
    log::info!(
        "Built {:?} scene #{} from {source}: {} metal, {} gem, {} pass-through, {} warning(s)",
        scene.kind,
        scene.id,
        scene.meshes_with_role(MaterialRole::Metal).count(),
        scene.meshes_with_role(MaterialRole::Gem).count(),
        scene.pass_through.len(),
        scene.report.warnings.len()
    );
}
