//! Transform propagation
//!
//! A render mesh is built fresh from a source node's geometry and must land
//! exactly where the source node would have rendered. Two strategies exist
//! and they are **not** interchangeable:
//!
//! - [`PlacementStrategy::WorldMatrix`] (metal): the node's full world matrix,
//!   resolved through every ancestor, applied as a matrix override with no
//!   decomposition.
//! - [`PlacementStrategy::LocalTrs`] (gem): the node's local position,
//!   rotation and scale only. Ancestor transforms are ignored, which is only
//!   correct when the gem has no transformed ancestors in the source asset.
//!
//! The two agree whenever the node has no transformed ancestors.

use glam::{Affine3A, Quat, Vec3};

use crate::assets::AssetGraph;
use crate::errors::{Result, ViewerError};
use crate::resources::material::{Material, MaterialRole};
use crate::scene::NodeKey;
use crate::scene::transform::Transform;
use crate::scene::transform_system::ChainDefect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementStrategy {
    WorldMatrix,
    LocalTrs,
}

impl PlacementStrategy {
    /// Strategy used for `role`; `None` for unclassified nodes, which keep
    /// their source node.
    #[must_use]
    pub fn for_role(role: MaterialRole) -> Option<Self> {
        match role {
            MaterialRole::Metal => Some(PlacementStrategy::WorldMatrix),
            MaterialRole::Gem => Some(PlacementStrategy::LocalTrs),
            MaterialRole::Unclassified => None,
        }
    }

    /// Strategy for a mesh that already carries a material.
    #[must_use]
    pub fn for_material(material: &Material) -> Self {
        match material {
            Material::Metal(_) => PlacementStrategy::WorldMatrix,
            Material::Gem(_) => PlacementStrategy::LocalTrs,
        }
    }
}

/// Where a render mesh goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Applied verbatim as a matrix override.
    Matrix(Affine3A),
    /// Applied to the TRS fields.
    Trs {
        position: Vec3,
        rotation: Quat,
        scale: Vec3,
    },
}

impl Placement {
    /// The matrix this placement resolves to.
    #[must_use]
    pub fn matrix(&self) -> Affine3A {
        match *self {
            Placement::Matrix(m) => m,
            Placement::Trs { position, rotation, scale } => {
                Affine3A::from_scale_rotation_translation(scale, rotation, position)
            }
        }
    }

    pub fn apply_to(&self, transform: &mut Transform) {
        match *self {
            Placement::Matrix(m) => transform.set_matrix_override(m),
            Placement::Trs { position, rotation, scale } => {
                transform.clear_matrix_override();
                transform.position = position;
                transform.rotation = rotation;
                transform.scale = scale;
            }
        }
        transform.update_local_matrix();
        let local = *transform.local_matrix();
        transform.set_world_matrix(local);
    }

    /// Builds a root-level transform carrying this placement.
    #[must_use]
    pub fn to_transform(&self) -> Transform {
        let mut t = Transform::new();
        self.apply_to(&mut t);
        t
    }
}

/// A placement plus any problem met while resolving it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementOutcome {
    pub placement: Placement,
    pub strategy: PlacementStrategy,
    /// Set when the ancestor walk was cut short; the placement is then the
    /// best-effort matrix of the reachable chain.
    pub defect: Option<ChainDefect>,
}

/// Places `key` with the strategy its role calls for.
///
/// Returns `Ok(None)` for [`MaterialRole::Unclassified`].
pub fn place_for_role(
    role: MaterialRole,
    graph: &AssetGraph,
    key: NodeKey,
) -> Result<Option<PlacementOutcome>> {
    PlacementStrategy::for_role(role)
        .map(|strategy| place_with(strategy, graph, key))
        .transpose()
}

/// Places `key` with an explicit strategy.
///
/// A cyclic or dangling parent chain does not fail: the walk stops, a warning
/// is logged and the outcome carries the defect.
pub fn place_with(
    strategy: PlacementStrategy,
    graph: &AssetGraph,
    key: NodeKey,
) -> Result<PlacementOutcome> {
    let node = graph
        .get_node(key)
        .ok_or_else(|| ViewerError::NodeNotFound(format!("{key:?}")))?;

    let outcome = match strategy {
        PlacementStrategy::WorldMatrix => {
            let resolved = graph.resolve_world(key);
            if let Some(defect) = resolved.defect {
                log::warn!(
                    "World transform of '{}' is best-effort after {} ancestor(s): {defect}",
                    node.name,
                    resolved.depth
                );
            }
            PlacementOutcome {
                placement: Placement::Matrix(resolved.matrix),
                strategy,
                defect: resolved.defect,
            }
        }
        PlacementStrategy::LocalTrs => PlacementOutcome {
            placement: Placement::Trs {
                position: node.transform.position,
                rotation: node.transform.rotation,
                scale: node.transform.scale,
            },
            strategy,
            defect: None,
        },
    };

    log::debug!("Placed '{}' with {:?}", node.name, outcome.strategy);
    Ok(outcome)
}
