use std::sync::Arc;

use glam::Affine3A;

use crate::resources::geometry::Geometry;
use crate::scene::NodeKey;
use crate::scene::transform::Transform;

/// A node of a decoded asset graph.
///
/// # Hierarchy
///
/// Nodes form a tree through parent-child links:
/// - `parent`: optional key of the parent node (None for roots)
/// - `children`: keys of the child nodes
///
/// Links come from the asset file and are not trusted: a malformed file can
/// produce a dangling parent or even a cycle, and every walk over them is
/// bounded.
///
/// # Geometry
///
/// Mesh-bearing nodes carry their geometry behind an `Arc`. Render-time
/// objects never share it; they take a deep copy.
#[derive(Debug, Clone)]
pub struct Node {
    /// Author-assigned name, possibly empty, not unique.
    pub name: String,

    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,

    pub transform: Transform,

    /// Geometry for mesh-bearing nodes, `None` for groups and anchors.
    pub geometry: Option<Arc<Geometry>>,

    pub visible: bool,
}

impl Node {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            geometry: None,
            visible: true,
        }
    }

    #[must_use]
    pub fn with_geometry(name: impl Into<String>, geometry: Geometry) -> Self {
        let mut node = Self::new(name);
        node.geometry = Some(Arc::new(geometry));
        node
    }

    #[inline]
    #[must_use]
    pub fn is_mesh(&self) -> bool {
        self.geometry.is_some()
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    /// Sets the parent link only. Prefer
    /// [`AssetGraph::attach`](crate::assets::AssetGraph::attach), which keeps
    /// both sides in sync.
    #[inline]
    pub fn set_parent(&mut self, parent: Option<NodeKey>) {
        self.parent = parent;
    }

    /// Cached world matrix, valid after a hierarchy update pass.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }
}
