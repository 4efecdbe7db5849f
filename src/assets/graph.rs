use glam::Affine3A;
use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::errors::{Result, ViewerError};
use crate::scene::NodeKey;
use crate::scene::node::Node;
use crate::scene::transform_system::{self, WorldResolve};

/// A decoded model: named nodes, their transforms, hierarchy and geometry.
///
/// The graph is pure data. It holds no render-time objects, and scene
/// composition only reads it, so one loaded graph can feed any number of
/// scene builds.
#[derive(Debug, Clone, Default)]
pub struct AssetGraph {
    nodes: SlotMap<NodeKey, Node>,
    roots: Vec<NodeKey>,
}

impl AssetGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node at the root level.
    pub fn add_node(&mut self, node: Node) -> NodeKey {
        let key = self.nodes.insert(node);
        self.roots.push(key);
        key
    }

    /// Adds a node under `parent`. Falls back to the root level if `parent`
    /// does not exist.
    pub fn add_child(&mut self, node: Node, parent: NodeKey) -> NodeKey {
        let key = self.nodes.insert(node);
        if self.nodes.contains_key(parent) {
            self.nodes[parent].children.push(key);
            self.nodes[key].parent = Some(parent);
        } else {
            log::warn!("Parent {parent:?} not found, adding node at root level");
            self.roots.push(key);
        }
        key
    }

    /// Moves `child` under `parent`, keeping both sides of the link in sync.
    pub fn attach(&mut self, child: NodeKey, parent: NodeKey) {
        if child == parent {
            log::warn!("Cannot attach node to itself!");
            return;
        }
        if !self.nodes.contains_key(child) || !self.nodes.contains_key(parent) {
            log::error!("Node not found during attach!");
            return;
        }

        // 1. Detach from old
        match self.nodes[child].parent {
            Some(old) => {
                if let Some(n) = self.nodes.get_mut(old) {
                    n.children.retain(|&c| c != child);
                }
            }
            None => self.roots.retain(|&r| r != child),
        }

        // 2. Attach to new
        self.nodes[parent].children.push(child);
        let node = &mut self.nodes[child];
        node.parent = Some(parent);
        node.transform.mark_dirty();
    }

    #[must_use]
    pub fn get_node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    pub fn get_node_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(key)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeKey, &Node)> {
        self.nodes.iter()
    }

    /// First node whose name matches exactly.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<NodeKey> {
        self.nodes.iter().find(|(_, n)| n.name == name).map(|(k, _)| k)
    }

    #[must_use]
    pub fn roots(&self) -> &[NodeKey] {
        &self.roots
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn mesh_count(&self) -> usize {
        self.nodes.values().filter(|n| n.is_mesh()).count()
    }

    #[inline]
    pub(crate) fn slots(&self) -> &SlotMap<NodeKey, Node> {
        &self.nodes
    }

    // ========================================================================
    // Transforms
    // ========================================================================

    /// Refreshes the cached world matrix of every node reachable from a root.
    pub fn update_world_matrices(&mut self) {
        transform_system::update_hierarchy(&mut self.nodes, &self.roots);
    }

    /// Refreshes `key` and its ancestors only.
    pub fn update_world_matrix(&mut self, key: NodeKey) -> WorldResolve {
        transform_system::update_ancestors(&mut self.nodes, key)
    }

    /// Best-effort world matrix from current TRS, never failing.
    #[must_use]
    pub fn resolve_world(&self, key: NodeKey) -> WorldResolve {
        transform_system::resolve_world_matrix(&self.nodes, key)
    }

    /// World matrix from current TRS; errors on a malformed parent chain.
    pub fn world_matrix(&self, key: NodeKey) -> Result<Affine3A> {
        let resolved = self.resolve_world(key);
        match resolved.defect {
            None => Ok(resolved.matrix),
            Some(defect) => Err(ViewerError::TransformPropagationFailed {
                node: self
                    .nodes
                    .get(key)
                    .map_or_else(|| format!("{key:?}"), |n| n.name.clone()),
                reason: defect.to_string(),
            }),
        }
    }

    // ========================================================================
    // Name map
    // ========================================================================

    /// Name → node map with unique keys.
    ///
    /// Repeated names get `_1`, `_2`, ... appended in node order, so every
    /// node stays addressable.
    #[must_use]
    pub fn node_map(&self) -> NodeMap {
        let mut entries: FxHashMap<String, NodeKey> = FxHashMap::default();
        for (key, node) in &self.nodes {
            let mut label = node.name.clone();
            let mut suffix = 1;
            while entries.contains_key(&label) {
                label = format!("{}_{suffix}", node.name);
                suffix += 1;
            }
            entries.insert(label, key);
        }
        NodeMap { entries }
    }
}

/// Unique name → node lookup over an [`AssetGraph`].
#[derive(Debug, Clone, Default)]
pub struct NodeMap {
    entries: FxHashMap<String, NodeKey>,
}

impl NodeMap {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<NodeKey> {
        self.entries.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, NodeKey)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
