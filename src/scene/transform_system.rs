//! Transform System
//!
//! Matrix propagation over an asset graph, decoupled from the graph owner so
//! it only borrows the node `SlotMap`.
//!
//! Parent links come from untrusted asset files. Every walk here is bounded by
//! the number of nodes and tracks visited keys, so a cyclic or dangling chain
//! ends the walk early instead of looping. The result then carries a
//! [`ChainDefect`] describing where the walk stopped.

use std::fmt;

use glam::Affine3A;
use rustc_hash::FxHashSet;
use slotmap::SlotMap;

use crate::scene::NodeKey;
use crate::scene::node::Node;

/// Why an ancestor walk stopped before reaching a root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainDefect {
    /// The node itself is not in the graph.
    MissingNode,
    /// A parent link points at a key that is not in the graph.
    DanglingParent(NodeKey),
    /// A parent link revisits a node already on the chain.
    Cycle(NodeKey),
}

impl fmt::Display for ChainDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainDefect::MissingNode => write!(f, "node is not part of the graph"),
            ChainDefect::DanglingParent(k) => write!(f, "parent {k:?} does not exist"),
            ChainDefect::Cycle(k) => write!(f, "parent chain loops back to {k:?}"),
        }
    }
}

/// Outcome of a world-matrix resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldResolve {
    /// Best-effort world matrix: the product of every local matrix that could
    /// be reached.
    pub matrix: Affine3A,
    /// Number of ancestors that contributed.
    pub depth: usize,
    /// Set when the walk ended early.
    pub defect: Option<ChainDefect>,
}

impl WorldResolve {
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.defect.is_none()
    }
}

/// Collects `key` and its ancestors, node first.
///
/// The walk visits at most `nodes.len()` keys.
pub fn collect_ancestor_chain(
    nodes: &SlotMap<NodeKey, Node>,
    key: NodeKey,
) -> (Vec<NodeKey>, Option<ChainDefect>) {
    let Some(node) = nodes.get(key) else {
        return (Vec::new(), Some(ChainDefect::MissingNode));
    };

    let mut chain = vec![key];
    let mut visited: FxHashSet<NodeKey> = FxHashSet::default();
    visited.insert(key);

    let mut next = node.parent;
    while let Some(parent_key) = next {
        if chain.len() > nodes.len() || !visited.insert(parent_key) {
            return (chain, Some(ChainDefect::Cycle(parent_key)));
        }
        let Some(parent) = nodes.get(parent_key) else {
            return (chain, Some(ChainDefect::DanglingParent(parent_key)));
        };
        chain.push(parent_key);
        next = parent.parent;
    }

    (chain, None)
}

/// Resolves the world matrix of `key` from the current TRS of the node and
/// its ancestors, without touching any cache.
#[must_use]
pub fn resolve_world_matrix(nodes: &SlotMap<NodeKey, Node>, key: NodeKey) -> WorldResolve {
    let (chain, defect) = collect_ancestor_chain(nodes, key);

    let matrix = chain
        .iter()
        .rev()
        .filter_map(|k| nodes.get(*k))
        .fold(Affine3A::IDENTITY, |world, node| {
            world * node.transform.compose_local()
        });

    WorldResolve {
        matrix,
        depth: chain.len().saturating_sub(1),
        defect,
    }
}

/// Brings `key` and all its ancestors up to date, root first, and writes the
/// resulting world matrices into their caches. Descendants are not touched.
pub fn update_ancestors(nodes: &mut SlotMap<NodeKey, Node>, key: NodeKey) -> WorldResolve {
    let (chain, defect) = collect_ancestor_chain(nodes, key);

    let mut world = Affine3A::IDENTITY;
    for k in chain.iter().rev() {
        if let Some(node) = nodes.get_mut(*k) {
            node.transform.update_local_matrix();
            world = world * *node.transform.local_matrix();
            node.transform.set_world_matrix(world);
        }
    }

    WorldResolve {
        matrix: world,
        depth: chain.len().saturating_sub(1),
        defect,
    }
}

/// Updates world matrices of every node reachable from `roots`.
///
/// Uses an explicit stack instead of recursion. A node reached a second time
/// (shared child, cycle) is skipped; the number of skipped visits is
/// returned.
pub fn update_hierarchy(nodes: &mut SlotMap<NodeKey, Node>, roots: &[NodeKey]) -> usize {
    // (node, parent world, parent changed)
    let mut stack: Vec<(NodeKey, Affine3A, bool)> = Vec::with_capacity(64);
    let mut visited: FxHashSet<NodeKey> = FxHashSet::default();
    let mut skipped = 0;

    for &root in roots.iter().rev() {
        stack.push((root, Affine3A::IDENTITY, false));
    }

    while let Some((key, parent_world, parent_changed)) = stack.pop() {
        if !visited.insert(key) {
            skipped += 1;
            continue;
        }
        let Some(node) = nodes.get_mut(key) else {
            continue;
        };

        let local_changed = node.transform.update_local_matrix();
        let world_changed = local_changed || parent_changed;
        if world_changed {
            let world = parent_world * *node.transform.local_matrix();
            node.transform.set_world_matrix(world);
        }

        let world = node.transform.world_matrix;
        for &child in node.children.iter().rev() {
            stack.push((child, world, world_changed));
        }
    }

    if skipped > 0 {
        log::warn!("Hierarchy update skipped {skipped} repeated node visit(s); the graph is not a tree");
    }
    skipped
}
