//! Node classification
//!
//! Decides which [`MaterialRole`] a mesh node plays from its name alone.
//!
//! The rule is a case-insensitive substring match checked in a fixed order:
//!
//! 1. contains `"ring"` → [`MaterialRole::Metal`]
//! 2. contains `"diamond"` or `"gem"` → [`MaterialRole::Gem`]
//! 3. otherwise → [`MaterialRole::Unclassified`]
//!
//! Metal is checked first, so `"ring_with_gem"` is metal. An empty name is
//! unclassified. The result is never cached: a reloaded asset may reuse a name
//! for a different part.
//!
//! The rule sits behind [`NodeClassifier`] so a metadata-driven classifier can
//! replace it without touching scene composition.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::resources::material::MaterialRole;
use crate::scene::node::Node;

/// Maps a source node to its material role.
///
/// Implementations must be pure: the same node always yields the same role.
pub trait NodeClassifier {
    fn classify(&self, node: &Node) -> MaterialRole;
}

static DEFAULT_RULES: LazyLock<NameClassifier> = LazyLock::new(NameClassifier::default);

/// Keyword rules matched against lower-cased node names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NameClassifier {
    /// Checked first.
    pub metal_keywords: Vec<String>,
    pub gem_keywords: Vec<String>,
}

impl Default for NameClassifier {
    fn default() -> Self {
        Self {
            metal_keywords: vec!["ring".to_string()],
            gem_keywords: vec!["diamond".to_string(), "gem".to_string()],
        }
    }
}

impl NameClassifier {
    #[must_use]
    pub fn classify_name(&self, name: &str) -> MaterialRole {
        if name.is_empty() {
            return MaterialRole::Unclassified;
        }
        let key = name.to_lowercase();
        let hit = |keywords: &[String]| {
            keywords
                .iter()
                .any(|k| !k.is_empty() && key.contains(k.to_lowercase().as_str()))
        };

        if hit(&self.metal_keywords) {
            MaterialRole::Metal
        } else if hit(&self.gem_keywords) {
            MaterialRole::Gem
        } else {
            MaterialRole::Unclassified
        }
    }
}

impl NodeClassifier for NameClassifier {
    fn classify(&self, node: &Node) -> MaterialRole {
        self.classify_name(&node.name)
    }
}

/// Classifies a node with the default keyword rules.
#[must_use]
pub fn classify(node: &Node) -> MaterialRole {
    classify_name(&node.name)
}

/// Classifies a bare name with the default keyword rules.
#[must_use]
pub fn classify_name(name: &str) -> MaterialRole {
    DEFAULT_RULES.classify_name(name)
}
