//! Scene graph
//!
//! - Node: asset graph node (hierarchy, transform, optional geometry)
//! - Transform: TRS plus cached matrices and matrix override
//! - transform_system: hierarchy updates and bounded ancestor walks
//! - Scene: the composed, renderable result
//! - Environment / ShadowCatcher: per-scene singletons

pub mod environment;
pub mod node;
pub mod scene;
pub mod transform;
pub mod transform_system;

pub use environment::{Environment, ShadowCatcher};
pub use node::Node;
pub use scene::{CameraSetup, PassThrough, PassThroughKind, RenderMesh, RenderSettings, Scene, SceneKind};
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeKey;
    pub struct MeshKey;
}
