//! Asset loading
//!
//! - [`AssetGraph`]: decoded model (the source nodes)
//! - [`EnvironmentMap`]: decoded HDR lighting
//! - [`AssetHandle`]: explicit, caller-owned references to loaded assets
//! - [`AssetLoader`]: the seam the view shell loads through

pub mod environment;
pub mod graph;
pub mod handle;
pub mod loader;
pub mod loaders;

pub use environment::{EnvironmentMap, load_environment_map};
pub use graph::{AssetGraph, NodeMap};
pub use handle::{AssetHandle, WeakAssetHandle};
pub use loader::{AssetLoader, FileAssetLoader};
#[cfg(feature = "gltf")]
pub use loaders::GltfLoader;
