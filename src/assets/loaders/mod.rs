#[cfg(feature = "gltf")]
pub mod gltf;

#[cfg(feature = "gltf")]
pub use gltf::GltfLoader;
