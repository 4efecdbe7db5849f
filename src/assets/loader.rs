use std::path::Path;

use crate::assets::{AssetGraph, AssetHandle, EnvironmentMap};
use crate::errors::Result;

/// Source of the two resources a view needs.
///
/// The view shell only talks to this trait, so tests and embedders can feed
/// in-memory assets while the application reads files.
pub trait AssetLoader {
    fn load_model(&self, path: &Path) -> Result<AssetHandle<AssetGraph>>;

    fn load_environment(&self, path: &Path) -> Result<AssetHandle<EnvironmentMap>>;
}

/// Reads models and environment maps from the file system, resolving
/// site-absolute paths (`/hdr/...`) against `root`.
#[derive(Debug, Clone)]
pub struct FileAssetLoader {
    root: std::path::PathBuf,
}

impl FileAssetLoader {
    pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `root` joined with `path`, leading `/` stripped.
    #[must_use]
    pub fn resolve(&self, path: &Path) -> std::path::PathBuf {
        let relative = path.strip_prefix("/").unwrap_or(path);
        self.root.join(relative)
    }
}

impl AssetLoader for FileAssetLoader {
    #[cfg(feature = "gltf")]
    fn load_model(&self, path: &Path) -> Result<AssetHandle<AssetGraph>> {
        let resolved = self.resolve(path);
        let graph = crate::assets::GltfLoader::load(&resolved)?;
        Ok(AssetHandle::new(path.to_string_lossy(), graph))
    }

    #[cfg(not(feature = "gltf"))]
    fn load_model(&self, path: &Path) -> Result<AssetHandle<AssetGraph>> {
        Err(crate::errors::ViewerError::AssetLoadFailed {
            path: path.to_path_buf(),
            reason: "built without the `gltf` feature".to_string(),
        })
    }

    fn load_environment(&self, path: &Path) -> Result<AssetHandle<EnvironmentMap>> {
        let resolved = self.resolve(path);
        let map = crate::assets::environment::load_environment_map(&resolved)?;
        Ok(AssetHandle::new(path.to_string_lossy(), map))
    }
}
