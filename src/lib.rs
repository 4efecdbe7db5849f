#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::module_inception)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod assets;
pub mod classify;
pub mod compose;
pub mod errors;
pub mod placement;
pub mod resources;
pub mod scene;
pub mod settings;
pub mod shell;

pub use assets::{AssetGraph, AssetHandle, AssetLoader, EnvironmentMap, FileAssetLoader};
#[cfg(feature = "gltf")]
pub use assets::GltfLoader;
pub use classify::{NameClassifier, NodeClassifier, classify};
pub use compose::{BuildReport, BuildWarning, build_debug_scene, build_viewer_scene};
pub use errors::{Result, ViewerError};
pub use placement::{Placement, PlacementStrategy, place_for_role};
pub use resources::primitives::*;
pub use resources::{Geometry, Material, MaterialProfiles, MaterialRole, SharedProfiles, Side};
pub use scene::{Node, RenderMesh, Scene, SceneKind, Transform};
pub use settings::ViewerSettings;
pub use shell::{LoadState, MountEvent, Route, ViewShell};
