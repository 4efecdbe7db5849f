//! Viewer Settings
//!
//! Everything the viewer needs at startup, as one serde-backed record.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lustre::settings::ViewerSettings;
//!
//! // Defaults: gold ring + diamond, studio HDR, ACES Filmic
//! let settings = ViewerSettings::default();
//!
//! // Or from a JSON file; missing fields keep their defaults
//! let settings = ViewerSettings::from_file("viewer.json")?;
//! ```
//!
//! # JSON Layout
//!
//! ```json
//! {
//!   "assets": { "model": "/3d_models/Ring_Raw.glb" },
//!   "materials": { "gold": { "color": "#FFD700", "roughness": 0.15 } },
//!   "debug": { "camera": { "position": [0.0, 0.0, 6.0] } }
//! }
//! ```
//!
//! Each view fills its missing fields from its own defaults: the partial
//! `debug` object above keeps the debug fov, background and environment map.

use std::path::{Path, PathBuf};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::classify::NameClassifier;
use crate::errors::Result;
use crate::resources::material::MaterialProfiles;
use crate::scene::environment::ShadowCatcher;
use crate::scene::scene::{CameraSetup, RenderSettings};

// ---------------------------------------------------------------------------
// Asset paths
// ---------------------------------------------------------------------------

/// Where the jewelry model lives.
///
/// Paths are site-absolute (`/3d_models/...`); an
/// [`AssetLoader`](crate::assets::AssetLoader) resolves them against its own
/// root. Environment maps are per view, see [`ViewSettings::environment`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    /// glTF / GLB jewelry model.
    pub model: PathBuf,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            model: PathBuf::from("/3d_models/Ring_Raw.glb"),
        }
    }
}

// ---------------------------------------------------------------------------
// Per-view settings
// ---------------------------------------------------------------------------

/// Settings that differ between the viewer and the debug view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    pub camera: CameraSetup,
    /// Radiance HDR or OpenEXR environment map lighting this view.
    pub environment: PathBuf,
    /// Draw the environment map as the visible background.
    pub environment_background: bool,
}

impl ViewSettings {
    #[must_use]
    pub fn viewer() -> Self {
        Self {
            camera: CameraSetup::viewer(),
            environment: PathBuf::from("/hdr/brown_photostudio_02_4k_copy.exr"),
            environment_background: false,
        }
    }

    #[must_use]
    pub fn debug() -> Self {
        Self {
            camera: CameraSetup::debug(),
            environment: PathBuf::from("/hdr/brown_photostudio_02_4k.exr"),
            environment_background: true,
        }
    }
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self::viewer()
    }
}

// ---------------------------------------------------------------------------
// ViewerSettings
// ---------------------------------------------------------------------------

/// Startup configuration of the viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    pub assets: AssetPaths,

    pub viewer: ViewSettings,
    /// Missing fields fall back to [`ViewSettings::debug`], not the viewer
    /// framing.
    #[serde(deserialize_with = "debug_view")]
    pub debug: ViewSettings,

    pub render: RenderSettings,
    /// Contact-shadow ground shared by both views.
    pub ground: ShadowCatcher,

    /// The material profile store.
    pub materials: MaterialProfiles,
    /// Keyword rules for role classification.
    pub classifier: NameClassifier,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            assets: AssetPaths::default(),
            viewer: ViewSettings::viewer(),
            debug: ViewSettings::debug(),
            render: RenderSettings::default(),
            ground: ShadowCatcher::default(),
            materials: MaterialProfiles::default(),
            classifier: NameClassifier::default(),
        }
    }
}

impl ViewerSettings {
    /// Parses settings from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&text)?;
        log::info!("Loaded viewer settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ---------------------------------------------------------------------------
// Per-view defaults
// ---------------------------------------------------------------------------

/// Deserializes a view by patching `ViewSettings::debug()` with the fields
/// present in the input, nested objects included.
fn debug_view<'de, D>(deserializer: D) -> std::result::Result<ViewSettings, D::Error>
where
    D: Deserializer<'de>,
{
    let patch = serde_json::Value::deserialize(deserializer)?;
    let mut base = serde_json::to_value(ViewSettings::debug()).map_err(D::Error::custom)?;
    merge_json(&mut base, patch);
    serde_json::from_value(base).map_err(D::Error::custom)
}

fn merge_json(base: &mut serde_json::Value, patch: serde_json::Value) {
    match (base, patch) {
        (serde_json::Value::Object(base), serde_json::Value::Object(patch)) => {
            for (key, value) in patch {
                match base.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
