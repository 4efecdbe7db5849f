//! HDR environment maps
//!
//! Radiance `.hdr` and OpenEXR `.exr` files are decoded with the `image`
//! crate into linear RGB floats. Prefiltering (PMREM) is left to the renderer.

use std::path::Path;

use glam::Vec3;

use crate::errors::{Result, ViewerError};

/// Decoded equirectangular environment image, linear RGB.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentMap {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[f32; 3]>,
}

impl EnvironmentMap {
    /// A 1×1 map of a single color. Useful as a neutral stand-in.
    #[must_use]
    pub fn uniform(color: Vec3) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![color.to_array()],
        }
    }

    /// Mean radiance over all texels.
    #[must_use]
    pub fn average_radiance(&self) -> Vec3 {
        if self.pixels.is_empty() {
            return Vec3::ZERO;
        }
        let sum = self
            .pixels
            .iter()
            .fold(Vec3::ZERO, |acc, p| acc + Vec3::from_array(*p));
        sum / self.pixels.len() as f32
    }

    /// Brightest texel luminance (Rec. 709 weights).
    #[must_use]
    pub fn peak_luminance(&self) -> f32 {
        self.pixels
            .iter()
            .map(|p| 0.2126 * p[0] + 0.7152 * p[1] + 0.0722 * p[2])
            .fold(0.0, f32::max)
    }
}

/// Loads an `.hdr` or `.exr` file.
pub fn load_environment_map(path: impl AsRef<Path>) -> Result<EnvironmentMap> {
    let path = path.as_ref();
    let fail = |reason: String| ViewerError::EnvironmentLoadFailed {
        path: path.to_path_buf(),
        reason,
    };

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if ext != "hdr" && ext != "exr" {
        return Err(fail(format!("unsupported extension '{ext}', expected .hdr or .exr")));
    }

    let img = image::open(path).map_err(|e| fail(e.to_string()))?;
    let rgb = img.into_rgb32f();
    let (width, height) = rgb.dimensions();
    let pixels = rgb.pixels().map(|p| p.0).collect();

    log::info!("Loaded environment map {} ({width}x{height})", path.display());

    Ok(EnvironmentMap { width, height, pixels })
}
