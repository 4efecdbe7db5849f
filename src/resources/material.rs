//! Material roles and profiles
//!
//! A [`MaterialRole`] says *what* a mesh is made of. A [`MaterialProfiles`]
//! store says *how* each role is shaded. Profiles are immutable once built and
//! shared read-only (`Arc`) by every render mesh that uses them.

use std::fmt;
use std::sync::Arc;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::errors::ViewerError;

/// The closed set of roles a mesh node can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialRole {
    /// Ring band, prongs: rendered as polished metal.
    Metal,
    /// Stones: rendered with the refraction approximation.
    Gem,
    /// Anything else: left as authored.
    Unclassified,
}

impl fmt::Display for MaterialRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaterialRole::Metal => write!(f, "metal"),
            MaterialRole::Gem => write!(f, "gem"),
            MaterialRole::Unclassified => write!(f, "unclassified"),
        }
    }
}

// ============================================================================
// Color
// ============================================================================

/// An sRGB color as written in configuration (`"#FFD700"`, `"white"`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::from_rgb8(0xFF, 0xFF, 0xFF);
    pub const BLACK: Color = Color::from_rgb8(0x00, 0x00, 0x00);
    pub const GOLD: Color = Color::from_rgb8(0xFF, 0xD7, 0x00);
    pub const SILVER: Color = Color::from_rgb8(0xC0, 0xC0, 0xC0);

    #[must_use]
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Parses `#RRGGBB`, `#RGB` or one of the known color names.
    pub fn parse(s: &str) -> Result<Self, ViewerError> {
        let s = s.trim();
        let invalid = || ViewerError::InvalidColor(s.to_string());

        if let Some(hex) = s.strip_prefix('#') {
            let channel = |i: usize, width: usize| -> Result<u8, ViewerError> {
                let digits = hex.get(i * width..(i + 1) * width).ok_or_else(invalid)?;
                let v = u8::from_str_radix(digits, 16).map_err(|_| invalid())?;
                Ok(if width == 1 { v * 17 } else { v })
            };
            return match hex.len() {
                6 => Ok(Self::from_rgb8(channel(0, 2)?, channel(1, 2)?, channel(2, 2)?)),
                3 => Ok(Self::from_rgb8(channel(0, 1)?, channel(1, 1)?, channel(2, 1)?)),
                _ => Err(invalid()),
            };
        }

        match s.to_ascii_lowercase().as_str() {
            "white" => Ok(Self::WHITE),
            "black" => Ok(Self::BLACK),
            "gold" => Ok(Self::GOLD),
            "silver" => Ok(Self::SILVER),
            _ => Err(invalid()),
        }
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02X}{:02X}{:02X}", q(self.r), q(self.g), q(self.b))
    }

    /// Linear-light RGB, for shading.
    #[must_use]
    pub fn to_linear(&self) -> Vec3 {
        fn decode(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        Vec3::new(decode(self.r), decode(self.g), decode(self.b))
    }
}

impl TryFrom<String> for Color {
    type Error = ViewerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::parse(&value)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_hex()
    }
}

/// Which faces of a mesh are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Side {
    #[default]
    Front,
    Back,
    Double,
}

// ============================================================================
// Profiles
// ============================================================================

/// Shading parameters for polished metal (metalness / roughness workflow).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetalProfile {
    pub color: Color,
    pub metalness: f32,
    pub roughness: f32,
    pub env_map_intensity: f32,
    pub side: Side,
}

impl Default for MetalProfile {
    fn default() -> Self {
        Self {
            color: Color::GOLD,
            metalness: 1.0,
            roughness: 0.15,
            env_map_intensity: 2.0,
            side: Side::Double,
        }
    }
}

/// Shading parameters for the screen-space refraction approximation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GemProfile {
    /// Internal reflection bounces traced by the shader.
    pub bounces: u32,
    /// Index of refraction (diamond ≈ 2.4).
    pub ior: f32,
    pub fresnel: f32,
    /// Chromatic dispersion strength.
    pub aberration_strength: f32,
    pub color: Color,
    /// Cheaper single-sample dispersion.
    pub fast_chroma: bool,
    pub side: Side,
}

impl Default for GemProfile {
    fn default() -> Self {
        Self {
            bounces: 3,
            ior: 2.4,
            fresnel: 1.0,
            aberration_strength: 0.04,
            color: Color::WHITE,
            fast_chroma: true,
            side: Side::Double,
        }
    }
}

/// The profile store: one profile per shaded role.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialProfiles {
    pub gold: MetalProfile,
    pub diamond: GemProfile,
}

impl MaterialProfiles {
    /// Freezes the store for sharing.
    #[must_use]
    pub fn into_shared(self) -> SharedProfiles {
        SharedProfiles {
            gold: Arc::new(self.gold),
            diamond: Arc::new(self.diamond),
        }
    }
}

/// Read-only, cheaply clonable view of a [`MaterialProfiles`] store.
#[derive(Debug, Clone)]
pub struct SharedProfiles {
    gold: Arc<MetalProfile>,
    diamond: Arc<GemProfile>,
}

impl Default for SharedProfiles {
    fn default() -> Self {
        MaterialProfiles::default().into_shared()
    }
}

impl SharedProfiles {
    /// Material for `role`; `None` for [`MaterialRole::Unclassified`].
    #[must_use]
    pub fn material_for(&self, role: MaterialRole) -> Option<Material> {
        match role {
            MaterialRole::Metal => Some(Material::Metal(Arc::clone(&self.gold))),
            MaterialRole::Gem => Some(Material::Gem(Arc::clone(&self.diamond))),
            MaterialRole::Unclassified => None,
        }
    }

    #[must_use]
    pub fn metal(&self) -> &Arc<MetalProfile> {
        &self.gold
    }

    #[must_use]
    pub fn gem(&self) -> &Arc<GemProfile> {
        &self.diamond
    }
}

/// The material attached to a render mesh.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    Metal(Arc<MetalProfile>),
    Gem(Arc<GemProfile>),
}

impl Material {
    #[must_use]
    pub fn role(&self) -> MaterialRole {
        match self {
            Material::Metal(_) => MaterialRole::Metal,
            Material::Gem(_) => MaterialRole::Gem,
        }
    }

    #[must_use]
    pub fn side(&self) -> Side {
        match self {
            Material::Metal(p) => p.side,
            Material::Gem(p) => p.side,
        }
    }

    #[must_use]
    pub fn as_metal(&self) -> Option<&MetalProfile> {
        match self {
            Material::Metal(p) => Some(p),
            Material::Gem(_) => None,
        }
    }

    #[must_use]
    pub fn as_gem(&self) -> Option<&GemProfile> {
        match self {
            Material::Gem(p) => Some(p),
            Material::Metal(_) => None,
        }
    }
}
