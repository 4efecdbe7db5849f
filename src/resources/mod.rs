//! CPU-side resources: geometry, primitives, material profiles and tone
//! mapping modes.

pub mod geometry;
pub mod material;
pub mod primitives;
pub mod tone_mapping;

pub use geometry::{Attribute, AttributeData, BoundingBox, Geometry};
pub use material::{
    Color, GemProfile, Material, MaterialProfiles, MaterialRole, MetalProfile, SharedProfiles, Side,
};
pub use tone_mapping::ToneMappingMode;
