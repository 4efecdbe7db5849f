use std::sync::atomic::{AtomicU64, Ordering};

use glam::{Affine3A, Vec3};
use rustc_hash::FxHashMap;
use uuid::Uuid;

use crate::errors::{Result, ViewerError};

/// Typed CPU-side vertex data of one attribute channel.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeData {
    Float32x2(Vec<[f32; 2]>),
    Float32x3(Vec<[f32; 3]>),
    Float32x4(Vec<[f32; 4]>),
}

impl AttributeData {
    /// Number of vertices stored in this channel.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            AttributeData::Float32x2(v) => v.len(),
            AttributeData::Float32x3(v) => v.len(),
            AttributeData::Float32x4(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Builds a new channel by reading the vertices named in `indices`.
    ///
    /// Returns `None` if any index is out of range.
    #[must_use]
    pub fn gather(&self, indices: &[u32]) -> Option<Self> {
        fn pick<T: Copy>(src: &[T], indices: &[u32]) -> Option<Vec<T>> {
            indices.iter().map(|&i| src.get(i as usize).copied()).collect()
        }

        Some(match self {
            AttributeData::Float32x2(v) => AttributeData::Float32x2(pick(v, indices)?),
            AttributeData::Float32x3(v) => AttributeData::Float32x3(pick(v, indices)?),
            AttributeData::Float32x4(v) => AttributeData::Float32x4(pick(v, indices)?),
        })
    }
}

impl From<Vec<[f32; 2]>> for AttributeData {
    fn from(v: Vec<[f32; 2]>) -> Self {
        AttributeData::Float32x2(v)
    }
}

impl From<Vec<[f32; 3]>> for AttributeData {
    fn from(v: Vec<[f32; 3]>) -> Self {
        AttributeData::Float32x3(v)
    }
}

impl From<Vec<[f32; 4]>> for AttributeData {
    fn from(v: Vec<[f32; 4]>) -> Self {
        AttributeData::Float32x4(v)
    }
}

static NEXT_ATTR_VERSION: AtomicU64 = AtomicU64::new(1);

/// One named vertex channel plus its data version.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub data: AttributeData,
    /// Data version for change detection
    pub version: u64,
}

impl Attribute {
    pub fn new(data: impl Into<AttributeData>) -> Self {
        Self {
            data: data.into(),
            version: NEXT_ATTR_VERSION.fetch_add(1, Ordering::Relaxed),
        }
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn as_vec3(&self) -> Option<&[[f32; 3]]> {
        match &self.data {
            AttributeData::Float32x3(v) => Some(v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    #[must_use]
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Returns `None` for an empty point set.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bb = BoundingBox { min: first, max: first };
        for p in iter {
            bb.min = bb.min.min(p);
            bb.max = bb.max.max(p);
        }
        Some(bb)
    }

    /// Axis-aligned box enclosing the eight transformed corners.
    #[must_use]
    pub fn transform(&self, matrix: &Affine3A) -> Self {
        let corners = [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ];

        let mut new_min = Vec3::splat(f32::INFINITY);
        let mut new_max = Vec3::splat(f32::NEG_INFINITY);

        for point in corners {
            let transformed = matrix.transform_point3(point);
            new_min = new_min.min(transformed);
            new_max = new_max.max(transformed);
        }

        Self { min: new_min, max: new_max }
    }
}

/// CPU-side triangle-list geometry.
///
/// Attributes are keyed by name (`"position"`, `"normal"`, `"uv"`, ...). The
/// index buffer is optional; without one every three consecutive vertices
/// form a triangle.
///
/// `Clone` produces a fully independent copy: no buffer is shared with the
/// original.
#[derive(Debug, Clone)]
pub struct Geometry {
    pub uuid: Uuid,

    attributes: FxHashMap<String, Attribute>,
    index: Option<Vec<u32>>,

    structure_version: u64,
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new()
    }
}

impl Geometry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            uuid: Uuid::new_v4(),
            attributes: FxHashMap::default(),
            index: None,
            structure_version: 0,
        }
    }

    /// Deep copy with a fresh identity.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        let mut copy = self.clone();
        copy.uuid = Uuid::new_v4();
        copy
    }

    // ========================================================================
    // Attribute management
    // ========================================================================

    pub fn set_attribute(&mut self, name: &str, attr: Attribute) {
        let is_new = self.attributes.insert(name.to_string(), attr).is_none();
        if is_new {
            self.structure_version = self.structure_version.wrapping_add(1);
        }
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<Attribute> {
        let removed = self.attributes.remove(name);
        if removed.is_some() {
            self.structure_version = self.structure_version.wrapping_add(1);
        }
        removed
    }

    #[must_use]
    pub fn get_attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    #[must_use]
    pub fn attributes(&self) -> &FxHashMap<String, Attribute> {
        &self.attributes
    }

    #[must_use]
    pub fn structure_version(&self) -> u64 {
        self.structure_version
    }

    pub fn set_indices(&mut self, indices: &[u32]) {
        self.index = Some(indices.to_vec());
        self.structure_version = self.structure_version.wrapping_add(1);
    }

    #[must_use]
    pub fn indices(&self) -> Option<&[u32]> {
        self.index.as_deref()
    }

    #[must_use]
    pub fn is_indexed(&self) -> bool {
        self.index.is_some()
    }

    #[must_use]
    pub fn positions(&self) -> Option<&[[f32; 3]]> {
        self.attributes.get("position").and_then(Attribute::as_vec3)
    }

    #[must_use]
    pub fn normals(&self) -> Option<&[[f32; 3]]> {
        self.attributes.get("normal").and_then(Attribute::as_vec3)
    }

    #[must_use]
    pub fn has_normals(&self) -> bool {
        self.normals().is_some()
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions().map_or(0, <[[f32; 3]]>::len)
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        match &self.index {
            Some(idx) => idx.len() / 3,
            None => self.vertex_count() / 3,
        }
    }

    /// Vertex indices of every triangle, indexed or not.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        let sequential = self.index.is_none().then(|| self.vertex_count() as u32 / 3);
        let indexed = self.index.as_deref().map(|idx| idx.chunks_exact(3));

        indexed
            .into_iter()
            .flatten()
            .map(|c| [c[0], c[1], c[2]])
            .chain(
                sequential
                    .into_iter()
                    .flat_map(|n| (0..n).map(|t| [t * 3, t * 3 + 1, t * 3 + 2])),
            )
    }

    // ========================================================================
    // Processing
    // ========================================================================

    /// Area-weighted smooth vertex normals.
    ///
    /// Vertices shared between faces average the normals of those faces, so
    /// flat shading needs [`to_non_indexed`](Self::to_non_indexed) first.
    pub fn compute_vertex_normals(&mut self) {
        let Some(positions) = self.positions() else {
            return;
        };
        let pos_count = positions.len();
        let mut normals = vec![Vec3::ZERO; pos_count];

        for [i0, i1, i2] in self.triangles() {
            let (i0, i1, i2) = (i0 as usize, i1 as usize, i2 as usize);
            if i0 >= pos_count || i1 >= pos_count || i2 >= pos_count {
                continue;
            }

            let v0 = Vec3::from_array(positions[i0]);
            let v1 = Vec3::from_array(positions[i1]);
            let v2 = Vec3::from_array(positions[i2]);

            // |cross| = 2 * triangle area
            let face_normal = (v1 - v0).cross(v2 - v0);

            normals[i0] += face_normal;
            normals[i1] += face_normal;
            normals[i2] += face_normal;
        }

        let normals: Vec<[f32; 3]> = normals
            .into_iter()
            .map(|n| n.normalize_or_zero().to_array())
            .collect();
        self.set_attribute("normal", Attribute::new(normals));
    }

    /// Computes normals only when the geometry has none. Returns whether
    /// normals were generated.
    pub fn ensure_normals(&mut self) -> bool {
        if self.has_normals() {
            return false;
        }
        self.compute_vertex_normals();
        true
    }

    /// Expands indexed geometry so every triangle owns its three vertices.
    ///
    /// Non-indexed geometry is returned as an independent copy.
    pub fn to_non_indexed(&self) -> Result<Geometry> {
        let Some(indices) = self.index.as_deref() else {
            log::debug!("Geometry is already non-indexed");
            return Ok(self.duplicate());
        };

        let mut out = Geometry::new();
        for (name, attr) in &self.attributes {
            let data = attr.data.gather(indices).ok_or_else(|| {
                ViewerError::InvalidGeometry(format!(
                    "index out of range for attribute '{name}' ({} vertices)",
                    attr.count()
                ))
            })?;
            out.set_attribute(name, Attribute::new(data));
        }
        Ok(out)
    }

    /// Per-face geometry with flat normals, for faceted shading.
    pub fn to_faceted(&self) -> Result<Geometry> {
        if self.positions().is_none() {
            return Err(ViewerError::InvalidGeometry(
                "geometry has no Float32x3 'position' attribute".to_string(),
            ));
        }
        let mut flat = self.to_non_indexed()?;
        flat.compute_vertex_normals();
        Ok(flat)
    }

    #[must_use]
    pub fn compute_bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.positions()?.iter().map(|p| Vec3::from_array(*p)))
    }
}
