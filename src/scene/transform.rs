use glam::{Affine3A, Quat, Vec3};

/// Transform component.
///
/// Holds a node's position / rotation / scale (TRS) together with cached
/// local and world matrices and the shadow state used for dirty checking.
///
/// A transform can also be frozen to an explicit matrix with
/// [`Transform::set_matrix_override`]. While an override is set the TRS
/// fields are ignored and the matrix is used verbatim, so nothing is lost to
/// a decomposition round-trip (shear, non-uniform scale under rotation).
#[derive(Debug, Clone)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,

    pub(crate) local_matrix: Affine3A,
    pub(crate) world_matrix: Affine3A,

    matrix_override: Option<Affine3A>,

    last_position: Vec3,
    last_rotation: Quat,
    last_scale: Vec3,
    force_update: bool,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,

            local_matrix: Affine3A::IDENTITY,
            world_matrix: Affine3A::IDENTITY,

            matrix_override: None,

            last_position: Vec3::ZERO,
            last_rotation: Quat::IDENTITY,
            last_scale: Vec3::ONE,
            force_update: true,
        }
    }

    /// Builds a transform from explicit TRS components.
    #[must_use]
    pub fn from_trs(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        let mut t = Self::new();
        t.position = position;
        t.rotation = rotation;
        t.scale = scale;
        t.update_local_matrix();
        t
    }

    // ========================================================================
    // Dirty-checked local matrix
    // ========================================================================

    /// Recomputes the local matrix if the TRS fields changed.
    ///
    /// Returns whether the local matrix changed. With a matrix override in
    /// place the override is the local matrix and TRS edits are ignored.
    pub fn update_local_matrix(&mut self) -> bool {
        if let Some(mat) = self.matrix_override {
            let changed = self.force_update || self.local_matrix != mat;
            self.local_matrix = mat;
            self.force_update = false;
            return changed;
        }

        let changed = self.position != self.last_position
            || self.rotation != self.last_rotation
            || self.scale != self.last_scale
            || self.force_update;

        if changed {
            self.local_matrix =
                Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position);

            self.last_position = self.position;
            self.last_rotation = self.rotation;
            self.last_scale = self.scale;
            self.force_update = false;
        }

        changed
    }

    // ========================================================================
    // Matrix override
    // ========================================================================

    /// Freezes this transform to `mat`.
    pub fn set_matrix_override(&mut self, mat: Affine3A) {
        self.matrix_override = Some(mat);
        self.local_matrix = mat;
        self.mark_dirty();
    }

    /// Returns the override matrix, if any.
    #[inline]
    #[must_use]
    pub fn matrix_override(&self) -> Option<&Affine3A> {
        self.matrix_override.as_ref()
    }

    /// Drops the override and returns to TRS-driven updates.
    pub fn clear_matrix_override(&mut self) {
        self.matrix_override = None;
        self.mark_dirty();
    }

    /// The matrix this transform resolves to right now, without touching the
    /// cache. Override wins over TRS.
    #[must_use]
    pub fn compose_local(&self) -> Affine3A {
        self.matrix_override.unwrap_or_else(|| {
            Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position)
        })
    }

    // ========================================================================
    // Cached matrices
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> &Affine3A {
        &self.local_matrix
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.world_matrix
    }

    pub fn set_world_matrix(&mut self, mat: Affine3A) {
        self.world_matrix = mat;
    }

    pub fn mark_dirty(&mut self) {
        self.force_update = true;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
