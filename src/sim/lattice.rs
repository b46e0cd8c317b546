//! Torus lattice geometry
//!
//! Blocks sit on the surface of a torus around the parent's local Z axis:
//! - major angle θ: position around the ring
//! - minor angle φ: position around the tube cross-section
//!
//! Only θ matters for lighting; φ just spreads blocks over the tube.

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::MINOR_SEGMENTS;
use crate::settings::ReprojectMode;

/// Position, rotation and scale of the object that owns the ring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParentTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for ParentTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ParentTransform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation_rotation(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
            scale: Vec3::ONE,
        }
    }

    /// Local point → world point (scale, rotate, translate)
    #[inline]
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.rotation * (local * self.scale) + self.translation
    }

    /// World point → local point
    #[inline]
    pub fn inverse_transform_point(&self, world: Vec3) -> Vec3 {
        let unrotated = self.rotation.inverse() * (world - self.translation);
        unrotated * safe_reciprocal(self.scale)
    }

    /// Local direction → world direction, ignoring scale
    #[inline]
    pub fn transform_vector_no_scale(&self, local: Vec3) -> Vec3 {
        self.rotation * local
    }

    /// World direction → local direction, ignoring scale
    #[inline]
    pub fn inverse_transform_vector_no_scale(&self, world: Vec3) -> Vec3 {
        self.rotation.inverse() * world
    }

    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// 1/s per component, with 0 for degenerate axes
fn safe_reciprocal(scale: Vec3) -> Vec3 {
    Vec3::new(
        if scale.x != 0.0 { 1.0 / scale.x } else { 0.0 },
        if scale.y != 0.0 { 1.0 / scale.y } else { 0.0 },
        if scale.z != 0.0 { 1.0 / scale.z } else { 0.0 },
    )
}

/// Where a block rests on the torus, in both frames
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockAnchor {
    /// Position in the parent's local frame (fixed at generation)
    pub local_position: Vec3,
    /// Outward surface normal in the parent's local frame (unit)
    pub local_normal: Vec3,
    /// Current world-space base position
    pub position: Vec3,
    /// Current world-space outward normal (unit)
    pub normal: Vec3,
}

impl BlockAnchor {
    fn new(local_position: Vec3, local_normal: Vec3, parent: &ParentTransform) -> Self {
        Self {
            local_position,
            local_normal,
            position: parent.transform_point(local_position),
            normal: parent
                .transform_vector_no_scale(local_normal)
                .normalize_or_zero(),
        }
    }

    /// Follow the parent from `previous` to `current`
    pub fn reproject(
        &mut self,
        previous: &ParentTransform,
        current: &ParentTransform,
        mode: ReprojectMode,
    ) {
        match mode {
            ReprojectMode::Absolute => {
                self.position = current.transform_point(self.local_position);
                self.normal = current
                    .transform_vector_no_scale(self.local_normal)
                    .normalize_or_zero();
            }
            ReprojectMode::Incremental => {
                let local = previous.inverse_transform_point(self.position);
                self.position = current.transform_point(local);
                let local_normal = previous.inverse_transform_vector_no_scale(self.normal);
                self.normal = current
                    .transform_vector_no_scale(local_normal)
                    .normalize_or_zero();
            }
        }
    }
}

/// One generated lattice site
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticePoint {
    /// Angle around the major circle (degrees)
    pub major_angle: f32,
    pub anchor: BlockAnchor,
}

/// Lay out `total_blocks * MINOR_SEGMENTS` sites over a torus.
///
/// Sites are ordered major-step first, so sites `i * 6 .. i * 6 + 6` share
/// the same major angle.
pub fn generate(
    major_radius: f32,
    minor_radius: f32,
    total_blocks: usize,
    parent: &ParentTransform,
) -> Vec<LatticePoint> {
    if total_blocks == 0 {
        return Vec::new();
    }
    // Block ids are u32 instance indices
    let count = match total_blocks.checked_mul(MINOR_SEGMENTS) {
        Some(count) if count <= u32::MAX as usize => count,
        _ => {
            log::warn!("Lattice of {total_blocks} blocks is too large; nothing generated");
            return Vec::new();
        }
    };

    let major_step = 360.0 / total_blocks as f32;
    let minor_step = 360.0 / MINOR_SEGMENTS as f32;
    let mut points = Vec::with_capacity(count);

    for i in 0..total_blocks {
        let major_angle = i as f32 * major_step;
        let (sin_t, cos_t) = major_angle.to_radians().sin_cos();

        for j in 0..MINOR_SEGMENTS {
            let (sin_p, cos_p) = (j as f32 * minor_step).to_radians().sin_cos();

            let ring = major_radius + minor_radius * cos_p;
            let local_position = Vec3::new(ring * cos_t, ring * sin_t, minor_radius * sin_p);
            let local_normal = Vec3::new(cos_t * cos_p, sin_t * cos_p, sin_p);

            points.push(LatticePoint {
                major_angle,
                anchor: BlockAnchor::new(local_position, local_normal, parent),
            });
        }
    }

    points
}
