//! Pose math shared by bind poses, local poses, and world transforms.

use glam::{Affine2, Vec2};
use std::f32::consts::PI;

/// Position, rotation, and scale of a bone at a given moment.
///
/// Rotation is a scalar angle in radians. The same type serves as a
/// bone's bind pose, an interpolated local pose, and a composed world
/// transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose2D {
    /// Translation relative to the parent bone (or the skeleton origin
    /// for a root)
    pub position: Vec2,
    /// Rotation in radians
    pub rotation: f32,
    /// Per-axis scale
    pub scale: Vec2,
}

impl Pose2D {
    /// The identity pose: no translation, no rotation, unit scale
    pub const IDENTITY: Self = Self {
        position: Vec2::ZERO,
        rotation: 0.0,
        scale: Vec2::ONE,
    };

    /// Create a pose from its components
    pub fn new(position: Vec2, rotation: f32, scale: Vec2) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Interpolate between two poses.
    ///
    /// Position and scale are lerped component-wise. Rotation takes the
    /// shortest arc: the angular delta is normalized to (−π, π] before
    /// blending, so interpolating across the ±π seam does not swing the
    /// long way around.
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            position: self.position.lerp(other.position, t),
            rotation: lerp_angle(self.rotation, other.rotation, t),
            scale: self.scale.lerp(other.scale, t),
        }
    }

    /// Compose a child's local pose with `self` as the parent's world
    /// transform, yielding the child's world transform.
    ///
    /// The child offset is scaled, then rotated into the parent frame;
    /// rotations add and scales multiply component-wise.
    pub fn compose(&self, local: &Self) -> Self {
        let (sin, cos) = self.rotation.sin_cos();
        let offset = local.position * self.scale;
        let rotated = Vec2::new(
            offset.x * cos - offset.y * sin,
            offset.x * sin + offset.y * cos,
        );

        Self {
            position: self.position + rotated,
            rotation: self.rotation + local.rotation,
            scale: self.scale * local.scale,
        }
    }

    /// Matrix form of this pose for consumers that want one
    pub fn to_affine2(&self) -> Affine2 {
        Affine2::from_scale_angle_translation(self.scale, self.rotation, self.position)
    }
}

impl Default for Pose2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Normalize an angle to (−π, π]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped == -PI { PI } else { wrapped }
}

/// Shortest-arc angular interpolation
pub fn lerp_angle(from: f32, to: f32, t: f32) -> f32 {
    from + wrap_angle(to - from) * t
}
