use crate::math::{Matrix4, Quaternion, Vector3};

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// A rigid transformation in 3D space (position and rotation)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Transform {
    /// Position in 3D space
    pub position: Vector3,

    /// Rotation as a quaternion
    pub rotation: Quaternion,
}

impl Transform {
    /// Creates a new transform with the given position and rotation
    #[inline]
    pub fn new(position: Vector3, rotation: Quaternion) -> Self {
        Self { position, rotation }
    }

    /// Creates a new identity transform (no translation, no rotation)
    #[inline]
    pub fn identity() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Quaternion::identity(),
        }
    }

    /// Creates a new transform from just a position
    #[inline]
    pub fn from_position(position: Vector3) -> Self {
        Self {
            position,
            rotation: Quaternion::identity(),
        }
    }

    /// Converts the transform to a 4x4 matrix
    pub fn to_matrix(&self) -> Matrix4 {
        Matrix4::from_rotation_translation(self.rotation.to_rotation_matrix(), self.position)
    }

    /// Creates a transform from a rigid 4x4 matrix
    pub fn from_matrix(matrix: &Matrix4) -> Self {
        Self {
            position: matrix.get_translation(),
            rotation: Quaternion::from_rotation_matrix(&matrix.to_matrix3()),
        }
    }

    /// Transforms a point by this transform
    #[inline]
    pub fn transform_point(&self, point: Vector3) -> Vector3 {
        self.rotation.rotate_vector(point) + self.position
    }

    /// Transforms a direction vector by this transform (ignoring translation)
    #[inline]
    pub fn transform_direction(&self, direction: Vector3) -> Vector3 {
        self.rotation.rotate_vector(direction)
    }

    /// Maps a world-space point into this transform's local space
    #[inline]
    pub fn inverse_transform_point(&self, point: Vector3) -> Vector3 {
        self.rotation.conjugate().rotate_vector(point - self.position)
    }

    /// Maps a world-space direction into this transform's local space
    #[inline]
    pub fn inverse_transform_direction(&self, direction: Vector3) -> Vector3 {
        self.rotation.conjugate().rotate_vector(direction)
    }

    /// Inverts this transform
    pub fn inverse(&self) -> Self {
        let inv_rotation = self.rotation.conjugate();
        Self {
            position: -(inv_rotation.rotate_vector(self.position)),
            rotation: inv_rotation,
        }
    }
}

impl Default for Transform {
    #[inline]
    fn default() -> Self {
        Self::identity()
    }
}
