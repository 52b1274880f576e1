use crate::math::{Matrix3, Vector3};
use std::ops::Mul;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// A quaternion for representing rotations
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Quaternion {
    pub w: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Quaternion {
    /// Creates a new quaternion from components
    #[inline]
    pub fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self { w, x, y, z }
    }

    /// Creates an identity quaternion (no rotation)
    #[inline]
    pub fn identity() -> Self {
        Self { w: 1.0, x: 0.0, y: 0.0, z: 0.0 }
    }

    /// Creates a quaternion from an axis and an angle in radians
    pub fn from_axis_angle(axis: Vector3, angle: f32) -> Self {
        let axis = axis.normalize();
        let half = angle * 0.5;
        let s = half.sin();
        Self {
            w: half.cos(),
            x: axis.x * s,
            y: axis.y * s,
            z: axis.z * s,
        }
    }

    /// Returns the rotation axis and angle in radians
    pub fn get_axis_angle(&self) -> (Vector3, f32) {
        let q = self.normalize();
        let sin_half_sq = 1.0 - q.w * q.w;
        if sin_half_sq < crate::math::EPSILON {
            return (Vector3::unit_x(), 0.0);
        }
        let inv_sin_half = 1.0 / sin_half_sq.sqrt();
        let axis = Vector3::new(q.x * inv_sin_half, q.y * inv_sin_half, q.z * inv_sin_half);
        (axis, 2.0 * q.w.clamp(-1.0, 1.0).acos())
    }

    /// Returns the vector (imaginary) part
    #[inline]
    pub fn vector_part(&self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Converts the quaternion to a rotation matrix
    pub fn to_rotation_matrix(&self) -> Matrix3 {
        let q = self.normalize();
        let (w, x, y, z) = (q.w, q.x, q.y, q.z);

        Matrix3::new([
            [
                1.0 - 2.0 * (y * y + z * z),
                2.0 * (x * y - w * z),
                2.0 * (x * z + w * y),
            ],
            [
                2.0 * (x * y + w * z),
                1.0 - 2.0 * (x * x + z * z),
                2.0 * (y * z - w * x),
            ],
            [
                2.0 * (x * z - w * y),
                2.0 * (y * z + w * x),
                1.0 - 2.0 * (x * x + y * y),
            ],
        ])
    }

    /// Creates a quaternion from a rotation matrix
    pub fn from_rotation_matrix(m: &Matrix3) -> Self {
        let d = &m.data;
        let trace = d[0][0] + d[1][1] + d[2][2];

        if trace > 0.0 {
            let s = (trace + 1.0).sqrt() * 2.0;
            Self {
                w: 0.25 * s,
                x: (d[2][1] - d[1][2]) / s,
                y: (d[0][2] - d[2][0]) / s,
                z: (d[1][0] - d[0][1]) / s,
            }
        } else if d[0][0] > d[1][1] && d[0][0] > d[2][2] {
            let s = (1.0 + d[0][0] - d[1][1] - d[2][2]).sqrt() * 2.0;
            Self {
                w: (d[2][1] - d[1][2]) / s,
                x: 0.25 * s,
                y: (d[0][1] + d[1][0]) / s,
                z: (d[0][2] + d[2][0]) / s,
            }
        } else if d[1][1] > d[2][2] {
            let s = (1.0 + d[1][1] - d[0][0] - d[2][2]).sqrt() * 2.0;
            Self {
                w: (d[0][2] - d[2][0]) / s,
                x: (d[0][1] + d[1][0]) / s,
                y: 0.25 * s,
                z: (d[1][2] + d[2][1]) / s,
            }
        } else {
            let s = (1.0 + d[2][2] - d[0][0] - d[1][1]).sqrt() * 2.0;
            Self {
                w: (d[1][0] - d[0][1]) / s,
                x: (d[0][2] + d[2][0]) / s,
                y: (d[1][2] + d[2][1]) / s,
                z: 0.25 * s,
            }
        }
    }

    /// Returns the conjugate of the quaternion
    #[inline]
    pub fn conjugate(&self) -> Self {
        Self {
            w: self.w,
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }

    /// Returns the squared length of the quaternion
    #[inline]
    pub fn length_squared(&self) -> f32 {
        self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Returns the length of the quaternion
    #[inline]
    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Returns a normalized version of the quaternion
    pub fn normalize(&self) -> Self {
        let length = self.length();
        if length > crate::math::EPSILON {
            Self {
                w: self.w / length,
                x: self.x / length,
                y: self.y / length,
                z: self.z / length,
            }
        } else {
            Self::identity()
        }
    }

    /// Computes the dot product of two quaternions
    #[inline]
    pub fn dot(&self, other: &Self) -> f32 {
        self.w * other.w + self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Rotates a vector by this quaternion
    pub fn rotate_vector(&self, v: Vector3) -> Vector3 {
        // v' = v + 2q_v x (q_v x v + w v)
        let qv = self.vector_part();
        let t = qv.cross(&v) * 2.0;
        v + t * self.w + qv.cross(&t)
    }

    /// Convert to nalgebra Quaternion
    pub fn to_nalgebra(&self) -> nalgebra::Quaternion<f32> {
        nalgebra::Quaternion::new(self.w, self.x, self.y, self.z)
    }

    /// Create from nalgebra Quaternion
    pub fn from_nalgebra(q: &nalgebra::Quaternion<f32>) -> Self {
        Self { w: q.w, x: q.i, y: q.j, z: q.k }
    }
}

impl Mul for Quaternion {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        Self {
            w: self.w * other.w - self.x * other.x - self.y * other.y - self.z * other.z,
            x: self.w * other.x + self.x * other.w + self.y * other.z - self.z * other.y,
            y: self.w * other.y - self.x * other.z + self.y * other.w + self.z * other.x,
            z: self.w * other.z + self.x * other.y - self.y * other.x + self.z * other.w,
        }
    }
}

impl Default for Quaternion {
    #[inline]
    fn default() -> Self {
        Self::identity()
    }
}
