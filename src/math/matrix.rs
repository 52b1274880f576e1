use crate::math::Vector3;
use nalgebra as na;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// A 3x3 matrix, stored row-major
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Matrix3 {
    pub data: [[f32; 3]; 3],
}

impl Matrix3 {
    /// Creates a new matrix from row-major data
    #[inline]
    pub fn new(data: [[f32; 3]; 3]) -> Self {
        Self { data }
    }

    /// Creates an identity matrix
    pub fn identity() -> Self {
        Self {
            data: [
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates a zero matrix
    pub fn zero() -> Self {
        Self { data: [[0.0; 3]; 3] }
    }

    /// Creates a matrix whose columns are the given basis vectors
    pub fn from_columns(x: Vector3, y: Vector3, z: Vector3) -> Self {
        Self {
            data: [
                [x.x, y.x, z.x],
                [x.y, y.y, z.y],
                [x.z, y.z, z.z],
            ],
        }
    }

    /// Creates a diagonal matrix
    pub fn from_diagonal(d: Vector3) -> Self {
        Self {
            data: [
                [d.x, 0.0, 0.0],
                [0.0, d.y, 0.0],
                [0.0, 0.0, d.z],
            ],
        }
    }

    /// Computes the determinant of the matrix
    pub fn determinant(&self) -> f32 {
        let m = &self.data;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Computes the inverse of the matrix, if it exists
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() < crate::math::EPSILON {
            return None;
        }

        let m = &self.data;
        let inv_det = 1.0 / det;
        let mut result = Self::zero();

        result.data[0][0] = (m[1][1] * m[2][2] - m[1][2] * m[2][1]) * inv_det;
        result.data[0][1] = (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv_det;
        result.data[0][2] = (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv_det;
        result.data[1][0] = (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv_det;
        result.data[1][1] = (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv_det;
        result.data[1][2] = (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * inv_det;
        result.data[2][0] = (m[1][0] * m[2][1] - m[1][1] * m[2][0]) * inv_det;
        result.data[2][1] = (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * inv_det;
        result.data[2][2] = (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * inv_det;

        Some(result)
    }

    /// Returns the transpose of the matrix
    pub fn transpose(&self) -> Self {
        let m = &self.data;
        Self {
            data: [
                [m[0][0], m[1][0], m[2][0]],
                [m[0][1], m[1][1], m[2][1]],
                [m[0][2], m[1][2], m[2][2]],
            ],
        }
    }

    /// Multiplies the matrix by a vector
    pub fn multiply_vector(&self, v: Vector3) -> Vector3 {
        let m = &self.data;
        Vector3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    /// Multiplies the matrix by another matrix
    pub fn multiply_matrix(&self, other: &Self) -> Self {
        let mut result = Self::zero();
        for i in 0..3 {
            for j in 0..3 {
                for k in 0..3 {
                    result.data[i][j] += self.data[i][k] * other.data[k][j];
                }
            }
        }
        result
    }

    /// Convert to nalgebra Matrix3
    pub fn to_nalgebra(&self) -> na::Matrix3<f32> {
        let m = &self.data;
        na::Matrix3::new(
            m[0][0], m[0][1], m[0][2],
            m[1][0], m[1][1], m[1][2],
            m[2][0], m[2][1], m[2][2],
        )
    }

    /// Create from nalgebra Matrix3
    pub fn from_nalgebra(m: &na::Matrix3<f32>) -> Self {
        Self {
            data: [
                [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
                [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
                [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
            ],
        }
    }
}

/// A 4x4 matrix, stored row-major, used for joint frames and wheel poses
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Matrix4 {
    pub data: [[f32; 4]; 4],
}

impl Matrix4 {
    /// Creates a new matrix from row-major data
    #[inline]
    pub fn new(data: [[f32; 4]; 4]) -> Self {
        Self { data }
    }

    /// Creates an identity matrix
    pub fn identity() -> Self {
        let mut data = [[0.0; 4]; 4];
        for i in 0..4 {
            data[i][i] = 1.0;
        }
        Self { data }
    }

    /// Creates a translation matrix
    pub fn from_translation(translation: Vector3) -> Self {
        let mut result = Self::identity();
        result.data[0][3] = translation.x;
        result.data[1][3] = translation.y;
        result.data[2][3] = translation.z;
        result
    }

    /// Creates a matrix from a rotation part and a translation part
    pub fn from_rotation_translation(rotation: Matrix3, translation: Vector3) -> Self {
        let mut result = Self::identity();
        for i in 0..3 {
            for j in 0..3 {
                result.data[i][j] = rotation.data[i][j];
            }
        }
        result.data[0][3] = translation.x;
        result.data[1][3] = translation.y;
        result.data[2][3] = translation.z;
        result
    }

    /// Returns the transpose of the matrix
    pub fn transpose(&self) -> Self {
        let mut result = Self::identity();
        for i in 0..4 {
            for j in 0..4 {
                result.data[i][j] = self.data[j][i];
            }
        }
        result
    }

    /// Transforms a point (applies rotation and translation)
    pub fn multiply_point(&self, v: Vector3) -> Vector3 {
        let m = &self.data;
        Vector3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z + m[0][3],
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z + m[1][3],
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z + m[2][3],
        )
    }

    /// Transforms a direction (applies rotation only)
    pub fn multiply_direction(&self, v: Vector3) -> Vector3 {
        let m = &self.data;
        Vector3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    /// Multiplies the matrix by another matrix
    pub fn multiply_matrix(&self, other: &Self) -> Self {
        let mut result = Self { data: [[0.0; 4]; 4] };
        for i in 0..4 {
            for j in 0..4 {
                for k in 0..4 {
                    result.data[i][j] += self.data[i][k] * other.data[k][j];
                }
            }
        }
        result
    }

    /// Inverts a rigid transform matrix (orthonormal rotation + translation)
    pub fn inverse_rigid(&self) -> Self {
        let rot_t = self.to_matrix3().transpose();
        let t = self.get_translation();
        let new_t = -rot_t.multiply_vector(t);
        Self::from_rotation_translation(rot_t, new_t)
    }

    /// Extracts the upper-left 3x3 rotation part
    pub fn to_matrix3(&self) -> Matrix3 {
        let mut result = Matrix3::zero();
        for i in 0..3 {
            for j in 0..3 {
                result.data[i][j] = self.data[i][j];
            }
        }
        result
    }

    /// Extracts the translation part
    pub fn get_translation(&self) -> Vector3 {
        Vector3::new(self.data[0][3], self.data[1][3], self.data[2][3])
    }

    /// Convert to nalgebra Matrix4
    pub fn to_nalgebra(&self) -> na::Matrix4<f32> {
        let m = &self.data;
        na::Matrix4::new(
            m[0][0], m[0][1], m[0][2], m[0][3],
            m[1][0], m[1][1], m[1][2], m[1][3],
            m[2][0], m[2][1], m[2][2], m[2][3],
            m[3][0], m[3][1], m[3][2], m[3][3],
        )
    }

    /// Create from nalgebra Matrix4
    pub fn from_nalgebra(m: &na::Matrix4<f32>) -> Self {
        let mut data = [[0.0; 4]; 4];
        for i in 0..4 {
            for j in 0..4 {
                data[i][j] = m[(i, j)];
            }
        }
        Self { data }
    }
}
