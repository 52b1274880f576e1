mod vector;
mod matrix;
mod transform;
mod rotation;
mod ray;

pub use vector::Vector3;
pub use matrix::{Matrix3, Matrix4};
pub use transform::Transform;
pub use rotation::Quaternion;
pub use ray::Ray;

/// Constant for a very small number, used for comparisons
pub const EPSILON: f32 = 1.0e-6;

/// Width of the band around the ±π seam inside which a wrapped angle is
/// reported as exactly +π, so that repeated reads never flip sign.
pub const ANGLE_EPSILON: f32 = 1.0e-4;

/// Returns true if the two floating point values are approximately equal
#[inline]
pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

/// Returns true if the value is approximately zero
#[inline]
pub fn approx_zero(a: f32) -> bool {
    a.abs() < EPSILON
}

/// Wraps an angle in radians into the half-open interval `(-PI, PI]`.
///
/// Angles within `ANGLE_EPSILON` of the seam collapse to exactly `PI`,
/// whichever side they approach from.
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};

    let mut a = angle % TAU;
    if a > PI {
        a -= TAU;
    } else if a <= -PI {
        a += TAU;
    }

    if PI - a.abs() < ANGLE_EPSILON {
        return PI;
    }
    a
}

/// Converts degrees to radians
#[inline]
pub fn to_radians(degrees: f32) -> f32 {
    degrees * std::f32::consts::PI / 180.0
}

/// Converts radians to degrees
#[inline]
pub fn to_degrees(radians: f32) -> f32 {
    radians * 180.0 / std::f32::consts::PI
}
