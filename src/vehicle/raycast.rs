use crate::math::{Ray, Vector3};

/// Result of a suspension ray cast
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    /// Hit point in world space
    pub position: Vector3,

    /// Surface normal at the hit point
    pub normal: Vector3,

    /// Distance from the ray origin to the hit point
    pub distance: f32,
}

/// Casts suspension rays against the world on behalf of a vehicle.
///
/// The vehicle owns no collision structures; implement this trait to bridge
/// wheel ray casts to whatever scene representation hosts the chassis.
pub trait VehicleRaycaster {
    /// Casts a ray and returns the nearest hit within `max_distance`, if any
    fn cast(&self, ray: &Ray, max_distance: f32) -> Option<RayHit>;
}

/// Raycaster against an infinite horizontal plane at a fixed height.
///
/// Useful for tests and flat-ground demos.
#[derive(Debug, Clone, Copy)]
pub struct PlaneRaycaster {
    height: f32,
}

impl PlaneRaycaster {
    /// Creates a raycaster against the plane `y = height`
    pub fn new(height: f32) -> Self {
        Self { height }
    }

    /// Returns the plane height
    pub fn get_height(&self) -> f32 {
        self.height
    }
}

impl VehicleRaycaster for PlaneRaycaster {
    fn cast(&self, ray: &Ray, max_distance: f32) -> Option<RayHit> {
        let direction = ray.normalized_direction();
        if direction.y.abs() < crate::math::EPSILON {
            return None;
        }
        let t = (self.height - ray.origin.y) / direction.y;
        if t < 0.0 || t > max_distance {
            return None;
        }
        Some(RayHit {
            position: ray.origin + direction * t,
            normal: Vector3::unit_y(),
            distance: t,
        })
    }
}
