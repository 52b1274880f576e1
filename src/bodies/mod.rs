mod rigid_body;
mod body_type;

pub use self::body_type::RigidBodyType;
pub use self::rigid_body::RigidBody;

use crate::math::Vector3;

/// Types of forces that can be applied to a body
#[derive(Debug, Clone, Copy)]
pub enum ForceType {
    /// Force applied at the center of mass
    Force(Vector3),

    /// Force applied at a specific point (can cause torque)
    ForceAtPoint {
        /// The force to apply
        force: Vector3,

        /// The point to apply the force at, in world space
        point: Vector3,
    },

    /// Torque that causes angular acceleration
    Torque(Vector3),
}
