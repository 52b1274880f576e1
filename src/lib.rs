pub mod math;
pub mod core;
pub mod bodies;
pub mod links;
pub mod vehicle;

/// Re-export common types for easier usage
pub use crate::core::{BodyHandle, LinkHandle, BackendId, LinkRegistry};
pub use crate::bodies::{RigidBody, RigidBodyType};
pub use crate::links::{
    Link, LinkType, LimitPair, AxisMode, ConeTwistLimits, SpringDescriptor, LinkFeedback,
};
pub use crate::vehicle::{SubstepIntegrator, Vehicle, VehicleTuning, Wheel, WheelFlags, WheelInfo};
pub use crate::math::Vector3;

/// Error types for the link and vehicle layer
pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum PhysicsError {
        #[error("Illegal state: {0}")]
        IllegalState(String),

        #[error("Invalid parameter: {0}")]
        InvalidParameter(String),

        #[error("Resource not found: {0}")]
        ResourceNotFound(String),
    }
}

/// Result type for link and vehicle operations
pub type Result<T> = std::result::Result<T, error::PhysicsError>;

/// Engine version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
