#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Parameters for a spring acting on a link.
///
/// The spring pulls the constrained coordinate toward `target` with torque
/// `-spring_coef * (value - target) - damper * velocity`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct SpringDescriptor {
    /// The damping coefficient
    pub damper: f32,

    /// The spring coefficient
    pub spring_coef: f32,

    /// The rest value at which the spring applies no torque
    pub target: f32,
}

impl SpringDescriptor {
    /// Creates a new spring descriptor
    pub fn new(damper: f32, spring_coef: f32, target: f32) -> Self {
        Self { damper, spring_coef, target }
    }
}

impl Default for SpringDescriptor {
    fn default() -> Self {
        Self { damper: 0.0, spring_coef: 0.0, target: 0.0 }
    }
}
