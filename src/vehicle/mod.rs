//! Raycast vehicles.
//!
//! A [`Vehicle`] is a rigid chassis carried on ray-cast wheel suspensions.
//! Ray casts are delegated to a [`VehicleRaycaster`] implementation, so the
//! vehicle works against any scene representation. Each update runs through
//! a [`SubstepIntegrator`], which splits the step while keeping gravity's
//! total effect on the chassis exact.

mod raycast;
mod substep;
mod vehicle;
mod wheel;

pub use raycast::{PlaneRaycaster, RayHit, VehicleRaycaster};
pub use substep::SubstepIntegrator;
pub use vehicle::{Vehicle, VehicleTuning};
pub use wheel::{Wheel, WheelFlags, WheelInfo};
