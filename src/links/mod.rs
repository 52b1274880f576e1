//! Pairwise constraints between rigid bodies.
//!
//! A [`Link`] is one entity for every constraint flavor; its [`LinkType`]
//! tag selects which capability records (limits, springs, feedback) it
//! carries. Links are constructed through the
//! [`LinkRegistry`](crate::core::LinkRegistry) and bound to bodies with one
//! of the `init` variants.

mod feedback;
mod limits;
mod link;
mod spring;

pub use feedback::LinkFeedback;
pub use limits::{AxisMode, ConeTwistLimits, LimitPair};
pub use link::{FramePair, GenericLimits, HingeFrame, Link, LinkType};
pub use spring::SpringDescriptor;
