#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// How a constrained axis behaves under the sentinel limit policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisMode {
    /// Axis is unconstrained (`lower > upper`)
    Free,

    /// Axis is locked in place (`lower == upper`)
    Locked,

    /// Axis moves freely within `[lower, upper]`
    Bounded,
}

/// A lower/upper bound pair for one constrained axis.
///
/// The sentinel convention applies: `lower > upper` leaves the axis
/// unconstrained, `lower == upper` locks it, anything else bounds it.
/// Out-of-order inputs are reinterpreted, never rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct LimitPair {
    /// The lower bound
    pub lower: f32,

    /// The upper bound
    pub upper: f32,
}

impl LimitPair {
    /// Creates a new limit pair
    #[inline]
    pub fn new(lower: f32, upper: f32) -> Self {
        Self { lower, upper }
    }

    /// Creates an unconstrained pair (lower above upper)
    #[inline]
    pub fn free() -> Self {
        Self { lower: 1.0, upper: -1.0 }
    }

    /// Creates a pair locking the axis at a value
    #[inline]
    pub fn locked_at(value: f32) -> Self {
        Self { lower: value, upper: value }
    }

    /// Interprets the pair under the sentinel policy
    pub fn mode(&self) -> AxisMode {
        if self.lower > self.upper {
            AxisMode::Free
        } else if self.lower == self.upper {
            AxisMode::Locked
        } else {
            AxisMode::Bounded
        }
    }

    /// Returns whether a value satisfies the limit
    pub fn contains(&self, value: f32) -> bool {
        match self.mode() {
            AxisMode::Free => true,
            AxisMode::Locked => value == self.lower,
            AxisMode::Bounded => value >= self.lower && value <= self.upper,
        }
    }

    /// Clamps a value into the limit range; a free axis passes values through
    pub fn clamp(&self, value: f32) -> f32 {
        match self.mode() {
            AxisMode::Free => value,
            AxisMode::Locked => self.lower,
            AxisMode::Bounded => value.clamp(self.lower, self.upper),
        }
    }
}

/// Spherical link bounds: cone deviation from rest plus twist about the axis.
///
/// Each bound is a non-negative angle in radians; a negative value disables
/// that bound.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct ConeTwistLimits {
    /// Maximum deviation from the rest orientation (radians)
    pub cone: f32,

    /// Maximum rotation about the link axis (radians)
    pub twist: f32,
}

impl ConeTwistLimits {
    /// Creates new cone/twist limits
    #[inline]
    pub fn new(cone: f32, twist: f32) -> Self {
        Self { cone, twist }
    }

    /// Creates limits with both bounds disabled
    #[inline]
    pub fn disabled() -> Self {
        Self { cone: -1.0, twist: -1.0 }
    }

    /// Returns whether the cone bound is active
    #[inline]
    pub fn cone_enabled(&self) -> bool {
        self.cone >= 0.0
    }

    /// Returns whether the twist bound is active
    #[inline]
    pub fn twist_enabled(&self) -> bool {
        self.twist >= 0.0
    }
}

impl Default for ConeTwistLimits {
    fn default() -> Self {
        Self::disabled()
    }
}
