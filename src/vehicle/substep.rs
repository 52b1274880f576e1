use crate::bodies::RigidBody;
use crate::core::{BodyHandle, BodyStorage};
use crate::math::{Vector3, EPSILON};
use crate::Result;

/// Splits a vehicle step into fixed substeps while keeping gravity's total
/// effect on the chassis unchanged.
///
/// The chassis's own gravity is reduced to a negligible downward residual
/// (never zero, so it keeps participating in contact activation) and the
/// cached full gravity is re-applied as a central impulse each substep. Over
/// any step the summed impulses equal exactly one full-gravity step,
/// independent of the substep count.
#[derive(Debug, Clone)]
pub struct SubstepIntegrator {
    substep_count: u32,
    cached_gravity: Option<Vector3>,
    up_axis: usize,
}

impl SubstepIntegrator {
    /// Creates an integrator with a single substep and Y up
    pub fn new() -> Self {
        Self {
            substep_count: 1,
            cached_gravity: None,
            up_axis: 1,
        }
    }

    /// Returns the number of substeps per step
    pub fn get_substep_count(&self) -> u32 {
        self.substep_count
    }

    /// Sets the number of substeps per step; values below 1 are clamped to 1
    pub fn set_substep_count(&mut self, count: u32) {
        self.substep_count = count.max(1);
    }

    /// Returns the world up axis index (0 = x, 1 = y, 2 = z)
    pub fn get_up_axis(&self) -> usize {
        self.up_axis
    }

    /// Sets the world up axis index; out-of-range values are clamped to z
    pub fn set_up_axis(&mut self, axis: usize) {
        self.up_axis = axis.min(2);
    }

    /// Returns the gravity last sampled from the chassis, if any step has
    /// sampled one
    pub fn get_cached_gravity(&self) -> Option<Vector3> {
        self.cached_gravity
    }

    /// Advances the chassis through `substep_count` substeps of `dt`,
    /// invoking `inner` after each gravity impulse to run the per-substep
    /// vehicle update.
    pub fn step<F>(
        &mut self,
        chassis: BodyHandle,
        bodies: &mut BodyStorage<RigidBody>,
        dt: f32,
        mut inner: F,
    ) -> Result<()>
    where
        F: FnMut(&mut BodyStorage<RigidBody>, f32) -> Result<()>,
    {
        self.capture_gravity(chassis, bodies)?;

        let substeps = self.substep_count.max(1);
        let sub_dt = dt / substeps as f32;

        let impulse = {
            let body = bodies.get_body(chassis)?;
            let inv_mass = body.get_inverse_mass();
            match self.cached_gravity {
                Some(gravity) if inv_mass > 0.0 => gravity * (sub_dt / inv_mass),
                _ => Vector3::zero(),
            }
        };

        for _ in 0..substeps {
            if !impulse.is_zero() {
                bodies.get_body_mut(chassis)?.apply_central_impulse(impulse);
            }
            inner(bodies, sub_dt)?;
        }
        Ok(())
    }

    /// Re-samples the chassis gravity and swaps in the residual.
    ///
    /// Runs every step so caller-side gravity transitions (disable, rescale)
    /// take effect on the next step rather than persisting a stale cache.
    /// A chassis already carrying the residual matches neither branch and
    /// keeps the existing cache.
    fn capture_gravity(
        &mut self,
        chassis: BodyHandle,
        bodies: &mut BodyStorage<RigidBody>,
    ) -> Result<()> {
        let gravity = bodies.get_body(chassis)?.get_gravity();
        if gravity[self.up_axis] < -EPSILON {
            self.cached_gravity = Some(gravity);
            let mut residual = Vector3::zero();
            residual[self.up_axis] = -EPSILON;
            bodies.get_body_mut(chassis)?.set_gravity(residual);
        } else if gravity[self.up_axis] == 0.0 {
            self.cached_gravity = Some(Vector3::zero());
        }
        Ok(())
    }
}

impl Default for SubstepIntegrator {
    fn default() -> Self {
        Self::new()
    }
}
