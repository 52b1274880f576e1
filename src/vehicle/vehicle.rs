use crate::bodies::RigidBody;
use crate::core::{BodyHandle, BodyStorage};
use crate::error::PhysicsError;
use crate::math::{Quaternion, Ray, Vector3};
use crate::vehicle::{SubstepIntegrator, VehicleRaycaster, Wheel, WheelFlags, WheelInfo};
use crate::Result;

/// Vehicle-wide driving parameters
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleTuning {
    /// Steering angle in radians at full steering input
    pub max_steering_angle: f32,

    /// Engine force at full acceleration input
    pub motor_force: f32,

    /// Brake force applied while braking
    pub brake_force: f32,
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self {
            max_steering_angle: 0.3,
            motor_force: 1000.0,
            brake_force: 100.0,
        }
    }
}

/// A raycast vehicle: a rigid chassis carried on ray-cast wheel suspensions.
///
/// Wheels are added while the vehicle is under construction; [`finalize`]
/// freezes the wheel set and unlocks the driving interface. Driving a
/// vehicle that has not been finalized, or adding wheels after it has, is an
/// illegal-state error.
///
/// [`finalize`]: Vehicle::finalize
pub struct Vehicle {
    chassis: BodyHandle,
    wheels: Vec<Wheel>,
    finalized: bool,
    integrator: SubstepIntegrator,
    tuning: VehicleTuning,
    steering: f32,
    engine_force: f32,
    brake_force: f32,
}

impl Vehicle {
    /// Creates an empty vehicle riding on the given chassis body, with the
    /// given motor and brake force ceilings
    pub fn new(chassis: BodyHandle, motor_force: f32, brake_force: f32) -> Self {
        Self::with_tuning(
            chassis,
            VehicleTuning {
                motor_force,
                brake_force,
                ..VehicleTuning::default()
            },
        )
    }

    /// Creates an empty vehicle with explicit tuning
    pub fn with_tuning(chassis: BodyHandle, tuning: VehicleTuning) -> Self {
        Self {
            chassis,
            wheels: Vec::new(),
            finalized: false,
            integrator: SubstepIntegrator::new(),
            tuning,
            steering: 0.0,
            engine_force: 0.0,
            brake_force: 0.0,
        }
    }

    /// Returns the chassis body handle
    pub fn get_chassis(&self) -> BodyHandle {
        self.chassis
    }

    /// Returns the vehicle tuning
    pub fn get_tuning(&self) -> VehicleTuning {
        self.tuning
    }

    /// Returns the number of wheels
    pub fn num_wheels(&self) -> usize {
        self.wheels.len()
    }

    /// Returns whether [`finalize`](Vehicle::finalize) has been called
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Adds a wheel and returns its index. Only valid before finalization.
    pub fn add_wheel(&mut self, info: WheelInfo) -> Result<usize> {
        if self.finalized {
            return Err(PhysicsError::IllegalState(
                "cannot add a wheel to a finalized vehicle".to_string(),
            ));
        }
        let index = self.wheels.len();
        let mut wheel = Wheel::new(index);
        wheel.init(info);
        self.wheels.push(wheel);
        Ok(index)
    }

    /// Freezes the wheel set and unlocks driving. One-way; calling it twice
    /// is an error.
    pub fn finalize(&mut self) -> Result<()> {
        if self.finalized {
            return Err(PhysicsError::IllegalState(
                "vehicle is already finalized".to_string(),
            ));
        }
        self.finalized = true;
        Ok(())
    }

    /// Returns a wheel by index
    pub fn wheel(&self, index: usize) -> Result<&Wheel> {
        self.wheels.get(index).ok_or_else(|| {
            PhysicsError::ResourceNotFound(format!("no wheel at index {}", index))
        })
    }

    /// Returns a wheel by index, mutably
    pub fn wheel_mut(&mut self, index: usize) -> Result<&mut Wheel> {
        self.wheels.get_mut(index).ok_or_else(|| {
            PhysicsError::ResourceNotFound(format!("no wheel at index {}", index))
        })
    }

    /// Returns the last commanded steering angle in radians
    pub fn get_steering(&self) -> f32 {
        self.steering
    }

    /// Returns the last commanded engine force
    pub fn get_engine_force(&self) -> f32 {
        self.engine_force
    }

    /// Returns the last commanded brake force
    pub fn get_brake_force(&self) -> f32 {
        self.brake_force
    }

    /// Sets the number of substeps each update is split into
    pub fn set_substep_count(&mut self, count: u32) {
        self.integrator.set_substep_count(count);
    }

    /// Returns the number of substeps each update is split into
    pub fn get_substep_count(&self) -> u32 {
        self.integrator.get_substep_count()
    }

    /// Drives the vehicle with normalized inputs.
    ///
    /// `steering` and `acceleration` are clamped into `[-1, 1]` and scaled by
    /// the tuning; `brakes` applies the tuned brake force to braking wheels.
    pub fn control(&mut self, steering: f32, acceleration: f32, brakes: bool) -> Result<()> {
        let steering = steering.clamp(-1.0, 1.0);
        let acceleration = acceleration.clamp(-1.0, 1.0);
        self.force_control(
            steering * self.tuning.max_steering_angle,
            acceleration * self.tuning.motor_force,
            if brakes { self.tuning.brake_force } else { 0.0 },
        )
    }

    /// Drives the vehicle with raw values: a steering angle in radians, an
    /// engine force and a brake force. Each value is routed to the wheels
    /// whose flags accept it.
    pub fn force_control(
        &mut self,
        steering_angle: f32,
        engine_force: f32,
        brake_force: f32,
    ) -> Result<()> {
        if !self.finalized {
            return Err(PhysicsError::IllegalState(
                "cannot drive a vehicle before it is finalized".to_string(),
            ));
        }
        self.steering = steering_angle;
        self.engine_force = engine_force;
        self.brake_force = brake_force;
        for wheel in &mut self.wheels {
            let flags = wheel.get_info().flags;
            wheel.set_steering(if flags.contains(WheelFlags::STEERABLE) {
                steering_angle
            } else {
                0.0
            });
            wheel.set_engine_force(if flags.contains(WheelFlags::DRIVEN) {
                engine_force
            } else {
                0.0
            });
            wheel.set_brake_force(if flags.contains(WheelFlags::BRAKING) {
                brake_force
            } else {
                0.0
            });
        }
        Ok(())
    }

    /// Advances the vehicle by `dt`, splitting the step into substeps so the
    /// chassis sees gravity and wheel forces at the same cadence
    pub fn update(
        &mut self,
        bodies: &mut BodyStorage<RigidBody>,
        raycaster: &dyn VehicleRaycaster,
        dt: f32,
    ) -> Result<()> {
        if !self.finalized {
            return Err(PhysicsError::IllegalState(
                "cannot update a vehicle before it is finalized".to_string(),
            ));
        }
        let chassis = self.chassis;
        let wheels = &mut self.wheels;
        self.integrator.step(chassis, bodies, dt, |bodies, sub_dt| {
            step_wheels(chassis, wheels, raycaster, bodies, sub_dt)?;
            bodies.get_body_mut(chassis)?.integrate(sub_dt);
            Ok(())
        })
    }
}

/// One suspension/traction pass over every wheel.
///
/// Each wheel casts a ray down its suspension axis; wheels in contact push
/// the chassis with a clamped spring-damper force plus engine, brake and
/// lateral tire forces in the steered wheel basis, all applied at the
/// contact point.
fn step_wheels(
    chassis: BodyHandle,
    wheels: &mut [Wheel],
    raycaster: &dyn VehicleRaycaster,
    bodies: &mut BodyStorage<RigidBody>,
    dt: f32,
) -> Result<()> {
    let (chassis_matrix, chassis_rotation, chassis_position) = {
        let body = bodies.get_body(chassis)?;
        let transform = body.get_transform();
        (transform.to_matrix(), transform.rotation, transform.position)
    };

    for wheel in wheels.iter_mut() {
        let info = *wheel.get_info();
        let hard_point = chassis_matrix.multiply_point(info.connection_point);
        let direction = chassis_matrix
            .multiply_direction(info.direction)
            .normalize();
        let max_distance = info.suspension_rest_length + info.radius;

        let ray = Ray::new(hard_point, direction);
        let hit = raycaster.cast(&ray, max_distance);

        let Some(hit) = hit else {
            wheel.clear_contact();
            wheel.update_location(chassis_rotation, &chassis_matrix);
            continue;
        };

        let min_length = info.suspension_rest_length - info.suspension_travel;
        let suspension_length =
            (hit.distance - info.radius).clamp(min_length, info.suspension_rest_length);
        let compression = info.suspension_rest_length - suspension_length;
        wheel.set_contact(hit.position, hit.normal, suspension_length);

        let (point_velocity, forward, lateral) = {
            let body = bodies.get_body(chassis)?;
            let r = hit.position - chassis_position;
            let point_velocity =
                body.get_linear_velocity() + body.get_angular_velocity().cross(&r);

            // Steered wheel basis projected onto the contact plane
            let steer = Quaternion::from_axis_angle(-info.direction, wheel.get_steering());
            let axle_world = chassis_matrix
                .multiply_direction(steer.rotate_vector(info.axle))
                .normalize();
            let forward = project_on_plane(direction.cross(&axle_world), hit.normal);
            let lateral = project_on_plane(axle_world, hit.normal);
            (point_velocity, forward, lateral)
        };

        // Spring resists compression, damper resists compression rate
        let compression_rate = point_velocity.dot(&direction);
        let suspension_force = (info.suspension_stiffness * compression
            + info.suspension_damping * compression_rate)
            .max(0.0);

        let forward_speed = point_velocity.dot(&forward);
        let lateral_speed = point_velocity.dot(&lateral);

        let mut force = hit.normal * suspension_force;
        force += forward * wheel.get_engine_force();
        if wheel.get_brake_force() > 0.0 && forward_speed.abs() > crate::math::EPSILON {
            force += forward * (-forward_speed.signum() * wheel.get_brake_force());
        }
        force += lateral * (-lateral_speed * info.friction_slip);

        bodies
            .get_body_mut(chassis)?
            .apply_force_at_point(force, hit.position);

        if info.radius > 0.0 {
            wheel.advance_spin(forward_speed / info.radius * dt);
        }
        wheel.update_location(chassis_rotation, &chassis_matrix);
    }
    Ok(())
}

fn project_on_plane(v: Vector3, normal: Vector3) -> Vector3 {
    let projected = v - normal * v.dot(&normal);
    if projected.is_zero() {
        Vector3::zero()
    } else {
        projected.normalize()
    }
}
