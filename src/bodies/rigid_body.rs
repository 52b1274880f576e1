use crate::bodies::{ForceType, RigidBodyType};
use crate::math::{Matrix3, Quaternion, Transform, Vector3};

/// Default gravitational acceleration, world Y up
const DEFAULT_GRAVITY: Vector3 = Vector3 { x: 0.0, y: -9.81, z: 0.0 };

/// A rigid body participating in links and vehicles.
///
/// This is the minimal collaborator surface the link and vehicle layer needs:
/// world transform, mass properties, a per-body gravity vector, and
/// force/impulse application. Shape-derived mass properties are out of scope;
/// mass and inertia are supplied directly.
pub struct RigidBody {
    /// The body's transform in world space
    transform: Transform,

    /// The body's linear velocity
    linear_velocity: Vector3,

    /// The body's angular velocity
    angular_velocity: Vector3,

    /// The body's type (dynamic, kinematic, or static)
    body_type: RigidBodyType,

    /// The body's mass
    mass: f32,

    /// Inverse of the body's mass (for efficiency)
    inv_mass: f32,

    /// The body's inertia tensor in local space
    inertia_tensor: Matrix3,

    /// Inverse of the body's inertia tensor in local space
    inv_inertia_tensor: Matrix3,

    /// Inverse of the body's inertia tensor in world space
    inv_inertia_tensor_world: Matrix3,

    /// Gravitational acceleration applied to this body each step
    gravity: Vector3,

    /// Forces to be applied in the next integration step
    forces: Vec<ForceType>,
}

impl RigidBody {
    /// Creates a new rigid body with the given mass and transform
    pub fn new(mass: f32, transform: Transform, body_type: RigidBodyType) -> Self {
        let mut body = Self {
            transform,
            linear_velocity: Vector3::zero(),
            angular_velocity: Vector3::zero(),
            body_type,
            mass: 1.0,
            inv_mass: 1.0,
            inertia_tensor: Matrix3::identity(),
            inv_inertia_tensor: Matrix3::identity(),
            inv_inertia_tensor_world: Matrix3::identity(),
            gravity: DEFAULT_GRAVITY,
            forces: Vec::new(),
        };

        body.set_mass(mass);
        body
    }

    /// Creates a new dynamic rigid body with the given mass and position
    pub fn new_dynamic(mass: f32, position: Vector3) -> Self {
        Self::new(mass, Transform::from_position(position), RigidBodyType::Dynamic)
    }

    /// Creates a new static rigid body at the given position
    pub fn new_static(position: Vector3) -> Self {
        Self::new(0.0, Transform::from_position(position), RigidBodyType::Static)
    }

    /// Returns the body's transform
    pub fn get_transform(&self) -> Transform {
        self.transform
    }

    /// Sets the body's transform
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
        self.update_inertia_tensor_world();
    }

    /// Returns the body's position
    pub fn get_position(&self) -> Vector3 {
        self.transform.position
    }

    /// Sets the body's position
    pub fn set_position(&mut self, position: Vector3) {
        self.transform.position = position;
    }

    /// Returns the body's rotation as a quaternion
    pub fn get_rotation(&self) -> Quaternion {
        self.transform.rotation
    }

    /// Sets the body's rotation as a quaternion
    pub fn set_rotation(&mut self, rotation: Quaternion) {
        self.transform.rotation = rotation;
        self.update_inertia_tensor_world();
    }

    /// Maps a body-local point into world space
    pub fn local_to_world(&self, point: Vector3) -> Vector3 {
        self.transform.transform_point(point)
    }

    /// Maps a body-local direction into world space
    pub fn local_to_world_direction(&self, direction: Vector3) -> Vector3 {
        self.transform.transform_direction(direction)
    }

    /// Returns the body's linear velocity
    pub fn get_linear_velocity(&self) -> Vector3 {
        self.linear_velocity
    }

    /// Sets the body's linear velocity
    pub fn set_linear_velocity(&mut self, velocity: Vector3) {
        self.linear_velocity = velocity;
    }

    /// Returns the body's angular velocity
    pub fn get_angular_velocity(&self) -> Vector3 {
        self.angular_velocity
    }

    /// Sets the body's angular velocity
    pub fn set_angular_velocity(&mut self, velocity: Vector3) {
        self.angular_velocity = velocity;
    }

    /// Returns the body's mass
    pub fn get_mass(&self) -> f32 {
        self.mass
    }

    /// Sets the body's mass, inverse mass, and a default inertia tensor
    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass;

        if self.body_type == RigidBodyType::Dynamic && mass > 0.0 {
            self.inv_mass = 1.0 / mass;
            self.set_inertia_tensor(Matrix3::from_diagonal(Vector3::one() * mass));
        } else {
            self.inv_mass = 0.0;
            self.inertia_tensor = Matrix3::zero();
            self.inv_inertia_tensor = Matrix3::zero();
            self.inv_inertia_tensor_world = Matrix3::zero();
        }
    }

    /// Returns the body's inverse mass
    pub fn get_inverse_mass(&self) -> f32 {
        self.inv_mass
    }

    /// Returns the body's inertia tensor in local space
    pub fn get_inertia_tensor(&self) -> &Matrix3 {
        &self.inertia_tensor
    }

    /// Sets the body's inertia tensor in local space
    pub fn set_inertia_tensor(&mut self, tensor: Matrix3) {
        self.inertia_tensor = tensor;

        if self.body_type == RigidBodyType::Dynamic {
            if let Some(inv) = tensor.inverse() {
                self.inv_inertia_tensor = inv;
                self.update_inertia_tensor_world();
            }
        } else {
            self.inv_inertia_tensor = Matrix3::zero();
            self.inv_inertia_tensor_world = Matrix3::zero();
        }
    }

    /// Returns the body's inverse inertia tensor in world space
    pub fn get_inverse_inertia_tensor_world(&self) -> &Matrix3 {
        &self.inv_inertia_tensor_world
    }

    /// Returns the body type
    pub fn get_body_type(&self) -> RigidBodyType {
        self.body_type
    }

    /// Returns the gravitational acceleration acting on this body
    pub fn get_gravity(&self) -> Vector3 {
        self.gravity
    }

    /// Sets the gravitational acceleration acting on this body
    pub fn set_gravity(&mut self, gravity: Vector3) {
        self.gravity = gravity;
    }

    /// Applies a force at the center of mass
    pub fn apply_force(&mut self, force: Vector3) {
        if self.body_type == RigidBodyType::Dynamic {
            self.forces.push(ForceType::Force(force));
        }
    }

    /// Applies a force at a specific world-space point
    pub fn apply_force_at_point(&mut self, force: Vector3, point: Vector3) {
        if self.body_type == RigidBodyType::Dynamic {
            self.forces.push(ForceType::ForceAtPoint { force, point });
        }
    }

    /// Applies a torque to the body
    pub fn apply_torque(&mut self, torque: Vector3) {
        if self.body_type == RigidBodyType::Dynamic {
            self.forces.push(ForceType::Torque(torque));
        }
    }

    /// Applies an impulse at the center of mass, changing velocity immediately
    pub fn apply_central_impulse(&mut self, impulse: Vector3) {
        if self.body_type == RigidBodyType::Dynamic {
            self.linear_velocity += impulse * self.inv_mass;
        }
    }

    /// Applies an angular impulse, changing angular velocity immediately
    pub fn apply_angular_impulse(&mut self, impulse: Vector3) {
        if self.body_type == RigidBodyType::Dynamic {
            self.angular_velocity += self.inv_inertia_tensor_world.multiply_vector(impulse);
        }
    }

    /// Returns the net force currently accumulated at the center of mass
    pub fn get_accumulated_force(&self) -> Vector3 {
        let mut total = Vector3::zero();
        for force in &self.forces {
            match force {
                ForceType::Force(f) => total += *f,
                ForceType::ForceAtPoint { force, .. } => total += *force,
                ForceType::Torque(_) => {}
            }
        }
        total
    }

    /// Returns the net torque currently accumulated about the center of mass
    pub fn get_accumulated_torque(&self) -> Vector3 {
        let mut total = Vector3::zero();
        for force in &self.forces {
            match force {
                ForceType::Force(_) => {}
                ForceType::ForceAtPoint { force, point } => {
                    let r = *point - self.transform.position;
                    total += r.cross(force);
                }
                ForceType::Torque(torque) => total += *torque,
            }
        }
        total
    }

    /// Discards accumulated forces without integrating them
    pub fn clear_forces(&mut self) {
        self.forces.clear();
    }

    /// Integrates gravity and accumulated forces into velocities, then
    /// velocities into the pose, over one timestep
    pub fn integrate(&mut self, dt: f32) {
        if self.body_type != RigidBodyType::Dynamic {
            self.forces.clear();
            return;
        }

        self.linear_velocity += self.gravity * dt;

        for force in &self.forces {
            match force {
                ForceType::Force(force) => {
                    self.linear_velocity += *force * self.inv_mass * dt;
                }
                ForceType::ForceAtPoint { force, point } => {
                    self.linear_velocity += *force * self.inv_mass * dt;

                    let r = *point - self.transform.position;
                    let torque = r.cross(force);
                    let angular_acceleration =
                        self.inv_inertia_tensor_world.multiply_vector(torque);
                    self.angular_velocity += angular_acceleration * dt;
                }
                ForceType::Torque(torque) => {
                    let angular_acceleration =
                        self.inv_inertia_tensor_world.multiply_vector(*torque);
                    self.angular_velocity += angular_acceleration * dt;
                }
            }
        }
        self.forces.clear();

        self.transform.position += self.linear_velocity * dt;

        if !self.angular_velocity.is_zero() {
            let angle = self.angular_velocity.length() * dt;
            let axis = self.angular_velocity.normalize();

            let rotation = Quaternion::from_axis_angle(axis, angle);
            self.transform.rotation = (rotation * self.transform.rotation).normalize();
            self.update_inertia_tensor_world();
        }
    }

    /// Updates the inverse inertia tensor in world space
    fn update_inertia_tensor_world(&mut self) {
        if self.body_type != RigidBodyType::Dynamic {
            self.inv_inertia_tensor_world = Matrix3::zero();
            return;
        }

        // R * inv_I * R^T
        let rotation_matrix = self.transform.rotation.to_rotation_matrix();
        let rotation_transpose = rotation_matrix.transpose();
        let temp = rotation_matrix.multiply_matrix(&self.inv_inertia_tensor);
        self.inv_inertia_tensor_world = temp.multiply_matrix(&rotation_transpose);
    }
}
