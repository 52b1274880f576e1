use crate::math::{Matrix3, Matrix4, Quaternion, Vector3};
use bitflags::bitflags;

bitflags! {
    /// Roles a wheel plays on its vehicle
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct WheelFlags: u32 {
        /// Steering input rotates this wheel about the suspension axis
        const STEERABLE = 1 << 0;
        /// Engine force drives this wheel
        const DRIVEN = 1 << 1;
        /// Brake force acts on this wheel
        const BRAKING = 1 << 2;
    }
}

impl Default for WheelFlags {
    fn default() -> Self {
        WheelFlags::empty()
    }
}

/// Static description of a wheel, given in the chassis's local space
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct WheelInfo {
    /// Suspension attachment point on the chassis
    pub connection_point: Vector3,

    /// Suspension travel direction, typically pointing down
    pub direction: Vector3,

    /// Axle direction the wheel spins about
    pub axle: Vector3,

    /// Suspension length with no load
    pub suspension_rest_length: f32,

    /// Spring stiffness of the suspension
    pub suspension_stiffness: f32,

    /// Damping applied to suspension compression velocity
    pub suspension_damping: f32,

    /// Maximum compression distance from rest
    pub suspension_travel: f32,

    /// Wheel radius
    pub radius: f32,

    /// Tire friction coefficient used for lateral grip
    pub friction_slip: f32,

    #[cfg_attr(feature = "serialize", serde(skip))]
    pub flags: WheelFlags,
}

impl Default for WheelInfo {
    fn default() -> Self {
        Self {
            connection_point: Vector3::zero(),
            direction: Vector3::new(0.0, -1.0, 0.0),
            axle: Vector3::new(1.0, 0.0, 0.0),
            suspension_rest_length: 0.6,
            suspension_stiffness: 20.0,
            suspension_damping: 2.3,
            suspension_travel: 0.5,
            radius: 0.5,
            friction_slip: 10.5,
            flags: WheelFlags::empty(),
        }
    }
}

/// Runtime state of a single wheel
#[derive(Debug, Clone)]
pub struct Wheel {
    index: usize,
    info: WheelInfo,
    steering: f32,
    engine_force: f32,
    brake_force: f32,
    suspension_length: f32,
    in_contact: bool,
    contact_point: Vector3,
    contact_normal: Vector3,
    spin: f32,
    location: Matrix4,
}

impl Wheel {
    pub(crate) fn new(index: usize) -> Self {
        Self {
            index,
            info: WheelInfo::default(),
            steering: 0.0,
            engine_force: 0.0,
            brake_force: 0.0,
            suspension_length: 0.0,
            in_contact: false,
            contact_point: Vector3::zero(),
            contact_normal: Vector3::unit_y(),
            spin: 0.0,
            location: Matrix4::identity(),
        }
    }

    /// Configures the wheel from its static description
    pub fn init(&mut self, info: WheelInfo) {
        self.suspension_length = info.suspension_rest_length;
        self.info = info;
    }

    /// Returns the wheel's index on its vehicle
    pub fn get_index(&self) -> usize {
        self.index
    }

    /// Returns the static wheel description
    pub fn get_info(&self) -> &WheelInfo {
        &self.info
    }

    /// Returns the current steering angle in radians
    pub fn get_steering(&self) -> f32 {
        self.steering
    }

    pub(crate) fn set_steering(&mut self, steering: f32) {
        self.steering = steering;
    }

    /// Returns the engine force currently driving this wheel
    pub fn get_engine_force(&self) -> f32 {
        self.engine_force
    }

    pub(crate) fn set_engine_force(&mut self, force: f32) {
        self.engine_force = force;
    }

    /// Returns the brake force currently acting on this wheel
    pub fn get_brake_force(&self) -> f32 {
        self.brake_force
    }

    pub(crate) fn set_brake_force(&mut self, force: f32) {
        self.brake_force = force;
    }

    /// Returns the current suspension length from chassis to contact
    pub fn get_suspension_length(&self) -> f32 {
        self.suspension_length
    }

    /// Returns whether the last ray cast hit the ground
    pub fn is_in_contact(&self) -> bool {
        self.in_contact
    }

    /// Returns the last ground contact point in world space
    pub fn get_contact_point(&self) -> Vector3 {
        self.contact_point
    }

    /// Returns the last ground contact normal in world space
    pub fn get_contact_normal(&self) -> Vector3 {
        self.contact_normal
    }

    pub(crate) fn set_contact(&mut self, point: Vector3, normal: Vector3, length: f32) {
        self.in_contact = true;
        self.contact_point = point;
        self.contact_normal = normal;
        self.suspension_length = length;
    }

    pub(crate) fn clear_contact(&mut self) {
        self.in_contact = false;
        self.suspension_length = self.info.suspension_rest_length;
    }

    /// Returns the accumulated spin angle about the axle, in radians
    pub fn get_spin(&self) -> f32 {
        self.spin
    }

    pub(crate) fn advance_spin(&mut self, delta: f32) {
        self.spin += delta;
    }

    /// Returns the wheel's world transform as of the last vehicle update
    pub fn get_location_matrix(&self) -> Matrix4 {
        self.location
    }

    /// Recomputes the wheel's world transform from the chassis pose, the
    /// current suspension length, steering and spin
    pub(crate) fn update_location(&mut self, chassis_rotation: Quaternion, chassis: &Matrix4) {
        let hub_local =
            self.info.connection_point + self.info.direction * self.suspension_length;
        let hub_world = chassis.multiply_point(hub_local);

        let steer = Quaternion::from_axis_angle(-self.info.direction, self.steering);
        let roll = Quaternion::from_axis_angle(self.info.axle, self.spin);
        let rotation: Matrix3 = (chassis_rotation * steer * roll).to_rotation_matrix();
        self.location = Matrix4::from_rotation_translation(rotation, hub_world);
    }
}
