/// The motion type of a rigid body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RigidBodyType {
    /// Body is fully simulated and responds to impulses and gravity
    Dynamic,

    /// Body is moved externally and has infinite mass
    Kinematic,

    /// Body never moves
    Static,
}
