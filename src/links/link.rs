use crate::bodies::RigidBody;
use crate::core::{BodyHandle, BodyStorage};
use crate::error::PhysicsError;
use crate::links::{ConeTwistLimits, LimitPair, LinkFeedback, SpringDescriptor};
use crate::math::{wrap_angle, Matrix3, Matrix4, Quaternion, Transform, Vector3};
use crate::Result;
use std::fmt;

/// The kind of constraint a link imposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkType {
    /// Ball-and-socket: 3 rotational degrees of freedom
    Spherical,

    /// Hinge: 1 rotational degree of freedom about an axis
    Revolute,

    /// Hinge with a spring pulling toward a target angle
    RevoluteSpring,

    /// Slider: 1 translational degree of freedom along an axis
    Prismatic,

    /// Up to 3 translational and 3 rotational degrees of freedom
    Generic,

    /// Weld: no relative motion
    Rigid,
}

impl LinkType {
    /// All link types, in declaration order
    pub const ALL: [LinkType; 6] = [
        LinkType::Spherical,
        LinkType::Revolute,
        LinkType::RevoluteSpring,
        LinkType::Prismatic,
        LinkType::Generic,
        LinkType::Rigid,
    ];

    /// Returns a short name for the type
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::Spherical => "spherical",
            LinkType::Revolute => "revolute",
            LinkType::RevoluteSpring => "revolute-spring",
            LinkType::Prismatic => "prismatic",
            LinkType::Generic => "generic",
            LinkType::Rigid => "rigid",
        }
    }

    /// Returns whether the type is a hinge variant
    pub fn is_revolute(&self) -> bool {
        matches!(self, LinkType::Revolute | LinkType::RevoluteSpring)
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Axis-and-frame bookkeeping for hinge and slider links.
///
/// Derived once at init time from the world anchor and axis; world-space
/// quantities are always re-derived from the parent's current transform.
#[derive(Debug, Clone, Copy)]
pub struct HingeFrame {
    /// Anchor in the parent's local space
    pub pivot_parent: Vector3,

    /// Axis in the parent's local space
    pub axis_parent: Vector3,

    /// Anchor in the child's local space
    pub pivot_child: Vector3,

    /// Axis in the child's local space
    pub axis_child: Vector3,

    /// Transforms joint coordinates to parent coordinates (joint Z = axis)
    pub frame_a: Matrix4,

    /// Transforms joint coordinates to child coordinates (joint Z = axis)
    pub frame_b: Matrix4,

    /// Relative orientation of child with respect to parent at init time
    pub initial_rotation: Quaternion,
}

/// Explicit joint frames for generic links
#[derive(Debug, Clone, Copy)]
pub struct FramePair {
    /// Transforms joint coordinates to parent coordinates
    pub frame_a: Matrix4,

    /// Transforms joint coordinates to child coordinates
    pub frame_b: Matrix4,
}

/// Independent per-axis limits for a generic link
#[derive(Debug, Clone, Copy)]
pub struct GenericLimits {
    /// Linear limits for the x, y and z axes
    pub linear: [LimitPair; 3],

    /// Angular limits about the x, y and z axes
    pub angular: [LimitPair; 3],
}

impl GenericLimits {
    /// Creates limits with every axis unconstrained
    pub fn free() -> Self {
        Self {
            linear: [LimitPair::free(); 3],
            angular: [LimitPair::free(); 3],
        }
    }

    /// Creates limits from per-axis lower/upper vectors
    pub fn from_vectors(
        linear_lower: Vector3,
        linear_upper: Vector3,
        angular_lower: Vector3,
        angular_upper: Vector3,
    ) -> Self {
        Self {
            linear: [
                LimitPair::new(linear_lower.x, linear_upper.x),
                LimitPair::new(linear_lower.y, linear_upper.y),
                LimitPair::new(linear_lower.z, linear_upper.z),
            ],
            angular: [
                LimitPair::new(angular_lower.x, angular_upper.x),
                LimitPair::new(angular_lower.y, angular_upper.y),
                LimitPair::new(angular_lower.z, angular_upper.z),
            ],
        }
    }
}

/// A pairwise constraint between two rigid bodies.
///
/// One entity covers every link type: a type tag selects which capability
/// records are present (limits, spring, feedback, frames), so overlapping
/// capability sets need no inheritance. Coordinates are world space unless
/// noted otherwise.
///
/// Every link must be bound to its bodies exactly once through one of the
/// `init` variants before any other operation; re-initialization is an
/// illegal-state error.
pub struct Link {
    link_type: LinkType,
    parent: Option<BodyHandle>,
    child: Option<BodyHandle>,
    anchor: Vector3,
    hinge: Option<HingeFrame>,
    frames: Option<FramePair>,
    angular_limit: Option<LimitPair>,
    linear_limit: Option<LimitPair>,
    generic_limits: Option<GenericLimits>,
    cone_twist: Option<ConeTwistLimits>,
    spring: Option<SpringDescriptor>,
    feedback: Option<LinkFeedback>,
}

impl Link {
    /// Creates an unbound link with the capability records its type calls for
    pub fn new(link_type: LinkType) -> Self {
        let mut link = Self {
            link_type,
            parent: None,
            child: None,
            anchor: Vector3::zero(),
            hinge: None,
            frames: None,
            angular_limit: None,
            linear_limit: None,
            generic_limits: None,
            cone_twist: None,
            spring: None,
            feedback: None,
        };

        match link_type {
            LinkType::Spherical => {
                link.cone_twist = Some(ConeTwistLimits::disabled());
            }
            LinkType::Revolute => {
                link.angular_limit = Some(LimitPair::free());
            }
            LinkType::RevoluteSpring => {
                link.angular_limit = Some(LimitPair::free());
                link.spring = Some(SpringDescriptor::default());
            }
            LinkType::Prismatic => {
                link.linear_limit = Some(LimitPair::free());
            }
            LinkType::Generic => {
                link.generic_limits = Some(GenericLimits::free());
            }
            LinkType::Rigid => {}
        }

        link
    }

    /// Attaches a feedback sensor; used by backend constructors that support
    /// reaction sensing for this type
    pub fn with_feedback(mut self) -> Self {
        self.feedback = Some(LinkFeedback::new());
        self
    }

    /// Returns the link's type tag
    pub fn get_link_type(&self) -> LinkType {
        self.link_type
    }

    /// Returns the parent body handle, if bound
    pub fn get_parent(&self) -> Option<BodyHandle> {
        self.parent
    }

    /// Returns the child body handle, if bound
    pub fn get_child(&self) -> Option<BodyHandle> {
        self.child
    }

    /// Returns whether the link has been initialized
    pub fn is_initialized(&self) -> bool {
        self.parent.is_some()
    }

    /// Binds the link's bodies.
    ///
    /// Exists as a separate seam so init variants can share the lifecycle
    /// check without re-entering each other.
    fn set_bodies(&mut self, parent: BodyHandle, child: BodyHandle) -> Result<()> {
        if self.is_initialized() {
            return Err(PhysicsError::IllegalState(format!(
                "{} link is already initialized",
                self.link_type
            )));
        }
        if parent == child {
            return Err(PhysicsError::InvalidParameter(
                "link parent and child must be distinct bodies".to_string(),
            ));
        }
        self.parent = Some(parent);
        self.child = Some(child);
        Ok(())
    }

    /// Initializes the link at the anchor implied by current body positions
    /// (the midpoint between the two bodies).
    ///
    /// Valid for spherical and rigid links; axis-bearing types need their
    /// typed init.
    pub fn init(
        &mut self,
        bodies: &BodyStorage<RigidBody>,
        parent: BodyHandle,
        child: BodyHandle,
    ) -> Result<()> {
        self.require_type(
            &[LinkType::Spherical, LinkType::Rigid],
            "init without an anchor",
        )?;
        let pos_a = bodies.get_body(parent)?.get_position();
        let pos_b = bodies.get_body(child)?.get_position();
        self.set_bodies(parent, child)?;
        self.anchor = (pos_a + pos_b) * 0.5;
        Ok(())
    }

    /// Initializes the link at an explicit world-space anchor
    pub fn init_at(
        &mut self,
        bodies: &BodyStorage<RigidBody>,
        parent: BodyHandle,
        child: BodyHandle,
        x: f32,
        y: f32,
        z: f32,
    ) -> Result<()> {
        self.require_type(&[LinkType::Spherical, LinkType::Rigid], "init at anchor")?;
        bodies.get_body(parent)?;
        bodies.get_body(child)?;
        self.set_bodies(parent, child)?;
        self.anchor = Vector3::new(x, y, z);
        Ok(())
    }

    /// Initializes a revolute link at a world anchor, rotating about a world
    /// axis (pass a unit vector)
    pub fn init_revolute(
        &mut self,
        bodies: &BodyStorage<RigidBody>,
        parent: BodyHandle,
        child: BodyHandle,
        x: f32,
        y: f32,
        z: f32,
        axis_x: f32,
        axis_y: f32,
        axis_z: f32,
    ) -> Result<()> {
        self.require_type(
            &[LinkType::Revolute, LinkType::RevoluteSpring],
            "init as revolute",
        )?;
        let anchor = Vector3::new(x, y, z);
        let axis = Vector3::new(axis_x, axis_y, axis_z);
        let hinge = build_hinge_frame(bodies, parent, child, anchor, axis)?;
        self.set_bodies(parent, child)?;
        self.anchor = anchor;
        self.hinge = Some(hinge);
        Ok(())
    }

    /// Initializes a prismatic link at a world anchor, sliding along a world
    /// axis (pass a unit vector)
    pub fn init_prismatic(
        &mut self,
        bodies: &BodyStorage<RigidBody>,
        parent: BodyHandle,
        child: BodyHandle,
        x: f32,
        y: f32,
        z: f32,
        axis_x: f32,
        axis_y: f32,
        axis_z: f32,
    ) -> Result<()> {
        self.require_type(&[LinkType::Prismatic], "init as prismatic")?;
        let anchor = Vector3::new(x, y, z);
        let axis = Vector3::new(axis_x, axis_y, axis_z);
        let hinge = build_hinge_frame(bodies, parent, child, anchor, axis)?;
        self.set_bodies(parent, child)?;
        self.anchor = anchor;
        self.hinge = Some(hinge);
        Ok(())
    }

    /// Initializes a generic link from a single pivot point, deriving both
    /// joint frames from the bodies' current world transforms and assuming
    /// zero relative joint rotation.
    ///
    /// Limits follow the sentinel policy per axis: `lower > upper` leaves an
    /// axis free, `lower == upper` locks it.
    pub fn init_generic_at_pivot(
        &mut self,
        bodies: &BodyStorage<RigidBody>,
        parent: BodyHandle,
        child: BodyHandle,
        pivot: Vector3,
        linear_lower: Vector3,
        linear_upper: Vector3,
        angular_lower: Vector3,
        angular_upper: Vector3,
    ) -> Result<()> {
        self.require_type(&[LinkType::Generic], "init as generic")?;
        let ta = bodies.get_body(parent)?.get_transform();
        let tb = bodies.get_body(child)?.get_transform();

        // Joint world frame sits at the pivot with identity rotation
        let joint_world = Matrix4::from_translation(pivot);
        let frame_a = ta.inverse().to_matrix().multiply_matrix(&joint_world);
        let frame_b = tb.inverse().to_matrix().multiply_matrix(&joint_world);

        self.init_generic_frames_bound(
            parent,
            child,
            pivot,
            frame_a,
            frame_b,
            GenericLimits::from_vectors(linear_lower, linear_upper, angular_lower, angular_upper),
        )
    }

    /// Initializes a generic link from explicit parent and child joint
    /// frames, allowing arbitrary relative orientation
    pub fn init_generic_with_frames(
        &mut self,
        bodies: &BodyStorage<RigidBody>,
        parent: BodyHandle,
        child: BodyHandle,
        frame_a: Matrix4,
        frame_b: Matrix4,
        linear_lower: Vector3,
        linear_upper: Vector3,
        angular_lower: Vector3,
        angular_upper: Vector3,
    ) -> Result<()> {
        self.require_type(&[LinkType::Generic], "init as generic")?;
        let ta = bodies.get_body(parent)?.get_transform();
        bodies.get_body(child)?;

        let anchor = ta.to_matrix().multiply_matrix(&frame_a).get_translation();
        self.init_generic_frames_bound(
            parent,
            child,
            anchor,
            frame_a,
            frame_b,
            GenericLimits::from_vectors(linear_lower, linear_upper, angular_lower, angular_upper),
        )
    }

    fn init_generic_frames_bound(
        &mut self,
        parent: BodyHandle,
        child: BodyHandle,
        anchor: Vector3,
        frame_a: Matrix4,
        frame_b: Matrix4,
        limits: GenericLimits,
    ) -> Result<()> {
        self.set_bodies(parent, child)?;
        self.anchor = anchor;
        self.frames = Some(FramePair { frame_a, frame_b });
        self.generic_limits = Some(limits);
        Ok(())
    }

    /// Returns the world-space anchor set at init time
    pub fn get_position(&self) -> Result<Vector3> {
        self.require_initialized()?;
        Ok(self.anchor)
    }

    /// Returns the joint frames, when the type carries them
    pub fn get_frames(&self) -> Result<(Matrix4, Matrix4)> {
        if let Some(frames) = &self.frames {
            return Ok((frames.frame_a, frames.frame_b));
        }
        if let Some(hinge) = &self.hinge {
            return Ok((hinge.frame_a, hinge.frame_b));
        }
        Err(PhysicsError::InvalidParameter(format!(
            "{} link carries no joint frames",
            self.link_type
        )))
    }

    /// Sets the lower/upper limit for the link's single constrained axis:
    /// angle limits for revolute variants, offset limits for prismatic.
    ///
    /// Sentinel inputs are reinterpreted per the limit policy, not rejected.
    pub fn set_limits(&mut self, lower: f32, upper: f32) -> Result<()> {
        match self.link_type {
            LinkType::Revolute | LinkType::RevoluteSpring => {
                self.angular_limit = Some(LimitPair::new(lower, upper));
                Ok(())
            }
            LinkType::Prismatic => {
                self.linear_limit = Some(LimitPair::new(lower, upper));
                Ok(())
            }
            _ => Err(PhysicsError::InvalidParameter(format!(
                "{} link has no scalar limit pair",
                self.link_type
            ))),
        }
    }

    /// Returns the link's scalar limit pair
    pub fn get_limits(&self) -> Result<LimitPair> {
        self.angular_limit.or(self.linear_limit).ok_or_else(|| {
            PhysicsError::InvalidParameter(format!(
                "{} link has no scalar limit pair",
                self.link_type
            ))
        })
    }

    /// Sets cone and twist bounds on a spherical link (radians, negative
    /// disables that bound). Fully replaces any prior limits.
    pub fn set_cone_twist_limits(&mut self, cone: f32, twist: f32) -> Result<()> {
        self.require_type(&[LinkType::Spherical], "set cone/twist limits")?;
        self.cone_twist = Some(ConeTwistLimits::new(cone, twist));
        Ok(())
    }

    /// Returns a spherical link's cone/twist limits
    pub fn get_cone_twist_limits(&self) -> Result<ConeTwistLimits> {
        self.cone_twist.ok_or_else(|| {
            PhysicsError::InvalidParameter(format!(
                "{} link has no cone/twist limits",
                self.link_type
            ))
        })
    }

    /// Returns a generic link's per-axis limits
    pub fn get_generic_limits(&self) -> Result<&GenericLimits> {
        self.generic_limits.as_ref().ok_or_else(|| {
            PhysicsError::InvalidParameter(format!(
                "{} link has no per-axis limits",
                self.link_type
            ))
        })
    }

    /// Sets the spring acting on a revolute-spring link
    pub fn set_spring(&mut self, spring: SpringDescriptor) -> Result<()> {
        self.require_type(&[LinkType::RevoluteSpring], "set a spring")?;
        self.spring = Some(spring);
        Ok(())
    }

    /// Returns the spring acting on a revolute-spring link
    pub fn get_spring(&self) -> Result<SpringDescriptor> {
        self.spring.ok_or_else(|| {
            PhysicsError::InvalidParameter(format!("{} link has no spring", self.link_type))
        })
    }

    /// Returns the feedback sensor.
    ///
    /// Fails hard when this backend/type combination computes no reaction
    /// reading, so callers cannot poll a sensor that will never update.
    pub fn get_feedback(&self) -> Result<&LinkFeedback> {
        self.feedback.as_ref().ok_or_else(|| {
            PhysicsError::IllegalState(format!(
                "{} link does not support reaction feedback",
                self.link_type
            ))
        })
    }

    /// Returns the feedback sensor mutably, for enabling sensing
    pub fn get_feedback_mut(&mut self) -> Result<&mut LinkFeedback> {
        let ty = self.link_type;
        self.feedback.as_mut().ok_or_else(|| {
            PhysicsError::IllegalState(format!("{} link does not support reaction feedback", ty))
        })
    }

    /// Returns the hinge axis in world space, derived from the parent body's
    /// current orientation. Never cached beyond one call.
    pub fn get_axis(&self, bodies: &BodyStorage<RigidBody>) -> Result<Vector3> {
        let (parent, _) = self.require_initialized()?;
        let hinge = self.require_hinge()?;
        Ok(bodies
            .get_body(parent)?
            .local_to_world_direction(hinge.axis_parent))
    }

    /// Returns the signed relative rotation between the two bodies about the
    /// hinge axis, wrapped into `(-π, π]`.
    ///
    /// The ±π seam is stabilized: angles within a small band of the seam
    /// report exactly +π instead of flipping sign between calls.
    pub fn get_angle(&self, bodies: &BodyStorage<RigidBody>) -> Result<f32> {
        let (parent, child) = self.require_initialized()?;
        self.require_type(
            &[LinkType::Revolute, LinkType::RevoluteSpring],
            "read a hinge angle",
        )?;
        let hinge = self.require_hinge()?;

        let qa = bodies.get_body(parent)?.get_rotation();
        let qb = bodies.get_body(child)?.get_rotation();

        // Rotation accumulated since init, expressed in the parent frame
        let relative = qa.conjugate() * qb;
        let delta = (hinge.initial_rotation.conjugate() * relative).normalize();

        // Twist component about the hinge axis
        let projection = delta.vector_part().dot(&hinge.axis_parent);
        let angle = 2.0 * projection.atan2(delta.w);
        Ok(wrap_angle(angle))
    }

    /// Returns the relative angular speed of child with respect to parent
    /// about the hinge axis
    pub fn get_angular_velocity(&self, bodies: &BodyStorage<RigidBody>) -> Result<f32> {
        let (parent, child) = self.require_initialized()?;
        self.require_type(
            &[LinkType::Revolute, LinkType::RevoluteSpring],
            "read a hinge velocity",
        )?;
        let axis = self.get_axis(bodies)?;
        let omega_a = bodies.get_body(parent)?.get_angular_velocity();
        let omega_b = bodies.get_body(child)?.get_angular_velocity();
        Ok((omega_b - omega_a).dot(&axis))
    }

    /// Applies a scalar torque about the hinge axis, equal and opposite on
    /// the two bodies
    pub fn apply_torque(
        &mut self,
        bodies: &mut BodyStorage<RigidBody>,
        torque: f32,
    ) -> Result<()> {
        let (parent, child) = self.require_initialized()?;
        self.require_type(
            &[LinkType::Revolute, LinkType::RevoluteSpring],
            "apply a hinge torque",
        )?;
        let axis = self.get_axis(bodies)?;
        let torque_world = axis * torque;

        bodies.get_body_mut(child)?.apply_torque(torque_world);
        bodies.get_body_mut(parent)?.apply_torque(-torque_world);

        if let Some(feedback) = &mut self.feedback {
            feedback.record(torque.abs());
        }
        Ok(())
    }

    /// Applies a scalar angular impulse about the hinge axis, equal and
    /// opposite on the two bodies
    pub fn apply_angular_impulse(
        &mut self,
        bodies: &mut BodyStorage<RigidBody>,
        impulse: f32,
    ) -> Result<()> {
        let (parent, child) = self.require_initialized()?;
        self.require_type(
            &[LinkType::Revolute, LinkType::RevoluteSpring],
            "apply a hinge impulse",
        )?;
        let axis = self.get_axis(bodies)?;
        let impulse_world = axis * impulse;

        bodies.get_body_mut(child)?.apply_angular_impulse(impulse_world);
        bodies.get_body_mut(parent)?.apply_angular_impulse(-impulse_world);

        if let Some(feedback) = &mut self.feedback {
            feedback.record(impulse.abs());
        }
        Ok(())
    }

    /// Applies the spring torque `-k(angle - target) - d·ω` on top of any
    /// externally applied torque. Call once per simulation step.
    pub fn apply_spring(&mut self, bodies: &mut BodyStorage<RigidBody>) -> Result<()> {
        self.require_type(&[LinkType::RevoluteSpring], "apply a spring")?;
        let spring = self.get_spring()?;

        let angle = self.get_angle(bodies)?;
        let velocity = self.get_angular_velocity(bodies)?;
        let torque = -spring.spring_coef * (angle - spring.target) - spring.damper * velocity;
        self.apply_torque(bodies, torque)
    }

    fn require_initialized(&self) -> Result<(BodyHandle, BodyHandle)> {
        match (self.parent, self.child) {
            (Some(parent), Some(child)) => Ok((parent, child)),
            _ => Err(PhysicsError::IllegalState(format!(
                "{} link has not been initialized",
                self.link_type
            ))),
        }
    }

    fn require_hinge(&self) -> Result<&HingeFrame> {
        self.hinge.as_ref().ok_or_else(|| {
            PhysicsError::IllegalState(format!(
                "{} link has no axis frame; was it initialized?",
                self.link_type
            ))
        })
    }

    fn require_type(&self, allowed: &[LinkType], operation: &str) -> Result<()> {
        if allowed.contains(&self.link_type) {
            Ok(())
        } else {
            Err(PhysicsError::InvalidParameter(format!(
                "a {} link cannot {}",
                self.link_type, operation
            )))
        }
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.parent, self.child) {
            (Some(parent), Some(child)) => write!(
                f,
                "{} link [{:?} -> {:?}] at {}",
                self.link_type, parent, child, self.anchor
            ),
            _ => write!(f, "{} link [unbound]", self.link_type),
        }
    }
}

/// Derives the hinge frame bookkeeping for an anchor and world axis.
///
/// The joint frame's Z axis is the rotation/slide axis; the remaining basis
/// vectors are an arbitrary perpendicular pair.
fn build_hinge_frame(
    bodies: &BodyStorage<RigidBody>,
    parent: BodyHandle,
    child: BodyHandle,
    anchor: Vector3,
    axis: Vector3,
) -> Result<HingeFrame> {
    if axis.is_zero() {
        return Err(PhysicsError::InvalidParameter(
            "link axis must be a non-zero vector".to_string(),
        ));
    }
    let axis_world = axis.normalize();

    let ta: Transform = bodies.get_body(parent)?.get_transform();
    let tb: Transform = bodies.get_body(child)?.get_transform();

    let u = axis_world.any_perpendicular();
    let v = axis_world.cross(&u);
    let joint_rotation = Matrix3::from_columns(u, v, axis_world);
    let joint_world = Matrix4::from_rotation_translation(joint_rotation, anchor);

    Ok(HingeFrame {
        pivot_parent: ta.inverse_transform_point(anchor),
        axis_parent: ta.inverse_transform_direction(axis_world).normalize(),
        pivot_child: tb.inverse_transform_point(anchor),
        axis_child: tb.inverse_transform_direction(axis_world).normalize(),
        frame_a: ta.inverse().to_matrix().multiply_matrix(&joint_world),
        frame_b: tb.inverse().to_matrix().multiply_matrix(&joint_world),
        initial_rotation: (ta.rotation.conjugate() * tb.rotation).normalize(),
    })
}
