use approx::assert_relative_eq;
use phys_link::core::{BodyStorage, Storage};
use phys_link::error::PhysicsError;
use phys_link::math::Quaternion;
use phys_link::{
    AxisMode, BackendId, BodyHandle, Link, LinkRegistry, LinkType, RigidBody, SpringDescriptor,
    Vector3,
};
use std::f32::consts::PI;

fn two_bodies() -> (BodyStorage<RigidBody>, BodyHandle, BodyHandle) {
    let mut bodies = BodyStorage::new();
    let a = bodies.add(RigidBody::new_dynamic(1.0, Vector3::new(0.0, 0.0, 0.0)));
    let b = bodies.add(RigidBody::new_dynamic(1.0, Vector3::new(2.0, 0.0, 0.0)));
    (bodies, a, b)
}

fn revolute_about_z() -> (BodyStorage<RigidBody>, BodyHandle, BodyHandle, Link) {
    let (bodies, a, b) = two_bodies();
    let registry = LinkRegistry::with_defaults();
    let mut link = registry
        .create(BackendId::REFERENCE, LinkType::Revolute)
        .unwrap();
    link.init_revolute(&bodies, a, b, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0)
        .unwrap();
    (bodies, a, b, link)
}

#[test]
fn test_registry_builds_every_link_type() {
    let registry = LinkRegistry::with_defaults();
    for ty in LinkType::ALL {
        let link = registry.create(BackendId::REFERENCE, ty).unwrap();
        assert_eq!(link.get_link_type(), ty);
        assert!(!link.is_initialized());
    }
    assert_eq!(registry.len(), LinkType::ALL.len());
}

#[test]
fn test_registry_unknown_backend_is_checked() {
    let registry = LinkRegistry::with_defaults();
    let result = registry.create(BackendId::new("missing"), LinkType::Revolute);
    assert!(matches!(result, Err(PhysicsError::ResourceNotFound(_))));
}

#[test]
fn test_double_init_is_rejected() {
    let (bodies, a, b) = two_bodies();
    let mut link = Link::new(LinkType::Spherical);
    link.init(&bodies, a, b).unwrap();
    let second = link.init(&bodies, a, b);
    assert!(matches!(second, Err(PhysicsError::IllegalState(_))));
}

#[test]
fn test_self_link_is_rejected() {
    let (bodies, a, _) = two_bodies();
    let mut link = Link::new(LinkType::Rigid);
    let result = link.init(&bodies, a, a);
    assert!(matches!(result, Err(PhysicsError::InvalidParameter(_))));
}

#[test]
fn test_plain_init_anchors_at_midpoint() {
    let (bodies, a, b) = two_bodies();
    let mut link = Link::new(LinkType::Rigid);
    link.init(&bodies, a, b).unwrap();
    let anchor = link.get_position().unwrap();
    assert_relative_eq!(anchor.x, 1.0);
    assert_relative_eq!(anchor.y, 0.0);
    assert_relative_eq!(anchor.z, 0.0);
}

#[test]
fn test_operations_before_init_fail() {
    let (bodies, _, _) = two_bodies();
    let link = Link::new(LinkType::Revolute);
    assert!(matches!(
        link.get_angle(&bodies),
        Err(PhysicsError::IllegalState(_))
    ));
    assert!(matches!(
        link.get_position(),
        Err(PhysicsError::IllegalState(_))
    ));
}

#[test]
fn test_revolute_angle_tracks_child_rotation() {
    let (mut bodies, _, b, link) = revolute_about_z();
    assert_relative_eq!(link.get_angle(&bodies).unwrap(), 0.0, epsilon = 1e-5);

    for angle in [0.25, 1.0, -1.5, 3.0, -3.0] {
        bodies
            .get_body_mut(b)
            .unwrap()
            .set_rotation(Quaternion::from_axis_angle(Vector3::unit_z(), angle));
        assert_relative_eq!(link.get_angle(&bodies).unwrap(), angle, epsilon = 1e-4);
    }
}

#[test]
fn test_revolute_angle_wraps_past_half_turn() {
    let (mut bodies, _, b, link) = revolute_about_z();
    let angle = PI + 0.5;
    bodies
        .get_body_mut(b)
        .unwrap()
        .set_rotation(Quaternion::from_axis_angle(Vector3::unit_z(), angle));
    assert_relative_eq!(
        link.get_angle(&bodies).unwrap(),
        angle - 2.0 * PI,
        epsilon = 1e-4
    );
}

#[test]
fn test_revolute_angle_is_stable_at_the_seam() {
    let (mut bodies, _, b, link) = revolute_about_z();

    // Either side of the half-turn seam reads exactly +PI
    for angle in [PI - 1.0e-5, -PI + 1.0e-5] {
        bodies
            .get_body_mut(b)
            .unwrap()
            .set_rotation(Quaternion::from_axis_angle(Vector3::unit_z(), angle));
        assert_eq!(link.get_angle(&bodies).unwrap(), PI);
    }
}

#[test]
fn test_revolute_angular_velocity() {
    let (mut bodies, a, b, link) = revolute_about_z();
    bodies
        .get_body_mut(b)
        .unwrap()
        .set_angular_velocity(Vector3::new(0.0, 0.0, 3.0));
    bodies
        .get_body_mut(a)
        .unwrap()
        .set_angular_velocity(Vector3::new(0.0, 0.0, 1.0));
    assert_relative_eq!(link.get_angular_velocity(&bodies).unwrap(), 2.0, epsilon = 1e-5);
}

#[test]
fn test_limit_sentinels() {
    // lower > upper leaves the axis free, lower == upper locks it
    let (bodies, a, b) = two_bodies();
    let mut link = Link::new(LinkType::Revolute);
    link.init_revolute(&bodies, a, b, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0)
        .unwrap();

    link.set_limits(1.0, -1.0).unwrap();
    assert_eq!(link.get_limits().unwrap().mode(), AxisMode::Free);

    link.set_limits(0.5, 0.5).unwrap();
    assert_eq!(link.get_limits().unwrap().mode(), AxisMode::Locked);

    link.set_limits(-0.5, 0.5).unwrap();
    let limits = link.get_limits().unwrap();
    assert_eq!(limits.mode(), AxisMode::Bounded);
    assert!(limits.contains(0.0));
    assert!(!limits.contains(0.6));
}

#[test]
fn test_prismatic_limits_and_type_routing() {
    let (bodies, a, b) = two_bodies();
    let mut link = Link::new(LinkType::Prismatic);
    link.init_prismatic(&bodies, a, b, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
        .unwrap();

    link.set_limits(0.0, 0.4).unwrap();
    assert_eq!(link.get_limits().unwrap().mode(), AxisMode::Bounded);

    // A slider has no hinge angle
    assert!(matches!(
        link.get_angle(&bodies),
        Err(PhysicsError::InvalidParameter(_))
    ));
}

#[test]
fn test_spherical_cone_twist_replacement() {
    let (bodies, a, b) = two_bodies();
    let mut link = Link::new(LinkType::Spherical);
    link.init_at(&bodies, a, b, 1.0, 0.0, 0.0).unwrap();

    link.set_cone_twist_limits(0.8, 0.2).unwrap();
    let limits = link.get_cone_twist_limits().unwrap();
    assert!(limits.cone_enabled());
    assert!(limits.twist_enabled());

    // Negative disables; setting again fully replaces the previous limits
    link.set_cone_twist_limits(-1.0, 0.2).unwrap();
    let limits = link.get_cone_twist_limits().unwrap();
    assert!(!limits.cone_enabled());
    assert!(limits.twist_enabled());

    // Limit setters for other families are rejected
    assert!(matches!(
        link.set_limits(0.0, 1.0),
        Err(PhysicsError::InvalidParameter(_))
    ));
}

#[test]
fn test_generic_limits_per_axis() {
    let (bodies, a, b) = two_bodies();
    let mut link = Link::new(LinkType::Generic);
    link.init_generic_at_pivot(
        &bodies,
        a,
        b,
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.0, 1.0, -0.2),
        Vector3::new(0.0, -1.0, 0.2),
        Vector3::new(1.0, 1.0, 1.0),
        Vector3::new(-1.0, -1.0, -1.0),
    )
    .unwrap();

    let limits = link.get_generic_limits().unwrap();
    assert_eq!(limits.linear[0].mode(), AxisMode::Locked);
    assert_eq!(limits.linear[1].mode(), AxisMode::Free);
    assert_eq!(limits.linear[2].mode(), AxisMode::Bounded);
    for axis in 0..3 {
        assert_eq!(limits.angular[axis].mode(), AxisMode::Free);
    }

    let (frame_a, frame_b) = link.get_frames().unwrap();
    // Parent sits at the origin, so its frame carries the full pivot offset
    assert_relative_eq!(frame_a.get_translation().x, 1.0, epsilon = 1e-5);
    assert_relative_eq!(frame_b.get_translation().x, -1.0, epsilon = 1e-5);
}

#[test]
fn test_spring_torque_restores_toward_target() {
    let (mut bodies, a, b) = two_bodies();
    let registry = LinkRegistry::with_defaults();
    let mut link = registry
        .create(BackendId::REFERENCE, LinkType::RevoluteSpring)
        .unwrap();
    link.init_revolute(&bodies, a, b, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0)
        .unwrap();
    link.set_spring(SpringDescriptor::new(0.0, 10.0, 0.0)).unwrap();

    // Deflect past the target: the spring must pull back
    bodies
        .get_body_mut(b)
        .unwrap()
        .set_rotation(Quaternion::from_axis_angle(Vector3::unit_z(), 0.5));
    link.apply_spring(&mut bodies).unwrap();
    let torque = bodies.get_body(b).unwrap().get_accumulated_torque();
    assert_relative_eq!(torque.z, -5.0, epsilon = 1e-3);

    // Equal and opposite on the parent
    let reaction = bodies.get_body(a).unwrap().get_accumulated_torque();
    assert_relative_eq!(reaction.z, 5.0, epsilon = 1e-3);

    // Deflecting the other way flips the sign
    bodies.get_body_mut(a).unwrap().clear_forces();
    bodies.get_body_mut(b).unwrap().clear_forces();
    bodies
        .get_body_mut(b)
        .unwrap()
        .set_rotation(Quaternion::from_axis_angle(Vector3::unit_z(), -0.5));
    link.apply_spring(&mut bodies).unwrap();
    let torque = bodies.get_body(b).unwrap().get_accumulated_torque();
    assert_relative_eq!(torque.z, 5.0, epsilon = 1e-3);
}

#[test]
fn test_feedback_support_by_type() {
    let registry = LinkRegistry::with_defaults();

    for ty in [
        LinkType::Revolute,
        LinkType::RevoluteSpring,
        LinkType::Generic,
        LinkType::Rigid,
    ] {
        let link = registry.create(BackendId::REFERENCE, ty).unwrap();
        assert!(link.get_feedback().is_ok(), "{} should carry feedback", ty);
    }

    for ty in [LinkType::Spherical, LinkType::Prismatic] {
        let link = registry.create(BackendId::REFERENCE, ty).unwrap();
        assert!(
            matches!(link.get_feedback(), Err(PhysicsError::IllegalState(_))),
            "{} should reject feedback access",
            ty
        );
    }
}

#[test]
fn test_feedback_records_only_when_enabled() {
    let (mut bodies, a, b) = two_bodies();
    let registry = LinkRegistry::with_defaults();
    let mut link = registry
        .create(BackendId::REFERENCE, LinkType::Revolute)
        .unwrap();
    link.init_revolute(&bodies, a, b, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0)
        .unwrap();

    // Disabled sensor stays at zero
    link.apply_torque(&mut bodies, 2.5).unwrap();
    assert!(!link.get_feedback().unwrap().is_enabled());
    assert_eq!(link.get_feedback().unwrap().get_value(), 0.0);

    // Enabled sensor tracks the applied magnitude
    link.get_feedback_mut().unwrap().set_enabled(true);
    link.apply_torque(&mut bodies, -2.5).unwrap();
    assert_relative_eq!(link.get_feedback().unwrap().get_value(), 2.5);
}

#[test]
fn test_torque_is_equal_and_opposite() {
    let (mut bodies, a, b, mut link) = revolute_about_z();
    link.apply_torque(&mut bodies, 4.0).unwrap();
    let on_child = bodies.get_body(b).unwrap().get_accumulated_torque();
    let on_parent = bodies.get_body(a).unwrap().get_accumulated_torque();
    assert_relative_eq!(on_child.z, 4.0, epsilon = 1e-5);
    assert_relative_eq!(on_parent.z, -4.0, epsilon = 1e-5);
}

#[test]
fn test_axis_follows_parent_orientation() {
    let (mut bodies, a, _, link) = revolute_about_z();

    // Rotating the parent 90 degrees about Y carries the hinge axis with it
    bodies
        .get_body_mut(a)
        .unwrap()
        .set_rotation(Quaternion::from_axis_angle(Vector3::unit_y(), PI / 2.0));
    let axis = link.get_axis(&bodies).unwrap();
    assert_relative_eq!(axis.x, 1.0, epsilon = 1e-5);
    assert_relative_eq!(axis.z, 0.0, epsilon = 1e-5);
}

#[test]
fn test_link_storage_checked_lookup() {
    use phys_link::core::LinkStorage;

    let (bodies, a, b) = two_bodies();
    let mut links = LinkStorage::new();
    let mut link = Link::new(LinkType::Spherical);
    link.init(&bodies, a, b).unwrap();
    let handle = links.add(link);

    assert_eq!(
        links.get_link(handle).unwrap().get_link_type(),
        LinkType::Spherical
    );

    links.remove(handle).unwrap();
    assert!(matches!(
        links.get_link(handle),
        Err(PhysicsError::ResourceNotFound(_))
    ));
}

#[test]
fn test_link_display() {
    let (bodies, a, b) = two_bodies();
    let mut link = Link::new(LinkType::Spherical);
    assert_eq!(format!("{}", link), "spherical link [unbound]");
    link.init_at(&bodies, a, b, 1.0, 0.0, 0.0).unwrap();
    let text = format!("{}", link);
    assert!(text.starts_with("spherical link ["));
    assert!(text.contains("(1, 0, 0)"));
}
