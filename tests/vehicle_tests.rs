use approx::assert_relative_eq;
use phys_link::core::{BodyStorage, Storage};
use phys_link::error::PhysicsError;
use phys_link::vehicle::PlaneRaycaster;
use phys_link::{
    BodyHandle, RigidBody, SubstepIntegrator, Vehicle, VehicleTuning, Vector3, WheelFlags,
    WheelInfo,
};

const DT: f32 = 1.0 / 60.0;

fn chassis_at(height: f32) -> (BodyStorage<RigidBody>, BodyHandle) {
    let mut bodies = BodyStorage::new();
    let chassis = bodies.add(RigidBody::new_dynamic(800.0, Vector3::new(0.0, height, 0.0)));
    (bodies, chassis)
}

fn wheel_at(x: f32, z: f32, flags: WheelFlags) -> WheelInfo {
    WheelInfo {
        connection_point: Vector3::new(x, 0.0, z),
        suspension_rest_length: 0.6,
        suspension_travel: 0.5,
        radius: 0.3,
        flags,
        ..WheelInfo::default()
    }
}

fn four_wheeler(chassis: BodyHandle) -> Vehicle {
    let mut vehicle = Vehicle::new(chassis, 1000.0, 100.0);
    let front = WheelFlags::STEERABLE;
    let rear = WheelFlags::DRIVEN | WheelFlags::BRAKING;
    vehicle.add_wheel(wheel_at(-0.8, 1.2, front)).unwrap();
    vehicle.add_wheel(wheel_at(0.8, 1.2, front)).unwrap();
    vehicle.add_wheel(wheel_at(-0.8, -1.2, rear)).unwrap();
    vehicle.add_wheel(wheel_at(0.8, -1.2, rear)).unwrap();
    vehicle
}

#[test]
fn test_add_wheel_after_finalize_fails() {
    let (_, chassis) = chassis_at(1.0);
    let mut vehicle = four_wheeler(chassis);
    vehicle.finalize().unwrap();
    let result = vehicle.add_wheel(wheel_at(0.0, 0.0, WheelFlags::empty()));
    assert!(matches!(result, Err(PhysicsError::IllegalState(_))));
    assert_eq!(vehicle.num_wheels(), 4);
}

#[test]
fn test_drive_before_finalize_fails() {
    let (mut bodies, chassis) = chassis_at(1.0);
    let mut vehicle = four_wheeler(chassis);

    assert!(matches!(
        vehicle.control(0.5, 0.5, false),
        Err(PhysicsError::IllegalState(_))
    ));
    let ground = PlaneRaycaster::new(0.0);
    assert!(matches!(
        vehicle.update(&mut bodies, &ground, DT),
        Err(PhysicsError::IllegalState(_))
    ));
}

#[test]
fn test_finalize_is_one_way() {
    let (_, chassis) = chassis_at(1.0);
    let mut vehicle = four_wheeler(chassis);
    vehicle.finalize().unwrap();
    assert!(vehicle.is_finalized());
    assert!(matches!(
        vehicle.finalize(),
        Err(PhysicsError::IllegalState(_))
    ));
}

#[test]
fn test_control_routes_by_wheel_flags() {
    let (_, chassis) = chassis_at(1.0);
    let mut vehicle = four_wheeler(chassis);
    let tuning = vehicle.get_tuning();
    vehicle.finalize().unwrap();

    // Over-range inputs are clamped before scaling
    vehicle.control(2.0, 0.5, true).unwrap();
    for index in 0..2 {
        let wheel = vehicle.wheel(index).unwrap();
        assert_relative_eq!(wheel.get_steering(), tuning.max_steering_angle);
        assert_eq!(wheel.get_engine_force(), 0.0);
        assert_eq!(wheel.get_brake_force(), 0.0);
    }
    for index in 2..4 {
        let wheel = vehicle.wheel(index).unwrap();
        assert_eq!(wheel.get_steering(), 0.0);
        assert_relative_eq!(wheel.get_engine_force(), 0.5 * tuning.motor_force);
        assert_relative_eq!(wheel.get_brake_force(), tuning.brake_force);
    }

    // Neutral input zeroes everything
    vehicle.control(0.0, 0.0, false).unwrap();
    for index in 0..4 {
        let wheel = vehicle.wheel(index).unwrap();
        assert_eq!(wheel.get_steering(), 0.0);
        assert_eq!(wheel.get_engine_force(), 0.0);
        assert_eq!(wheel.get_brake_force(), 0.0);
    }
}

#[test]
fn test_vehicle_reports_last_commanded_values() {
    let (_, chassis) = chassis_at(1.0);
    let mut vehicle = four_wheeler(chassis);
    vehicle.finalize().unwrap();

    vehicle.force_control(0.2, 600.0, 40.0).unwrap();
    assert_relative_eq!(vehicle.get_steering(), 0.2);
    assert_relative_eq!(vehicle.get_engine_force(), 600.0);
    assert_relative_eq!(vehicle.get_brake_force(), 40.0);

    // Normalized control reports the scaled values it routed
    vehicle.control(0.5, -1.0, false).unwrap();
    let tuning = vehicle.get_tuning();
    assert_relative_eq!(vehicle.get_steering(), 0.5 * tuning.max_steering_angle);
    assert_relative_eq!(vehicle.get_engine_force(), -tuning.motor_force);
    assert_eq!(vehicle.get_brake_force(), 0.0);
}

#[test]
fn test_wheel_index_out_of_range() {
    let (_, chassis) = chassis_at(1.0);
    let vehicle = four_wheeler(chassis);
    assert!(matches!(
        vehicle.wheel(4),
        Err(PhysicsError::ResourceNotFound(_))
    ));
}

#[test]
fn test_substep_gravity_total_is_independent_of_count() {
    // Summed gravity impulses over a step must equal one full-gravity step
    // for any substep count
    for count in [1u32, 2, 4, 8] {
        let (mut bodies, chassis) = chassis_at(1.0);
        let mut integrator = SubstepIntegrator::new();
        integrator.set_substep_count(count);

        integrator
            .step(chassis, &mut bodies, DT, |_, _| Ok(()))
            .unwrap();

        let velocity = bodies.get_body(chassis).unwrap().get_linear_velocity();
        assert_relative_eq!(velocity.y, -9.81 * DT, epsilon = 1e-5);
        assert_relative_eq!(velocity.x, 0.0);
        assert_relative_eq!(velocity.z, 0.0);
    }
}

#[test]
fn test_substep_swaps_in_residual_gravity() {
    let (mut bodies, chassis) = chassis_at(1.0);
    let mut integrator = SubstepIntegrator::new();
    integrator.set_substep_count(4);
    integrator
        .step(chassis, &mut bodies, DT, |_, _| Ok(()))
        .unwrap();

    let cached = integrator.get_cached_gravity().unwrap();
    assert_relative_eq!(cached.y, -9.81);

    // The chassis keeps a tiny downward pull rather than zero gravity
    let residual = bodies.get_body(chassis).unwrap().get_gravity();
    assert!(residual.y < 0.0);
    assert!(residual.y > -1.0e-5);
    assert_eq!(residual.x, 0.0);
    assert_eq!(residual.z, 0.0);
}

#[test]
fn test_substep_zero_gravity_caches_zero() {
    let (mut bodies, chassis) = chassis_at(1.0);
    bodies
        .get_body_mut(chassis)
        .unwrap()
        .set_gravity(Vector3::zero());

    let mut integrator = SubstepIntegrator::new();
    integrator
        .step(chassis, &mut bodies, DT, |_, _| Ok(()))
        .unwrap();

    assert_eq!(integrator.get_cached_gravity(), Some(Vector3::zero()));
    let velocity = bodies.get_body(chassis).unwrap().get_linear_velocity();
    assert_eq!(velocity.y, 0.0);
}

#[test]
fn test_substep_stops_impulses_when_gravity_is_disabled() {
    let (mut bodies, chassis) = chassis_at(1.0);
    let mut integrator = SubstepIntegrator::new();
    integrator
        .step(chassis, &mut bodies, DT, |_, _| Ok(()))
        .unwrap();
    let after_first = bodies.get_body(chassis).unwrap().get_linear_velocity();
    assert_relative_eq!(after_first.y, -9.81 * DT, epsilon = 1e-5);

    // Disabling gravity between steps must clear the cache, not keep
    // replaying the old impulse
    bodies
        .get_body_mut(chassis)
        .unwrap()
        .set_gravity(Vector3::zero());
    integrator
        .step(chassis, &mut bodies, DT, |_, _| Ok(()))
        .unwrap();

    let after_second = bodies.get_body(chassis).unwrap().get_linear_velocity();
    assert_eq!(after_second.y, after_first.y);
    assert_eq!(integrator.get_cached_gravity(), Some(Vector3::zero()));
}

#[test]
fn test_substep_tracks_gravity_magnitude_changes() {
    let (mut bodies, chassis) = chassis_at(1.0);
    let mut integrator = SubstepIntegrator::new();
    integrator.set_substep_count(4);
    integrator
        .step(chassis, &mut bodies, DT, |_, _| Ok(()))
        .unwrap();
    let after_first = bodies.get_body(chassis).unwrap().get_linear_velocity();

    // Rescaled gravity takes effect on the next step
    bodies
        .get_body_mut(chassis)
        .unwrap()
        .set_gravity(Vector3::new(0.0, -19.62, 0.0));
    integrator
        .step(chassis, &mut bodies, DT, |_, _| Ok(()))
        .unwrap();

    let after_second = bodies.get_body(chassis).unwrap().get_linear_velocity();
    assert_relative_eq!(after_second.y - after_first.y, -19.62 * DT, epsilon = 1e-5);
    assert_relative_eq!(integrator.get_cached_gravity().unwrap().y, -19.62);

    // The chassis is again left with the residual, so an unmodified third
    // step keeps applying the latest cached gravity
    integrator
        .step(chassis, &mut bodies, DT, |_, _| Ok(()))
        .unwrap();
    let after_third = bodies.get_body(chassis).unwrap().get_linear_velocity();
    assert_relative_eq!(after_third.y - after_second.y, -19.62 * DT, epsilon = 1e-5);
}

#[test]
fn test_substep_immovable_chassis_gets_no_impulse() {
    let mut bodies = BodyStorage::new();
    let chassis = bodies.add(RigidBody::new_static(Vector3::new(0.0, 1.0, 0.0)));

    let mut integrator = SubstepIntegrator::new();
    integrator
        .step(chassis, &mut bodies, DT, |_, _| Ok(()))
        .unwrap();

    let velocity = bodies.get_body(chassis).unwrap().get_linear_velocity();
    assert_eq!(velocity.y, 0.0);
}

#[test]
fn test_substep_counts_inner_calls() {
    let (mut bodies, chassis) = chassis_at(1.0);
    let mut integrator = SubstepIntegrator::new();
    integrator.set_substep_count(5);

    let mut calls = 0;
    integrator
        .step(chassis, &mut bodies, DT, |_, sub_dt| {
            calls += 1;
            assert_relative_eq!(sub_dt, DT / 5.0);
            Ok(())
        })
        .unwrap();
    assert_eq!(calls, 5);

    // Counts below one are clamped
    integrator.set_substep_count(0);
    assert_eq!(integrator.get_substep_count(), 1);
}

#[test]
fn test_wheels_contact_and_compress_on_flat_ground() {
    // Hard points sit 0.7 above the plane; with radius 0.3 the suspension
    // settles at 0.4, compressed 0.2 from rest
    let (mut bodies, chassis) = chassis_at(0.7);
    let mut vehicle = four_wheeler(chassis);
    vehicle.finalize().unwrap();

    let ground = PlaneRaycaster::new(0.0);
    vehicle.update(&mut bodies, &ground, DT).unwrap();

    for index in 0..4 {
        let wheel = vehicle.wheel(index).unwrap();
        assert!(wheel.is_in_contact());
        assert_relative_eq!(wheel.get_suspension_length(), 0.4, epsilon = 1e-4);
        assert_relative_eq!(wheel.get_contact_point().y, 0.0, epsilon = 1e-4);
        assert_relative_eq!(wheel.get_contact_normal().y, 1.0);

        // Wheel hub hangs below the hard point by the suspension length
        let location = wheel.get_location_matrix();
        assert_relative_eq!(location.get_translation().y, 0.3, epsilon = 1e-4);
    }

    // Compressed suspension pushes the chassis up against gravity
    let velocity = bodies.get_body(chassis).unwrap().get_linear_velocity();
    assert!(velocity.y > -9.81 * DT);
}

#[test]
fn test_wheels_clear_contact_when_airborne() {
    let (mut bodies, chassis) = chassis_at(10.0);
    let mut vehicle = four_wheeler(chassis);
    vehicle.finalize().unwrap();

    let ground = PlaneRaycaster::new(0.0);
    vehicle.update(&mut bodies, &ground, DT).unwrap();

    for index in 0..4 {
        let wheel = vehicle.wheel(index).unwrap();
        assert!(!wheel.is_in_contact());
        assert_relative_eq!(wheel.get_suspension_length(), 0.6);
    }

    // With no contact the chassis just falls
    let velocity = bodies.get_body(chassis).unwrap().get_linear_velocity();
    assert_relative_eq!(velocity.y, -9.81 * DT, epsilon = 1e-4);
}

#[test]
fn test_driven_wheels_accelerate_the_chassis() {
    let (mut bodies, chassis) = chassis_at(0.7);
    let mut vehicle = four_wheeler(chassis);
    vehicle.finalize().unwrap();
    vehicle.control(0.0, 1.0, false).unwrap();

    let ground = PlaneRaycaster::new(0.0);
    for _ in 0..10 {
        vehicle.update(&mut bodies, &ground, DT).unwrap();
    }

    // Wheel forward is suspension-down cross axle: -Y x +X = +Z
    let velocity = bodies.get_body(chassis).unwrap().get_linear_velocity();
    assert!(velocity.z > 0.0);
    assert_relative_eq!(velocity.x, 0.0, epsilon = 1e-3);

    // Driven wheels spin forward as the chassis gains speed
    assert!(vehicle.wheel(2).unwrap().get_spin() > 0.0);
}
