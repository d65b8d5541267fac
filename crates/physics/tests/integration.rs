use physics::{CentralMass, OrbitEngine, OrbitParams, OrbitingBody, PhysicsError, Thrust, Vec2};

fn unit_mu_engine() -> OrbitEngine {
    let params = OrbitParams { gravitational_constant: 1.0, ..OrbitParams::default() };
    OrbitEngine::new(CentralMass::new(1.0), params)
}

#[test]
fn one_step_matches_semi_implicit_closed_form() {
    let engine = unit_mu_engine();
    let dt = 0.01;
    let mut bodies = vec![OrbitingBody::new(Vec2::new(1.0, 0.0), Vec2::ZERO, 0.05)];
    engine.step(&mut bodies, &[Thrust::None], dt).unwrap();

    // a = (-1, 0); v' = a dt; p' = p + v' dt
    let expected_velocity = Vec2::new(-dt, 0.0);
    let expected_position = Vec2::new(1.0 - dt * dt, 0.0);
    assert!((bodies[0].velocity.x - expected_velocity.x).abs() < 1e-15);
    assert_eq!(bodies[0].velocity.y, 0.0);
    assert!((bodies[0].position.x - expected_position.x).abs() < 1e-15);
    assert_eq!(bodies[0].position.y, 0.0);
    assert_eq!(bodies[0].mass, 0.05);
}

#[test]
fn circular_orbit_stays_circular_for_a_full_period() {
    let engine = unit_mu_engine();
    let dt = 1e-3;
    let mut bodies = vec![OrbitingBody::new(Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0), 0.01)];
    let period = 2.0 * std::f64::consts::PI;
    let steps = (period / dt) as usize;
    for _ in 0..steps {
        engine.step(&mut bodies, &[Thrust::None], dt).unwrap();
        let r = bodies[0].position.magnitude();
        assert!((r - 1.0).abs() < 0.01, "radius drifted to {r}");
    }
    assert!(bodies[0].position.distance(Vec2::new(1.0, 0.0)) < 0.05);
}

#[test]
fn mismatched_actions_are_rejected() {
    let engine = unit_mu_engine();
    let mut bodies = vec![OrbitingBody::new(Vec2::new(1.0, 0.0), Vec2::ZERO, 0.05); 2];
    let before = bodies.clone();
    let err = engine.step(&mut bodies, &[Thrust::None], 0.01).unwrap_err();
    assert_eq!(err, PhysicsError::ActionCountMismatch { bodies: 2, actions: 1 });
    assert_eq!(bodies, before);
}

#[test]
fn invalid_timestep_is_rejected() {
    let engine = unit_mu_engine();
    let mut bodies = vec![OrbitingBody::new(Vec2::new(1.0, 0.0), Vec2::ZERO, 0.05)];
    assert!(matches!(
        engine.step(&mut bodies, &[Thrust::None], f64::NAN),
        Err(PhysicsError::InvalidTimestep(_))
    ));
    assert!(engine.step(&mut bodies, &[Thrust::None], -1.0).is_err());
}

#[test]
fn forward_thrust_raises_orbital_energy() {
    let engine = unit_mu_engine();
    let energy = |b: &OrbitingBody| 0.5 * b.velocity.dot(b.velocity) - 1.0 / b.position.magnitude();
    let mut coasting = vec![OrbitingBody::new(Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0), 0.01)];
    let mut boosted = coasting.clone();
    for _ in 0..100 {
        engine.step(&mut coasting, &[Thrust::None], 1e-3).unwrap();
        engine.step(&mut boosted, &[Thrust::Forward], 1e-3).unwrap();
    }
    assert!(energy(&boosted[0]) > energy(&coasting[0]));
}
