use physics::{CentralMass, OrbitEngine, OrbitParams, OrbitingBody, Thrust, Vec2};

fn engine(mu: f64) -> OrbitEngine {
    let params = OrbitParams {
        gravitational_constant: 1.0,
        thrust: 0.5,
        escape_margin: 0.0,
        min_radius: 1e-3,
    };
    OrbitEngine::new(CentralMass::new(mu), params)
}

#[test]
fn static_body_is_pulled_toward_origin_with_inverse_square_magnitude() {
    let engine = engine(2.0);
    for position in [Vec2::new(2.0, 0.0), Vec2::new(-1.0, 1.0), Vec2::new(0.3, -0.4)] {
        let r = position.magnitude();
        let a = engine.gravity(position);
        assert!((a.magnitude() - 2.0 / (r * r)).abs() < 1e-9);
        // antiparallel to the position vector
        let cos = a.dot(position) / (a.magnitude() * r);
        assert!((cos + 1.0).abs() < 1e-12);
    }
}

#[test]
fn gravity_near_origin_is_clamped() {
    let engine = engine(1.0);
    let a = engine.gravity(Vec2::new(1e-9, 0.0));
    assert!(a.is_finite());
    assert!((a.magnitude() - 1.0 / (1e-3 * 1e-3)).abs() < 1e-3);
    assert_eq!(engine.gravity(Vec2::ZERO), Vec2::ZERO);
}

#[test]
fn gravity_at_sub_epsilon_distance_is_clamped_not_dropped() {
    let engine = engine(1.0);
    let a = engine.gravity(Vec2::new(1e-17, 0.0));
    assert!(a.is_finite());
    assert!((a.magnitude() - 1e6).abs() < 1e-3, "got {a:?}");
    assert!(a.x < 0.0);
}

#[test]
fn thrust_follows_velocity() {
    let engine = engine(1.0);
    let body = OrbitingBody::new(Vec2::new(1.0, 0.0), Vec2::new(0.0, 0.5), 0.01);
    assert_eq!(engine.thrust_acceleration(&body, Thrust::None), Vec2::ZERO);
    assert_eq!(engine.thrust_acceleration(&body, Thrust::Forward), Vec2::new(0.0, 0.5));
    assert_eq!(engine.thrust_acceleration(&body, Thrust::Reverse), Vec2::new(0.0, -0.5));
}

#[test]
fn forward_thrust_is_refused_above_escape_speed() {
    let engine = engine(1.0);
    // escape speed at r = 1 is sqrt(2)
    let fast = OrbitingBody::new(Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.5), 0.01);
    assert_eq!(engine.thrust_acceleration(&fast, Thrust::Forward), Vec2::ZERO);
    assert_ne!(engine.thrust_acceleration(&fast, Thrust::Reverse), Vec2::ZERO);
}

#[test]
fn zero_velocity_gives_no_thrust_direction() {
    let engine = engine(1.0);
    let body = OrbitingBody::new(Vec2::new(1.0, 0.0), Vec2::ZERO, 0.01);
    for thrust in Thrust::ALL {
        assert_eq!(engine.thrust_acceleration(&body, thrust), Vec2::ZERO);
    }
}

#[test]
fn thrust_indices_round_trip() {
    for (i, thrust) in Thrust::ALL.into_iter().enumerate() {
        assert_eq!(thrust.index(), i);
        assert_eq!(Thrust::from_index(i), Some(thrust));
    }
    assert_eq!(Thrust::from_index(Thrust::COUNT), None);
}
