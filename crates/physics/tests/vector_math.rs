use physics::Vec2;

fn close(a: Vec2, b: Vec2) -> bool {
    (a.x - b.x).abs() < 1e-12 && (a.y - b.y).abs() < 1e-12
}

#[test]
fn unit_vector_scaled_by_magnitude_reconstructs_input() {
    let samples = [
        Vec2::new(3.0, 4.0),
        Vec2::new(-0.25, 0.1),
        Vec2::new(1e-6, -2e-6),
        Vec2::new(0.0, -7.5),
        Vec2::new(123.0, 0.001),
    ];
    for v in samples {
        let unit = v.unit().expect("nonzero vector has a direction");
        assert!((unit.magnitude() - 1.0).abs() < 1e-12, "|unit({v:?})| != 1");
        let rebuilt = unit.scale(v.magnitude());
        assert!(close(rebuilt, v), "rebuilt {rebuilt:?} from {v:?}");
    }
}

#[test]
fn basic_operations() {
    let a = Vec2::new(1.0, 2.0);
    let b = Vec2::new(4.0, 6.0);
    assert_eq!(a.distance(b), 5.0);
    assert_eq!(a.dot(b), 16.0);
    assert_eq!(b - a, Vec2::new(3.0, 4.0));
    assert_eq!(a * 2.0, Vec2::new(2.0, 4.0));
    assert_eq!(-a, Vec2::new(-1.0, -2.0));
    assert_eq!(Vec2::add_all([a, b, Vec2::new(-5.0, -8.0)]), Vec2::ZERO);
}

#[test]
fn tiny_vectors_keep_their_direction() {
    for v in [Vec2::new(1e-17, 0.0), Vec2::new(0.0, -1e-300), Vec2::new(3e-320, 4e-320)] {
        let u = v.unit().expect("nonzero vector has a direction");
        assert!((u.magnitude() - 1.0).abs() < 1e-3, "{v:?} -> {u:?}");
        assert!(u.is_finite());
        assert!(u.dot(v) > 0.0);
    }
    assert_eq!(Vec2::new(1e-17, 0.0).unit(), Some(Vec2::new(1.0, 0.0)));
}

#[test]
fn zero_and_non_finite_vectors_have_no_direction() {
    assert!(Vec2::ZERO.unit().is_none());
    assert!(Vec2::new(f64::NAN, 1.0).unit().is_none());
    assert!(Vec2::new(f64::INFINITY, 0.0).unit().is_none());
    assert_eq!(Vec2::ZERO.unit_or_zero(), Vec2::ZERO);
}
