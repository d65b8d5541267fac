use ml::graph::Graph;
use ml::recorder::Recorder;
use ml::*;
use std::collections::HashMap;

#[test]
fn elementwise_ops_and_reductions() {
    let mut g = Graph::new();
    let mut tensors = HashMap::new();

    let a = Tensor::from_vec(vec![2, 2], vec![1.0, 2.0, 3.0, 4.0]);
    let b = Tensor::from_vec(vec![2, 2], vec![5.0, 6.0, 7.0, 8.0]);

    let c = a.add(&b, &mut g, &mut tensors).unwrap();
    let d = a.mul(&b, &mut g, &mut tensors).unwrap();
    let e = b.sub(&a, &mut g, &mut tensors).unwrap();
    let f = c.reduce_sum(&mut g, &mut tensors);
    let m = d.reduce_mean(&mut g, &mut tensors);

    assert_eq!(c.data(), &[6.0, 8.0, 10.0, 12.0]);
    assert_eq!(d.data(), &[5.0, 12.0, 21.0, 32.0]);
    assert_eq!(e.data(), &[4.0, 4.0, 4.0, 4.0]);
    assert_eq!(f.data(), &[36.0]);
    assert_eq!(m.data(), &[17.5]);

    assert_eq!(g.nodes().len(), 5);
    for t in [&a, &b, &c, &d, &e, &f, &m] {
        assert!(tensors.contains_key(&t.id), "tensor {} not tracked", t.id);
    }
}

#[test]
fn unary_ops() {
    let mut g = Graph::new();
    let mut tensors = HashMap::new();
    let x = Tensor::from_vec(vec![3], vec![-1.0, 0.0, 2.0]);

    assert_eq!(x.pow(2.0, &mut g, &mut tensors).data(), &[1.0, 0.0, 4.0]);
    assert_eq!(x.mul_scalar(-3.0, &mut g, &mut tensors).data(), &[3.0, -0.0, -6.0]);
    let t = x.tanh(&mut g, &mut tensors);
    for (o, e) in t.data().iter().zip([(-1.0f32).tanh(), 0.0, 2.0f32.tanh()]) {
        assert!((o - e).abs() < 1e-6);
    }
}

#[test]
fn matmul_batches_rows() {
    let mut g = Graph::new();
    let mut tensors = HashMap::new();
    // w: [out=2, in=3]
    let w = Tensor::from_vec(vec![2, 3], vec![1.0, 0.0, -1.0, 0.5, 0.5, 0.5]);
    let x = Tensor::from_vec(vec![2, 3], vec![1.0, 2.0, 3.0, -1.0, 0.0, 1.0]);
    let y = w.matmul(&x, &mut g, &mut tensors).unwrap();
    assert_eq!(y.shape, vec![2, 2]);
    assert_eq!(y.data(), &[-2.0, 3.0, -2.0, 0.0]);

    let bias = Tensor::from_vec(vec![2], vec![10.0, 20.0]);
    let z = y.add_broadcast(&bias, &mut g, &mut tensors).unwrap();
    assert_eq!(z.data(), &[8.0, 23.0, 8.0, 20.0]);

    let single = Tensor::from_vec(vec![3], vec![1.0, 1.0, 1.0]);
    let s = w.matmul(&single, &mut g, &mut tensors).unwrap();
    assert_eq!(s.shape, vec![2]);
    assert_eq!(s.data(), &[0.0, 1.5]);
}

#[test]
fn shape_mismatches_are_errors() {
    let mut g = Graph::new();
    let mut tensors = HashMap::new();
    let a = Tensor::from_vec(vec![2], vec![1.0, 2.0]);
    let b = Tensor::from_vec(vec![3], vec![1.0, 2.0, 3.0]);
    assert!(matches!(a.add(&b, &mut g, &mut tensors), Err(MlError::ShapeMismatch { op: "add", .. })));

    let w = Tensor::from_vec(vec![1, 2], vec![1.0, 1.0]);
    assert!(w.matmul(&b, &mut g, &mut tensors).is_err());
    assert!(b.add_broadcast(&a, &mut g, &mut tensors).is_err());
    assert!(g.nodes().is_empty());
}
