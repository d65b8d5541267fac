use ml::graph::Graph;
use ml::nn::Dense;
use ml::recorder::Recorder;
use ml::tape::{pull_grads, Tape};
use ml::*;
use std::collections::HashMap;

/// mean((tanh(x W1ᵀ + b1) W2ᵀ + b2 - y)²)
fn loss(l1: &Dense, l2: &Dense, x: &Tensor, y: &Tensor, recorder: &mut impl Recorder) -> Tensor {
    let mut tensors = HashMap::new();
    let h = l1.forward(x, recorder, &mut tensors).unwrap().tanh(recorder, &mut tensors);
    let out = l2.forward(&h, recorder, &mut tensors).unwrap();
    out.sub(y, recorder, &mut tensors)
        .unwrap()
        .pow(2.0, recorder, &mut tensors)
        .reduce_mean(recorder, &mut tensors)
}

#[test]
fn two_layer_backward_matches_finite_differences() {
    let mut rng = fastrand::Rng::with_seed(3);
    let mut l1 = Dense::random(3, 4, &mut rng);
    let mut l2 = Dense::random(4, 2, &mut rng);
    let x = Tensor::from_vec(vec![2, 3], vec![0.9, -0.1, 0.3, -0.5, 0.2, 0.7]);
    let y = Tensor::from_vec(vec![2, 2], vec![0.5, -0.5, 1.0, 0.0]);

    let mut tape = Tape::new();
    let mut tensors = HashMap::new();
    let h = l1.forward(&x, &mut tape, &mut tensors).unwrap().tanh(&mut tape, &mut tensors);
    let out = l2.forward(&h, &mut tape, &mut tensors).unwrap();
    let l = out
        .sub(&y, &mut tape, &mut tensors)
        .unwrap()
        .pow(2.0, &mut tape, &mut tensors)
        .reduce_mean(&mut tape, &mut tensors);
    tape.backward(&l, &mut tensors).unwrap();
    pull_grads(&mut l1.params_mut(), &tensors).unwrap();
    pull_grads(&mut l2.params_mut(), &tensors).unwrap();

    // inputs and targets do not require gradients
    assert!(tensors[&x.id].grad.is_none());
    assert!(tensors[&y.id].grad.is_none());

    let eps = 1e-3;
    let w1_grad = l1.w.grad.clone().unwrap();
    for i in 0..l1.w.len() {
        let mut plus = l1.clone();
        plus.w.data[i] += eps;
        let mut minus = l1.clone();
        minus.w.data[i] -= eps;
        let numerical = (loss(&plus, &l2, &x, &y, &mut Graph::new()).data()[0]
            - loss(&minus, &l2, &x, &y, &mut Graph::new()).data()[0])
            / (2.0 * eps);
        let diff = (numerical - w1_grad[i]).abs();
        assert!(diff < 1e-3, "w1[{i}] numerical {numerical} analytical {}", w1_grad[i]);
    }

    let b2_grad = l2.b.grad.clone().unwrap();
    for i in 0..l2.b.len() {
        let mut plus = l2.clone();
        plus.b.data[i] += eps;
        let mut minus = l2.clone();
        minus.b.data[i] -= eps;
        let numerical = (loss(&l1, &plus, &x, &y, &mut Graph::new()).data()[0]
            - loss(&l1, &minus, &x, &y, &mut Graph::new()).data()[0])
            / (2.0 * eps);
        assert!((numerical - b2_grad[i]).abs() < 1e-3, "b2[{i}]");
    }
}

#[test]
fn graph_outputs_are_constants_for_the_tape() {
    let mut rng = fastrand::Rng::with_seed(11);
    let frozen = Dense::random(2, 1, &mut rng);
    let mut trained = Dense::random(2, 1, &mut rng);
    let x = Tensor::from_vec(vec![1, 2], vec![0.3, -0.8]);

    let mut tensors = HashMap::new();
    let target = frozen.forward(&x, &mut Graph::new(), &mut tensors).unwrap();
    let mut tape = Tape::new();
    let pred = trained.forward(&x, &mut tape, &mut tensors).unwrap();
    let l = pred
        .sub(&target, &mut tape, &mut tensors)
        .unwrap()
        .pow(2.0, &mut tape, &mut tensors)
        .reduce_sum(&mut tape, &mut tensors);
    tape.backward(&l, &mut tensors).unwrap();

    assert!(tensors[&frozen.w.id].grad.is_none());
    assert!(tensors[&frozen.b.id].grad.is_none());
    pull_grads(&mut trained.params_mut(), &tensors).unwrap();
    let expected = 2.0 * (pred.data()[0] - target.data()[0]);
    assert!((trained.b.grad.as_ref().unwrap()[0] - expected).abs() < 1e-6);
}

#[test]
fn missing_operand_is_reported() {
    let mut tape = Tape::new();
    let mut tensors = HashMap::new();
    let a = Tensor::from_vec(vec![1], vec![2.0]).with_grad();
    let s = a.mul_scalar(3.0, &mut tape, &mut tensors);
    tensors.remove(&a.id);
    assert_eq!(tape.backward(&s, &mut tensors), Err(MlError::MissingTensor(a.id)));
}
