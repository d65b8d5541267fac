use crate::error::MlError;
use crate::graph::{EOp, Node};
use crate::recorder::Recorder;
use crate::Tensor;
use std::collections::HashMap;

/// A tape that records operations for automatic differentiation.
#[derive(Default)]
pub struct Tape {
    nodes: Vec<Node>,
}

impl Recorder for Tape {
    fn record(&mut self, node: Node) {
        self.nodes.push(node);
    }

    fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}

fn lookup(tensors: &HashMap<usize, Tensor>, id: usize) -> Result<&Tensor, MlError> {
    tensors.get(&id).ok_or(MlError::MissingTensor(id))
}

fn accumulate<'g>(grads: &'g mut HashMap<usize, Vec<f32>>, id: usize, len: usize) -> &'g mut Vec<f32> {
    grads.entry(id).or_insert_with(|| vec![0.0; len])
}

impl Tape {
    /// Creates a new, empty tape.
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Computes the gradients of the recorded operations with respect to
    /// `loss`, walking the tape in reverse.
    ///
    /// Every tensor in `tensors` with `requires_grad` that the loss depends on
    /// gets its `grad` field set. Tensors produced outside this tape (for
    /// example through a [`crate::graph::Graph`]) are leaves and receive
    /// nothing.
    ///
    /// # Errors
    ///
    /// [`MlError::MissingTensor`] when a recorded operand is not in the arena.
    pub fn backward(&self, loss: &Tensor, tensors: &mut HashMap<usize, Tensor>) -> Result<(), MlError> {
        let mut grads: HashMap<usize, Vec<f32>> = HashMap::new();
        grads.insert(loss.id, vec![1.0; loss.len()]);

        for node in self.nodes.iter().rev() {
            let Some(out_grad) = grads.get(&node.out).cloned() else {
                continue;
            };
            let a = lookup(tensors, node.a)?;

            match node.op {
                EOp::Add | EOp::Sub => {
                    let sign = if node.op == EOp::Sub { -1.0 } else { 1.0 };
                    let b_len = lookup(tensors, node.b)?.len();
                    for (g, og) in accumulate(&mut grads, node.a, a.len()).iter_mut().zip(&out_grad) {
                        *g += og;
                    }
                    for (g, og) in accumulate(&mut grads, node.b, b_len).iter_mut().zip(&out_grad) {
                        *g += sign * og;
                    }
                }
                EOp::Mul => {
                    let b = lookup(tensors, node.b)?;
                    let a_grad: Vec<f32> = b.data.iter().zip(&out_grad).map(|(d, og)| d * og).collect();
                    let b_grad: Vec<f32> = a.data.iter().zip(&out_grad).map(|(d, og)| d * og).collect();
                    let (a_len, b_len) = (a.len(), b.len());
                    for (g, v) in accumulate(&mut grads, node.a, a_len).iter_mut().zip(a_grad) {
                        *g += v;
                    }
                    for (g, v) in accumulate(&mut grads, node.b, b_len).iter_mut().zip(b_grad) {
                        *g += v;
                    }
                }
                EOp::MatMul => {
                    let x = lookup(tensors, node.b)?;
                    let out_dim = a.shape[0];
                    let in_dim = a.shape[1];
                    let batch = x.rows();

                    let mut w_grad = vec![0.0; a.len()];
                    let mut x_grad = vec![0.0; x.len()];
                    for k in 0..batch {
                        for i in 0..out_dim {
                            let og = out_grad[k * out_dim + i];
                            for j in 0..in_dim {
                                w_grad[i * in_dim + j] += og * x.data[k * in_dim + j];
                                x_grad[k * in_dim + j] += og * a.data[i * in_dim + j];
                            }
                        }
                    }
                    let (a_len, x_len) = (a.len(), x.len());
                    for (g, v) in accumulate(&mut grads, node.a, a_len).iter_mut().zip(w_grad) {
                        *g += v;
                    }
                    for (g, v) in accumulate(&mut grads, node.b, x_len).iter_mut().zip(x_grad) {
                        *g += v;
                    }
                }
                EOp::AddBroadcast => {
                    let dim = lookup(tensors, node.b)?.len();
                    for (g, og) in accumulate(&mut grads, node.a, a.len()).iter_mut().zip(&out_grad) {
                        *g += og;
                    }
                    let b_grad = accumulate(&mut grads, node.b, dim);
                    for (i, og) in out_grad.iter().enumerate() {
                        b_grad[i % dim] += og;
                    }
                }
                EOp::Tanh => {
                    let out = lookup(tensors, node.out)?;
                    let local: Vec<f32> = out.data.iter().zip(&out_grad).map(|(t, og)| (1.0 - t * t) * og).collect();
                    for (g, v) in accumulate(&mut grads, node.a, a.len()).iter_mut().zip(local) {
                        *g += v;
                    }
                }
                EOp::Pow => {
                    let exp = lookup(tensors, node.b)?.data[0];
                    let local: Vec<f32> = a
                        .data
                        .iter()
                        .zip(&out_grad)
                        .map(|(d, og)| exp * d.powf(exp - 1.0) * og)
                        .collect();
                    for (g, v) in accumulate(&mut grads, node.a, a.len()).iter_mut().zip(local) {
                        *g += v;
                    }
                }
                EOp::MulScalar => {
                    let factor = lookup(tensors, node.b)?.data[0];
                    for (g, og) in accumulate(&mut grads, node.a, a.len()).iter_mut().zip(&out_grad) {
                        *g += factor * og;
                    }
                }
                EOp::ReduceSum => {
                    for g in accumulate(&mut grads, node.a, a.len()).iter_mut() {
                        *g += out_grad[0];
                    }
                }
                EOp::ReduceMean => {
                    let n = a.len().max(1) as f32;
                    for g in accumulate(&mut grads, node.a, a.len()).iter_mut() {
                        *g += out_grad[0] / n;
                    }
                }
            }
        }

        tracing::trace!(nodes = self.nodes.len(), reached = grads.len(), "backward pass");
        for (id, grad) in grads {
            if let Some(tensor) = tensors.get_mut(&id) {
                if tensor.requires_grad {
                    tensor.grad = Some(grad);
                }
            }
        }

        Ok(())
    }
}

/// Moves the gradients computed into the arena back onto `params`.
///
/// # Errors
///
/// [`MlError::MissingGradient`] for a parameter the loss did not reach.
pub fn pull_grads(params: &mut [&mut Tensor], tensors: &HashMap<usize, Tensor>) -> Result<(), MlError> {
    for p in params.iter_mut() {
        let grad = tensors
            .get(&p.id)
            .and_then(|t| t.grad.clone())
            .ok_or(MlError::MissingGradient(p.id))?;
        p.grad = Some(grad);
    }
    Ok(())
}
