use crate::error::MlError;
use crate::recorder::Recorder;
use crate::tensor::Tensor;
use std::collections::HashMap;

/// A fully connected neural network layer.
#[derive(Clone, Debug)]
pub struct Dense {
    /// The weight matrix for the layer, `[out_dim, in_dim]`.
    pub w: Tensor,
    /// The bias vector for the layer, `[out_dim]`.
    pub b: Tensor,
    /// The number of input dimensions.
    pub in_dim: usize,
    /// The number of output dimensions.
    pub out_dim: usize,
}

impl Dense {
    /// Creates a new `Dense` layer with the given weights and biases.
    pub fn new(weights: Vec<f32>, bias: Vec<f32>, in_d: usize, out_d: usize) -> Self {
        assert_eq!(weights.len(), in_d * out_d);
        assert_eq!(bias.len(), out_d);
        Self {
            w: Tensor::from_vec(vec![out_d, in_d], weights).with_grad(),
            b: Tensor::from_vec(vec![out_d], bias).with_grad(),
            in_dim: in_d,
            out_dim: out_d,
        }
    }

    /// Glorot-uniform weights, zero bias.
    pub fn random(in_d: usize, out_d: usize, rng: &mut fastrand::Rng) -> Self {
        let limit = (6.0 / (in_d + out_d) as f32).sqrt();
        let weights = (0..in_d * out_d)
            .map(|_| rng.f32() * 2.0 * limit - limit)
            .collect();
        let bias = vec![0.0; out_d];
        Self::new(weights, bias, in_d, out_d)
    }

    /// Performs the forward pass through the layer.
    ///
    /// The layer's parameters enter `tensors` on first use so a following
    /// [`crate::tape::Tape::backward`] can reach them.
    ///
    /// # Errors
    ///
    /// [`MlError::ShapeMismatch`] when `x` rows are not `in_dim` wide.
    pub fn forward(
        &self,
        x: &Tensor,
        recorder: &mut impl Recorder,
        tensors: &mut HashMap<usize, Tensor>,
    ) -> Result<Tensor, MlError> {
        let wx = self.w.matmul(x, recorder, tensors)?;
        wx.add_broadcast(&self.b, recorder, tensors)
    }

    pub fn params(&self) -> [&Tensor; 2] {
        [&self.w, &self.b]
    }

    pub fn params_mut(&mut self) -> [&mut Tensor; 2] {
        [&mut self.w, &mut self.b]
    }

    /// Copies parameter values from `other` while keeping this layer's
    /// tensor ids.
    ///
    /// # Errors
    ///
    /// [`MlError::ShapeMismatch`] when the layers have different shapes.
    pub fn load_from(&mut self, other: &Dense) -> Result<(), MlError> {
        if self.w.shape != other.w.shape || self.b.shape != other.b.shape {
            return Err(MlError::ShapeMismatch {
                op: "load_from",
                left: self.w.shape.clone(),
                right: other.w.shape.clone(),
            });
        }
        self.w.data.copy_from_slice(&other.w.data);
        self.b.data.copy_from_slice(&other.b.data);
        Ok(())
    }
}
