use crate::error::MlError;
use crate::graph::{EOp, Node};
use crate::recorder::Recorder;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

fn next_id() -> usize {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Row-major `f32` tensor with an arena id.
///
/// Clones share the id, so a clone inserted into the arena stands in for the
/// original during a backward pass.
#[derive(Clone, Debug)]
pub struct Tensor {
    pub id: usize,
    pub data: Vec<f32>,
    pub shape: Vec<usize>,
    pub requires_grad: bool,
    pub grad: Option<Vec<f32>>,
}

impl Tensor {
    pub fn from_vec(shape: Vec<usize>, data: Vec<f32>) -> Self {
        assert_eq!(shape.iter().product::<usize>(), data.len());
        Self {
            id: next_id(),
            data,
            shape,
            requires_grad: false,
            grad: None,
        }
    }

    pub fn scalar(value: f32) -> Self {
        Self::from_vec(vec![1], vec![value])
    }

    #[must_use]
    pub fn with_grad(mut self) -> Self {
        self.requires_grad = true;
        self
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Width of the innermost dimension.
    pub fn cols(&self) -> usize {
        self.shape.last().copied().unwrap_or(1)
    }

    /// Number of rows when viewed as a `[rows, cols]` matrix.
    pub fn rows(&self) -> usize {
        match self.cols() {
            0 => 0,
            cols => self.len() / cols,
        }
    }

    fn emit(
        op: EOp,
        a: usize,
        b: usize,
        shape: Vec<usize>,
        data: Vec<f32>,
        recorder: &mut impl Recorder,
        tensors: &mut HashMap<usize, Tensor>,
    ) -> Tensor {
        let out = Tensor::from_vec(shape, data);
        recorder.record(Node { op, a, b, out: out.id });
        tensors.insert(out.id, out.clone());
        out
    }

    /// Ensures `self` is in the arena so a backward pass can find it.
    pub fn track(&self, tensors: &mut HashMap<usize, Tensor>) {
        tensors.entry(self.id).or_insert_with(|| self.clone());
    }

    fn constant(value: f32, tensors: &mut HashMap<usize, Tensor>) -> usize {
        let t = Tensor::scalar(value);
        let id = t.id;
        tensors.insert(id, t);
        id
    }

    fn zip_with(
        &self,
        other: &Tensor,
        op: EOp,
        name: &'static str,
        f: impl Fn(f32, f32) -> f32,
        recorder: &mut impl Recorder,
        tensors: &mut HashMap<usize, Tensor>,
    ) -> Result<Tensor, MlError> {
        if self.shape != other.shape {
            return Err(MlError::ShapeMismatch {
                op: name,
                left: self.shape.clone(),
                right: other.shape.clone(),
            });
        }
        self.track(tensors);
        other.track(tensors);
        let data = self.data.iter().zip(&other.data).map(|(&a, &b)| f(a, b)).collect();
        Ok(Self::emit(op, self.id, other.id, self.shape.clone(), data, recorder, tensors))
    }

    fn map(
        &self,
        op: EOp,
        b: usize,
        f: impl Fn(f32) -> f32,
        recorder: &mut impl Recorder,
        tensors: &mut HashMap<usize, Tensor>,
    ) -> Tensor {
        self.track(tensors);
        let data = self.data.iter().map(|&v| f(v)).collect();
        Self::emit(op, self.id, b, self.shape.clone(), data, recorder, tensors)
    }

    /// Element-wise sum.
    ///
    /// # Errors
    ///
    /// [`MlError::ShapeMismatch`] unless both shapes are equal.
    pub fn add(
        &self,
        other: &Tensor,
        recorder: &mut impl Recorder,
        tensors: &mut HashMap<usize, Tensor>,
    ) -> Result<Tensor, MlError> {
        self.zip_with(other, EOp::Add, "add", |a, b| a + b, recorder, tensors)
    }

    /// Element-wise difference.
    ///
    /// # Errors
    ///
    /// [`MlError::ShapeMismatch`] unless both shapes are equal.
    pub fn sub(
        &self,
        other: &Tensor,
        recorder: &mut impl Recorder,
        tensors: &mut HashMap<usize, Tensor>,
    ) -> Result<Tensor, MlError> {
        self.zip_with(other, EOp::Sub, "sub", |a, b| a - b, recorder, tensors)
    }

    /// Element-wise product.
    ///
    /// # Errors
    ///
    /// [`MlError::ShapeMismatch`] unless both shapes are equal.
    pub fn mul(
        &self,
        other: &Tensor,
        recorder: &mut impl Recorder,
        tensors: &mut HashMap<usize, Tensor>,
    ) -> Result<Tensor, MlError> {
        self.zip_with(other, EOp::Mul, "mul", |a, b| a * b, recorder, tensors)
    }

    /// `self` is a `[out, in]` weight matrix, `x` a batch of rows `[batch, in]`
    /// (or a single `[in]` vector). Returns `x · selfᵀ` shaped `[batch, out]`
    /// (or `[out]`).
    ///
    /// # Errors
    ///
    /// [`MlError::ShapeMismatch`] when `x` rows are not `in` wide.
    pub fn matmul(
        &self,
        x: &Tensor,
        recorder: &mut impl Recorder,
        tensors: &mut HashMap<usize, Tensor>,
    ) -> Result<Tensor, MlError> {
        if self.shape.len() != 2 || x.cols() != self.shape[1] {
            return Err(MlError::ShapeMismatch {
                op: "matmul",
                left: self.shape.clone(),
                right: x.shape.clone(),
            });
        }
        self.track(tensors);
        x.track(tensors);
        let (out_dim, in_dim) = (self.shape[0], self.shape[1]);
        let batch = x.rows();
        let mut data = vec![0.0; batch * out_dim];
        for k in 0..batch {
            let row = &x.data[k * in_dim..(k + 1) * in_dim];
            for o in 0..out_dim {
                let w = &self.data[o * in_dim..(o + 1) * in_dim];
                data[k * out_dim + o] = w.iter().zip(row).map(|(a, b)| a * b).sum();
            }
        }
        let shape = if x.shape.len() == 1 { vec![out_dim] } else { vec![batch, out_dim] };
        Ok(Self::emit(EOp::MatMul, self.id, x.id, shape, data, recorder, tensors))
    }

    /// Adds the vector `bias` to every row of `self`.
    ///
    /// # Errors
    ///
    /// [`MlError::ShapeMismatch`] when `bias` is not as wide as a row.
    pub fn add_broadcast(
        &self,
        bias: &Tensor,
        recorder: &mut impl Recorder,
        tensors: &mut HashMap<usize, Tensor>,
    ) -> Result<Tensor, MlError> {
        let dim = bias.len();
        if dim == 0 || self.cols() != dim {
            return Err(MlError::ShapeMismatch {
                op: "add_broadcast",
                left: self.shape.clone(),
                right: bias.shape.clone(),
            });
        }
        self.track(tensors);
        bias.track(tensors);
        let data = self
            .data
            .iter()
            .enumerate()
            .map(|(i, &v)| v + bias.data[i % dim])
            .collect();
        Ok(Self::emit(EOp::AddBroadcast, self.id, bias.id, self.shape.clone(), data, recorder, tensors))
    }

    pub fn tanh(&self, recorder: &mut impl Recorder, tensors: &mut HashMap<usize, Tensor>) -> Tensor {
        self.map(EOp::Tanh, self.id, f32::tanh, recorder, tensors)
    }

    pub fn pow(&self, exp: f32, recorder: &mut impl Recorder, tensors: &mut HashMap<usize, Tensor>) -> Tensor {
        let b = Self::constant(exp, tensors);
        self.map(EOp::Pow, b, |v| v.powf(exp), recorder, tensors)
    }

    pub fn mul_scalar(
        &self,
        factor: f32,
        recorder: &mut impl Recorder,
        tensors: &mut HashMap<usize, Tensor>,
    ) -> Tensor {
        let b = Self::constant(factor, tensors);
        self.map(EOp::MulScalar, b, |v| v * factor, recorder, tensors)
    }

    pub fn reduce_sum(&self, recorder: &mut impl Recorder, tensors: &mut HashMap<usize, Tensor>) -> Tensor {
        self.track(tensors);
        let sum = self.data.iter().sum();
        Self::emit(EOp::ReduceSum, self.id, self.id, vec![1], vec![sum], recorder, tensors)
    }

    pub fn reduce_mean(&self, recorder: &mut impl Recorder, tensors: &mut HashMap<usize, Tensor>) -> Tensor {
        self.track(tensors);
        let mean = if self.is_empty() {
            0.0
        } else {
            self.data.iter().sum::<f32>() / self.len() as f32
        };
        Self::emit(EOp::ReduceMean, self.id, self.id, vec![1], vec![mean], recorder, tensors)
    }
}
