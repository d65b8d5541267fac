use crate::observation::{Observation, OBS_DIM};
use ml::graph::Graph;
use ml::nn::Dense;
use ml::recorder::Recorder;
use ml::{MlError, Tensor};
use physics::Thrust;
use std::collections::HashMap;

/// Action-value estimator: `obs -> tanh(Dense) -> Dense -> Q(obs, ·)`.
///
/// Output rows hold one value per [`Thrust`], indexed by [`Thrust::index`].
#[derive(Clone, Debug)]
pub struct QNetwork {
    hidden: Dense,
    head: Dense,
}

impl QNetwork {
    pub fn new(hidden_units: usize, rng: &mut fastrand::Rng) -> Self {
        Self {
            hidden: Dense::random(OBS_DIM, hidden_units, rng),
            head: Dense::random(hidden_units, Thrust::COUNT, rng),
        }
    }

    /// Packs observations into a `[n, OBS_DIM]` tensor.
    pub fn batch(observations: &[Observation]) -> Tensor {
        let data = observations.iter().flat_map(|o| o.0).collect();
        Tensor::from_vec(vec![observations.len(), OBS_DIM], data)
    }

    /// Forward pass over a `[n, OBS_DIM]` batch, returning `[n, Thrust::COUNT]`.
    ///
    /// # Errors
    ///
    /// [`MlError::ShapeMismatch`] if `x` is not `OBS_DIM` wide.
    pub fn forward(
        &self,
        x: &Tensor,
        recorder: &mut impl Recorder,
        tensors: &mut HashMap<usize, Tensor>,
    ) -> Result<Tensor, MlError> {
        let h = self.hidden.forward(x, recorder, tensors)?.tanh(recorder, tensors);
        self.head.forward(&h, recorder, tensors)
    }

    /// Inference-only action values, one row per observation.
    ///
    /// # Errors
    ///
    /// Propagates [`MlError`] from the forward pass.
    pub fn values(&self, observations: &[Observation]) -> Result<Vec<[f32; Thrust::COUNT]>, MlError> {
        if observations.is_empty() {
            return Ok(Vec::new());
        }
        let mut tensors = HashMap::new();
        let out = self.forward(&Self::batch(observations), &mut Graph::new(), &mut tensors)?;
        Ok(out
            .data()
            .chunks_exact(Thrust::COUNT)
            .map(|row| {
                let mut q = [0.0; Thrust::COUNT];
                q.copy_from_slice(row);
                q
            })
            .collect())
    }

    pub fn params(&self) -> [&Tensor; 4] {
        [&self.hidden.w, &self.hidden.b, &self.head.w, &self.head.b]
    }

    pub fn params_mut(&mut self) -> [&mut Tensor; 4] {
        [&mut self.hidden.w, &mut self.hidden.b, &mut self.head.w, &mut self.head.b]
    }

    /// Overwrites this network's parameters with a snapshot of `other`.
    ///
    /// # Errors
    ///
    /// [`MlError::ShapeMismatch`] when the hidden widths differ.
    pub fn load_from(&mut self, other: &QNetwork) -> Result<(), MlError> {
        self.hidden.load_from(&other.hidden)?;
        self.head.load_from(&other.head)
    }
}

/// Highest-valued action. Ties go to the lower index; NaN never wins.
pub fn greedy(values: &[f32; Thrust::COUNT]) -> Thrust {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] || values[best].is_nan() {
            best = i;
        }
    }
    Thrust::ALL[best]
}
