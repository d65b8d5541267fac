use crate::error::MlError;
use crate::Tensor;

pub struct Adam {
    lr: f32,
    beta1: f32,
    beta2: f32,
    eps: f32,
    t: u32,
    m: Vec<Vec<f32>>,
    v: Vec<Vec<f32>>,
}

impl Adam {
    pub fn new(params: &[&Tensor], lr: f32) -> Self {
        Self {
            lr,
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
            t: 0,
            m: params.iter().map(|p| vec![0.0; p.data.len()]).collect(),
            v: params.iter().map(|p| vec![0.0; p.data.len()]).collect(),
        }
    }

    pub fn learning_rate(&self) -> f32 {
        self.lr
    }

    /// Number of updates applied so far.
    pub fn steps(&self) -> u32 {
        self.t
    }

    /// Applies one update using the `grad` stored on every parameter.
    ///
    /// Nothing is modified unless every parameter carries a gradient.
    ///
    /// # Errors
    ///
    /// [`MlError::ParamCountMismatch`] when `params` is not the list the
    /// optimizer was built for, [`MlError::MissingGradient`] when a
    /// parameter has no gradient.
    pub fn step(&mut self, params: &mut [&mut Tensor]) -> Result<(), MlError> {
        if params.len() != self.m.len() {
            tracing::warn!(expected = self.m.len(), actual = params.len(), "adam step refused");
            return Err(MlError::ParamCountMismatch {
                expected: self.m.len(),
                actual: params.len(),
            });
        }
        if let Some(p) = params.iter().find(|p| p.grad.is_none()) {
            tracing::warn!(param = p.id, "adam step refused, parameter has no gradient");
            return Err(MlError::MissingGradient(p.id));
        }

        self.t += 1;
        tracing::trace!(step = self.t, params = params.len(), "adam step");
        let t = i32::try_from(self.t).unwrap_or(i32::MAX);
        let lr_t = self.lr * (1.0 - self.beta2.powi(t)).sqrt() / (1.0 - self.beta1.powi(t));

        for (i, p) in params.iter_mut().enumerate() {
            let Some(grad) = p.grad.take() else { continue };
            for (j, g) in grad.iter().enumerate() {
                self.m[i][j] = self.beta1 * self.m[i][j] + (1.0 - self.beta1) * g;
                self.v[i][j] = self.beta2 * self.v[i][j] + (1.0 - self.beta2) * g.powi(2);
                p.data[j] -= lr_t * self.m[i][j] / (self.v[i][j].sqrt() + self.eps);
            }
        }
        Ok(())
    }
}
