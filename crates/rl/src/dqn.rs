//! # Batched dual-estimator agent
//!
//! One [`QNetwork`] is trained online from every body's transitions; a second,
//! lagged copy supplies the bootstrap value of the next state. The bootstrap
//! target is evaluated through an inference graph and enters the loss as a
//! plain tensor, so the gradient only ever reaches the current network.

use crate::config::AgentConfig;
use crate::error::RlError;
use crate::estimator::{greedy, QNetwork};
use crate::observation::{Observation, Transition};
use crate::policy::{LearnReport, Policy};
use crate::schedule::{EpsilonSchedule, SyncSchedule};
use ml::optim::Adam;
use ml::tape::{pull_grads, Tape};
use ml::{MlError, Tensor};
use physics::Thrust;
use std::collections::HashMap;

pub struct DqnAgent {
    current: QNetwork,
    target: QNetwork,
    optimizer: Adam,
    discount: f32,
    epsilon: EpsilonSchedule,
    sync: SyncSchedule,
    rng: fastrand::Rng,
    learn_steps: u64,
    syncs: u64,
}

enum Update {
    Applied(f32),
    Skipped(Option<f32>),
}

impl DqnAgent {
    /// # Errors
    ///
    /// [`RlError::InvalidConfig`] when `config` does not validate.
    pub fn new(config: &AgentConfig, seed: u64) -> Result<Self, RlError> {
        config.validate()?;
        let mut rng = fastrand::Rng::with_seed(seed);
        let current = QNetwork::new(config.hidden_units, &mut rng);
        let target = current.clone();
        let optimizer = Adam::new(&current.params(), config.learning_rate);
        Ok(Self {
            current,
            target,
            optimizer,
            discount: config.discount,
            epsilon: config.epsilon_schedule(),
            sync: config.sync_schedule(),
            rng,
            learn_steps: 0,
            syncs: 0,
        })
    }

    #[must_use]
    pub fn with_epsilon(mut self, epsilon: EpsilonSchedule) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Learning updates actually applied so far.
    pub fn learn_steps(&self) -> u64 {
        self.learn_steps
    }

    pub fn syncs(&self) -> u64 {
        self.syncs
    }

    pub fn current(&self) -> &QNetwork {
        &self.current
    }

    pub fn target(&self) -> &QNetwork {
        &self.target
    }

    /// Copies the current estimator into the target estimator.
    pub fn sync_target(&mut self) {
        // Both networks come from the same config, so shapes always agree.
        if let Err(err) = self.target.load_from(&self.current) {
            tracing::error!("target sync failed: {err}");
            return;
        }
        self.syncs += 1;
        tracing::info!(learn_steps = self.learn_steps, syncs = self.syncs, "target estimator synced");
    }

    /// `r + γ · Q_target(o', argmax_a Q_current(o', a))` per transition.
    fn bootstrap_targets(&self, batch: &[Transition]) -> Result<Vec<f32>, MlError> {
        let next: Vec<Observation> = batch.iter().map(|t| t.next_observation).collect();
        let greedy_next = self.current.values(&next)?;
        let target_next = self.target.values(&next)?;
        Ok(batch
            .iter()
            .zip(greedy_next.iter().zip(&target_next))
            .map(|(t, (q_current, q_target))| {
                let action = greedy(q_current);
                t.reward + self.discount * q_target[action.index()]
            })
            .collect())
    }

    fn update(&mut self, batch: &[Transition]) -> Result<Update, MlError> {
        let targets = self.bootstrap_targets(batch)?;
        if targets.iter().any(|y| !y.is_finite()) {
            return Ok(Update::Skipped(None));
        }

        let n = batch.len();
        let mut mask = vec![0.0; n * Thrust::COUNT];
        let mut wide_targets = vec![0.0; n * Thrust::COUNT];
        for (i, (t, y)) in batch.iter().zip(&targets).enumerate() {
            mask[i * Thrust::COUNT + t.action.index()] = 1.0;
            wide_targets[i * Thrust::COUNT..(i + 1) * Thrust::COUNT].fill(*y);
        }
        let mask = Tensor::from_vec(vec![n, Thrust::COUNT], mask);
        let wide_targets = Tensor::from_vec(vec![n, Thrust::COUNT], wide_targets);
        let observations: Vec<Observation> = batch.iter().map(|t| t.observation).collect();

        let mut tape = Tape::new();
        let mut tensors = HashMap::new();
        let predicted = self
            .current
            .forward(&QNetwork::batch(&observations), &mut tape, &mut tensors)?;
        // Only the taken action's column survives the mask, so the mean over
        // all entries times the column count is the mean squared TD error.
        let loss = predicted
            .sub(&wide_targets, &mut tape, &mut tensors)?
            .mul(&mask, &mut tape, &mut tensors)?
            .pow(2.0, &mut tape, &mut tensors)
            .reduce_mean(&mut tape, &mut tensors)
            .mul_scalar(Thrust::COUNT as f32, &mut tape, &mut tensors);
        let loss_value = loss.data()[0];
        if !loss_value.is_finite() {
            return Ok(Update::Skipped(Some(loss_value)));
        }

        tape.backward(&loss, &mut tensors)?;
        let mut params = self.current.params_mut();
        pull_grads(&mut params, &tensors)?;
        let grads_finite = params
            .iter()
            .all(|p| p.grad.as_ref().is_some_and(|g| g.iter().all(|v| v.is_finite())));
        if !grads_finite {
            for p in &mut params {
                p.grad = None;
            }
            return Ok(Update::Skipped(Some(loss_value)));
        }
        self.optimizer.step(&mut params)?;
        Ok(Update::Applied(loss_value))
    }
}

impl Policy for DqnAgent {
    fn select_actions(&mut self, observations: &[Observation]) -> Vec<Thrust> {
        let eps = self.epsilon();
        let values = match self.current.values(observations) {
            Ok(values) => values,
            Err(err) => {
                tracing::error!("action values unavailable, acting randomly: {err}");
                return observations
                    .iter()
                    .map(|_| Thrust::ALL[self.rng.usize(..Thrust::COUNT)])
                    .collect();
            }
        };
        values
            .iter()
            .map(|q| {
                if self.rng.f32() < eps {
                    Thrust::ALL[self.rng.usize(..Thrust::COUNT)]
                } else {
                    greedy(q)
                }
            })
            .collect()
    }

    fn learn(&mut self, batch: &[Transition]) -> LearnReport {
        if batch.is_empty() {
            return LearnReport::empty();
        }
        let mut report = LearnReport {
            batch_size: batch.len(),
            ..LearnReport::empty()
        };
        match self.update(batch) {
            Ok(Update::Applied(loss)) => {
                report.loss = Some(loss);
                self.learn_steps += 1;
                if self.sync.should_sync(self.learn_steps) {
                    self.sync_target();
                    report.synced = true;
                }
                tracing::debug!(loss, learn_steps = self.learn_steps, batch = batch.len(), "learning step");
            }
            Ok(Update::Skipped(loss)) => {
                report.loss = loss;
                report.skipped = true;
                tracing::warn!(?loss, batch = batch.len(), "non-finite learning signal, update skipped");
            }
            Err(err) => {
                report.skipped = true;
                tracing::warn!("learning step failed, update skipped: {err}");
            }
        }
        report
    }

    fn epsilon(&self) -> f32 {
        self.epsilon.value(self.learn_steps)
    }
}
