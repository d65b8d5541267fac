use crate::observation::{Observation, Transition};
use physics::Thrust;

/// Outcome of one [`Policy::learn`] call.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LearnReport {
    /// Transitions in the batch.
    pub batch_size: usize,
    /// Loss before the update, when one was computed.
    pub loss: Option<f32>,
    /// The update was dropped because something non-finite showed up.
    pub skipped: bool,
    /// The target estimator was refreshed after this update.
    pub synced: bool,
}

impl LearnReport {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn applied(&self) -> bool {
        self.loss.is_some() && !self.skipped
    }
}

/// A thrust controller shared by every body of a world.
pub trait Policy {
    /// Picks one action per observation, in order.
    fn select_actions(&mut self, observations: &[Observation]) -> Vec<Thrust>;

    /// Learns from one batch of transitions. An empty batch is a no-op.
    fn learn(&mut self, batch: &[Transition]) -> LearnReport;

    /// Current exploration rate, for reporting.
    fn epsilon(&self) -> f32 {
        1.0
    }
}

/// Uniformly random thrust; never learns.
pub struct RandomPolicy {
    rng: fastrand::Rng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self { rng: fastrand::Rng::with_seed(seed) }
    }
}

impl Policy for RandomPolicy {
    fn select_actions(&mut self, observations: &[Observation]) -> Vec<Thrust> {
        observations
            .iter()
            .map(|_| Thrust::ALL[self.rng.usize(..Thrust::COUNT)])
            .collect()
    }

    fn learn(&mut self, batch: &[Transition]) -> LearnReport {
        LearnReport {
            batch_size: batch.len(),
            ..LearnReport::empty()
        }
    }
}
