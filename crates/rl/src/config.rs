use crate::error::RlError;
use crate::schedule::{EpsilonSchedule, SyncSchedule};
use serde::{Deserialize, Serialize};

/// Hyperparameters of [`crate::DqnAgent`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgentConfig {
    /// Discount applied to the bootstrapped next-state value. Must be in `[0, 1)`.
    pub discount: f32,
    /// Per-learning-step decay of the exploration rate.
    pub epsilon_decay: f32,
    /// Exploration rate the decay converges to.
    pub epsilon_floor: f32,
    /// Overrides the decay with a constant exploration rate.
    pub fixed_epsilon: Option<f32>,
    /// Learning steps between target syncs after the warm-up list. `0` turns
    /// off the periodic part; `sync_warmup` must then be non-empty.
    pub sync_interval: u64,
    /// Learning steps at which the target is synced early on.
    pub sync_warmup: Vec<u64>,
    pub hidden_units: usize,
    pub learning_rate: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        let sync = SyncSchedule::default();
        Self {
            discount: 0.95,
            epsilon_decay: 1e-4,
            epsilon_floor: 0.05,
            fixed_epsilon: None,
            sync_interval: sync.interval,
            sync_warmup: sync.warmup,
            hidden_units: 32,
            learning_rate: 1e-3,
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> RlError {
    RlError::InvalidConfig { field, reason: reason.into() }
}

impl AgentConfig {
    /// # Errors
    ///
    /// [`RlError::InvalidConfig`] naming the first out-of-range field.
    pub fn validate(&self) -> Result<(), RlError> {
        if !(0.0..1.0).contains(&self.discount) {
            return Err(invalid("discount", format!("{} is not in [0, 1)", self.discount)));
        }
        if !(0.0..=1.0).contains(&self.epsilon_decay) {
            return Err(invalid("epsilon_decay", format!("{} is not in [0, 1]", self.epsilon_decay)));
        }
        if !(0.0..=1.0).contains(&self.epsilon_floor) {
            return Err(invalid("epsilon_floor", format!("{} is not in [0, 1]", self.epsilon_floor)));
        }
        if let Some(eps) = self.fixed_epsilon {
            if !(0.0..=1.0).contains(&eps) {
                return Err(invalid("fixed_epsilon", format!("{eps} is not in [0, 1]")));
            }
        }
        if self.sync_interval == 0 && self.sync_warmup.is_empty() {
            return Err(invalid(
                "sync_interval",
                "0 with an empty `sync_warmup` would never refresh the target estimator",
            ));
        }
        if self.hidden_units == 0 {
            return Err(invalid("hidden_units", "must be positive"));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(invalid("learning_rate", format!("{} must be finite and positive", self.learning_rate)));
        }
        Ok(())
    }

    pub fn epsilon_schedule(&self) -> EpsilonSchedule {
        match self.fixed_epsilon {
            Some(eps) => EpsilonSchedule::Fixed(eps),
            None => EpsilonSchedule::Decay {
                rate: self.epsilon_decay,
                floor: self.epsilon_floor,
            },
        }
    }

    pub fn sync_schedule(&self) -> SyncSchedule {
        SyncSchedule {
            interval: self.sync_interval,
            warmup: self.sync_warmup.clone(),
        }
    }
}
