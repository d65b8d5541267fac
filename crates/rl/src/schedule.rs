use serde::{Deserialize, Serialize};

/// Exploration rate as a function of applied learning steps.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EpsilonSchedule {
    Fixed(f32),
    /// `floor + (1 - floor) * (1 - rate)^t`
    Decay { rate: f32, floor: f32 },
}

impl EpsilonSchedule {
    pub fn value(&self, learn_steps: u64) -> f32 {
        let eps = match *self {
            EpsilonSchedule::Fixed(eps) => eps,
            EpsilonSchedule::Decay { rate, floor } => {
                let keep = (1.0 - f64::from(rate)).powf(learn_steps as f64) as f32;
                floor + (1.0 - floor) * keep
            }
        };
        eps.clamp(0.0, 1.0)
    }
}

/// When to copy the current estimator into the target estimator.
///
/// Syncs after every learning step listed in `warmup` and then every
/// `interval` steps. An `interval` of zero disables the periodic part.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSchedule {
    pub interval: u64,
    pub warmup: Vec<u64>,
}

impl Default for SyncSchedule {
    fn default() -> Self {
        Self {
            interval: 2000,
            warmup: vec![10, 50, 100, 250, 500, 1000],
        }
    }
}

impl SyncSchedule {
    pub fn should_sync(&self, learn_steps: u64) -> bool {
        if learn_steps == 0 {
            return false;
        }
        self.warmup.contains(&learn_steps) || (self.interval > 0 && learn_steps % self.interval == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decay_is_monotone_and_reaches_floor() {
        let schedule = EpsilonSchedule::Decay { rate: 0.01, floor: 0.05 };
        assert!((schedule.value(0) - 1.0).abs() < 1e-6);
        let mut prev = schedule.value(0);
        for t in (1..5000).step_by(37) {
            let eps = schedule.value(t);
            assert!(eps <= prev);
            assert!(eps >= 0.05);
            prev = eps;
        }
        assert!((schedule.value(100_000) - 0.05).abs() < 1e-6);
    }

    #[test]
    fn fixed_is_clamped() {
        assert_eq!(EpsilonSchedule::Fixed(1.5).value(3), 1.0);
        assert_eq!(EpsilonSchedule::Fixed(-0.2).value(3), 0.0);
    }

    #[test]
    fn sync_uses_warmup_then_interval() {
        let sync = SyncSchedule { interval: 100, warmup: vec![3, 7] };
        let hits: Vec<u64> = (0..=300).filter(|&t| sync.should_sync(t)).collect();
        assert_eq!(hits, vec![3, 7, 100, 200, 300]);
        assert!(!SyncSchedule { interval: 0, warmup: vec![] }.should_sync(10));
    }
}
