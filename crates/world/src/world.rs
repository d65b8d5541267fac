//! # Orbit World
//!
//! [`OrbitWorld`] owns a fixed population of bodies around one central mass
//! and a single shared [`Policy`]. Every [`OrbitWorld::step`] runs one full
//! cycle: observe, act, integrate, reward, learn.
//!
//! Each body contributes one [`Transition`] per step: the observation it had
//! before integration, the thrust it used, the reward `1 - e` computed from
//! its eccentricity after integration, and its new observation.

use crate::config::{LearningMode, WorldConfig};
use crate::drawable::{self, Drawable, DrawableKind};
use crate::error::ConfigError;
use crate::input::InputHandle;
use parking_lot::{Mutex, MutexGuard};
use physics::{CentralMass, OrbitEngine, OrbitingBody, Thrust, Vec2};
use rl::{LearnReport, Observation, Policy, Transition};
use serde::Serialize;
use std::sync::Arc;
use std::thread::JoinHandle;

/// Steps between periodic debug dumps of the world state.
const DEBUG_EVERY: u64 = 200;

/// Summary of the most recent [`OrbitWorld::step`].
///
/// With [`LearningMode::Background`] the learning fields describe the update
/// that finished at the start of the step, i.e. the previous step's batch.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct StepStats {
    /// Completed steps, this one included.
    pub step: u64,
    pub mean_reward: f64,
    /// Mean of the clamped eccentricities.
    pub mean_eccentricity: f64,
    /// Exploration rate used to select this step's actions.
    pub epsilon: f32,
    pub batch_size: usize,
    pub loss: Option<f32>,
    pub skipped: bool,
    pub synced: bool,
}

pub struct OrbitWorld<P> {
    engine: OrbitEngine,
    bodies: Vec<OrbitingBody>,
    manual_body: bool,
    train_on_manual_body: bool,
    max_eccentricity: f64,
    learning_mode: LearningMode,
    policy: Arc<Mutex<P>>,
    learning: Option<JoinHandle<LearnReport>>,
    input: InputHandle,
    seed: u64,
    steps: u64,
    last: StepStats,
}

fn sample(rng: &mut fastrand::Rng, [low, high]: [f64; 2]) -> f64 {
    low + rng.f64() * (high - low)
}

impl<P: Policy + Send + 'static> OrbitWorld<P> {
    /// Builds a world with a random central mass and randomly placed bodies.
    ///
    /// # Errors
    ///
    /// Any [`WorldConfig::validate`] error.
    pub fn new(config: &WorldConfig, policy: P) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(|| fastrand::u64(..));
        let mut rng = fastrand::Rng::with_seed(seed);
        let central = CentralMass::new(sample(&mut rng, config.central_mass_range));
        let bodies = (0..config.total_bodies())
            .map(|_| {
                let position = Vec2::new(
                    sample(&mut rng, config.position_range),
                    sample(&mut rng, config.position_range),
                );
                let velocity = Vec2::new(
                    sample(&mut rng, config.velocity_range),
                    sample(&mut rng, config.velocity_range),
                );
                OrbitingBody::new(position, velocity, sample(&mut rng, config.body_mass_range))
            })
            .collect();
        tracing::info!(
            seed,
            central_mass = central.mass,
            bodies = config.total_bodies(),
            manual = config.manual_body,
            "orbit world created"
        );
        Ok(Self::assemble(config, central, bodies, policy, seed))
    }

    /// Builds a world around explicit bodies. The sampling ranges and
    /// `body_count` of `config` are ignored; with `manual_body` set, the last
    /// body is the manual one.
    ///
    /// # Errors
    ///
    /// Any [`WorldConfig::validate`] error, or [`ConfigError::Invalid`] when
    /// a manual body is requested without any bodies.
    pub fn from_bodies(
        config: &WorldConfig,
        central: CentralMass,
        bodies: Vec<OrbitingBody>,
        policy: P,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if config.manual_body && bodies.is_empty() {
            return Err(ConfigError::Invalid {
                field: "manual_body",
                reason: "needs at least one body".into(),
            });
        }
        Ok(Self::assemble(config, central, bodies, policy, config.seed.unwrap_or_default()))
    }

    fn assemble(config: &WorldConfig, central: CentralMass, bodies: Vec<OrbitingBody>, policy: P, seed: u64) -> Self {
        Self {
            engine: OrbitEngine::new(central, config.orbit_params()),
            bodies,
            manual_body: config.manual_body,
            train_on_manual_body: config.train_on_manual_body,
            max_eccentricity: config.max_eccentricity,
            learning_mode: config.learning_mode,
            policy: Arc::new(Mutex::new(policy)),
            learning: None,
            input: InputHandle::new(),
            seed,
            steps: 0,
            last: StepStats::default(),
        }
    }

    /// Advances the world by `dt`.
    ///
    /// A negative or non-finite `dt` is logged and the step is skipped
    /// entirely; pending manual input stays pending.
    pub fn step(&mut self, dt: f64) {
        if !dt.is_finite() || dt < 0.0 {
            tracing::warn!(dt, "rejected timestep, world not advanced");
            return;
        }
        let finished = self.finish_learning();
        let manual = self.input.take();

        let observations: Vec<Observation> = self.bodies.iter().map(Observation::from_body).collect();
        let agent_count = self.agent_count();
        let (mut actions, epsilon) = {
            let mut policy = self.policy.lock();
            let epsilon = policy.epsilon();
            (policy.select_actions(&observations[..agent_count]), epsilon)
        };
        if actions.len() != agent_count {
            tracing::error!(
                expected = agent_count,
                got = actions.len(),
                "policy returned the wrong number of actions"
            );
            actions.resize(agent_count, Thrust::None);
        }
        if self.manual_body {
            actions.push(manual.unwrap_or_default());
        }

        if let Err(err) = self.engine.step(&mut self.bodies, &actions, dt) {
            tracing::error!("orbit step failed: {err}");
            return;
        }

        let eccentricities: Vec<f64> = self
            .bodies
            .iter()
            .map(|body| self.engine.eccentricity(body).min(self.max_eccentricity))
            .collect();
        let trained = if self.manual_body && !self.train_on_manual_body {
            agent_count
        } else {
            self.bodies.len()
        };
        let batch: Vec<Transition> = (0..trained)
            .map(|i| Transition {
                observation: observations[i],
                action: actions[i],
                reward: (1.0 - eccentricities[i]) as f32,
                next_observation: Observation::from_body(&self.bodies[i]),
            })
            .collect();

        let report = match self.learning_mode {
            LearningMode::Inline => Some(self.policy.lock().learn(&batch)),
            LearningMode::Background => {
                let policy = Arc::clone(&self.policy);
                self.learning = Some(std::thread::spawn(move || policy.lock().learn(&batch)));
                finished
            }
        };

        self.steps += 1;
        let (mean_eccentricity, mean_reward) = if eccentricities.is_empty() {
            (0.0, 0.0)
        } else {
            let mean = eccentricities.iter().sum::<f64>() / eccentricities.len() as f64;
            (mean, 1.0 - mean)
        };
        let report = report.unwrap_or_default();
        self.last = StepStats {
            step: self.steps,
            mean_reward,
            mean_eccentricity,
            epsilon,
            batch_size: report.batch_size,
            loss: report.loss,
            skipped: report.skipped,
            synced: report.synced,
        };

        if self.steps % DEBUG_EVERY == 0 {
            tracing::debug!(
                step = self.steps,
                dt,
                mean_reward,
                mean_eccentricity,
                epsilon,
                bodies = ?self.bodies,
                "orbit world state"
            );
        }
    }

    /// Waits for an in-flight background update and returns its report.
    pub fn finish_learning(&mut self) -> Option<LearnReport> {
        let handle = self.learning.take()?;
        match handle.join() {
            Ok(report) => Some(report),
            Err(_) => {
                tracing::error!("background learning panicked, update dropped");
                Some(LearnReport {
                    skipped: true,
                    ..LearnReport::empty()
                })
            }
        }
    }

    /// Locks the policy. Blocks while a background update is running.
    pub fn policy(&self) -> MutexGuard<'_, P> {
        self.policy.lock()
    }

    /// Central mass first, then every body in order.
    pub fn as_drawable_entities(&self) -> Vec<Drawable> {
        let agent_count = self.agent_count();
        std::iter::once(Drawable {
            position: Vec2::ZERO,
            radius: self.engine.central().mass,
            kind: DrawableKind::CentralMass,
        })
        .chain(self.bodies.iter().enumerate().map(|(i, body)| Drawable {
            position: body.position,
            radius: body.mass,
            kind: if i < agent_count {
                DrawableKind::AgentBody
            } else {
                DrawableKind::ManualBody
            },
        }))
        .collect()
    }

    /// [`Self::as_drawable_entities`] packed as [`crate::DrawableGpu`] bytes.
    pub fn drawable_bytes(&self) -> Vec<u8> {
        drawable::to_bytes(&self.as_drawable_entities())
    }
}

impl<P> OrbitWorld<P> {
    /// Sets the thrust the manual body uses on the next step.
    pub fn on_manual_input(&self, action: Thrust) {
        self.input.set(action);
    }

    /// A handle other threads can use to feed manual input.
    pub fn input_handle(&self) -> InputHandle {
        self.input.clone()
    }

    pub fn bodies(&self) -> &[OrbitingBody] {
        &self.bodies
    }

    pub fn engine(&self) -> &OrbitEngine {
        &self.engine
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn last_step(&self) -> &StepStats {
        &self.last
    }

    pub fn has_manual_body(&self) -> bool {
        self.manual_body
    }

    /// Bodies steered by the policy.
    pub fn agent_count(&self) -> usize {
        self.bodies.len() - usize::from(self.manual_body)
    }
}

impl<P> Drop for OrbitWorld<P> {
    fn drop(&mut self) {
        if let Some(handle) = self.learning.take() {
            let _ = handle.join();
        }
    }
}
