#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::must_use_candidate
)]
//! # Kepler RL
//!
//! Thrust control policies for orbiting bodies.
//!
//! The [`Policy`] trait is the seam the world orchestrator talks to: one
//! batched call to pick a [`physics::Thrust`] per observation, one batched
//! call to learn from the resulting [`Transition`]s. [`DqnAgent`] is the
//! learned implementation (a Q-network plus a lagged target copy);
//! [`RandomPolicy`] is the trivial baseline.

pub mod config;
pub mod dqn;
pub mod error;
pub mod estimator;
pub mod observation;
pub mod policy;
pub mod schedule;

pub use config::AgentConfig;
pub use dqn::DqnAgent;
pub use error::RlError;
pub use estimator::QNetwork;
pub use observation::{Observation, Transition, OBS_DIM};
pub use policy::{LearnReport, Policy, RandomPolicy};
pub use schedule::{EpsilonSchedule, SyncSchedule};
