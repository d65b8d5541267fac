#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::must_use_candidate,
    clippy::missing_panics_doc
)]
//! # Kepler World
//!
//! Wires the orbit engine to a thrust policy.
//!
//! An [`OrbitWorld`] holds the bodies, a [`physics::OrbitEngine`] and one
//! injected [`rl::Policy`] shared by every agent-controlled body. Optionally
//! one extra body is steered from outside through an [`InputHandle`]. After
//! each step the host pulls a [`Drawable`] snapshot for rendering and a
//! [`StepStats`] summary for logging.
//!
//! ```rust
//! use rl::RandomPolicy;
//! use world::{OrbitWorld, WorldConfig};
//!
//! let config = WorldConfig { body_count: 4, seed: Some(1), ..WorldConfig::default() };
//! let mut world = OrbitWorld::new(&config, RandomPolicy::new(1))?;
//! world.step(1.0 / 60.0);
//! assert_eq!(world.as_drawable_entities().len(), 1 + 4 + 1);
//! # Ok::<(), world::ConfigError>(())
//! ```

pub mod config;
pub mod drawable;
pub mod error;
pub mod input;
pub mod world;

pub use config::{LearningMode, WorldConfig};
pub use drawable::{Drawable, DrawableGpu, DrawableKind};
pub use error::ConfigError;
pub use input::InputHandle;
pub use world::{OrbitWorld, StepStats};
