#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Kepler Orbit Engine
//!
//! A small two-dimensional orbital mechanics engine for the Kepler project.
//!
//! Bodies move around a single fixed central mass at the origin. Each step
//! the engine applies point gravity plus an externally chosen [`Thrust`]
//! and advances the bodies with semi-implicit Euler integration. The engine
//! also exposes the orbital eccentricity of a body, which higher layers use
//! as a reward signal for learned thrust control.
//!
//! ## Key Components
//!
//! -   **Vector math:** [`Vec2`] in the [`vector`] module provides the pure
//!     2D primitives everything else is written in.
//! -   **Orbit engine:** [`OrbitEngine`] in the [`orbit`] module owns the
//!     gravitational parameter and thrust settings and steps a slice of
//!     [`OrbitingBody`] values.
//!
//! ## Usage
//!
//! ```rust
//! use physics::{CentralMass, OrbitEngine, OrbitParams, OrbitingBody, Thrust, Vec2};
//!
//! let params = OrbitParams { gravitational_constant: 1.0, ..OrbitParams::default() };
//! let engine = OrbitEngine::new(CentralMass::new(1.0), params);
//! let mut bodies = vec![OrbitingBody::new(Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0), 0.05)];
//! engine.step(&mut bodies, &[Thrust::None], 0.01)?;
//! assert!(engine.eccentricity(&bodies[0]) < 0.01);
//! # Ok::<(), physics::PhysicsError>(())
//! ```

pub mod error;
pub mod orbit;
pub mod vector;

pub use error::PhysicsError;
pub use orbit::{CentralMass, OrbitEngine, OrbitParams, OrbitingBody, Thrust};
pub use vector::Vec2;
