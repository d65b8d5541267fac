//! # Kepler
//!
//! Bodies orbit a single central mass and a shared learned policy fires
//! their thrusters, rewarded for keeping every orbit close to circular.
//!
//! ## Project Architecture
//!
//! The workspace is split into crates with one responsibility each:
//!
//! -   **[`physics`]:** 2D vector math and the orbit engine. Point gravity,
//!     thrust, semi-implicit Euler integration and orbital eccentricity.
//! -   **[`ml`]:** Tensors with a recorded operation graph, reverse-mode
//!     gradients, a dense layer and the Adam optimizer.
//! -   **[`rl`]:** The `Policy` seam plus the batched dual-estimator agent
//!     that learns from every body's transitions.
//! -   **[`world`]:** The orchestrator. Observe, act, integrate, reward and
//!     learn once per step, then expose drawables for a renderer.
//! -   **`kepler`:** This crate. A headless command line driver, see
//!     [`cli::Cli`] and [`app::run`].
//!
//! ## Getting Started
//!
//! ```text
//! RUST_LOG=info cargo run -p kepler -- --steps 5000 --bodies 64 --seed 7
//! ```

pub mod app;
pub mod cli;

pub use ml;
pub use physics;
pub use rl;
pub use world;
