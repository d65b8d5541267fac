#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_precision_loss,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! # Kepler ML
//!
//! A deliberately small reverse-mode autodiff toolkit, sized for the value
//! networks the Kepler agents train online.
//!
//! -   [`Tensor`] values live in an arena (`HashMap<usize, Tensor>`) keyed by
//!     tensor id. Every operation writes its output into that arena and
//!     reports a [`graph::Node`] to a [`recorder::Recorder`].
//! -   [`graph::Graph`] is the inference recorder. Nothing recorded there is
//!     ever differentiated, which is how callers keep constants (bootstrap
//!     targets, frozen networks) out of a gradient computation.
//! -   [`tape::Tape`] is the training recorder; [`tape::Tape::backward`]
//!     walks it in reverse and stores gradients on tensors that require them.
//! -   [`nn::Dense`] and [`optim::Adam`] are the only layer and optimizer.

pub mod error;
pub mod graph;
pub mod nn;
pub mod optim;
pub mod recorder;
pub mod tape;
pub mod tensor;

pub use error::MlError;
pub use tensor::Tensor;
