use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("expected {bodies} thrust actions, got {actions}")]
    ActionCountMismatch { bodies: usize, actions: usize },
    #[error("timestep must be finite and non-negative, got {0}")]
    InvalidTimestep(f64),
}
