use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MlError {
    #[error("shape mismatch in {op}: {left:?} vs {right:?}")]
    ShapeMismatch {
        op: &'static str,
        left: Vec<usize>,
        right: Vec<usize>,
    },
    #[error("tensor {0} is not in the arena")]
    MissingTensor(usize),
    #[error("parameter {0} has no gradient")]
    MissingGradient(usize),
    #[error("optimizer tracks {expected} parameters, got {actual}")]
    ParamCountMismatch { expected: usize, actual: usize },
}
