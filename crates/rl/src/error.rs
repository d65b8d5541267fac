use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RlError {
    #[error("invalid agent setting `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },
    #[error(transparent)]
    Ml(#[from] ml::MlError),
}
