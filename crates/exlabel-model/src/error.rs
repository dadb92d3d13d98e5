use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid parameter '{0}': expected NAME=VALUE")]
    InvalidParameter(String),
}
