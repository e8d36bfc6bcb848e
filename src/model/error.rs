//! Model training errors

use thiserror::Error;

/// Errors from model configuration and training
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid model configuration: {0}")]
    InvalidConfig(String),

    #[error("training matrix has no interactions")]
    EmptyTraining,
}

/// Result type for model operations
pub type Result<T> = std::result::Result<T, ModelError>;
