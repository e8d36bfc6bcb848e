//! Ranking-quality metrics over held-out interactions

mod ranking;

pub use ranking::{auc_at_k, ndcg_at_k};

use thiserror::Error;

/// Errors from metric evaluation
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("dimension mismatch between model and matrices: {0}")]
    DimensionMismatch(String),

    #[error("k must be > 0")]
    InvalidK,
}

/// Result type for evaluation operations
pub type Result<T> = std::result::Result<T, EvalError>;
