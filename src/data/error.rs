//! Data loading and splitting errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors from dataset loading and splitting
#[derive(Debug, Error)]
pub enum DataError {
    #[error("no ratings file found under {0} (expected ratings.dat or ratings.csv)")]
    RatingsNotFound(PathBuf),

    #[error("malformed ratings line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },

    #[error("empty interaction matrix")]
    EmptyMatrix,

    #[error("interaction ({row}, {col}) outside matrix dimensions")]
    IndexOutOfBounds { row: u32, col: u32 },

    #[error("invalid train fraction {0} (must be in (0, 1))")]
    InvalidFraction(f64),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for data operations
pub type Result<T> = std::result::Result<T, DataError>;
