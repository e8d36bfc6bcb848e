//! Search error types

use thiserror::Error;

/// Errors from search-space and searcher operations
#[derive(Debug, Error)]
pub enum HpoError {
    #[error("empty search space")]
    EmptySpace,

    #[error("parameter not found: {0}")]
    ParameterNotFound(String),

    #[error("invalid value for parameter {0}: {1}")]
    InvalidValue(String, String),

    #[error("invalid domain for parameter {0}: {1}")]
    InvalidDomain(String, String),

    #[error("searcher exhausted after {0} configurations")]
    Exhausted(usize),
}

/// Result type for search operations
pub type Result<T> = std::result::Result<T, HpoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert!(format!("{}", HpoError::EmptySpace).contains("empty search space"));
        assert!(
            format!("{}", HpoError::ParameterNotFound("lr".into())).contains("lr")
        );
        assert!(format!("{}", HpoError::Exhausted(9)).contains('9'));
    }
}
