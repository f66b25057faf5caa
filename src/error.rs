//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
///
/// Failures of a caller-supplied compute function are not represented here:
/// they keep the caller's own error type and propagate unchanged.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Configuration rejected at construction
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Key could not be turned into its canonical form
    #[error("Key normalization failed: {0}")]
    Normalization(#[from] serde_json::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CacheError::InvalidConfig("size must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: size must be positive");
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<u32>("not a number").unwrap_err();
        let err: CacheError = json_err.into();
        assert!(matches!(err, CacheError::Normalization(_)));
        assert!(err.to_string().starts_with("Key normalization failed"));
    }
}
