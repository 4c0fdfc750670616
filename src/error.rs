//! Error types for the rating service
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the crate. The rating calculation itself is a total function and
//! never surfaces an error; these types cover the configuration and storage
//! boundaries only.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific rating-service scenarios
#[derive(Debug, thiserror::Error)]
pub enum RatingError {
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal service error: {message}")]
    InternalError { message: String },
}
