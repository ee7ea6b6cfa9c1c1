use thiserror::Error;

/// Error type for session token operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    #[error("Signing key must be at least {min} bytes, got {actual}")]
    InvalidSigningKey { min: usize, actual: usize },

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token is malformed: {0}")]
    MalformedToken(String),
}
