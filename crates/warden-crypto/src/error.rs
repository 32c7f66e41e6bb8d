//! Cryptographic error types.

use thiserror::Error;

/// Errors that can occur during credential operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Unknown hash algorithm name.
    #[error("unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Hash iteration count must be at least one.
    #[error("hash iterations must be at least 1")]
    InvalidIterations,
}

/// Result type for cryptographic operations.
pub type CryptoResult<T> = Result<T, CryptoError>;
