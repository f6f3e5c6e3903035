//! Error types for session token handling.

use thiserror::Error;

/// Errors that can occur while issuing or validating session tokens.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Failed to generate keypair.
    #[error("failed to generate keypair: {0}")]
    KeyGenerationFailed(String),

    /// Failed to parse private key.
    #[error("failed to parse private key: {0}")]
    InvalidPrivateKey(String),

    /// Failed to parse public key.
    #[error("failed to parse public key: {0}")]
    InvalidPublicKey(String),

    /// The configured session lifetime is not representable.
    #[error("invalid session lifetime: {0} days")]
    InvalidLifetime(i64),

    /// Failed to create token.
    #[error("failed to create token: {0}")]
    CreationFailed(String),

    /// The token is malformed, carries a bad signature, is missing a claim
    /// or has expired.
    #[error("invalid token: {0}")]
    Invalid(String),

    /// IO error (reading/writing keys).
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
