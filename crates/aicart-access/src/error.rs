//! Error types for the access service.

use aicart_store::StoreError;
use aicart_token::TokenError;
use thiserror::Error;

/// Outcome of a failed login or signup.
///
/// Display strings are deliberately generic: nothing here tells the caller
/// whether the email or the password was wrong.
#[derive(Debug, Error)]
pub enum AccessError {
    /// Unknown email, wrong password, or an account of the other role.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Signup for an email that already has an account.
    #[error("email already registered")]
    EmailTaken,

    /// Signup payload is missing a required field.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// The live store failed or timed out during this call.
    #[error("service temporarily unavailable")]
    Unavailable,

    /// Hashing or token signing failed.
    #[error("internal error")]
    Internal(String),
}

impl AccessError {
    /// Stable, non-leaking error code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            AccessError::InvalidCredentials => "invalid_credentials",
            AccessError::EmailTaken => "email_taken",
            AccessError::InvalidInput(_) => "invalid_input",
            AccessError::Unavailable => "service_unavailable",
            AccessError::Internal(_) => "internal_error",
        }
    }
}

impl From<StoreError> for AccessError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => AccessError::EmailTaken,
            StoreError::Unavailable(reason) => {
                tracing::warn!(error = %reason, "credential store call failed");
                AccessError::Unavailable
            }
            other => AccessError::Internal(other.to_string()),
        }
    }
}

impl From<TokenError> for AccessError {
    fn from(err: TokenError) -> Self {
        AccessError::Internal(err.to_string())
    }
}
