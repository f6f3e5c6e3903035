//! Error types for credential store adapters.

use thiserror::Error;

/// Errors surfaced by a [`CredentialStore`](crate::CredentialStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or did not answer in time.
    #[error("credential store unavailable: {0}")]
    Unavailable(String),

    /// An account with this email already exists.
    #[error("email already registered")]
    DuplicateEmail,

    /// A stored row could not be mapped to a user.
    #[error("corrupt user record: {0}")]
    CorruptRecord(String),

    /// Schema migration failed at startup.
    #[error("migration failed: {0}")]
    Migration(String),

    /// Any other database error.
    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::DuplicateEmail,
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => StoreError::Unavailable(err.to_string()),
            _ => StoreError::Database(err.to_string()),
        }
    }
}
