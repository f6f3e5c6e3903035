//! # aicart-store
//!
//! Credential store adapters for the aicart access service.
//!
//! The [`CredentialStore`] trait is the only seam the access service talks
//! to. Two implementations ship here:
//!
//! - [`PostgresCredentialStore`] backed by a sqlx pool and the `users` table
//! - [`MemoryCredentialStore`] for tests and local development
//!
//! Whether the persistent store is usable at all is decided once, at process
//! start, by [`probe_store`]. Adapters never reconnect on their own; a call
//! that cannot reach the database fails with [`StoreError::Unavailable`].

use aicart_core::{NewUser, User};
use async_trait::async_trait;

pub mod error;
pub mod memory;
pub mod postgres;
pub mod probe;

pub use error::StoreError;
pub use memory::MemoryCredentialStore;
pub use postgres::PostgresCredentialStore;
pub use probe::{StoreAvailability, probe_store};

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up an account by exact (case-sensitive) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Create an account. Fails with [`StoreError::DuplicateEmail`] when the
    /// email is taken, including when a concurrent insert wins the race.
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;
}
