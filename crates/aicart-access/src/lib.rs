//! # aicart-access
//!
//! Availability-aware login and signup for the aicart storefront.
//!
//! - [`PasswordVerifier`]: Argon2id hashing on the blocking pool
//! - [`DegradedDirectory`]: fixed admin/user identities for when the store is down
//! - [`AccessService`]: `login_admin`, `login_user` and `signup_user`
//!
//! Callers never need to know which mode is active; both produce the same
//! [`AccessGrant`] and the same [`AccessError`] codes.

pub mod directory;
pub mod error;
pub mod password;
pub mod service;

pub use directory::{DegradedDirectory, DegradedIdentity};
pub use error::AccessError;
pub use password::PasswordVerifier;
pub use service::{AccessGrant, AccessService, CredentialSource, StoreMode};
