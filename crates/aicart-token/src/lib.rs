//! # aicart-token
//!
//! Session credentials for the aicart access service.
//!
//! A session token is a Biscuit token signed with a process-wide Ed25519
//! key. Its authority block carries four facts:
//!
//! | Fact | Meaning |
//! |------|---------|
//! | `subject($id)` | user id, or a sentinel id in degraded mode |
//! | `role($role)` | `"admin"` or `"user"` |
//! | `issued_at($ts)` | unix seconds |
//! | `expires_at($ts)` | unix seconds, `issued_at` + lifetime |
//!
//! plus a `check if time($t), $t < expires_at` so an expired token cannot
//! pass authorization even if a verifier forgets to compare timestamps.
//!
//! Validation is stateless: signature and expiry decide everything. There is
//! no revocation list, and changing the key invalidates every token issued
//! under the previous one.

pub mod claims;
pub mod error;
pub mod keys;
pub mod token;

pub use biscuit_auth::PublicKey;
pub use claims::SessionClaims;
pub use error::TokenError;
pub use keys::KeyPair;
pub use token::{TokenIssuer, TokenVerifier};
