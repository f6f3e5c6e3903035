//! Claims carried by a session token.

use aicart_core::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The verified contents of a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id, or a sentinel id for degraded-mode identities.
    pub subject: String,
    pub role: Role,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionClaims {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
