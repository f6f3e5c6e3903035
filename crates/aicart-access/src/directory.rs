//! Fixed identities served while the credential store is unreachable.
//!
//! The directory holds exactly one identity per role. It is never written
//! to, never persisted, and its entries are compared by exact string match.

use aicart_core::{Role, UserProfile};
use subtle::ConstantTimeEq;

/// Credits shown for degraded-mode identities. Nothing is ever charged.
const DEGRADED_CREDITS: i64 = 100;

#[derive(Debug, Clone)]
pub struct DegradedIdentity {
    pub email: String,
    pub password: String,
    /// Sentinel subject id; not tied to any stored record.
    pub subject: String,
    pub name: String,
    pub role: Role,
}

impl DegradedIdentity {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.subject.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
            credits: DEGRADED_CREDITS,
        }
    }

    fn matches(&self, email: &str, password: &str) -> bool {
        let email_ok = self.email.as_bytes().ct_eq(email.as_bytes());
        let password_ok = self.password.as_bytes().ct_eq(password.as_bytes());
        (email_ok & password_ok).into()
    }
}

#[derive(Debug, Clone)]
pub struct DegradedDirectory {
    admin: DegradedIdentity,
    user: DegradedIdentity,
}

impl Default for DegradedDirectory {
    fn default() -> Self {
        Self::builtin()
    }
}

impl DegradedDirectory {
    /// The well-known development identities.
    pub fn builtin() -> Self {
        Self {
            admin: DegradedIdentity {
                email: "admin@aicart.local".to_string(),
                password: "admin123".to_string(),
                subject: "degraded-admin".to_string(),
                name: "Admin".to_string(),
                role: Role::Admin,
            },
            user: DegradedIdentity {
                email: "user@aicart.local".to_string(),
                password: "user123".to_string(),
                subject: "degraded-user".to_string(),
                name: "Demo User".to_string(),
                role: Role::User,
            },
        }
    }

    /// The fixed identity for `role`.
    pub fn sentinel_for(&self, role: Role) -> &DegradedIdentity {
        match role {
            Role::Admin => &self.admin,
            Role::User => &self.user,
        }
    }

    /// Exact match on email, password and role. Any mismatch is `None`.
    pub fn authenticate(
        &self,
        email: &str,
        password: &str,
        expected_role: Role,
    ) -> Option<&DegradedIdentity> {
        let identity = self.sentinel_for(expected_role);
        identity.matches(email, password).then_some(identity)
    }
}
