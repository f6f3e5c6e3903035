//! Login and signup orchestration.
//!
//! The credential source is chosen once, when the service is built, from the
//! startup store probe. Every call reads that decision; nothing switches it
//! at runtime and no call retries.

use crate::directory::DegradedDirectory;
use crate::error::AccessError;
use crate::password::PasswordVerifier;
use aicart_core::{NewUser, Role, SIGNUP_CREDITS, UserProfile};
use aicart_store::CredentialStore;
use aicart_token::{SessionClaims, TokenError, TokenIssuer};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Where credentials are checked for the lifetime of the process.
#[derive(Clone)]
pub enum CredentialSource {
    /// The persistent store answered the startup probe.
    Live(Arc<dyn CredentialStore>),
    /// The store was unreachable; serve the degraded-mode directory.
    Degraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreMode {
    Live,
    Degraded,
}

impl fmt::Display for StoreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreMode::Live => f.write_str("live"),
            StoreMode::Degraded => f.write_str("degraded"),
        }
    }
}

/// A successful login or signup.
#[derive(Debug, Clone, Serialize)]
pub struct AccessGrant {
    pub token: String,
    pub user: UserProfile,
}

pub struct AccessService {
    source: CredentialSource,
    directory: DegradedDirectory,
    passwords: PasswordVerifier,
    tokens: Arc<TokenIssuer>,
}

impl AccessService {
    pub fn new(
        source: CredentialSource,
        directory: DegradedDirectory,
        passwords: PasswordVerifier,
        tokens: Arc<TokenIssuer>,
    ) -> Self {
        Self {
            source,
            directory,
            passwords,
            tokens,
        }
    }

    /// Live-mode service with the builtin directory and production hashing.
    pub fn live(store: Arc<dyn CredentialStore>, tokens: Arc<TokenIssuer>) -> Self {
        Self::new(
            CredentialSource::Live(store),
            DegradedDirectory::builtin(),
            PasswordVerifier::new(),
            tokens,
        )
    }

    /// Degraded-mode service with the builtin directory.
    pub fn degraded(tokens: Arc<TokenIssuer>) -> Self {
        Self::new(
            CredentialSource::Degraded,
            DegradedDirectory::builtin(),
            PasswordVerifier::new(),
            tokens,
        )
    }

    pub fn mode(&self) -> StoreMode {
        match self.source {
            CredentialSource::Live(_) => StoreMode::Live,
            CredentialSource::Degraded => StoreMode::Degraded,
        }
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    pub async fn login_admin(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AccessGrant, AccessError> {
        self.login(email, password, Role::Admin).await
    }

    pub async fn login_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AccessGrant, AccessError> {
        self.login(email, password, Role::User).await
    }

    /// Authenticate against `expected_role`.
    ///
    /// The issued token always carries `expected_role`. An account whose
    /// stored role differs fails exactly like a wrong password.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        expected_role: Role,
    ) -> Result<AccessGrant, AccessError> {
        let profile = match &self.source {
            CredentialSource::Degraded => self
                .directory
                .authenticate(email, password, expected_role)
                .map(|identity| identity.profile()),
            CredentialSource::Live(store) => {
                self.check_live(store.as_ref(), email, password, expected_role)
                    .await?
            }
        };

        let Some(profile) = profile else {
            tracing::info!(role = %expected_role, mode = %self.mode(), "login rejected");
            return Err(AccessError::InvalidCredentials);
        };

        let token = self.tokens.issue(&profile.id, expected_role)?;
        tracing::info!(
            subject = %profile.id,
            role = %expected_role,
            mode = %self.mode(),
            "login succeeded"
        );
        Ok(AccessGrant {
            token,
            user: profile,
        })
    }

    async fn check_live(
        &self,
        store: &dyn CredentialStore,
        email: &str,
        password: &str,
        expected_role: Role,
    ) -> Result<Option<UserProfile>, AccessError> {
        let found = store
            .find_by_email(email)
            .await?
            .filter(|user| user.role == expected_role);
        let Some(user) = found else {
            // Same Argon2 cost as a wrong password.
            self.passwords.verify_decoy(password.to_string()).await?;
            return Ok(None);
        };
        let verified = self
            .passwords
            .verify(password.to_string(), user.password_hash.clone())
            .await?;
        Ok(verified.then(|| user.profile()))
    }

    /// Create a `user` account and log it in.
    ///
    /// A blank email or password is `InvalidInput` in both modes.
    ///
    /// In degraded mode nothing is stored: the token is bound to the
    /// degraded user sentinel and the account vanishes with the process.
    pub async fn signup_user(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<AccessGrant, AccessError> {
        if email.trim().is_empty() {
            return Err(AccessError::InvalidInput("email is required"));
        }
        if password.trim().is_empty() {
            return Err(AccessError::InvalidInput("password is required"));
        }
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(email)
            .to_string();

        let profile = match &self.source {
            CredentialSource::Degraded => {
                tracing::warn!("degraded-mode signup: account is not persisted");
                let sentinel = self.directory.sentinel_for(Role::User);
                UserProfile {
                    email: email.to_string(),
                    name,
                    ..sentinel.profile()
                }
            }
            CredentialSource::Live(store) => {
                if store.find_by_email(email).await?.is_some() {
                    return Err(AccessError::EmailTaken);
                }
                let password_hash = self.passwords.hash(password.to_string()).await?;
                // The existence check above races with concurrent signups; the
                // store's unique constraint turns the loser into EmailTaken.
                let user = store
                    .create(NewUser {
                        email: email.to_string(),
                        password_hash,
                        role: Role::User,
                        name,
                        credits: SIGNUP_CREDITS,
                    })
                    .await?;
                user.profile()
            }
        };

        let token = self.tokens.issue(&profile.id, Role::User)?;
        tracing::info!(subject = %profile.id, mode = %self.mode(), "signup succeeded");
        Ok(AccessGrant {
            token,
            user: profile,
        })
    }

    /// Validate a bearer token for downstream request authorization.
    pub fn validate_session(&self, token: &str) -> Result<SessionClaims, TokenError> {
        self.tokens.validate(token)
    }
}
