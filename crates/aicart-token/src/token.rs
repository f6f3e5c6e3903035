//! Session token issuance and validation.

use crate::claims::SessionClaims;
use crate::error::TokenError;
use crate::keys::KeyPair;
use aicart_core::{MAX_LIFETIME_DAYS, Role, TokenConfig};
use biscuit_auth::builder::AuthorizerBuilder;
use biscuit_auth::macros::{check, fact};
use biscuit_auth::{Authorizer, Biscuit, PublicKey};
use chrono::{DateTime, Duration, Utc};

/// Default session lifetime.
pub const DEFAULT_LIFETIME_DAYS: i64 = 7;

/// Issues session tokens and validates them against its own key.
pub struct TokenIssuer {
    keypair: KeyPair,
    lifetime: Duration,
    verifier: TokenVerifier,
}

impl TokenIssuer {
    pub fn new(keypair: KeyPair, lifetime: Duration) -> Self {
        let verifier = TokenVerifier::new(keypair.public_key());
        Self {
            keypair,
            lifetime,
            verifier,
        }
    }

    /// Build an issuer from configuration.
    ///
    /// Without a configured key an ephemeral one is generated; tokens issued
    /// with it stop validating when the process restarts.
    pub fn from_config(config: &TokenConfig) -> Result<Self, TokenError> {
        let keypair = match config.resolve_private_key()? {
            Some(hex) => KeyPair::from_private_key_hex(&hex)?,
            None => {
                tracing::warn!(
                    "no token signing key configured; generating an ephemeral key (sessions will not survive restart)"
                );
                KeyPair::generate()?
            }
        };
        let lifetime = Duration::try_days(config.lifetime_days)
            .filter(|_| (1..=MAX_LIFETIME_DAYS).contains(&config.lifetime_days))
            .ok_or(TokenError::InvalidLifetime(config.lifetime_days))?;
        Ok(Self::new(keypair, lifetime))
    }

    pub fn public_key(&self) -> PublicKey {
        self.keypair.public_key()
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issue a token for `subject` with `role`, valid from now.
    pub fn issue(&self, subject: &str, role: Role) -> Result<String, TokenError> {
        self.issue_at(subject, role, Utc::now())
    }

    /// Issue a token as if the current time were `issued_at`.
    pub fn issue_at(
        &self,
        subject: &str,
        role: Role,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let expires_at = issued_at
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| TokenError::CreationFailed("expiry out of range".to_string()))?;
        let issued_ts = issued_at.timestamp();
        let expires_ts = expires_at.timestamp();

        let builder = Biscuit::builder()
            .fact(fact!("subject({subject})", subject = subject.to_string()))
            .and_then(|b| b.fact(fact!("role({role})", role = role.as_str().to_string())))
            .and_then(|b| b.fact(fact!("issued_at({ts})", ts = issued_ts)))
            .and_then(|b| b.fact(fact!("expires_at({ts})", ts = expires_ts)))
            .and_then(|b| {
                b.check(check!(
                    "check if time($time), $time < {expires_at}",
                    expires_at = expires_ts
                ))
            })
            .map_err(|e| TokenError::CreationFailed(e.to_string()))?;

        let biscuit = builder
            .build(self.keypair.inner())
            .map_err(|e| TokenError::CreationFailed(e.to_string()))?;

        biscuit
            .to_base64()
            .map_err(|e| TokenError::CreationFailed(e.to_string()))
    }

    /// Validate a token and return its claims.
    pub fn validate(&self, token: &str) -> Result<SessionClaims, TokenError> {
        self.verifier.verify(token)
    }

    /// Validate a token as if the current time were `now`.
    pub fn validate_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<SessionClaims, TokenError> {
        self.verifier.verify_at(token, now)
    }
}

/// Validates session tokens with only the public half of the signing key.
#[derive(Clone)]
pub struct TokenVerifier {
    public_key: PublicKey,
}

impl TokenVerifier {
    pub fn new(public_key: PublicKey) -> Self {
        Self { public_key }
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError> {
        // Parsing checks the signature chain against the root key.
        let biscuit = Biscuit::from_base64(token.trim(), self.public_key.clone())
            .map_err(|e| TokenError::Invalid(e.to_string()))?;

        let now_ts = now.timestamp();
        let mut authorizer = AuthorizerBuilder::new()
            .code(format!(
                r#"
                time({now_ts});
                allow if true;
                "#
            ))
            .map_err(|e| TokenError::Invalid(e.to_string()))?
            .build(&biscuit)
            .map_err(|e| TokenError::Invalid(e.to_string()))?;

        let subject = query_string(&mut authorizer, "subject")?;
        let role = query_string(&mut authorizer, "role")?
            .parse::<Role>()
            .map_err(|e| TokenError::Invalid(e.to_string()))?;
        let issued_at = to_datetime(query_i64(&mut authorizer, "issued_at")?)?;
        let expires_at = to_datetime(query_i64(&mut authorizer, "expires_at")?)?;

        let claims = SessionClaims {
            subject,
            role,
            issued_at,
            expires_at,
        };

        if claims.is_expired_at(now) {
            return Err(TokenError::Invalid(format!(
                "token expired at {}",
                claims.expires_at.to_rfc3339()
            )));
        }

        authorizer
            .authorize()
            .map_err(|e| TokenError::Invalid(e.to_string()))?;

        Ok(claims)
    }
}

fn fact_rule(name: &str) -> Result<biscuit_auth::builder::Rule, TokenError> {
    format!("data($x) <- {name}($x)")
        .parse()
        .map_err(|e: biscuit_auth::error::Token| TokenError::Invalid(e.to_string()))
}

fn query_string(authorizer: &mut Authorizer, name: &str) -> Result<String, TokenError> {
    let results: Vec<(String,)> = authorizer
        .query(fact_rule(name)?)
        .map_err(|e| TokenError::Invalid(e.to_string()))?;
    single(results, name)
}

fn query_i64(authorizer: &mut Authorizer, name: &str) -> Result<i64, TokenError> {
    let results: Vec<(i64,)> = authorizer
        .query(fact_rule(name)?)
        .map_err(|e| TokenError::Invalid(e.to_string()))?;
    single(results, name)
}

// Exactly one value per claim; anything else means the token was not minted here.
fn single<T>(results: Vec<(T,)>, name: &str) -> Result<T, TokenError> {
    let mut iter = results.into_iter();
    match (iter.next(), iter.next()) {
        (Some((value,)), None) => Ok(value),
        (None, _) => Err(TokenError::Invalid(format!("missing claim: {name}"))),
        (Some(_), Some(_)) => Err(TokenError::Invalid(format!("ambiguous claim: {name}"))),
    }
}

fn to_datetime(ts: i64) -> Result<DateTime<Utc>, TokenError> {
    DateTime::from_timestamp(ts, 0)
        .ok_or_else(|| TokenError::Invalid(format!("timestamp out of range: {ts}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(
            KeyPair::generate().unwrap(),
            Duration::days(DEFAULT_LIFETIME_DAYS),
        )
    }

    #[test]
    fn test_issue_and_validate() {
        let issuer = issuer();
        let token = issuer.issue("user-42", Role::Admin).unwrap();

        let claims = issuer.validate(&token).unwrap();
        assert_eq!(claims.subject, "user-42");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.expires_at - claims.issued_at, Duration::days(7));
        assert_eq!(issuer.lifetime(), Duration::days(7));
    }

    #[test]
    fn test_from_config_rejects_unrepresentable_lifetime() {
        for days in [0, MAX_LIFETIME_DAYS + 1, 10_000_000_000_000, i64::MAX] {
            let config = TokenConfig {
                private_key_env: None,
                private_key_file: None,
                lifetime_days: days,
            };
            assert!(matches!(
                TokenIssuer::from_config(&config),
                Err(TokenError::InvalidLifetime(d)) if d == days
            ));
        }
    }

    #[test]
    fn test_from_config_uses_configured_lifetime() {
        let config = TokenConfig {
            private_key_env: None,
            private_key_file: None,
            lifetime_days: 30,
        };
        let issuer = TokenIssuer::from_config(&config).unwrap();
        assert_eq!(issuer.lifetime(), Duration::days(30));
    }

    #[test]
    fn test_issue_with_expiry_out_of_range_is_error() {
        let issuer = TokenIssuer::new(KeyPair::generate().unwrap(), Duration::days(1_000_000_000));
        assert!(matches!(
            issuer.issue("u", Role::User),
            Err(TokenError::CreationFailed(_))
        ));
    }

    #[test]
    fn test_subject_with_datalog_metacharacters() {
        let issuer = issuer();
        let subject = r#"evil"); role("admin"#;
        let token = issuer.issue(subject, Role::User).unwrap();

        let claims = issuer.validate(&token).unwrap();
        assert_eq!(claims.subject, subject);
        assert_eq!(claims.role, Role::User);
    }

    #[test]
    fn test_valid_just_before_expiry() {
        let issuer = issuer();
        let issued_at = Utc::now() - Duration::days(7) + Duration::minutes(1);
        let token = issuer.issue_at("u", Role::User, issued_at).unwrap();
        assert!(issuer.validate(&token).is_ok());
    }

    #[test]
    fn test_expired_token_is_invalid() {
        let issuer = issuer();
        let issued_at = Utc::now() - Duration::days(8);
        let token = issuer.issue_at("u", Role::User, issued_at).unwrap();

        assert!(matches!(issuer.validate(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_validate_at_future_time() {
        let issuer = issuer();
        let token = issuer.issue("u", Role::User).unwrap();
        let later = Utc::now() + Duration::days(7) + Duration::seconds(1);

        assert!(matches!(
            issuer.validate_at(&token, later),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_foreign_key_is_invalid() {
        let token = issuer().issue("u", Role::Admin).unwrap();
        assert!(matches!(issuer().validate(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_garbage_is_invalid() {
        assert!(matches!(
            issuer().validate("definitely-not-a-token"),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_verifier_with_public_key_only() {
        let issuer = issuer();
        let token = issuer.issue("u-7", Role::User).unwrap();

        let verifier = TokenVerifier::new(issuer.public_key());
        assert_eq!(verifier.verify(&token).unwrap().subject, "u-7");
    }
}
